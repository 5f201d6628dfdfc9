use thiserror::Error;

#[derive(Error, Debug)]
pub enum InletError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid item ({url}): missing {field}")]
    InvalidItem { url: String, field: &'static str },

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Sync failed: HTTP {status}: {body}")]
    SyncFailed { status: u16, body: String },

    #[error("A sync pass is already in flight")]
    SyncInFlight,

    #[error("Could not discover a feed at {0}")]
    DiscoveryFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, InletError>;
