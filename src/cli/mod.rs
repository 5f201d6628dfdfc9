pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "inlet")]
#[command(about = "A personal feed aggregator with triage", long_about = None)]
pub struct Cli {
    /// Database file (overrides the configured path)
    #[arg(long, global = true)]
    pub db: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a source
    Add {
        /// Feed or site URL
        url: String,

        /// Crawl the page for a feed link instead of using the URL as-is
        #[arg(long)]
        discover: bool,

        /// Display name (also seeds the source id)
        #[arg(short, long)]
        name: Option<String>,

        /// crypto, marketing, tech or general
        #[arg(short, long)]
        category: Option<String>,

        /// rss, html or email
        #[arg(short, long)]
        kind: Option<String>,
    },
    /// Re-enable a disabled source
    Enable {
        /// Source id
        id: String,
    },
    /// Disable a source without losing its items
    Disable {
        /// Source id
        id: String,
    },
    /// List sources or items
    List {
        /// Show items instead of sources
        #[arg(long)]
        items: bool,

        /// Start from a saved view in settings.json
        #[arg(long)]
        view: Option<String>,

        /// Filter by status (unread, read, clipped, dismissed, saved)
        #[arg(long)]
        status: Option<String>,

        /// Filter by source id
        #[arg(long)]
        source: Option<String>,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Minimum score
        #[arg(long)]
        min_score: Option<f64>,

        /// Sort order: published, fetched or score
        #[arg(long)]
        order: Option<String>,

        /// Page size
        #[arg(long)]
        limit: Option<u32>,

        /// Rows to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Fetch all enabled sources now
    Refresh,
    /// Pull items from the configured remote endpoint
    Sync,
    /// Mark an item read
    Read {
        /// Item url
        url: String,
    },
    /// Move an item between triage buckets (inbox, later, archive)
    Triage {
        /// Item url
        url: String,
        /// Target bucket
        bucket: String,
    },
    /// Clip an item for later reference
    Clip {
        /// Item url
        url: String,
    },
    /// Dismiss an item
    Dismiss {
        /// Item url
        url: String,
    },
    /// Flag an item as a content idea
    Idea {
        /// Item url
        url: String,
        /// Optional note stored with the action
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Generate a TLDR digest for an item
    Summarize {
        /// Item url
        url: String,
    },
    /// Run the refresh/sync loop in the foreground
    Daemon {
        /// Update interval (e.g., "1h", "30m", "6h", "1d")
        #[arg(short, long, default_value = "1h")]
        interval: String,

        /// Skip the initial update on start
        #[arg(long)]
        no_initial_update: bool,
    },
}
