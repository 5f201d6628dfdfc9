use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Retrieval strategy for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Rss,
    Html,
    Email,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Rss => "rss",
            SourceKind::Html => "html",
            SourceKind::Email => "email",
        }
    }

    /// Unknown values fall back to `rss`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "html" => SourceKind::Html,
            "email" => SourceKind::Email,
            _ => SourceKind::Rss,
        }
    }
}

/// Fixed category set; anything else maps to `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Crypto,
    Marketing,
    Tech,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Crypto => "Crypto",
            Category::Marketing => "Marketing",
            Category::Tech => "Tech",
            Category::General => "General",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "crypto" => Category::Crypto,
            "marketing" => Category::Marketing,
            "tech" => Category::Tech,
            _ => Category::General,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Stable slug, primary key. Derived from name or URL hostname
    /// when not supplied explicitly.
    pub id: String,
    pub name: String,
    pub url: String,
    pub kind: SourceKind,
    pub category: Category,
    /// User-controlled; never overwritten by sync.
    pub enabled: bool,
    pub added_at: DateTime<Utc>,
}

impl Source {
    pub fn new(id: String, name: String, url: String) -> Self {
        Self {
            id,
            name,
            url,
            kind: SourceKind::Rss,
            category: Category::General,
            enabled: true,
            added_at: Utc::now(),
        }
    }
}
