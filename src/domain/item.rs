use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Triage state of a persisted item. User-driven; never reset by a re-sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Unread,
    Read,
    Clipped,
    Dismissed,
    Saved,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Unread => "unread",
            ItemStatus::Read => "read",
            ItemStatus::Clipped => "clipped",
            ItemStatus::Dismissed => "dismissed",
            ItemStatus::Saved => "saved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unread" => Some(ItemStatus::Unread),
            "read" => Some(ItemStatus::Read),
            "clipped" => Some(ItemStatus::Clipped),
            "dismissed" => Some(ItemStatus::Dismissed),
            "saved" => Some(ItemStatus::Saved),
            _ => None,
        }
    }
}

/// Coarse three-way triage view projected from [`ItemStatus`].
/// The projection is lossy: several statuses collapse into one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Inbox,
    Later,
    Archive,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Inbox => "inbox",
            Bucket::Later => "later",
            Bucket::Archive => "archive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "inbox" => Some(Bucket::Inbox),
            "later" => Some(Bucket::Later),
            "archive" => Some(Bucket::Archive),
            _ => None,
        }
    }

    /// Status written when an item is moved into this bucket.
    /// Archive always implies read.
    pub fn to_status(self) -> ItemStatus {
        match self {
            Bucket::Inbox => ItemStatus::Unread,
            Bucket::Later => ItemStatus::Saved,
            Bucket::Archive => ItemStatus::Read,
        }
    }

    /// Bucket an existing status projects into.
    pub fn from_status(status: ItemStatus) -> Self {
        match status {
            ItemStatus::Unread => Bucket::Inbox,
            ItemStatus::Saved | ItemStatus::Clipped => Bucket::Later,
            ItemStatus::Read | ItemStatus::Dismissed => Bucket::Archive,
        }
    }
}

/// A normalized item candidate, not yet persisted. The `url` is the sole
/// external identity: two candidates with the same url are the same item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub source_id: String,
    pub title: String,
    pub url: String,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
    pub content_md: Option<String>,
    pub content_text: Option<String>,
    pub summary: Option<String>,
    pub score: f64,
}

impl NewItem {
    pub fn new(source_id: &str, title: &str, url: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            author: None,
            published_at: None,
            fetched_at: Utc::now(),
            content_md: None,
            content_text: None,
            summary: None,
            score: 0.0,
        }
    }

    /// Dedup identity: the url when present, otherwise a hash of
    /// source + title so url-less records can still collapse.
    pub fn identity_key(&self) -> String {
        if !self.url.trim().is_empty() {
            return self.url.clone();
        }
        let mut hasher = Sha256::new();
        hasher.update(self.source_id.as_bytes());
        hasher.update(b"\x00");
        hasher.update(self.title.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// A persisted item row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub source_id: String,
    pub title: String,
    pub url: String,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
    pub content_md: Option<String>,
    pub content_text: Option<String>,
    pub summary: Option<String>,
    pub score: f64,
    pub status: ItemStatus,
    pub acted_at: Option<DateTime<Utc>>,
}

impl Item {
    pub fn bucket(&self) -> Bucket {
        Bucket::from_status(self.status)
    }

    /// Best available text for summarization or display.
    pub fn display_content(&self) -> &str {
        self.content_text
            .as_deref()
            .or(self.content_md.as_deref())
            .or(self.summary.as_deref())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_key_prefers_url() {
        let item = NewItem::new("src", "Title", "https://example.com/a");
        assert_eq!(item.identity_key(), "https://example.com/a");
    }

    #[test]
    fn test_identity_key_composite_when_url_empty() {
        let a = NewItem::new("src", "Title", "");
        let b = NewItem::new("src", "Title", "");
        let c = NewItem::new("src", "Other", "");
        assert_eq!(a.identity_key(), b.identity_key());
        assert_ne!(a.identity_key(), c.identity_key());
        assert_eq!(a.identity_key().len(), 64);
    }

    #[test]
    fn test_bucket_round_trip() {
        assert_eq!(Bucket::parse("inbox"), Some(Bucket::Inbox));
        assert_eq!(Bucket::parse("Archive"), Some(Bucket::Archive));
        assert_eq!(Bucket::parse("junk"), None);

        assert_eq!(Bucket::Archive.to_status(), ItemStatus::Read);
        assert_eq!(Bucket::Later.to_status(), ItemStatus::Saved);
        assert_eq!(Bucket::from_status(ItemStatus::Dismissed), Bucket::Archive);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ItemStatus::parse("saved"), Some(ItemStatus::Saved));
        assert_eq!(ItemStatus::parse("bogus"), None);
    }
}
