pub mod sqlite;

use crate::app::Result;
use crate::domain::{ActionKind, Category, Item, ItemStatus, NewItem, Source, UserAction};

pub use sqlite::SqliteStore;

/// Metadata key holding the sync watermark.
pub const SYNC_CURSOR_KEY: &str = "sync.last_success_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    /// Published time, falling back to fetch time for undated items.
    #[default]
    Published,
    Fetched,
    Score,
}

/// Query shape for [`Store::get_items`].
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Empty means any status.
    pub statuses: Vec<ItemStatus>,
    pub source_id: Option<String>,
    pub category: Option<Category>,
    pub min_score: Option<f64>,
    pub order: OrderBy,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl ItemFilter {
    pub fn with_status(status: ItemStatus) -> Self {
        Self {
            statuses: vec![status],
            ..Self::default()
        }
    }
}

pub trait Store {
    // Source operations. Sources are never hard-deleted; disable instead.
    //
    // `upsert_source` replaces name/url/kind/category/enabled/added_at
    // wholesale. Callers reconciling remote data must re-inject the
    // previously stored `enabled` and `added_at` first, or they will
    // silently re-enable a user-disabled source.
    fn upsert_source(&self, source: &Source) -> Result<()>;
    fn get_source(&self, id: &str) -> Result<Option<Source>>;
    fn get_all_sources(&self) -> Result<Vec<Source>>;
    fn get_enabled_sources(&self) -> Result<Vec<Source>>;
    fn set_source_enabled(&self, id: &str, enabled: bool) -> Result<()>;

    // Item operations, keyed externally by url.
    fn upsert_item(&self, item: &NewItem) -> Result<()>;
    /// Upsert a batch inside one transaction; returns how many were new rows.
    fn upsert_items(&self, items: &[NewItem]) -> Result<usize>;
    fn get_item_by_url(&self, url: &str) -> Result<Option<Item>>;
    fn get_items(&self, filter: &ItemFilter) -> Result<Vec<Item>>;
    fn update_item_status(&self, url: &str, status: ItemStatus) -> Result<()>;
    fn set_item_summary(&self, url: &str, summary: &str) -> Result<()>;
    fn count_items(&self) -> Result<i64>;

    // Append-only action log.
    fn record_action(
        &self,
        item_id: i64,
        action: ActionKind,
        metadata_json: Option<&str>,
    ) -> Result<i64>;
    fn get_actions_for_item(&self, item_id: i64) -> Result<Vec<UserAction>>;

    // Key/value metadata (sync cursor lives here).
    fn get_meta(&self, key: &str) -> Result<Option<String>>;
    fn set_meta(&self, key: &str, value: &str) -> Result<()>;
}
