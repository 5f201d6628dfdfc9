//! In-memory deduplication over one fetch cycle's results.
//!
//! Collapses candidates sharing an identity key, keeping the most recently
//! published version. Persisted-store merges are the store's upsert job,
//! not this module's.

use std::collections::HashMap;

use crate::domain::NewItem;

/// Global retention ceiling after merging a cycle's batches.
pub const MAX_ITEMS_PER_CYCLE: usize = 500;
/// Per-source cap applied before the global merge, bounding any single
/// source's influence.
pub const MAX_ITEMS_PER_SOURCE: usize = 30;

/// Collapse colliding items (same identity key) keeping the later
/// `published_at`, then sort by published time descending and truncate
/// to the global ceiling. Undated items sort last.
pub fn merge(items: Vec<NewItem>) -> Vec<NewItem> {
    let mut order: Vec<String> = Vec::with_capacity(items.len());
    let mut by_key: HashMap<String, NewItem> = HashMap::with_capacity(items.len());

    for item in items {
        let key = item.identity_key();
        match by_key.get_mut(&key) {
            Some(existing) => {
                // Last-write-wins by recency; a dateless incoming copy
                // never displaces a dated one.
                if item.published_at > existing.published_at {
                    *existing = item;
                }
            }
            None => {
                order.push(key.clone());
                by_key.insert(key, item);
            }
        }
    }

    let mut merged: Vec<NewItem> = order
        .into_iter()
        .filter_map(|key| by_key.remove(&key))
        .collect();

    merged.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    merged.truncate(MAX_ITEMS_PER_CYCLE);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn dated(url: &str, title: &str, published: &str) -> NewItem {
        let mut item = NewItem::new("src", title, url);
        item.published_at = Some(published.parse::<DateTime<Utc>>().unwrap());
        item
    }

    #[test]
    fn test_merge_same_url_keeps_later_published() {
        let old = dated("https://x.com/a", "A", "2024-01-01T00:00:00Z");
        let new = dated("https://x.com/a", "A'", "2024-01-02T00:00:00Z");
        let merged = merge(vec![old, new]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "A'");
    }

    #[test]
    fn test_merge_ignores_earlier_duplicate() {
        let new = dated("https://x.com/a", "A'", "2024-01-02T00:00:00Z");
        let old = dated("https://x.com/a", "A", "2024-01-01T00:00:00Z");
        let merged = merge(vec![new, old]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "A'");
    }

    #[test]
    fn test_merge_urlless_by_source_and_title() {
        let mut first = NewItem::new("src", "Same Title", "");
        first.published_at = Some("2024-01-01T00:00:00Z".parse().unwrap());
        let mut second = NewItem::new("src", "Same Title", "");
        second.published_at = Some("2024-01-03T00:00:00Z".parse().unwrap());
        second.author = Some("later".into());

        let merged = merge(vec![first, second]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].author.as_deref(), Some("later"));
    }

    #[test]
    fn test_merge_distinct_keys_survive() {
        let a = dated("https://x.com/a", "A", "2024-01-01T00:00:00Z");
        let b = dated("https://x.com/b", "B", "2024-01-02T00:00:00Z");
        let merged = merge(vec![a, b]);
        assert_eq!(merged.len(), 2);
        // Sorted by published desc
        assert_eq!(merged[0].title, "B");
    }

    #[test]
    fn test_dateless_never_displaces_dated() {
        let dated_item = dated("https://x.com/a", "Dated", "2024-01-01T00:00:00Z");
        let undated = NewItem::new("src", "Undated", "https://x.com/a");
        let merged = merge(vec![dated_item, undated]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "Dated");
    }

    #[test]
    fn test_undated_items_sort_last() {
        let undated = NewItem::new("src", "Undated", "https://x.com/u");
        let dated_item = dated("https://x.com/a", "Dated", "2020-01-01T00:00:00Z");
        let merged = merge(vec![undated, dated_item]);
        assert_eq!(merged[0].title, "Dated");
        assert_eq!(merged[1].title, "Undated");
    }

    #[test]
    fn test_global_ceiling_truncates() {
        let items: Vec<NewItem> = (0..MAX_ITEMS_PER_CYCLE + 50)
            .map(|i| {
                dated(
                    &format!("https://x.com/{i}"),
                    &format!("Item {i}"),
                    "2024-01-01T00:00:00Z",
                )
            })
            .collect();
        assert_eq!(merge(items).len(), MAX_ITEMS_PER_CYCLE);
    }
}
