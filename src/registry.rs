//! Built-in source registry: the starter set seeded into a fresh store.
//! Seeding is idempotent and never touches rows the user already has, so
//! a disabled built-in stays disabled.

use crate::app::Result;
use crate::domain::{Category, Source, SourceKind};
use crate::store::Store;

pub struct BuiltinSource {
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
    pub kind: SourceKind,
    pub category: Category,
}

pub const BUILTIN_SOURCES: &[BuiltinSource] = &[
    BuiltinSource {
        id: "coindesk",
        name: "CoinDesk",
        url: "https://www.coindesk.com/arc/outboundfeeds/rss/",
        kind: SourceKind::Rss,
        category: Category::Crypto,
    },
    BuiltinSource {
        id: "decrypt",
        name: "Decrypt",
        url: "https://decrypt.co/feed",
        kind: SourceKind::Rss,
        category: Category::Crypto,
    },
    BuiltinSource {
        id: "moz-blog",
        name: "Moz Blog",
        url: "https://moz.com/posts/rss/blog",
        kind: SourceKind::Rss,
        category: Category::Marketing,
    },
    BuiltinSource {
        id: "seth-godin",
        name: "Seth's Blog",
        url: "https://seths.blog/feed/",
        kind: SourceKind::Rss,
        category: Category::Marketing,
    },
    BuiltinSource {
        id: "techcrunch",
        name: "TechCrunch",
        url: "https://techcrunch.com/feed/",
        kind: SourceKind::Rss,
        category: Category::Tech,
    },
    BuiltinSource {
        id: "ars-technica",
        name: "Ars Technica",
        url: "https://feeds.arstechnica.com/arstechnica/index",
        kind: SourceKind::Rss,
        category: Category::Tech,
    },
    BuiltinSource {
        id: "hacker-news",
        name: "Hacker News",
        url: "https://news.ycombinator.com/",
        kind: SourceKind::Html,
        category: Category::Tech,
    },
    BuiltinSource {
        id: "bbc-news",
        name: "BBC News",
        url: "https://feeds.bbci.co.uk/news/rss.xml",
        kind: SourceKind::Rss,
        category: Category::General,
    },
];

/// Insert missing built-ins; returns how many were newly created.
pub fn seed<S: Store>(store: &S) -> Result<usize> {
    let mut created = 0;
    for builtin in BUILTIN_SOURCES {
        if store.get_source(builtin.id)?.is_some() {
            continue;
        }
        let mut source = Source::new(
            builtin.id.to_string(),
            builtin.name.to_string(),
            builtin.url.to_string(),
        );
        source.kind = builtin.kind;
        source.category = builtin.category;
        store.upsert_source(&source)?;
        created += 1;
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    #[test]
    fn test_seed_is_idempotent() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(seed(&store).unwrap(), BUILTIN_SOURCES.len());
        assert_eq!(seed(&store).unwrap(), 0);
        assert_eq!(store.get_all_sources().unwrap().len(), BUILTIN_SOURCES.len());
    }

    #[test]
    fn test_seed_leaves_disabled_source_alone() {
        let store = SqliteStore::in_memory().unwrap();
        seed(&store).unwrap();
        store.set_source_enabled("techcrunch", false).unwrap();

        seed(&store).unwrap();
        assert!(!store.get_source("techcrunch").unwrap().unwrap().enabled);
    }

    #[test]
    fn test_builtin_ids_are_unique_slugs() {
        use crate::normalizer::slugify;
        let mut seen = std::collections::HashSet::new();
        for builtin in BUILTIN_SOURCES {
            assert!(seen.insert(builtin.id), "duplicate id {}", builtin.id);
            assert_eq!(builtin.id, slugify(builtin.id));
        }
    }
}
