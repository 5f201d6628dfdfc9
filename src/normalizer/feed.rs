use chrono::Utc;
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{InletError, Result};
use crate::domain::{NewItem, Source};
use crate::normalizer::dedup::MAX_ITEMS_PER_SOURCE;

#[derive(Debug, Clone)]
pub struct FeedMeta {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Maps raw RSS/Atom bytes into canonical items for one source.
#[derive(Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse a feed body and normalize its entries. Entries without a link
    /// are rejected (the url is the item's identity); entries without a
    /// title fall back to the decoded summary line or are rejected.
    pub fn normalize(&self, source: &Source, body: &[u8]) -> Result<(FeedMeta, Vec<NewItem>)> {
        let feed = parser::parse(body).map_err(|e| InletError::FeedParse(e.to_string()))?;

        let meta = FeedMeta {
            title: feed
                .title
                .map(|t| decode_html_entities(&t.content).to_string()),
            description: feed
                .description
                .map(|d| decode_html_entities(&d.content).to_string()),
        };

        let now = Utc::now();
        let items: Vec<NewItem> = feed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let link = entry.links.first().map(|l| l.href.clone())?;
                let title = entry
                    .title
                    .map(|t| decode_html_entities(&t.content).trim().to_string())
                    .filter(|t| !t.is_empty())?;

                let mut item = NewItem::new(&source.id, &title, &link);
                item.fetched_at = now;
                item.author = entry.authors.first().map(|a| a.name.clone());
                item.published_at = entry
                    .published
                    .or(entry.updated)
                    .map(|dt| dt.with_timezone(&Utc));
                item.content_md = entry
                    .content
                    .and_then(|c| c.body)
                    .map(|b| decode_html_entities(&b).to_string());
                item.summary = entry
                    .summary
                    .map(|s| decode_html_entities(&s.content).to_string());
                Some(item)
            })
            .take(MAX_ITEMS_PER_SOURCE)
            .collect();

        Ok((meta, items))
    }
}
