//! Item extraction from ad-hoc HTML pages.
//!
//! Sources of kind `html` have no machine-readable feed; items are scraped
//! out of the page markup. A small per-site rule table handles known layouts
//! and a generic anchor scan covers the rest.

use std::collections::HashSet;

use chrono::Utc;
use html_escape::decode_html_entities;
use regex::Regex;
use url::Url;

use crate::domain::{NewItem, Source};
use crate::normalizer::dedup::MAX_ITEMS_PER_SOURCE;

/// Anchors with shorter decoded text than this are navigation chrome,
/// not articles.
const MIN_TITLE_LEN: usize = 12;

struct SiteRule {
    host_suffix: &'static str,
    pattern: Regex,
}

pub struct HtmlExtractor {
    generic: Regex,
    tag_strip: Regex,
    rules: Vec<SiteRule>,
}

impl HtmlExtractor {
    pub fn new() -> Self {
        let rules = vec![SiteRule {
            host_suffix: "news.ycombinator.com",
            pattern: Regex::new(
                r#"(?si)<span class="titleline">\s*<a href="([^"]+)"[^>]*>(.*?)</a>"#,
            )
            .expect("valid site rule regex"),
        }];

        Self {
            generic: Regex::new(r#"(?si)<a\s[^>]*href=["']([^"'#]+)["'][^>]*>(.*?)</a>"#)
                .expect("valid anchor regex"),
            tag_strip: Regex::new(r"<[^>]+>").expect("valid tag regex"),
            rules,
        }
    }

    /// Scrape candidate items out of a page fetched for `source`. Links are
    /// resolved against the source URL; with the generic rule only same-host
    /// links qualify. Capped per source before the global merge.
    pub fn extract(&self, source: &Source, html: &str) -> Vec<NewItem> {
        let Ok(base) = Url::parse(&source.url) else {
            return Vec::new();
        };

        let (pattern, same_host_only) = match self.site_rule(&base) {
            Some(rule) => (rule, false),
            None => (&self.generic, true),
        };

        let now = Utc::now();
        let mut seen: HashSet<String> = HashSet::new();
        let mut items = Vec::new();

        for caps in pattern.captures_iter(html) {
            let (Some(href), Some(raw_title)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let Ok(resolved) = base.join(href.as_str()) else {
                continue;
            };
            if !matches!(resolved.scheme(), "http" | "https") {
                continue;
            }
            if same_host_only && resolved.host_str() != base.host_str() {
                continue;
            }

            let title = decode_html_entities(&self.tag_strip.replace_all(raw_title.as_str(), " "))
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            if title.len() < MIN_TITLE_LEN {
                continue;
            }

            let mut url = resolved;
            url.set_fragment(None);
            if !seen.insert(url.to_string()) {
                continue;
            }

            let mut item = NewItem::new(&source.id, &title, url.as_str());
            item.fetched_at = now;
            items.push(item);
            if items.len() >= MAX_ITEMS_PER_SOURCE {
                break;
            }
        }

        items
    }

    fn site_rule(&self, base: &Url) -> Option<&Regex> {
        let host = base.host_str()?;
        self.rules
            .iter()
            .find(|rule| host.ends_with(rule.host_suffix))
            .map(|rule| &rule.pattern)
    }
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html_source(url: &str) -> Source {
        let mut source = Source::new("blog".into(), "Blog".into(), url.into());
        source.kind = crate::domain::SourceKind::Html;
        source
    }

    #[test]
    fn test_generic_extracts_same_host_articles() {
        let html = r#"
            <a href="/posts/first-interesting-article">A first interesting article</a>
            <a href="https://example.com/posts/second-article">The second long article</a>
            <a href="https://elsewhere.com/offsite-article-here">Offsite article link text</a>
            <a href="/nav">Home</a>
        "#;
        let extractor = HtmlExtractor::new();
        let items = extractor.extract(&html_source("https://example.com/blog"), html);

        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].url,
            "https://example.com/posts/first-interesting-article"
        );
        assert_eq!(items[0].title, "A first interesting article");
        assert_eq!(items[0].source_id, "blog");
    }

    #[test]
    fn test_short_titles_and_duplicates_skipped() {
        let html = r#"
            <a href="/posts/a">A long enough title here</a>
            <a href="/posts/a">A long enough title here</a>
            <a href="/posts/b">tiny</a>
        "#;
        let extractor = HtmlExtractor::new();
        let items = extractor.extract(&html_source("https://example.com"), html);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_inner_tags_stripped_and_entities_decoded() {
        let html = r#"<a href="/posts/a"><b>Bold</b> &amp; decoded title text</a>"#;
        let extractor = HtmlExtractor::new();
        let items = extractor.extract(&html_source("https://example.com"), html);
        assert_eq!(items[0].title, "Bold & decoded title text");
    }

    #[test]
    fn test_site_rule_allows_offsite_links() {
        let html = r#"
            <span class="titleline"><a href="https://elsewhere.com/story">A story hosted elsewhere</a></span>
            <a href="https://news.ycombinator.com/item?id=1">A same host comment link</a>
        "#;
        let extractor = HtmlExtractor::new();
        let items = extractor.extract(&html_source("https://news.ycombinator.com"), html);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://elsewhere.com/story");
    }

    #[test]
    fn test_per_source_cap() {
        let mut html = String::new();
        for i in 0..MAX_ITEMS_PER_SOURCE + 20 {
            html.push_str(&format!(
                r#"<a href="/posts/{i}">A sufficiently long title number {i}</a>"#
            ));
        }
        let extractor = HtmlExtractor::new();
        let items = extractor.extract(&html_source("https://example.com"), &html);
        assert_eq!(items.len(), MAX_ITEMS_PER_SOURCE);
    }

    #[test]
    fn test_invalid_source_url_yields_nothing() {
        let extractor = HtmlExtractor::new();
        let items = extractor.extract(&html_source("not a url"), "<a href='/x'>whatever here</a>");
        assert!(items.is_empty());
    }
}
