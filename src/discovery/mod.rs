//! Feed discovery: given an arbitrary publication URL, locate a
//! machine-readable feed by probing conventional paths and scanning HTML
//! for `<link rel="alternate">` tags.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use feed_rs::parser;
use regex::Regex;
use url::Url;

use crate::app::{InletError, Result};
use crate::fetcher::Fetcher;

/// Conventional feed locations probed when the URL itself isn't one.
pub const FEED_PATHS: &[&str] = &[
    "/feed",
    "/feed.xml",
    "/rss",
    "/rss.xml",
    "/atom.xml",
    "/index.xml",
    "/feed/",
    "/feeds/posts/default",
];

#[derive(Debug, Clone)]
pub struct DiscoveredFeed {
    pub url: String,
    pub title: Option<String>,
}

pub struct FeedDiscovery {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    link_rel_type: Regex,
    link_type_only: Regex,
}

impl FeedDiscovery {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        // Both attribute orders occur in the wild.
        let link_rel_type = Regex::new(
            r#"(?i)<link[^>]*rel=["']alternate["'][^>]*type=["']application/(?:rss|atom)\+xml["'][^>]*href=["']([^"']+)["']"#,
        )
        .expect("valid link regex");
        let link_type_only = Regex::new(
            r#"(?i)<link[^>]*type=["']application/(?:rss|atom)\+xml["'][^>]*href=["']([^"']+)["']"#,
        )
        .expect("valid link regex");

        Self {
            fetcher,
            link_rel_type,
            link_type_only,
        }
    }

    /// Breadth-first probe: the URL itself, then conventional paths, then
    /// anything advertised in fetched HTML. Returns the first body that
    /// parses as a feed; a drained queue is an explicit failure.
    pub async fn discover(&self, start: &str) -> Result<DiscoveredFeed> {
        let start_url = Url::parse(start)?;

        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(start_url.to_string());

        // Substack puts every publication's feed at /feed.
        if let Some(host) = start_url.host_str() {
            if host.ends_with("substack.com") {
                if let Ok(shortcut) = start_url.join("/feed") {
                    queue.push_back(shortcut.to_string());
                }
            }
        }

        if !path_looks_feedish(start_url.path()) {
            for feed_path in FEED_PATHS {
                // Origin-resolved variant
                if let Ok(candidate) = start_url.join(feed_path) {
                    queue.push_back(candidate.to_string());
                }
                // Path-relative variant, e.g. /blog + /feed -> /blog/feed
                let base_path = start_url.path().trim_end_matches('/');
                if !base_path.is_empty() {
                    if let Ok(candidate) = start_url.join(&format!("{base_path}{feed_path}")) {
                        queue.push_back(candidate.to_string());
                    }
                }
            }
        }

        let mut visited: HashSet<String> = HashSet::new();
        while let Some(candidate) = queue.pop_front() {
            if !visited.insert(candidate.clone()) {
                continue;
            }

            let body = match self.fetcher.fetch(&candidate).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("discovery probe {} failed: {}", candidate, e);
                    continue;
                }
            };

            if let Ok(feed) = parser::parse(&body[..]) {
                return Ok(DiscoveredFeed {
                    url: candidate,
                    title: feed.title.map(|t| t.content),
                });
            }

            // Not a feed; scan as HTML for advertised alternates.
            let html = String::from_utf8_lossy(&body);
            for href in self.scan_feed_links(&html) {
                if let Ok(base) = Url::parse(&candidate) {
                    if let Ok(resolved) = base.join(&href) {
                        let resolved = resolved.to_string();
                        if !visited.contains(&resolved) {
                            queue.push_back(resolved);
                        }
                    }
                }
            }
        }

        Err(InletError::DiscoveryFailed(start.to_string()))
    }

    fn scan_feed_links(&self, html: &str) -> Vec<String> {
        let mut links: Vec<String> = Vec::new();
        for re in [&self.link_rel_type, &self.link_type_only] {
            for caps in re.captures_iter(html) {
                if let Some(href) = caps.get(1) {
                    let href = href.as_str().to_string();
                    if !links.contains(&href) {
                        links.push(href);
                    }
                }
            }
        }
        links
    }
}

/// Paths that already look like a feed skip the conventional-path probes.
fn path_looks_feedish(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.ends_with(".xml")
        || lower.ends_with(".rss")
        || lower.ends_with(".atom")
        || lower.contains("feed")
        || lower.contains("rss")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FakeFetcher {
        bodies: HashMap<String, Vec<u8>>,
    }

    #[async_trait]
    impl Fetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| InletError::Other(format!("404: {url}")))
        }
    }

    const FEED_BODY: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Discovered Feed</title>
  <item><title>One</title><link>https://example.com/1</link></item>
</channel></rss>"#;

    fn discovery(bodies: HashMap<String, Vec<u8>>) -> FeedDiscovery {
        FeedDiscovery::new(Arc::new(FakeFetcher { bodies }))
    }

    #[tokio::test]
    async fn test_direct_feed_url() {
        let mut bodies = HashMap::new();
        bodies.insert("https://example.com/feed.xml".to_string(), FEED_BODY.into());

        let found = discovery(bodies)
            .discover("https://example.com/feed.xml")
            .await
            .unwrap();
        assert_eq!(found.url, "https://example.com/feed.xml");
        assert_eq!(found.title.as_deref(), Some("Discovered Feed"));
    }

    #[tokio::test]
    async fn test_conventional_path_probe() {
        let mut bodies = HashMap::new();
        bodies.insert(
            "https://example.com/blog".to_string(),
            b"<html><body>no links</body></html>".to_vec(),
        );
        bodies.insert("https://example.com/rss.xml".to_string(), FEED_BODY.into());

        let found = discovery(bodies)
            .discover("https://example.com/blog")
            .await
            .unwrap();
        assert_eq!(found.url, "https://example.com/rss.xml");
    }

    #[tokio::test]
    async fn test_path_relative_probe() {
        let mut bodies = HashMap::new();
        bodies.insert(
            "https://example.com/blog/feed".to_string(),
            FEED_BODY.into(),
        );

        let found = discovery(bodies)
            .discover("https://example.com/blog")
            .await
            .unwrap();
        assert_eq!(found.url, "https://example.com/blog/feed");
    }

    #[tokio::test]
    async fn test_link_tag_scan() {
        let mut bodies = HashMap::new();
        bodies.insert(
            "https://example.com/".to_string(),
            br#"<html><head>
                <link rel="alternate" type="application/atom+xml" href="/weird/feed-location"/>
            </head></html>"#
                .to_vec(),
        );
        bodies.insert(
            "https://example.com/weird/feed-location".to_string(),
            FEED_BODY.into(),
        );

        let found = discovery(bodies)
            .discover("https://example.com/")
            .await
            .unwrap();
        assert_eq!(found.url, "https://example.com/weird/feed-location");
    }

    #[tokio::test]
    async fn test_link_tag_reverse_attribute_order() {
        let mut bodies = HashMap::new();
        bodies.insert(
            "https://example.com/".to_string(),
            br#"<link type="application/rss+xml" href="https://example.com/the-feed" rel="alternate">"#
                .to_vec(),
        );
        bodies.insert("https://example.com/the-feed".to_string(), FEED_BODY.into());

        let found = discovery(bodies)
            .discover("https://example.com/")
            .await
            .unwrap();
        assert_eq!(found.url, "https://example.com/the-feed");
    }

    #[tokio::test]
    async fn test_nothing_found_is_explicit_failure() {
        let mut bodies = HashMap::new();
        bodies.insert(
            "https://example.com/blog".to_string(),
            b"<html><body>plain page, no alternates</body></html>".to_vec(),
        );

        let result = discovery(bodies).discover("https://example.com/blog").await;
        assert!(matches!(
            result,
            Err(InletError::DiscoveryFailed(url)) if url == "https://example.com/blog"
        ));
    }

    #[tokio::test]
    async fn test_substack_shortcut() {
        let mut bodies = HashMap::new();
        bodies.insert(
            "https://words.substack.com/feed".to_string(),
            FEED_BODY.into(),
        );

        let found = discovery(bodies)
            .discover("https://words.substack.com/")
            .await
            .unwrap();
        assert_eq!(found.url, "https://words.substack.com/feed");
    }

    #[test]
    fn test_path_looks_feedish() {
        assert!(path_looks_feedish("/feed.xml"));
        assert!(path_looks_feedish("/blog/rss"));
        assert!(path_looks_feedish("/main.atom"));
        assert!(!path_looks_feedish("/blog"));
        assert!(!path_looks_feedish("/"));
    }
}
