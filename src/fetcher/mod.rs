pub mod html;
pub mod http;

use async_trait::async_trait;

use crate::app::Result;

pub use html::HtmlExtractor;
pub use http::HttpFetcher;

/// Retrieval seam. Implementations return the raw response body; parsing
/// is the normalizer's job.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
