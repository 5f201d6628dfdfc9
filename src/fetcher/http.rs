use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::Result;
use crate::fetcher::Fetcher;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const RETRY_BACKOFF: Duration = Duration::from_secs(2);

pub struct HttpFetcher {
    client: Client,
    retry_backoff: Duration,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("inlet/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            retry_backoff: RETRY_BACKOFF,
        }
    }

    async fn get_once(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;
        Ok(response.bytes().await?.to_vec())
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetch with one bounded retry after a fixed backoff. Source fetches
    /// are per-cycle best-effort; a second failure surfaces to the caller
    /// as that source's issue.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        match self.get_once(url).await {
            Ok(body) => Ok(body),
            Err(first) => {
                tracing::debug!("fetch {} failed ({}), retrying once", url, first);
                tokio::time::sleep(self.retry_backoff).await;
                self.get_once(url).await
            }
        }
    }
}
