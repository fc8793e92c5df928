//! Plain HTTP page fetcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use profilescout_readers::snapshot_from_html;
use profilescout_shared::{FetchConfig, ProfileScoutError, RawPageSnapshot, Result};

use crate::PageFetcher;

/// Fetches the server-rendered page with a single GET request.
///
/// Sees only what the server embeds in the initial HTML; client-side
/// rendering needs the browser backend.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the configured user agent and timeout.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10).min(config.timeout))
            .build()
            .map_err(|e| {
                ProfileScoutError::Network(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(skip_all, fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<RawPageSnapshot> {
        debug!("fetching page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| ProfileScoutError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProfileScoutError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProfileScoutError::Network(format!("{url}: body read failed: {e}")))?;

        let snapshot = snapshot_from_html(&body);
        debug!(
            bytes = body.len(),
            structured_metadata = snapshot.structured_metadata.is_some(),
            boot_data = snapshot.boot_data.is_some(),
            "page fetched"
        );

        Ok(snapshot)
    }

    fn name(&self) -> &str {
        "http"
    }
}
