//! Page fetchers: turn a profile URL into a [`RawPageSnapshot`].
//!
//! This crate provides:
//! - [`PageFetcher`]: the async fetch boundary the pipeline depends on
//! - [`HttpFetcher`]: plain HTTP GET via `reqwest`
//! - `BrowserFetcher`: headless Chromium via `chromiumoxide` (`browser` feature)
//! - [`profile_url`]: username validation and URL templating

mod http;
mod target;

#[cfg(feature = "browser")]
mod browser;

use std::sync::Arc;

use async_trait::async_trait;
use profilescout_shared::{FetchBackend, FetchConfig, RawPageSnapshot, Result};
use url::Url;

#[cfg(feature = "browser")]
pub use browser::BrowserFetcher;
pub use http::HttpFetcher;
pub use target::{profile_url, validate_username};

/// Fetches a page once and hands back a best-effort snapshot.
///
/// An `Err` means no snapshot could be produced at all. A fetch problem that
/// still left readable HTML is reported through
/// [`RawPageSnapshot::fetch_warning`] instead.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<RawPageSnapshot>;

    /// Human-readable fetcher name for tracing.
    fn name(&self) -> &str;
}

/// Build the fetcher selected by `config.backend`.
pub fn build_fetcher(config: &FetchConfig) -> Result<Arc<dyn PageFetcher>> {
    match config.backend {
        FetchBackend::Http => Ok(Arc::new(HttpFetcher::new(config)?)),
        #[cfg(feature = "browser")]
        FetchBackend::Browser => Ok(Arc::new(BrowserFetcher::new(config))),
        #[cfg(not(feature = "browser"))]
        FetchBackend::Browser => Err(profilescout_shared::ProfileScoutError::config(
            "the browser backend requires building with the `browser` feature",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_http_fetcher_by_default() {
        let fetcher = build_fetcher(&FetchConfig::default()).unwrap();
        assert_eq!(fetcher.name(), "http");
    }

    #[cfg(not(feature = "browser"))]
    #[test]
    fn browser_backend_needs_feature() {
        use profilescout_shared::ProfileScoutError;

        let config = FetchConfig {
            backend: FetchBackend::Browser,
            ..FetchConfig::default()
        };
        let err = build_fetcher(&config).err().unwrap();
        assert!(matches!(err, ProfileScoutError::Config { .. }));
    }
}
