//! Headless Chromium page fetcher using chromiumoxide.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};
use url::Url;

use profilescout_readers::snapshot_from_html;
use profilescout_shared::{FetchConfig, ProfileScoutError, RawPageSnapshot, Result};

use crate::PageFetcher;

/// Renders the page in a fresh headless Chromium per fetch.
pub struct BrowserFetcher {
    chrome_path: Option<PathBuf>,
    timeout: Duration,
}

impl BrowserFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            chrome_path: config.chrome_path.clone(),
            timeout: config.timeout,
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking");

        if let Some(path) = &self.chrome_path {
            builder = builder.chrome_executable(path);
        }

        builder
            .build()
            .map_err(|e| ProfileScoutError::Browser(format!("failed to build browser config: {e}")))
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    #[instrument(skip_all, fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<RawPageSnapshot> {
        let deadlines = Deadlines::starting_now(self.timeout);

        let (mut browser, mut handler) =
            within(deadlines.overall, "Chromium launch", Browser::launch(self.browser_config()?))
                .await?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = render(&browser, url, &deadlines).await;

        match tokio::time::timeout(CLOSE_TIMEOUT, browser.close()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => debug!(error = %e, "browser close failed"),
            Err(_) => debug!("browser close timed out"),
        }
        handler_task.abort();

        result
    }

    fn name(&self) -> &str {
        "browser"
    }
}

/// Upper bound for shutting the browser down once the page is read.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Share of the fetch timeout navigation may use; the rest is kept for
/// reading back a partially rendered page.
const NAVIGATION_SHARE: f64 = 0.8;

/// Instants bounding one fetch.
#[derive(Debug, Clone, Copy)]
struct Deadlines {
    /// Navigation gives up here and the page is read as-is.
    navigation: Instant,
    /// Nothing of the fetch runs past this point.
    overall: Instant,
}

impl Deadlines {
    fn starting_now(timeout: Duration) -> Self {
        let started = Instant::now();
        Self {
            navigation: started + timeout.mul_f64(NAVIGATION_SHARE),
            overall: started + timeout,
        }
    }
}

/// Await `fut` until `deadline`, mapping both its error and the timeout to
/// a browser error naming `stage`.
async fn within<T, E, F>(deadline: Instant, stage: &str, fut: F) -> Result<T>
where
    E: std::fmt::Display,
    F: Future<Output = std::result::Result<T, E>>,
{
    match tokio::time::timeout_at(deadline, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ProfileScoutError::Browser(format!("{stage} failed: {e}"))),
        Err(_) => Err(ProfileScoutError::Browser(format!(
            "{stage} did not finish before the fetch deadline"
        ))),
    }
}

/// Navigate and read back the rendered HTML.
///
/// A navigation failure is kept as a warning as long as the DOM can still be
/// read before the overall deadline; only an unreadable page is an error.
async fn render(browser: &Browser, url: &Url, deadlines: &Deadlines) -> Result<RawPageSnapshot> {
    let page = within(deadlines.overall, "opening a page", browser.new_page("about:blank")).await?;

    let navigation = tokio::time::timeout_at(deadlines.navigation, async {
        page.goto(url.as_str()).await?;
        page.wait_for_navigation().await?;
        Ok::<_, chromiumoxide::error::CdpError>(())
    })
    .await;

    let fetch_warning = match navigation {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(format!("navigation failed: {e}")),
        Err(_) => Some("navigation timed out".to_string()),
    };
    if let Some(warning) = &fetch_warning {
        warn!(%warning, "continuing with partially rendered page");
    }

    let html = within(deadlines.overall, "reading page content", page.content()).await?;

    let mut snapshot = snapshot_from_html(&html);
    snapshot.fetch_warning = fetch_warning;
    debug!(bytes = html.len(), "page rendered");

    Ok(snapshot)
}
