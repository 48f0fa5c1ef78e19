//! Single-tab page rendering
//!
//! One tab is opened per run and reused for every page. Rendering means
//! navigating, polling the DOM until the page's ready selector appears, then
//! pausing a randomized settle delay so late-rendering JavaScript can land
//! before the snapshot is taken.

use std::time::{Duration, Instant};

use chromiumoxide::{Browser, Page};
use scraper::Html;
use tracing::debug;

use crate::config::{DelayWindow, ScrapeConfig};
use crate::error::{ScrapeError, ScrapeResult};
use crate::stealth;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Pause between scrolling a control into view and clicking it
const CLICK_DELAY: DelayWindow = DelayWindow::from_secs(1, 3);

/// A rendered page snapshot, detached from the browser
///
/// Holds the serialized DOM rather than a parse tree so snapshots stay
/// `Send` and can cross await points freely.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Final URL after redirects
    pub url: String,
    /// Serialized DOM at snapshot time
    pub html: String,
}

impl RenderedPage {
    /// Parse the snapshot into a queryable document
    #[must_use]
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// Renders pages in a single reused browser tab
pub struct PageRenderer {
    page: Page,
    ready_timeout: Duration,
    settle_delay: DelayWindow,
}

impl PageRenderer {
    /// Open a fresh tab and arm it with the stealth patches
    pub async fn new(browser: &Browser, config: &ScrapeConfig) -> ScrapeResult<Self> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapeError::Browser(format!("failed to open tab: {e}")))?;
        stealth::arm_page(&page, config.user_agent()).await;

        Ok(Self {
            page,
            ready_timeout: Duration::from_secs(config.ready_timeout_secs()),
            settle_delay: config.page_load_delay(),
        })
    }

    /// Navigate to `url` and snapshot it once `ready_selector` is in the DOM
    pub async fn render(&self, url: &str, ready_selector: &str) -> ScrapeResult<RenderedPage> {
        debug!(url, "navigating");
        self.page
            .goto(url)
            .await
            .map_err(|e| render_error(url, e))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| render_error(url, e))?;

        self.wait_for_ready(ready_selector).await?;
        self.settle_delay.pause().await;
        self.current_page().await
    }

    /// Poll the DOM until `selector` matches or the ready deadline passes
    ///
    /// `wait_for_navigation` returns when the HTTP response arrives, but the
    /// storefront renders listings and product details via JavaScript
    /// afterward. The selector appearing in the DOM is the real readiness
    /// signal.
    pub async fn wait_for_ready(&self, selector: &str) -> ScrapeResult<()> {
        let start = Instant::now();
        loop {
            match self.page.find_element(selector).await {
                Ok(_) => {
                    debug!(
                        selector,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "page ready"
                    );
                    return Ok(());
                }
                Err(_) if start.elapsed() >= self.ready_timeout => {
                    return Err(ScrapeError::RenderTimeout {
                        selector: selector.to_string(),
                        timeout_secs: self.ready_timeout.as_secs(),
                    });
                }
                Err(_) => tokio::time::sleep(READY_POLL_INTERVAL).await,
            }
        }
    }

    /// Let late JavaScript finish before the next snapshot or click
    pub async fn settle(&self) {
        self.settle_delay.pause().await;
    }

    /// Snapshot the tab's current DOM without navigating
    ///
    /// Used after in-page transitions like pagination clicks, where the next
    /// page arrives without a top-level navigation.
    pub async fn current_page(&self) -> ScrapeResult<RenderedPage> {
        let url = self.page.url().await.ok().flatten().unwrap_or_default();
        let html = self
            .page
            .content()
            .await
            .map_err(|e| render_error(&url, e))?;
        Ok(RenderedPage { url, html })
    }

    /// Click the pagination control, reporting whether one was clickable
    ///
    /// A missing or disabled control means the walk is complete, not an
    /// error. The control is scrolled into view and the click delayed
    /// briefly first; the storefront ignores clicks on off-screen controls.
    pub async fn click_next(&self, selector: &str) -> ScrapeResult<bool> {
        let Ok(control) = self.page.find_element(selector).await else {
            return Ok(false);
        };
        if let Ok(Some(_)) = control.attribute("disabled").await {
            return Ok(false);
        }

        let url = self.page.url().await.ok().flatten().unwrap_or_default();
        let control = control
            .scroll_into_view()
            .await
            .map_err(|e| render_error(&url, e))?;
        CLICK_DELAY.pause().await;
        control.click().await.map_err(|e| render_error(&url, e))?;
        Ok(true)
    }
}

fn render_error(url: &str, message: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::Render {
        url: url.to_string(),
        message: message.to_string(),
    }
}
