pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod listing;
pub mod pipeline;
pub mod progress;
pub mod renderer;
pub mod retry;
pub mod sink;
pub mod stealth;
pub mod utils;

pub use browser::{BrowserHandle, download_managed_browser, find_browser_executable};
pub use config::{DelayWindow, DetailFetchMode, ScrapeConfig, ScrapeConfigBuilder};
pub use error::{ScrapeError, ScrapeResult};
pub use extract::{CSV_HEADERS, ProductRecord};
pub use listing::{ListingEntry, WalkOutcome};
pub use pipeline::RunSummary;
pub use progress::{LogProgress, NoOpProgress, ProgressReporter};
pub use renderer::{PageRenderer, RenderedPage};
pub use retry::RetryPolicy;

/// Run a full scrape without progress reporting
///
/// The CLI wires in [`LogProgress`] instead; embedders wanting their own
/// reporting call [`pipeline::run`] directly.
pub async fn scrape(config: &ScrapeConfig) -> ScrapeResult<RunSummary> {
    pipeline::run(config, &NoOpProgress).await
}
