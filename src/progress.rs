//! Progress reporting abstraction for scrape runs
//!
//! Defines the `ProgressReporter` trait for lifecycle event reporting,
//! a no-op implementation for embedding, and a logging implementation
//! for the CLI.

use tracing::{info, warn};

/// Trait for reporting scrape progress at key lifecycle events
///
/// Implementations can send updates to channels, log to console, update a
/// UI, etc. The abstraction keeps the pipeline itself free of any opinion
/// about where progress goes.
pub trait ProgressReporter: Send + Sync {
    /// Report that browser initialization has started
    fn report_initializing(&self);

    /// Report that the browser has launched successfully
    fn report_browser_launched(&self);

    /// Report that a listing page has been harvested
    fn report_listing_page(&self, page_number: usize, total_entries: usize);

    /// Report that work on one discovered item has started
    fn report_item_started(&self, index: usize, total: usize, url: &str);

    /// Report that an item was extracted successfully
    fn report_item_extracted(&self, index: usize, total: usize, name: &str);

    /// Report that an item was dropped after exhausting retries
    fn report_item_failed(&self, url: &str, error: &str);

    /// Report that cleanup has started
    fn report_cleanup_started(&self);

    /// Report that the run has completed successfully
    fn report_completed(&self, extracted: usize, discovered: usize);
}

/// Progress reporter that does nothing
///
/// For embedding the pipeline where progress is not wanted. All methods
/// are no-ops and will be inlined away by the compiler.
#[derive(Debug, Clone, Copy)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_initializing(&self) {}

    #[inline(always)]
    fn report_browser_launched(&self) {}

    #[inline(always)]
    fn report_listing_page(&self, _page_number: usize, _total_entries: usize) {}

    #[inline(always)]
    fn report_item_started(&self, _index: usize, _total: usize, _url: &str) {}

    #[inline(always)]
    fn report_item_extracted(&self, _index: usize, _total: usize, _name: &str) {}

    #[inline(always)]
    fn report_item_failed(&self, _url: &str, _error: &str) {}

    #[inline(always)]
    fn report_cleanup_started(&self) {}

    #[inline(always)]
    fn report_completed(&self, _extracted: usize, _discovered: usize) {}
}

/// Progress reporter that logs every event, used by the CLI
#[derive(Debug, Clone, Copy)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report_initializing(&self) {
        info!("initializing browser");
    }

    fn report_browser_launched(&self) {
        info!("browser launched");
    }

    fn report_listing_page(&self, page_number: usize, total_entries: usize) {
        info!(page = page_number, total_entries, "listing page harvested");
    }

    fn report_item_started(&self, index: usize, total: usize, url: &str) {
        info!(item = index + 1, total, url, "extracting item");
    }

    fn report_item_extracted(&self, index: usize, total: usize, name: &str) {
        info!(item = index + 1, total, name, "item extracted");
    }

    fn report_item_failed(&self, url: &str, error: &str) {
        warn!(url, error, "item dropped");
    }

    fn report_cleanup_started(&self) {
        info!("cleaning up");
    }

    fn report_completed(&self, extracted: usize, discovered: usize) {
        info!(extracted, discovered, "scrape complete");
    }
}
