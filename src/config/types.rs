//! Core configuration types for scrape runs
//!
//! This module contains the main `ScrapeConfig` struct and its associated
//! types that define the parameters for a storefront scrape run.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Inclusive randomized delay window in milliseconds
///
/// Every pause samples the window afresh so request timing never repeats
/// exactly. Degenerate windows (`min == max`) behave as fixed delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayWindow {
    pub(crate) min_ms: u64,
    pub(crate) max_ms: u64,
}

impl DelayWindow {
    /// Create a window from whole seconds
    #[must_use]
    pub const fn from_secs(min_secs: u64, max_secs: u64) -> Self {
        Self {
            min_ms: min_secs * 1000,
            max_ms: max_secs * 1000,
        }
    }

    /// Create a window from milliseconds
    #[must_use]
    pub const fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Draw a uniformly random duration from the window
    #[must_use]
    pub fn sample(&self) -> Duration {
        let millis = if self.min_ms >= self.max_ms {
            self.min_ms
        } else {
            rand::rng().random_range(self.min_ms..=self.max_ms)
        };
        Duration::from_millis(millis)
    }

    /// Sleep for a freshly sampled duration
    pub async fn pause(&self) {
        tokio::time::sleep(self.sample()).await;
    }
}

/// How detail pages are fetched once the listing walk has produced entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailFetchMode {
    /// Render each detail page in the browser tab (default)
    Browser,
    /// Fetch each detail page over plain HTTP with the stealth user agent
    ///
    /// Faster and lighter than a full render, at the cost of missing any
    /// content the storefront only fills in through JavaScript.
    Http,
}

/// Main configuration struct for a scrape run
///
/// Immutable once built; construct through [`ScrapeConfig::builder`], which
/// validates delay windows and the start URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub(crate) start_url: String,
    pub(crate) output_path: PathBuf,

    /// Randomized pause between consecutive item visits
    pub(crate) load_delay: DelayWindow,

    /// Randomized settle pause after a page reports ready, letting late
    /// scripts and lazy-loaded blocks finish before the DOM is captured
    pub(crate) page_load_delay: DelayWindow,

    /// Randomized pause between retry attempts
    pub(crate) retry_backoff: DelayWindow,

    /// Total attempts per retried operation, first try included
    pub(crate) max_retries: u32,

    /// How long to wait for a page's ready selector before giving up
    pub(crate) ready_timeout_secs: u64,

    pub(crate) headless: bool,
    pub(crate) detail_fetch: DetailFetchMode,

    /// Stop walking listing pages after this many, regardless of pagination
    pub(crate) max_pages: Option<usize>,

    /// Stop visiting items after this many records have been extracted
    pub(crate) max_items: Option<usize>,

    pub(crate) user_agent: String,
}

impl ScrapeConfig {
    #[must_use]
    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    #[must_use]
    pub fn load_delay(&self) -> DelayWindow {
        self.load_delay
    }

    #[must_use]
    pub fn page_load_delay(&self) -> DelayWindow {
        self.page_load_delay
    }

    #[must_use]
    pub fn retry_backoff(&self) -> DelayWindow {
        self.retry_backoff
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[must_use]
    pub fn ready_timeout_secs(&self) -> u64 {
        self.ready_timeout_secs
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn detail_fetch(&self) -> DetailFetchMode {
        self.detail_fetch
    }

    #[must_use]
    pub fn max_pages(&self) -> Option<usize> {
        self.max_pages
    }

    #[must_use]
    pub fn max_items(&self) -> Option<usize> {
        self.max_items
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_stays_inside_window() {
        let window = DelayWindow::from_millis(100, 200);
        for _ in 0..50 {
            let d = window.sample();
            assert!(d >= Duration::from_millis(100));
            assert!(d <= Duration::from_millis(200));
        }
    }

    #[test]
    fn degenerate_window_is_fixed() {
        let window = DelayWindow::from_millis(250, 250);
        assert_eq!(window.sample(), Duration::from_millis(250));
    }

    #[test]
    fn from_secs_converts_to_millis() {
        let window = DelayWindow::from_secs(3, 7);
        assert_eq!(window.min_ms, 3000);
        assert_eq!(window.max_ms, 7000);
    }
}
