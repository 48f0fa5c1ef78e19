//! Type-safe builder for `ScrapeConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time
//! validation ensuring the start URL is set before a `ScrapeConfig` can be
//! built. Everything else carries a sensible default.

use std::marker::PhantomData;
use std::path::PathBuf;
use url::Url;

use super::types::{DelayWindow, DetailFetchMode, ScrapeConfig};
use crate::error::{ScrapeError, ScrapeResult};
use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_LOAD_DELAY, DEFAULT_MAX_RETRIES, DEFAULT_OUTPUT_FILE,
    DEFAULT_PAGE_LOAD_DELAY, DEFAULT_READY_TIMEOUT_SECS, DEFAULT_RETRY_BACKOFF,
};

/// Reject windows where the lower bound exceeds the upper bound
fn validate_window(name: &str, window: DelayWindow) -> ScrapeResult<()> {
    if window.min_ms > window.max_ms {
        return Err(ScrapeError::Config(format!(
            "{name}: minimum delay {}ms exceeds maximum {}ms",
            window.min_ms, window.max_ms
        )));
    }
    Ok(())
}

// Type state for the builder
pub struct WithStartUrl;

pub struct ScrapeConfigBuilder<State = ()> {
    pub(crate) start_url: Option<String>,
    pub(crate) output_path: PathBuf,
    pub(crate) load_delay: DelayWindow,
    pub(crate) page_load_delay: DelayWindow,
    pub(crate) retry_backoff: DelayWindow,
    pub(crate) max_retries: u32,
    pub(crate) ready_timeout_secs: u64,
    pub(crate) headless: bool,
    pub(crate) detail_fetch: DetailFetchMode,
    pub(crate) max_pages: Option<usize>,
    pub(crate) max_items: Option<usize>,
    pub(crate) user_agent: String,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ScrapeConfigBuilder<()> {
    fn default() -> Self {
        Self {
            start_url: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            load_delay: DEFAULT_LOAD_DELAY,
            page_load_delay: DEFAULT_PAGE_LOAD_DELAY,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            max_retries: DEFAULT_MAX_RETRIES,
            ready_timeout_secs: DEFAULT_READY_TIMEOUT_SECS,
            headless: true,
            detail_fetch: DetailFetchMode::Browser,
            max_pages: None,
            max_items: None,
            user_agent: CHROME_USER_AGENT.to_string(),
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder<()> {
        ScrapeConfigBuilder::default()
    }
}

impl ScrapeConfigBuilder<()> {
    pub fn start_url(self, url: impl Into<String>) -> ScrapeConfigBuilder<WithStartUrl> {
        let url_string = url.into();

        // Normalize URL: add https:// if no scheme is present
        let normalized_url =
            if url_string.starts_with("http://") || url_string.starts_with("https://") {
                url_string
            } else {
                format!("https://{url_string}")
            };

        ScrapeConfigBuilder {
            start_url: Some(normalized_url),
            output_path: self.output_path,
            load_delay: self.load_delay,
            page_load_delay: self.page_load_delay,
            retry_backoff: self.retry_backoff,
            max_retries: self.max_retries,
            ready_timeout_secs: self.ready_timeout_secs,
            headless: self.headless,
            detail_fetch: self.detail_fetch,
            max_pages: self.max_pages,
            max_items: self.max_items,
            user_agent: self.user_agent,
            _phantom: PhantomData,
        }
    }
}

// Optional settings available at any builder state
impl<State> ScrapeConfigBuilder<State> {
    /// Set where the CSV output is written
    #[must_use]
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set the randomized pause between consecutive item visits
    #[must_use]
    pub fn load_delay(mut self, window: DelayWindow) -> Self {
        self.load_delay = window;
        self
    }

    /// Set the randomized settle pause after a page reports ready
    #[must_use]
    pub fn page_load_delay(mut self, window: DelayWindow) -> Self {
        self.page_load_delay = window;
        self
    }

    /// Set the randomized pause between retry attempts
    #[must_use]
    pub fn retry_backoff(mut self, window: DelayWindow) -> Self {
        self.retry_backoff = window;
        self
    }

    /// Set the total attempts per retried operation, first try included
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set how long to wait for a page's ready selector
    #[must_use]
    pub fn ready_timeout_secs(mut self, secs: u64) -> Self {
        self.ready_timeout_secs = secs;
        self
    }

    /// Run the browser with a visible window (debug builds only)
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Choose how detail pages are fetched
    #[must_use]
    pub fn detail_fetch(mut self, mode: DetailFetchMode) -> Self {
        self.detail_fetch = mode;
        self
    }

    /// Cap how many listing pages the walk may visit
    #[must_use]
    pub fn max_pages(mut self, limit: Option<usize>) -> Self {
        self.max_pages = limit;
        self
    }

    /// Cap how many product records the run may extract
    #[must_use]
    pub fn max_items(mut self, limit: Option<usize>) -> Self {
        self.max_items = limit;
        self
    }

    /// Override the user agent presented to the storefront
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }
}

// Build method only available once the start URL is set
impl ScrapeConfigBuilder<WithStartUrl> {
    pub fn build(self) -> ScrapeResult<ScrapeConfig> {
        let start_url = self
            .start_url
            .ok_or_else(|| ScrapeError::Config("start_url is required".to_string()))?;

        let parsed = Url::parse(&start_url)
            .map_err(|e| ScrapeError::Config(format!("invalid start URL '{start_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScrapeError::Config(format!(
                "start URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        validate_window("load_delay", self.load_delay)?;
        validate_window("page_load_delay", self.page_load_delay)?;
        validate_window("retry_backoff", self.retry_backoff)?;

        if self.max_retries == 0 {
            return Err(ScrapeError::Config(
                "max_retries must be at least 1".to_string(),
            ));
        }

        // Enforce headless mode in release builds for production safety
        #[cfg(not(debug_assertions))]
        let headless = if !self.headless {
            tracing::warn!(
                "Forcing headless mode in release build. \
                Headed mode is only available in debug builds for development."
            );
            true
        } else {
            self.headless
        };

        #[cfg(debug_assertions)]
        let headless = self.headless;

        Ok(ScrapeConfig {
            start_url,
            output_path: self.output_path,
            load_delay: self.load_delay,
            page_load_delay: self.page_load_delay,
            retry_backoff: self.retry_backoff,
            max_retries: self.max_retries,
            ready_timeout_secs: self.ready_timeout_secs,
            headless,
            detail_fetch: self.detail_fetch,
            max_pages: self.max_pages,
            max_items: self.max_items,
            user_agent: self.user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let config = ScrapeConfig::builder()
            .start_url("https://shop.example.com/store")
            .build()
            .expect("default config should build");

        assert_eq!(config.start_url(), "https://shop.example.com/store");
        assert_eq!(config.max_retries(), 3);
        assert_eq!(config.ready_timeout_secs(), 15);
        assert_eq!(config.detail_fetch(), DetailFetchMode::Browser);
        assert_eq!(config.output_path(), PathBuf::from("products.csv"));
        assert!(config.max_pages().is_none());
    }

    #[test]
    fn bare_host_gains_https_scheme() {
        let config = ScrapeConfig::builder()
            .start_url("shop.example.com/store")
            .build()
            .expect("bare host should normalize");

        assert_eq!(config.start_url(), "https://shop.example.com/store");
    }

    #[test]
    fn rejects_inverted_delay_window() {
        let err = ScrapeConfig::builder()
            .start_url("https://shop.example.com")
            .load_delay(DelayWindow::from_secs(7, 3))
            .build()
            .expect_err("inverted window must be rejected");

        assert!(matches!(err, ScrapeError::Config(_)));
    }

    #[test]
    fn rejects_zero_retries() {
        let err = ScrapeConfig::builder()
            .start_url("https://shop.example.com")
            .max_retries(0)
            .build()
            .expect_err("zero retries must be rejected");

        assert!(matches!(err, ScrapeError::Config(_)));
    }

    #[test]
    fn rejects_unsupported_scheme() {
        let err = ScrapeConfig::builder()
            .start_url("ftp://shop.example.com")
            .build()
            .expect_err("non-http scheme must be rejected");

        assert!(matches!(err, ScrapeError::Config(_)));
    }
}
