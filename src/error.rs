//! Error types for scrape operations
//!
//! This module defines the error taxonomy for the pipeline with transience
//! classification so retry logic can tell recoverable failures apart from
//! permanent ones.

use thiserror::Error;

/// Result type alias for scrape operations
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Error types for scrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Ready selector never appeared within the render deadline (transient)
    #[error("Timed out after {timeout_secs}s waiting for '{selector}' to appear")]
    RenderTimeout { selector: String, timeout_secs: u64 },

    /// Navigation or in-tab rendering failed (transient)
    #[error("Failed to render {url}: {message}")]
    Render { url: String, message: String },

    /// Page rendered but product extraction failed as a whole (transient)
    ///
    /// Individual fields that fail to parse resolve to their defaults and
    /// never raise this; only a page-level failure does.
    #[error("Failed to extract product data from {url}: {message}")]
    Extraction { url: String, message: String },

    /// Plain-HTTP detail fetch failed (transient)
    #[error("HTTP fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Browser launch or CDP session failure
    #[error("Browser failure: {0}")]
    Browser(String),

    /// Configuration rejected at build time
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The run finished without a single product record to write
    #[error("No products extracted starting from {start_url} ({pages_walked} listing pages walked)")]
    NoData {
        start_url: String,
        pages_walked: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<anyhow::Error> for ScrapeError {
    fn from(error: anyhow::Error) -> Self {
        ScrapeError::Browser(format!("{error:#}"))
    }
}

impl ScrapeError {
    /// Check if the error is transient and the operation worth retrying
    ///
    /// Render and extraction failures are transient because a page that
    /// rendered incompletely once usually renders fully on a later attempt.
    /// Browser-level failures are permanent: the tab is gone and retrying
    /// the same operation against it cannot succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ScrapeError::RenderTimeout { .. }
                | ScrapeError::Render { .. }
                | ScrapeError::Extraction { .. }
                | ScrapeError::Fetch { .. }
        )
    }
}
