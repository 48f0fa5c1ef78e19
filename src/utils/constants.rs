//! Shared configuration constants for shopscrape
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

use crate::config::DelayWindow;

/// Default pause between consecutive item visits: 3-7 seconds
///
/// Wide enough that request timing looks like a person browsing the shop
/// rather than a fixed-interval poller. Narrow it for local testing only.
pub const DEFAULT_LOAD_DELAY: DelayWindow = DelayWindow::from_secs(3, 7);

/// Default settle pause after a page reports ready: 5-10 seconds
///
/// Storefront pages keep loading prices, galleries, and review blocks
/// through JavaScript well after the ready marker appears. Capturing the
/// DOM too early yields records full of defaults.
pub const DEFAULT_PAGE_LOAD_DELAY: DelayWindow = DelayWindow::from_secs(5, 10);

/// Default pause between retry attempts: 5-10 seconds
///
/// Deliberately wider than the inter-item delay so a struggling page gets
/// real breathing room before the next attempt.
pub const DEFAULT_RETRY_BACKOFF: DelayWindow = DelayWindow::from_secs(5, 10);

/// Default total attempts per retried operation, first try included
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default wait for a page's ready selector: 15 seconds
///
/// Long enough for a slow storefront render over a poor connection, short
/// enough that a dead page does not stall the whole run.
pub const DEFAULT_READY_TIMEOUT_SECS: u64 = 15;

/// Default CSV output filename, written to the working directory
pub const DEFAULT_OUTPUT_FILE: &str = "products.csv";

/// Chrome user agent string for stealth mode
///
/// Updated: 2025-09-10 to Chrome 140 (current stable)
/// Next update: 2025-12-10 (quarterly schedule)
///
/// Chrome releases new stable versions ~every 4 weeks.
/// Update quarterly to stay within reasonable version window.
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.7339.81 Safari/537.36";
