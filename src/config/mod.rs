//! Configuration module for scrape runs
//!
//! This module provides the `ScrapeConfig` struct and its type-safe builder
//! for configuring scrape runs with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod types;

// Re-exports for public API
pub use builder::{ScrapeConfigBuilder, WithStartUrl};
pub use types::{DelayWindow, DetailFetchMode, ScrapeConfig};
