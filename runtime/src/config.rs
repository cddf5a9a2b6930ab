//! Run configuration, resolved once at startup and passed by reference.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// User agent sent when none is given.
pub const DEFAULT_USER_AGENT: &str = "My-User-Agent";

/// Viewport width in CSS pixels when none is given.
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1000;

/// Viewport height in CSS pixels when none is given.
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 1000;

/// How many sitemap-index levels are followed below the root sitemap.
pub const DEFAULT_MAX_SITEMAP_DEPTH: usize = 5;

/// Per-page navigation budget, including the wait for network idle.
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Per-request budget for sitemap fetches.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 15_000;

/// The above-fold test window, in device-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

/// Everything a scan needs to know. Immutable once built.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root sitemap or sitemap index.
    pub sitemap_url: String,
    /// Sent on every sitemap fetch and by the browser page.
    pub user_agent: String,
    pub viewport: Viewport,
    /// Directory the CSV lands in.
    pub output_dir: PathBuf,
    pub max_sitemap_depth: usize,
    pub navigation_timeout: Duration,
    pub fetch_timeout: Duration,
    /// Explicit Chromium binary; discovered when `None`.
    pub chromium_path: Option<PathBuf>,
}

impl ScanConfig {
    /// Build a configuration with every optional field at its default.
    pub fn new(sitemap_url: impl Into<String>) -> Self {
        Self {
            sitemap_url: sitemap_url.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewport: Viewport::default(),
            output_dir: PathBuf::from("."),
            max_sitemap_depth: DEFAULT_MAX_SITEMAP_DEPTH,
            navigation_timeout: Duration::from_millis(DEFAULT_NAVIGATION_TIMEOUT_MS),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            chromium_path: None,
        }
    }
}

/// Configuration problems detected before any I/O.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sitemapUrl is missing")]
    MissingSitemapUrl,
}
