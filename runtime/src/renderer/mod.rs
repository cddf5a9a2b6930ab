//! Browser rendering seam.
//!
//! The pipeline only talks to [`Renderer`] and [`RenderContext`]; the
//! Chromium implementation lives in [`chromium`], and tests swap in a
//! scripted renderer.

pub mod chromium;
pub mod locate;
#[cfg(test)]
pub(crate) mod mock;

use crate::config::Viewport;
use async_trait::async_trait;
use thiserror::Error;

/// Outcome of a completed navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationResult {
    /// The URL after redirects.
    pub final_url: String,
    /// Time from navigation start to network idle.
    pub load_time_ms: u64,
}

/// Failures raised by a renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch browser: {0}")]
    Launch(String),
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },
    #[error("{url} did not reach network idle within {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },
    #[error("page script failed: {0}")]
    Script(String),
    #[error("browser protocol error: {0}")]
    Protocol(#[from] chromiumoxide::error::CdpError),
}

/// A single browser page.
#[async_trait]
pub trait RenderContext: Send + Sync {
    async fn set_user_agent(&mut self, user_agent: &str) -> Result<(), RenderError>;

    /// Apply viewport dimensions to the page.
    async fn set_viewport(&mut self, viewport: Viewport) -> Result<(), RenderError>;

    /// Navigate and wait until the network is idle, giving up after `timeout_ms`.
    async fn navigate(&mut self, url: &str, timeout_ms: u64)
        -> Result<NavigationResult, RenderError>;

    /// Evaluate a script in the page and return its result.
    async fn execute_js(&self, script: &str) -> Result<serde_json::Value, RenderError>;

    async fn close(self: Box<Self>) -> Result<(), RenderError>;
}

/// A running browser that hands out pages.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>, RenderError>;

    /// Close the browser. Further calls are no-ops.
    async fn shutdown(&self) -> Result<(), RenderError>;
}
