//! Above-the-fold class extraction for a single page.
//!
//! The probe script runs inside the page and only measures: for every
//! element carrying at least one class it reports the bounding box's top
//! and bottom edges plus the class list. Deciding what is above the fold
//! happens here, in Rust, against the page's reported viewport height.

use super::class_set::ClassSet;
use crate::config::Viewport;
use crate::renderer::{RenderContext, RenderError};
use serde::Deserialize;
use tracing::info;

/// Measures every classed element. Returns a JSON string so the result
/// crosses the protocol boundary as a plain value.
pub const PROBE_SCRIPT: &str = r#"
    (function() {
        var elements = [];
        var all = document.querySelectorAll('*');
        for (var i = 0; i < all.length; i++) {
            var el = all[i];
            if (!el.classList || el.classList.length === 0) continue;
            var rect = el.getBoundingClientRect();
            elements.push({
                top: rect.top,
                bottom: rect.bottom,
                classes: Array.from(el.classList)
            });
        }
        return JSON.stringify({ innerHeight: window.innerHeight, elements: elements });
    })()
"#;

/// One classed element's vertical extent in viewport coordinates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ElementBox {
    pub top: f64,
    pub bottom: f64,
    #[serde(default)]
    pub classes: Vec<String>,
}

impl ElementBox {
    /// Fully inside `[0, viewport_height]` vertically. Horizontal overflow
    /// is not considered.
    pub fn is_above_fold(&self, viewport_height: f64) -> bool {
        self.top >= 0.0 && self.bottom <= viewport_height
    }
}

/// What the probe reports for one page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProbeReport {
    #[serde(rename = "innerHeight")]
    pub inner_height: f64,
    pub elements: Vec<ElementBox>,
}

impl ProbeReport {
    /// Decode the probe's return value: a JSON string, or the object itself.
    pub fn from_value(value: serde_json::Value) -> Result<Self, RenderError> {
        let parsed = match value {
            serde_json::Value::String(json) => serde_json::from_str(&json),
            other => serde_json::from_value(other),
        };
        parsed.map_err(|e| RenderError::Script(format!("unexpected probe result: {e}")))
    }

    /// Unique classes of above-fold elements, in document order.
    pub fn above_fold_classes(&self) -> ClassSet {
        let mut classes = ClassSet::new();
        for element in &self.elements {
            if element.is_above_fold(self.inner_height) {
                for name in &element.classes {
                    classes.insert(name);
                }
            }
        }
        classes
    }
}

/// Classes found above the fold on one page.
#[derive(Debug, Clone)]
pub struct PageClasses {
    pub url: String,
    pub final_url: String,
    pub classes: ClassSet,
    /// Classed elements the probe measured, above the fold or not.
    pub elements_measured: usize,
    pub load_time_ms: u64,
}

/// Load `url` into `context` at `viewport` and collect its above-fold classes.
///
/// The viewport is re-applied on every call so each page starts from the
/// same window regardless of what the previous page did.
pub async fn extract_page(
    context: &mut dyn RenderContext,
    url: &str,
    viewport: Viewport,
    timeout_ms: u64,
) -> Result<PageClasses, RenderError> {
    context.set_viewport(viewport).await?;

    info!("Loading URL: {url}");
    let nav = context.navigate(url, timeout_ms).await?;

    let value = context.execute_js(PROBE_SCRIPT).await?;
    let report = ProbeReport::from_value(value)?;
    let classes = report.above_fold_classes();

    Ok(PageClasses {
        url: url.to_string(),
        final_url: nav.final_url,
        classes,
        elements_measured: report.elements.len(),
        load_time_ms: nav.load_time_ms,
    })
}
