//! Chromium binary discovery.

use std::path::{Path, PathBuf};

/// Environment variable naming a Chromium binary.
pub const CHROMIUM_PATH_ENV: &str = "FOLDSCAN_CHROMIUM_PATH";

const PATH_CANDIDATES: &[&str] = &["google-chrome", "chromium", "chromium-browser"];

/// Find a Chromium binary by checking multiple locations.
///
/// Order: the explicit path, `FOLDSCAN_CHROMIUM_PATH`, well-known names on
/// `PATH`, then the default macOS install. Paths that do not exist are skipped.
pub fn find_chromium(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit.filter(|p| p.exists()) {
        return Some(path.to_path_buf());
    }

    if let Ok(p) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(p);
        if path.exists() {
            return Some(path);
        }
    }

    for name in PATH_CANDIDATES {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}
