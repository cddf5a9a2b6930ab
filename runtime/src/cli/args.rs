//! `key=value` argument tokens -> [`ScanConfig`].
//!
//! Only four keys are understood: `sitemapUrl`, `userAgent`, `viewportWidth`
//! and `viewportHeight`. Anything else is ignored. A viewport value that does
//! not start with a positive integer falls back to the default.

use crate::config::{
    ConfigError, ScanConfig, Viewport, DEFAULT_USER_AGENT, DEFAULT_VIEWPORT_HEIGHT,
    DEFAULT_VIEWPORT_WIDTH,
};
use tracing::debug;

/// Raw values picked out of the token list, before defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanArgs {
    pub sitemap_url: Option<String>,
    pub user_agent: Option<String>,
    pub viewport_width: Option<u32>,
    pub viewport_height: Option<u32>,
}

impl ScanArgs {
    /// Collect recognized keys from `name=value` tokens. Later tokens win.
    pub fn parse<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = Self::default();

        for token in tokens {
            let token = token.as_ref();
            let (key, value) = token.split_once('=').unwrap_or((token, ""));

            match key {
                "sitemapUrl" => args.sitemap_url = non_empty(value),
                "userAgent" => args.user_agent = non_empty(value),
                "viewportWidth" => args.viewport_width = parse_dimension(value),
                "viewportHeight" => args.viewport_height = parse_dimension(value),
                _ => debug!("ignoring unrecognized argument {key:?}"),
            }
        }

        args
    }

    /// Apply defaults and check that the sitemap URL is present.
    pub fn into_config(self) -> Result<ScanConfig, ConfigError> {
        let sitemap_url = self.sitemap_url.ok_or(ConfigError::MissingSitemapUrl)?;

        let mut config = ScanConfig::new(sitemap_url);
        config.user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        config.viewport = Viewport {
            width: self.viewport_width.unwrap_or(DEFAULT_VIEWPORT_WIDTH),
            height: self.viewport_height.unwrap_or(DEFAULT_VIEWPORT_HEIGHT),
        };
        Ok(config)
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a leading base-10 integer, ignoring trailing characters
/// (`"800px"` -> 800). Zero, negative, overflowing or digit-less input
/// yields `None`.
fn parse_dimension(value: &str) -> Option<u32> {
    let value = value.trim_start();
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() || negative {
        return None;
    }

    digits.parse::<u32>().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keys() {
        let args = ScanArgs::parse([
            "sitemapUrl=https://example.com/sitemap.xml",
            "userAgent=FoldBot/1.0",
            "viewportWidth=1280",
            "viewportHeight=720",
        ]);
        let config = args.into_config().unwrap();
        assert_eq!(config.sitemap_url, "https://example.com/sitemap.xml");
        assert_eq!(config.user_agent, "FoldBot/1.0");
        assert_eq!(config.viewport, Viewport { width: 1280, height: 720 });
    }

    #[test]
    fn test_any_order_and_defaults() {
        let config = ScanArgs::parse(["viewportHeight=640", "sitemapUrl=https://a.test/s.xml"])
            .into_config()
            .unwrap();
        assert_eq!(config.user_agent, "My-User-Agent");
        assert_eq!(config.viewport, Viewport { width: 1000, height: 640 });
    }

    #[test]
    fn test_missing_sitemap_url() {
        let err = ScanArgs::parse(["userAgent=x", "viewportWidth=10"])
            .into_config()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingSitemapUrl);

        let empty: [&str; 0] = [];
        assert!(ScanArgs::parse(empty).into_config().is_err());
        assert!(ScanArgs::parse(["sitemapUrl="]).into_config().is_err());
    }

    #[test]
    fn test_unrecognized_keys_ignored() {
        let args = ScanArgs::parse(["sitemapurl=lowercase", "foo=bar", "bare"]);
        assert_eq!(args, ScanArgs::default());
    }

    #[test]
    fn test_bad_dimensions_use_default() {
        for bad in ["abc", "", "px100", "-200", "0", "99999999999"] {
            let config = ScanArgs::parse([
                "sitemapUrl=https://example.com/sitemap.xml".to_string(),
                format!("viewportWidth={bad}"),
                format!("viewportHeight={bad}"),
            ])
            .into_config()
            .unwrap();
            assert_eq!(config.viewport, Viewport::default(), "value {bad:?}");
        }
    }

    #[test]
    fn test_dimension_prefix_parsing() {
        assert_eq!(parse_dimension("800px"), Some(800));
        assert_eq!(parse_dimension("  42"), Some(42));
        assert_eq!(parse_dimension("+7"), Some(7));
        assert_eq!(parse_dimension("12.9"), Some(12));
    }

    #[test]
    fn test_value_keeps_later_equals_signs() {
        let args = ScanArgs::parse(["sitemapUrl=https://example.com/sitemap.xml?page=2"]);
        assert_eq!(
            args.sitemap_url.as_deref(),
            Some("https://example.com/sitemap.xml?page=2")
        );
    }

    #[test]
    fn test_later_token_wins() {
        let args = ScanArgs::parse(["userAgent=first", "userAgent=second"]);
        assert_eq!(args.user_agent.as_deref(), Some("second"));
    }
}
