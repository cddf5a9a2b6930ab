//! Write the collected classes as a one-column CSV.
//!
//! One class per line, sorted, no header, no quoting, no trailing newline.
//! The file is named after the sitemap's host: `<host>-CSS-ATF.csv`.

use crate::extraction::class_set::ClassSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use url::Url;

/// Appended to the sitemap host to form the file name.
pub const FILE_SUFFIX: &str = "-CSS-ATF.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid sitemap URL {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("sitemap URL {0} has no hostname")]
    NoHostname(String),
    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `<hostname>-CSS-ATF.csv` for the given sitemap URL.
pub fn output_file_name(sitemap_url: &str) -> Result<String, ExportError> {
    let parsed = Url::parse(sitemap_url).map_err(|source| ExportError::InvalidUrl {
        url: sitemap_url.to_string(),
        source,
    })?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ExportError::NoHostname(sitemap_url.to_string()))?;
    Ok(format!("{host}{FILE_SUFFIX}"))
}

/// Newline-joined class names.
pub fn render_csv(sorted: &[String]) -> String {
    sorted.join("\n")
}

/// Sort `classes` and write them into `dir`, replacing any existing file.
pub fn write_csv(dir: &Path, sitemap_url: &str, classes: ClassSet) -> Result<PathBuf, ExportError> {
    let path = dir.join(output_file_name(sitemap_url)?);
    let content = render_csv(&classes.into_sorted());

    std::fs::write(&path, content).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    info!("CSV file saved successfully: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name("https://example.com/sitemap.xml").unwrap(),
            "example.com-CSS-ATF.csv"
        );
        assert_eq!(
            output_file_name("http://Blog.Example.org:8080/a/b/sitemap_index.xml").unwrap(),
            "blog.example.org-CSS-ATF.csv"
        );
    }

    #[test]
    fn test_output_file_name_errors() {
        assert!(matches!(
            output_file_name("not a url"),
            Err(ExportError::InvalidUrl { .. })
        ));
        assert!(matches!(
            output_file_name("data:text/plain,hi"),
            Err(ExportError::NoHostname(_))
        ));
    }

    #[test]
    fn test_render_csv() {
        assert_eq!(render_csv(&[]), "");
        assert_eq!(
            render_csv(&["btn".to_string(), "hero".to_string(), "nav".to_string()]),
            "btn\nhero\nnav"
        );
    }

    #[test]
    fn test_write_csv_sorts_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.com-CSS-ATF.csv");
        std::fs::write(&path, "stale content that is longer than the new one").unwrap();

        let classes: ClassSet = ["nav", "btn", "hero"].into_iter().collect();
        let written = write_csv(dir.path(), "https://example.com/sitemap.xml", classes).unwrap();

        assert_eq!(written, path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "btn\nhero\nnav");
    }

    #[test]
    fn test_write_csv_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = write_csv(&missing, "https://example.com/s.xml", ClassSet::new()).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
