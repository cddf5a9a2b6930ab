//! Sitemap and sitemap-index resolution.
//!
//! A root sitemap is fetched and parsed into a [`SitemapDocument`]. Index
//! documents are expanded depth-first in document order until only page URLs
//! remain. Each sitemap URL is fetched at most once, and nesting deeper than
//! the configured limit is skipped.

use crate::acquisition::http_client::HttpClient;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

/// One parsed sitemap file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<urlset>`: page URLs.
    UrlSet(Vec<String>),
    /// `<sitemapindex>`: URLs of further sitemaps.
    Index(Vec<String>),
}

/// Why a sitemap body could not be understood.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("unexpected root element <{0}>, expected <urlset> or <sitemapindex>")]
    UnsupportedRoot(String),
    #[error("document has no root element")]
    Empty,
    #[error("document ends inside <{0}>")]
    Truncated(String),
    #[error("failed to decompress gzip body: {0}")]
    Decompress(#[source] std::io::Error),
}

/// Failures while resolving a sitemap tree. All of them end the run.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("failed to fetch sitemap {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("sitemap {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to parse sitemap {url}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RootKind {
    UrlSet,
    Index,
}

impl RootKind {
    fn entry_tag(self) -> &'static [u8] {
        match self {
            RootKind::UrlSet => b"url",
            RootKind::Index => b"sitemap",
        }
    }
}

/// Parse one sitemap body. Namespace prefixes are ignored.
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root: Option<RootKind> = None;
    // Local names of currently open elements.
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut locs = Vec::new();
    let mut current_loc = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let name = e.local_name().as_ref().to_vec();
                if root.is_none() {
                    root = Some(root_kind(&name)?);
                }
                stack.push(name);
                if in_loc(&stack, root) {
                    current_loc.clear();
                }
            }
            Event::Empty(ref e) => {
                if root.is_none() {
                    let name = e.local_name().as_ref().to_vec();
                    root = Some(root_kind(&name)?);
                }
            }
            Event::Text(ref e) => {
                if in_loc(&stack, root) {
                    let text = e.unescape()?;
                    current_loc.push_str(&text);
                }
            }
            Event::CData(ref e) => {
                if in_loc(&stack, root) {
                    current_loc.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(_) => {
                if in_loc(&stack, root) {
                    let loc = current_loc.trim();
                    if !loc.is_empty() {
                        locs.push(loc.to_string());
                    }
                    current_loc.clear();
                }
                stack.pop();
            }
            Event::Eof => {
                if let Some(open) = stack.last() {
                    return Err(ParseError::Truncated(
                        String::from_utf8_lossy(open).to_string(),
                    ));
                }
                break;
            }
            _ => {}
        }
    }

    match root {
        Some(RootKind::UrlSet) => Ok(SitemapDocument::UrlSet(locs)),
        Some(RootKind::Index) => Ok(SitemapDocument::Index(locs)),
        None => Err(ParseError::Empty),
    }
}

fn root_kind(name: &[u8]) -> Result<RootKind, ParseError> {
    match name {
        b"urlset" => Ok(RootKind::UrlSet),
        b"sitemapindex" => Ok(RootKind::Index),
        other => Err(ParseError::UnsupportedRoot(
            String::from_utf8_lossy(other).to_string(),
        )),
    }
}

/// True when the open-element stack is `<root><entry><loc>`.
fn in_loc(stack: &[Vec<u8>], root: Option<RootKind>) -> bool {
    let Some(kind) = root else {
        return false;
    };
    stack.len() == 3 && stack[1] == kind.entry_tag() && stack[2] == b"loc"
}

/// Expands a sitemap tree into a flat list of page URLs.
pub struct SitemapResolver<'a> {
    client: &'a HttpClient,
    max_depth: usize,
}

impl<'a> SitemapResolver<'a> {
    /// `max_depth` counts index levels below the root (root is depth 0).
    pub fn new(client: &'a HttpClient, max_depth: usize) -> Self {
        Self { client, max_depth }
    }

    /// Resolve `root_url` into page URLs, deduplicated by first occurrence.
    pub async fn resolve(&self, root_url: &str) -> Result<Vec<String>, SitemapError> {
        let mut pending = vec![(root_url.to_string(), 0usize)];
        let mut visited: HashSet<String> = HashSet::new();
        let mut pages = Vec::new();
        let mut seen_pages: HashSet<String> = HashSet::new();

        while let Some((url, depth)) = pending.pop() {
            if !visited.insert(url.clone()) {
                debug!("sitemap {url} already visited, skipping");
                continue;
            }

            match self.fetch(&url).await? {
                SitemapDocument::UrlSet(urls) => {
                    debug!("sitemap {url} lists {} pages", urls.len());
                    for page in urls {
                        if seen_pages.insert(page.clone()) {
                            pages.push(page);
                        }
                    }
                }
                SitemapDocument::Index(children) => {
                    debug!("sitemap index {url} references {} sitemaps", children.len());
                    if depth >= self.max_depth {
                        warn!(
                            "sitemap index {url} is at depth {depth}, skipping {} children (max depth {})",
                            children.len(),
                            self.max_depth
                        );
                        continue;
                    }
                    // Reversed so the stack pops children in document order.
                    for child in children.into_iter().rev() {
                        pending.push((child, depth + 1));
                    }
                }
            }
        }

        info!(
            "resolved {} unique page URLs from {} sitemap(s)",
            pages.len(),
            visited.len()
        );
        Ok(pages)
    }

    async fn fetch(&self, url: &str) -> Result<SitemapDocument, SitemapError> {
        let resp = self
            .client
            .get(url)
            .await
            .map_err(|source| SitemapError::Fetch {
                url: url.to_string(),
                source,
            })?;

        if !resp.is_success() {
            return Err(SitemapError::Status {
                url: url.to_string(),
                status: resp.status,
            });
        }

        if resp.final_url != url {
            debug!("sitemap {url} redirected to {}", resp.final_url);
        }

        let parse_error = |source: ParseError| SitemapError::Parse {
            url: url.to_string(),
            source,
        };
        let body = resp.text().map_err(|e| parse_error(ParseError::Decompress(e)))?;
        parse_sitemap(&body).map_err(parse_error)
    }
}
