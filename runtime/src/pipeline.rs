//! The scan pipeline: sitemap -> pages -> classes -> CSV.
//!
//! Stages run strictly one after another and every failure is fatal. The
//! browser is only launched once the sitemap has resolved, and it is closed
//! again whether or not the page loop succeeded.

use crate::acquisition::http_client::HttpClient;
use crate::cartography::sitemap::SitemapResolver;
use crate::config::ScanConfig;
use crate::export::csv::write_csv;
use crate::extraction::above_fold::extract_page;
use crate::extraction::class_set::ClassSet;
use crate::renderer::{RenderError, Renderer};
use anyhow::{Context, Result};
use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What a finished scan produced.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub sitemap_url: String,
    pub pages_visited: usize,
    pub class_count: usize,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

/// Resolve the configured sitemap into unique page URLs.
pub async fn resolve_urls(config: &ScanConfig) -> Result<Vec<String>> {
    let client = HttpClient::new(&config.user_agent, config.fetch_timeout)
        .context("building HTTP client")?;
    let urls = SitemapResolver::new(&client, config.max_sitemap_depth)
        .resolve(&config.sitemap_url)
        .await?;
    Ok(urls)
}

/// Visit every URL on one page of `renderer` and gather above-fold classes.
///
/// The page is closed before returning, on success and on failure.
pub async fn scrape_classes(
    renderer: &dyn Renderer,
    config: &ScanConfig,
    urls: &[String],
) -> Result<ClassSet, RenderError> {
    let mut context = renderer.new_context().await?;

    info!(
        "Starting up with UserAgent {}, ViewportHeight: {} ViewportWidth: {}...",
        config.user_agent, config.viewport.height, config.viewport.width
    );

    let timeout_ms = config.navigation_timeout.as_millis() as u64;
    let mut scraped = async {
        context.set_user_agent(&config.user_agent).await?;

        let mut all = ClassSet::new();
        for url in urls {
            let page = extract_page(context.as_mut(), url, config.viewport, timeout_ms).await?;
            if page.final_url != page.url {
                info!("{} redirected to {}", page.url, page.final_url);
            }
            let added = all.merge(&page.classes);
            debug!(
                "{}: {} above-fold classes ({added} new) from {} classed elements in {}ms",
                page.url,
                page.classes.len(),
                page.elements_measured,
                page.load_time_ms
            );
        }
        Ok::<ClassSet, RenderError>(all)
    }
    .await;

    if let Err(e) = context.close().await {
        warn!("closing page: {e}");
        if scraped.is_ok() {
            scraped = Err(e);
        }
    }
    scraped
}

/// Run a whole scan. `launch` starts the browser once URLs are known.
pub async fn run_scan<L, F>(config: &ScanConfig, launch: L) -> Result<ScanSummary>
where
    L: FnOnce() -> F,
    F: Future<Output = Result<Box<dyn Renderer>, RenderError>>,
{
    let start = Instant::now();

    let urls = resolve_urls(config).await.context("resolving sitemap")?;
    if urls.is_empty() {
        warn!("sitemap {} lists no pages", config.sitemap_url);
    }

    let renderer = launch().await.context("launching browser")?;
    let scraped = scrape_classes(renderer.as_ref(), config, &urls).await;
    let shutdown = renderer.shutdown().await;
    let classes = scraped.context("extracting above-fold classes")?;
    shutdown.context("closing browser")?;

    info!(
        "All Classes: {:?}",
        classes.iter().collect::<Vec<_>>()
    );

    let class_count = classes.len();
    let output_path = write_csv(&config.output_dir, &config.sitemap_url, classes)
        .context("writing CSV")?;

    Ok(ScanSummary {
        sitemap_url: config.sitemap_url.clone(),
        pages_visited: urls.len(),
        class_count,
        output_path,
        elapsed: start.elapsed(),
    })
}
