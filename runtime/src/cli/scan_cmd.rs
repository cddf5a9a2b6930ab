//! `foldscan sitemapUrl=<url> ...` — scan a site and write its above-fold CSV.

use crate::cli::output::{self, Styled};
use crate::config::ScanConfig;
use crate::pipeline::{self, ScanSummary};
use crate::renderer::chromium::{ChromiumRenderer, LaunchOptions};
use crate::renderer::Renderer;
use anyhow::Result;

/// Run the scan command.
pub async fn run(config: &ScanConfig, quiet: bool) -> Result<ScanSummary> {
    let options = LaunchOptions {
        chromium_path: config.chromium_path.clone(),
        viewport: config.viewport,
    };

    let summary = pipeline::run_scan(config, move || async move {
        let renderer = ChromiumRenderer::launch(options).await?;
        Ok(Box::new(renderer) as Box<dyn Renderer>)
    })
    .await?;

    if !quiet {
        print_summary(&Styled::new(), &summary);
    }
    Ok(summary)
}

fn print_summary(s: &Styled, summary: &ScanSummary) {
    eprintln!(
        "  {} {} classes from {} pages of {} in {}",
        s.ok_sym(),
        s.bold(&summary.class_count.to_string()),
        summary.pages_visited,
        summary.sitemap_url,
        output::format_duration(summary.elapsed.as_secs())
    );
    eprintln!("  {}", s.dim(&summary.output_path.display().to_string()));
}
