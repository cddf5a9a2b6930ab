//! foldscan — collect the CSS classes rendered above the fold across a sitemap.

use clap::{Parser, ValueEnum};
use foldscan::cli::args::ScanArgs;
use foldscan::cli::output::Styled;
use foldscan::cli::scan_cmd;
use foldscan::config::{
    ConfigError, ScanConfig, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_MAX_SITEMAP_DEPTH,
    DEFAULT_NAVIGATION_TIMEOUT_MS,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "foldscan",
    version,
    about = "Collect the CSS classes used above the fold on every page of a sitemap",
    after_help = "Example:\n  foldscan sitemapUrl=https://example.com/sitemap.xml viewportWidth=1280 viewportHeight=800"
)]
struct Cli {
    /// `sitemapUrl=<url>` (required), `userAgent=<ua>`, `viewportWidth=<px>`, `viewportHeight=<px>`
    #[arg(value_name = "KEY=VALUE")]
    args: Vec<String>,

    /// Directory to write `<host>-CSS-ATF.csv` into
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// How many nested sitemap-index levels to follow
    #[arg(long, default_value_t = DEFAULT_MAX_SITEMAP_DEPTH)]
    max_sitemap_depth: usize,

    /// Per-page budget for loading until network idle
    #[arg(long, default_value_t = DEFAULT_NAVIGATION_TIMEOUT_MS)]
    navigation_timeout_ms: u64,

    /// Per-request budget for sitemap fetches
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_MS)]
    fetch_timeout_ms: u64,

    /// Chromium binary to launch
    #[arg(long, env = "FOLDSCAN_CHROMIUM_PATH")]
    chromium_path: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long)]
    quiet: bool,

    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

impl Cli {
    fn into_config(self) -> Result<ScanConfig, ConfigError> {
        let mut config = ScanArgs::parse(&self.args).into_config()?;
        config.output_dir = self.output_dir;
        config.max_sitemap_depth = self.max_sitemap_depth;
        config.navigation_timeout = Duration::from_millis(self.navigation_timeout_ms);
        config.fetch_timeout = Duration::from_millis(self.fetch_timeout_ms);
        config.chromium_path = self.chromium_path;
        Ok(config)
    }
}

fn init_tracing(cli: &Cli) {
    let default_directive = if cli.verbose {
        "foldscan=debug"
    } else if cli.quiet {
        "foldscan=warn"
    } else {
        "foldscan=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let quiet = cli.quiet;
    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match scan_cmd::run(&config, quiet).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let s = Styled::new();
            eprintln!("  {} {}", s.fail_sym(), s.red(&format!("Error: {e:#}")));
            ExitCode::FAILURE
        }
    }
}
