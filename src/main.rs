//! Site-Archiver main entry point
//!
//! This is the command-line interface for the Site-Archiver site mirror.

use anyhow::Context;
use clap::Parser;
use site_archiver::config::{load_layered, Config, ConfigOverrides};
use site_archiver::crawler::{crawl, scope_from_config, ArchiveOptions};
use site_archiver::output::{print_report, ASSET_DIR, INDEX_FILE};
use std::fmt::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Site-Archiver: a domain-scoped recursive site archiver
///
/// Site-Archiver mirrors every page reachable beneath a seed URL into a
/// local directory named after the seed host, and downloads the PDFs those
/// pages link to into its `pdfs/` subdirectory.
#[derive(Parser, Debug)]
#[command(name = "site-archiver")]
#[command(version)]
#[command(about = "A domain-scoped recursive site archiver", long_about = None)]
struct Cli {
    /// Seed URL; only pages beneath it are archived
    #[arg(long, env = "SEED_URL", value_name = "URL")]
    seed: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory the per-host output root is created in
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Maximum pages and assets processed at once
    #[arg(long, value_name = "N")]
    max_concurrent_pages: Option<u32>,

    /// Seconds allowed for rendering a single page
    #[arg(long, value_name = "N")]
    page_timeout_secs: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate settings and show where output would go without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = build_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_archiver=info,warn"),
            1 => EnvFilter::new("site_archiver=debug,info"),
            2 => EnvFilter::new("site_archiver=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), layers command-line flags over it, and
/// validates the result
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let overrides = ConfigOverrides {
        seed_url: cli.seed.clone(),
        base_dir: cli.output_dir.clone(),
        max_concurrent_pages: cli.max_concurrent_pages,
        page_timeout_secs: cli.page_timeout_secs,
    };

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let (config, hash) =
        load_layered(cli.config.as_deref(), &overrides).context("Invalid configuration")?;
    if let Some(hash) = hash {
        tracing::info!("Configuration loaded successfully (hash: {})", hash);
    }

    Ok(config)
}

/// Handles the --dry-run mode: validates settings and shows the planned layout
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    print!("{}", dry_run_summary(config)?);
    Ok(())
}

/// Renders the dry-run summary
fn dry_run_summary(config: &Config) -> anyhow::Result<String> {
    let scope = scope_from_config(config)?;
    let options = ArchiveOptions::from_config(config, &scope);
    let mut out = String::new();

    writeln!(out, "=== Site-Archiver Dry Run ===\n")?;

    writeln!(out, "Scope:")?;
    writeln!(out, "  Seed: {}", scope.seed())?;
    writeln!(out, "  Host: {}", scope.host())?;
    writeln!(out, "  Pages archived: URLs starting with {}", scope.seed())?;
    writeln!(
        out,
        "  Assets downloaded: *.pdf on host {} (any scheme or port)",
        scope.host()
    )?;

    writeln!(out, "\nCrawler Configuration:")?;
    writeln!(out, "  Max concurrent pages: {}", options.max_concurrent_pages)?;
    writeln!(out, "  Page timeout: {}s", options.page_timeout.as_secs())?;
    writeln!(out, "  User agent: {}", config.user_agent.header_value())?;

    writeln!(out, "\nOutput:")?;
    writeln!(out, "  Root: {}", options.output_root.display())?;
    writeln!(
        out,
        "  Seed page: {}",
        options.output_root.join(INDEX_FILE).display()
    )?;
    writeln!(out, "  Assets: {}", options.output_root.join(ASSET_DIR).display())?;

    writeln!(out, "\n✓ Configuration is valid")?;

    Ok(out)
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let report = crawl(config).await.context("Crawl failed")?;
    print_report(&report);
    Ok(())
}
