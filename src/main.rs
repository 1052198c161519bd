//! Media-Mirror main entry point
//!
//! This is the command-line interface for the Media-Mirror crawler.

use anyhow::Context;
use clap::Parser;
use media_mirror::crawler::Orchestrator;
use media_mirror::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Media-Mirror: a polite single-origin media crawler
///
/// Media-Mirror crawls one website breadth-first, collects the product
/// images its pages reference, and mirrors each image once into a local
/// directory tree matching the remote URL paths.
#[derive(Parser, Debug)]
#[command(name = "media-mirror")]
#[command(version = "1.0.0")]
#[command(about = "A polite single-origin media crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without touching the network
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let orchestrator = Orchestrator::from_config_file(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&orchestrator);
    } else {
        handle_mirror(orchestrator).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("media_mirror=info,warn"),
            1 => EnvFilter::new("media_mirror=debug,info"),
            2 => EnvFilter::new("media_mirror=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(orchestrator: &Orchestrator) {
    let config = orchestrator.config();
    println!("=== Media-Mirror Dry Run ===\n");

    println!("Site:");
    println!("  Origin: {}", config.site.origin);
    println!("  Media prefix: {}", config.site.media_prefix);
    println!("  Allow prefixes: {}", config.site.allow_prefixes.join(", "));
    println!("  Deny prefixes: {}", config.site.deny_prefixes.join(", "));

    println!("\nCrawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Crawl delay: {}ms", config.crawler.crawl_delay);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Mirror root: {}", orchestrator.downloader().mirror_root().display());
    println!("  Media directory: {}", orchestrator.downloader().media_dir().display());

    let entry_points = orchestrator.entry_points();
    println!("\nEntry Points ({}):", entry_points.len());
    for entry in &entry_points {
        println!("  - {}", entry);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", orchestrator.seed());
}

/// Handles the main mirror operation
///
/// Individual fetch and download failures do not change the exit status.
async fn handle_mirror(mut orchestrator: Orchestrator) -> anyhow::Result<()> {
    let config = orchestrator.config();
    tracing::info!(
        "Mirroring {} (max {} pages, {} entry points)",
        config.site.origin,
        config.crawler.max_pages,
        config.site.entry_points.len()
    );

    let summary = orchestrator.run().await.context("Mirror run failed")?;

    print_summary(&summary);

    Ok(())
}
