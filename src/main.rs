//! Docmap main entry point
//!
//! This is the command-line interface for the Docmap documentation cartographer.

use anyhow::Context;
use clap::Parser;
use docmap::config::{load_config_with_hash, validate, Config};
use docmap::output::{print_statistics, write_json};
use docmap::{normalize_url, ExtractionResult, Pipeline};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Docmap: a documentation site cartographer
///
/// Docmap crawls a documentation site, infers its modules and submodules
/// from the heading structure and writes a short description of each to a
/// JSON file.
#[derive(Parser, Debug)]
#[command(name = "docmap")]
#[command(version)]
#[command(about = "Map a documentation site into described modules", long_about = None)]
#[command(after_help = "Examples:\n  \
    docmap https://docs.example.com/\n  \
    docmap https://docs.example.com/ -o modules.json --pretty\n  \
    docmap https://docs.example.com/ -d 2 -p 50 --delay 1.5")]
struct Cli {
    /// One or more documentation URLs; the first one fixes the crawl domain
    #[arg(value_name = "URL", required = true, num_args = 1..)]
    urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output JSON file path [default: output.json]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum crawl depth [default: 3]
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// Maximum number of pages to crawl [default: 100]
    #[arg(short = 'p', long)]
    max_pages: Option<usize>,

    /// Delay between requests in seconds [default: 0.5]
    #[arg(long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Stop crawling after this many seconds and keep what was fetched
    #[arg(long, value_name = "SECONDS")]
    run_timeout: Option<u64>,

    /// Ignore robots.txt
    #[arg(long)]
    no_robots: bool,

    /// Number of concurrent fetch workers [default: 1]
    #[arg(long)]
    concurrency: Option<usize>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print extraction logs to stdout
    #[arg(long)]
    logs: bool,

    /// Validate settings and seeds, then exit without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid settings")?;

    for url in &cli.urls {
        normalize_url(url).with_context(|| format!("Invalid seed URL: {}", url))?;
    }

    if cli.dry_run {
        print_dry_run(&config, &cli.urls);
        return Ok(ExitCode::SUCCESS);
    }

    let output_path = PathBuf::from(&config.output.path);
    let pretty = config.output.pretty;

    let pipeline = Pipeline::new(config);
    let result = pipeline.extract(&cli.urls).await;

    if cli.logs {
        println!("=== Extraction Logs ===\n");
        for entry in result.logs.entries() {
            println!("{}", entry);
        }
        println!();
    }

    print_statistics(&result.stats);
    println!();
    print_modules(&result);

    write_json(&result.modules, &output_path, pretty)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    println!("\n✓ Results written to: {}", output_path.display());

    if result.modules.is_empty() {
        tracing::warn!("No modules were extracted");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docmap=info,warn"),
            1 => EnvFilter::new("docmap=debug,info"),
            2 => EnvFilter::new("docmap=trace,debug"),
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

/// Command-line flags take precedence over the configuration file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay_ms = (delay.max(0.0) * 1000.0).round() as u64;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout_secs = timeout;
    }
    if cli.run_timeout.is_some() {
        config.crawler.run_timeout_secs = cli.run_timeout;
    }
    if cli.no_robots {
        config.crawler.respect_robots = false;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(output) = &cli.output {
        config.output.path = output.display().to_string();
    }
    if cli.pretty {
        config.output.pretty = true;
    }
}

/// Handles the --dry-run mode: shows what would be crawled
fn print_dry_run(config: &Config, urls: &[String]) {
    println!("=== Docmap Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Delay: {}ms", config.crawler.delay_ms);
    println!("  Request timeout: {}s", config.crawler.timeout_secs);
    match config.crawler.run_timeout_secs {
        Some(secs) => println!("  Run timeout: {}s", secs),
        None => println!("  Run timeout: none"),
    }
    println!("  Respect robots.txt: {}", config.crawler.respect_robots);
    println!("  Workers: {}", config.crawler.concurrency);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.user_agent());

    println!("\nOutput:");
    println!("  File: {}", config.output.path);
    println!("  Pretty: {}", config.output.pretty);

    println!("\nSeed URLs ({}):", urls.len());
    for url in urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
}

fn print_modules(result: &ExtractionResult) {
    if result.modules.is_empty() {
        println!("No modules found.");
        return;
    }

    println!("Modules ({}):", result.modules.len());
    for record in &result.modules {
        println!("  - {} ({} submodules)", record.module, record.submodules.len());
        for (name, _) in &record.submodules {
            println!("      * {}", name);
        }
    }
}
