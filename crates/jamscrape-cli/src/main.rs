use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jamscrape_client::{ClientConfig, ItchClient};
use jamscrape_core::config::IngestConfig;
use jamscrape_core::coordinator::IngestService;
use jamscrape_core::layout::Layout;
use jamscrape_core::reporter::TracingReporter;
use jamscrape_core::traits::RecordSink;
use jamscrape_store::{load_jam, FsSink, OutputFormat};

#[derive(Parser)]
#[command(name = "jamscrape", version, about = "Scrape itch.io game jams to disk")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape one or more jams
    Scrape {
        /// Jam URLs (e.g. https://itch.io/jam/brackeys-13)
        #[arg(required = true)]
        urls: Vec<String>,

        /// Output directory root
        #[arg(short, long, env = "JAMSCRAPE_DIR", default_value = "./data")]
        dir: PathBuf,

        /// Record format: json, jsonl or markdown
        #[arg(short, long, env = "JAMSCRAPE_FORMAT", default_value = "json")]
        format: String,

        /// Number of jams scraped concurrently
        #[arg(long, default_value_t = 1)]
        jam_workers: usize,

        /// Number of games scraped concurrently within one jam
        #[arg(long, env = "JAMSCRAPE_WORKERS", default_value_t = 2)]
        game_workers: usize,

        /// Delay between requests, in milliseconds
        #[arg(long, env = "JAMSCRAPE_DELAY_MS", default_value_t = 1500)]
        delay_ms: u64,

        /// User agent sent with every request
        #[arg(long, env = "JAMSCRAPE_USER_AGENT")]
        user_agent: Option<String>,

        /// Skip cover images and screenshots
        #[arg(long, default_value_t = false)]
        no_media: bool,

        /// Attempt game-file downloads
        #[arg(long, default_value_t = false)]
        download_games: bool,
    },

    /// Render a Markdown report over an already-scraped jam
    Report {
        /// Jam id (the slug used when scraping)
        jam_id: String,

        /// Output directory root the jam was scraped into
        #[arg(short, long, env = "JAMSCRAPE_DIR", default_value = "./data")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jamscrape=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            urls,
            dir,
            format,
            jam_workers,
            game_workers,
            delay_ms,
            user_agent,
            no_media,
            download_games,
        } => {
            let format: OutputFormat = format.parse()?;
            let mut client_config = ClientConfig {
                request_delay: Duration::from_millis(delay_ms),
                ..ClientConfig::default()
            };
            if let Some(agent) = user_agent {
                client_config.user_agent = agent;
            }

            cmd_scrape(
                urls,
                Layout::new(dir),
                format,
                client_config,
                jam_workers,
                IngestConfig {
                    game_workers,
                    download_media: !no_media,
                    download_games,
                },
            )
            .await
        }
        Commands::Report { jam_id, dir } => cmd_report(&jam_id, Layout::new(dir)),
    }
}

async fn cmd_scrape(
    urls: Vec<String>,
    layout: Layout,
    format: OutputFormat,
    client_config: ClientConfig,
    jam_workers: usize,
    config: IngestConfig,
) -> Result<()> {
    let client = ItchClient::new(client_config).context("Failed to build HTTP client")?;
    let sink = FsSink::new(layout.clone(), format);
    let render_markdown = format == OutputFormat::Markdown;

    let service = IngestService::new(client, sink.clone(), TracingReporter, layout.clone(), config);
    let outcomes = service.run_batch(&urls, jam_workers).await;

    let mut failures = 0usize;
    for outcome in &outcomes {
        match (&outcome.jam_id, &outcome.result) {
            (Some(jam_id), Ok(())) => {
                println!("✓ {jam_id} -> {}", layout.jam_dir(jam_id).display());
                if render_markdown {
                    if let Err(e) = write_report(&sink, &layout, jam_id) {
                        tracing::warn!(jam_id, error = %e, "Report rendering failed");
                    }
                }
            }
            (Some(jam_id), Err(e)) => {
                failures += 1;
                eprintln!("✗ {jam_id}: {e}");
            }
            (None, result) => {
                failures += 1;
                let reason = result
                    .as_ref()
                    .err()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "could not resolve jam id".to_string());
                eprintln!("✗ {}: {reason}", outcome.url);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} jam(s) failed", outcomes.len());
    }
    Ok(())
}

fn cmd_report(jam_id: &str, layout: Layout) -> Result<()> {
    let sink = FsSink::new(layout.clone(), OutputFormat::Markdown);
    write_report(&sink, &layout, jam_id)?;
    println!("Report: {}", layout.report_path(jam_id).display());
    Ok(())
}

fn write_report(sink: &FsSink, layout: &Layout, jam_id: &str) -> Result<()> {
    let (meta, records) = load_jam(layout, jam_id)
        .with_context(|| format!("Failed to load scraped data for '{jam_id}'"))?;
    sink.write_report(jam_id, &meta, &records)
        .with_context(|| format!("Failed to write report for '{jam_id}'"))?;
    Ok(())
}
