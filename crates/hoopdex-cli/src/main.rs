use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use hoopdex_client::{AnyRenderer, RendererKind};
use hoopdex_core::site::DEFAULT_BASE_URL;
use hoopdex_core::snapshot::DEFAULT_SNAPSHOT_FILE;
use hoopdex_core::{
    AppError, BootstrapOutcome, IndexBuilder, IndexStore, JsonSnapshot, PlayerId, SiteLayout,
    PageRenderer, StatSeries, StatsExtractor, ThrottleConfig, TracingCrawlReporter, bootstrap,
    search,
};

#[derive(Parser)]
#[command(name = "hoopdex", version, about = "Basketball player index and season stats")]
struct Cli {
    /// Site to crawl and render
    #[arg(long, global = true, env = "HOOPDEX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Page renderer backend: "http" or "browser"
    #[arg(long, global = true, env = "HOOPDEX_RENDERER")]
    renderer: Option<RendererKind>,

    /// Navigation timeout in seconds
    #[arg(long, global = true, env = "HOOPDEX_RENDER_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the a–z listing pages and write the player index
    BuildIndex {
        /// Snapshot file to write
        #[arg(short, long, env = "HOOPDEX_INDEX_FILE", default_value = DEFAULT_SNAPSHOT_FILE)]
        out: PathBuf,

        /// Courtesy delay before each listing request, in milliseconds
        #[arg(long, env = "HOOPDEX_CRAWL_DELAY_MS", default_value_t = 1200)]
        delay_ms: u64,

        /// Crawl even if a valid snapshot already exists
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Search the saved player index by name
    Search {
        /// Name or part of a name (at least 2 characters)
        query: String,

        /// Snapshot file to read
        #[arg(short, long, env = "HOOPDEX_INDEX_FILE", default_value = DEFAULT_SNAPSHOT_FILE)]
        index: PathBuf,
    },

    /// Print a player's points per game by season
    Stats {
        /// Player identifier, e.g. "j/jordami01.html"
        identifier: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hoopdex=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let site = SiteLayout::new(&cli.base_url)?;
    let renderer_kind = cli.renderer.unwrap_or_else(RendererKind::default_for_build);
    let timeout = Duration::from_secs(cli.timeout_secs);

    match cli.command {
        Commands::BuildIndex {
            out,
            delay_ms,
            force,
        } => {
            let cancel = CancellationToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Interrupted, stopping crawl");
                    ctrl_c.cancel();
                }
            });

            let renderer = AnyRenderer::launch(renderer_kind, timeout).await?;
            let builder = IndexBuilder::new(
                renderer.clone(),
                site,
                ThrottleConfig::new(Duration::from_millis(delay_ms)),
            );
            let result = cmd_build_index(&builder, &out, force, &cancel).await;
            close_renderer(&renderer).await;
            result?;
        }
        Commands::Search { query, index } => {
            cmd_search(&query, index).await?;
        }
        Commands::Stats {
            identifier,
            format,
        } => {
            // Reject bad input before launching anything.
            let id = PlayerId::parse(&identifier)?;
            let renderer = AnyRenderer::launch(renderer_kind, timeout).await?;
            let result = StatsExtractor::new(renderer.clone(), site).extract(&id).await;
            close_renderer(&renderer).await;
            print_stats(&result?, format)?;
        }
    }

    Ok(())
}

async fn close_renderer(renderer: &AnyRenderer) {
    if let Err(e) = renderer.close().await {
        tracing::warn!(error = %e, "Error closing renderer");
    }
}

async fn cmd_build_index<R: PageRenderer>(
    builder: &IndexBuilder<R>,
    out: &Path,
    force: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let store = IndexStore::new(JsonSnapshot::new(out));

    if force {
        let report = tokio::select! {
            report = builder.build(&TracingCrawlReporter) => report?,
            () = cancel.cancelled() => return Err(AppError::Cancelled.into()),
        };
        let players = report.index.len();
        // Never replace a good snapshot with an empty crawl.
        if report.index.is_empty() {
            println!("Indexed {players} players; nothing was saved");
        } else {
            store
                .snapshot()
                .write(&report.index)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!(
                "Indexed {players} players ({} anomalies) -> {}",
                report.anomalies.len(),
                out.display()
            );
        }
        print_anomalies(&report.anomalies);
        return Ok(());
    }

    match bootstrap(&store, builder, &TracingCrawlReporter, cancel).await? {
        BootstrapOutcome::Loaded { players } => {
            println!(
                "{} already holds {players} players; use --force to crawl again",
                out.display()
            );
        }
        BootstrapOutcome::Built {
            players,
            saved,
            anomalies,
        } => {
            if saved {
                println!(
                    "Indexed {players} players ({} anomalies) -> {}",
                    anomalies.len(),
                    out.display()
                );
            } else {
                println!("Indexed {players} players; nothing was saved");
            }
            print_anomalies(&anomalies);
        }
    }
    Ok(())
}

fn print_anomalies(anomalies: &[hoopdex_core::Anomaly]) {
    for a in anomalies {
        println!("  [{:?}] {}: {}", a.kind, a.context, a.detail);
    }
}

async fn cmd_search(query: &str, index_path: PathBuf) -> Result<()> {
    let index = JsonSnapshot::new(&index_path)
        .read()
        .await
        .with_context(|| format!("Failed to read {}", index_path.display()))?
        .with_context(|| {
            format!(
                "No player index at {}. Run `hoopdex build-index` first.",
                index_path.display()
            )
        })?;

    let results = search::search(index.entries(), query);
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn print_stats(stats: &StatSeries, format: OutputFormat) -> Result<()> {
    for warning in &stats.warnings {
        tracing::warn!(detail = %warning.detail, "Unexpected page shape");
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(stats)?);
        }
        OutputFormat::Csv => write_csv(stats, std::io::stdout())?,
    }
    Ok(())
}

fn write_csv<W: std::io::Write>(stats: &StatSeries, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["season", "pts_per_g"])?;
    for stat in &stats.series {
        wtr.write_record([&stat.season_label, &stat.value])?;
    }
    wtr.flush()?;
    Ok(())
}
