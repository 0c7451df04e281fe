//! trackmap-mx - Track Matching Service
//!
//! **Module Identity:**
//! - Name: trackmap-mx (Match)
//! - Port: 5740
//!
//! Maps a liked-songs collection or playlist to official-audio video URLs and
//! writes `spotify_to_youtube.json` / `.csv`. Runs as an HTTP service (`serve`,
//! the default) or as a one-shot CLI batch (`run`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::signal;
use tracing::{error, info};

use trackmap_common::config::load_toml_config;
use trackmap_common::logging::init_tracing;
use trackmap_mx::config::ServiceSettings;
use trackmap_mx::matching::{EngineConfig, QueryProfile};
use trackmap_mx::models::MatchOptions;
use trackmap_mx::services::{CatalogSelector, SpotifyCatalog};
use trackmap_mx::workflow::run_mapping;
use trackmap_mx::{build_matcher, build_router, AppState, DEFAULT_PORT};

/// Command-line arguments for trackmap-mx
#[derive(Parser, Debug)]
#[command(name = "trackmap-mx")]
#[command(about = "Match catalog tracks to official-audio videos")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true, env = "TRACKMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Output directory for mapping files
    #[arg(long, global = true, env = "TRACKMAP_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Log level when RUST_LOG is not set (overrides config)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args, Debug, Clone)]
struct EngineArgs {
    /// Search results considered per track (1-50)
    #[arg(long, global = true, default_value_t = 12)]
    pool_size: usize,

    /// Append "official audio" and the album name to search queries
    #[arg(long, global = true)]
    extended_query: bool,

    /// Upper bound on one AI judge call, in seconds
    #[arg(long, global = true, default_value_t = 60)]
    judge_timeout_secs: u64,
}

impl EngineArgs {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            pool_size: self.pool_size,
            query_profile: if self.extended_query {
                QueryProfile::Extended
            } else {
                QueryProfile::Basic
            },
            judge_timeout: Duration::from_secs(self.judge_timeout_secs),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT, env = "TRACKMAP_MX_PORT")]
        port: u16,
    },
    /// Map one collection and write the output files
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Map the user's liked songs
    #[arg(long, conflicts_with = "playlist")]
    liked: bool,

    /// Map a playlist by id
    #[arg(long)]
    playlist: Option<String>,

    /// Skip duration verification
    #[arg(long)]
    no_verify_duration: bool,

    /// Allowed duration difference in milliseconds
    #[arg(long, default_value_t = 6000)]
    tolerance_ms: u64,

    /// Tracks matched at once (1-6)
    #[arg(long, default_value_t = 3)]
    concurrency: usize,

    /// Do not reward "Artist - Topic" channels
    #[arg(long)]
    no_prefer_topic: bool,

    /// Extra title keyword to penalize (repeatable)
    #[arg(long = "exclude")]
    exclude_keywords: Vec<String>,

    /// Keep rows in completion order instead of input order
    #[arg(long)]
    completion_order: bool,
}

impl RunArgs {
    fn selector(&self) -> Result<CatalogSelector> {
        match (&self.playlist, self.liked) {
            (Some(id), _) if !id.trim().is_empty() => {
                Ok(CatalogSelector::Playlist(id.trim().to_string()))
            }
            (None, true) => Ok(CatalogSelector::Liked),
            _ => bail!("Specify --liked or --playlist <ID>"),
        }
    }

    fn match_options(&self) -> MatchOptions {
        MatchOptions {
            verify_duration: !self.no_verify_duration,
            tolerance_ms: self.tolerance_ms,
            concurrency: self.concurrency,
            prefer_topic: !self.no_prefer_topic,
            exclude_keywords: self.exclude_keywords.clone(),
            preserve_order: !self.completion_order,
        }
        .normalized()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let toml_config = load_toml_config(cli.config.as_deref())?;
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| toml_config.logging.level.clone());
    init_tracing(&level)?;

    info!("trackmap-mx version {}", env!("CARGO_PKG_VERSION"));

    let settings = ServiceSettings::resolve(&toml_config, cli.output_dir.clone());
    let engine = cli.engine.engine_config();

    match cli.command {
        Some(Command::Run(args)) => run_once(settings, engine, args).await,
        Some(Command::Serve { port }) => serve(settings, engine, port).await,
        None => serve(settings, engine, DEFAULT_PORT).await,
    }
}

async fn run_once(settings: ServiceSettings, engine: EngineConfig, args: RunArgs) -> Result<()> {
    let selector = args.selector()?;
    let options = args.match_options();

    let access = settings.require_catalog_access()?;
    let matcher = build_matcher(&settings, engine)?;
    let catalog = SpotifyCatalog::new()?;

    let report = run_mapping(
        &catalog,
        access,
        &selector,
        &matcher,
        &options,
        &settings.output_dir,
    )
    .await
    .context("Mapping run failed")?;

    let matched = report.rows.iter().filter(|r| r.youtube_url.is_some()).count();
    info!(rows = report.rows.len(), matched, "Mapping complete");

    println!("{}", report.paths.json.display());
    println!("{}", report.paths.csv.display());
    Ok(())
}

async fn serve(settings: ServiceSettings, engine: EngineConfig, port: u16) -> Result<()> {
    info!("Output directory: {}", settings.output_dir.display());

    let state = AppState::from_settings(settings, engine)?;
    let app = build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
