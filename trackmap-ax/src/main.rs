//! trackmap-ax - Audio Extraction Service
//!
//! **Module Identity:**
//! - Name: trackmap-ax (Audio eXtract)
//! - Port: 5741
//!
//! Downloads video URLs as MP3, enriches tags from MusicBrainz and writes
//! `"<Artist> - <Title> [<id>].mp3"` files. Runs as an HTTP service (`serve`, the default)
//! or as a one-shot CLI batch (`extract`).

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::signal;
use tracing::{error, info};

use trackmap_ax::config::ExtractSettings;
use trackmap_ax::pipeline::ExtractOptions;
use trackmap_ax::{build_extractor, build_router, AppState, DEFAULT_PORT};
use trackmap_common::config::load_toml_config;
use trackmap_common::logging::init_tracing;

/// Command-line arguments for trackmap-ax
#[derive(Parser, Debug)]
#[command(name = "trackmap-ax")]
#[command(about = "Extract tagged MP3 audio from video URLs")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true, env = "TRACKMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Output directory for audio files
    #[arg(long, visible_alias = "out", global = true, env = "TRACKMAP_AUDIO_DIR")]
    output_dir: Option<PathBuf>,

    /// Log level when RUST_LOG is not set (overrides config)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Skip MusicBrainz lookups
    #[arg(long, global = true)]
    no_musicbrainz: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT, env = "TRACKMAP_AX_PORT")]
        port: u16,
    },
    /// Extract the given URLs and print the written file paths
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Album written to every file
    #[arg(long)]
    album: Option<String>,

    /// URLs processed at once (1-3)
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Video URLs
    #[arg(required = true)]
    urls: Vec<String>,
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

    info!("trackmap-ax version {}", env!("CARGO_PKG_VERSION"));

    let mut settings = ExtractSettings::resolve(&toml_config, cli.output_dir.clone());
    if cli.no_musicbrainz {
        settings.musicbrainz = false;
    }

    match cli.command {
        Some(Command::Extract(args)) => extract_once(settings, args).await,
        Some(Command::Serve { port }) => serve(settings, port).await,
        None => serve(settings, DEFAULT_PORT).await,
    }
}

async fn extract_once(settings: ExtractSettings, args: ExtractArgs) -> Result<()> {
    let extractor = build_extractor(&settings)?;
    let options = ExtractOptions {
        album: args.album,
        concurrency: args.concurrency,
    };

    let report = extractor
        .extract_batch(args.urls, &options, &settings.output_dir)
        .await
        .context("Extraction batch failed")?;

    for file in &report.files {
        println!("{}", file.display());
    }

    if !report.errors.is_empty() {
        for failure in &report.errors {
            error!(url = %failure.url, "{}", failure.error);
        }
        bail!(
            "{} of {} URLs failed",
            report.errors.len(),
            report.errors.len() + report.files.len()
        );
    }
    Ok(())
}

async fn serve(settings: ExtractSettings, port: u16) -> Result<()> {
    info!("Output directory: {}", settings.output_dir.display());
    info!("yt-dlp: {}", settings.ytdlp_binary);

    let extractor = build_extractor(&settings)?;
    let app = build_router(AppState::new(settings, extractor));

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
