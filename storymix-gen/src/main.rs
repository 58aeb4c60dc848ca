//! Storymix generator service - main entry point
//!
//! Turns submitted stories into mixed audio artifacts: emotion-classified,
//! voice-directed narration over looped and faded background music, with a
//! live progress stream per job.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use storymix_gen::api::{self, AppContext};
use storymix_gen::collab::{hf::HfClient, Collaborators};
use storymix_gen::config::TomlConfig;
use storymix_gen::pipeline::background::BackgroundResolver;
use storymix_gen::state::SharedState;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for storymix-gen
#[derive(Parser, Debug)]
#[command(name = "storymix-gen")]
#[command(about = "Story-to-emotional-audio generation service")]
#[command(version)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "storymix.toml", env = "STORYMIX_CONFIG")]
    config: PathBuf,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "STORYMIX_PORT")]
    port: Option<u16>,

    /// Background music asset directory (overrides config)
    #[arg(long, env = "STORYMIX_ASSETS_DIR")]
    assets_dir: Option<PathBuf>,

    /// Artifact output directory (overrides config)
    #[arg(long, env = "STORYMIX_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        TomlConfig::load_or_default(&args.config).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(assets_dir) = args.assets_dir {
        config.assets_dir = assets_dir;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }

    // RUST_LOG wins; otherwise the configured level applies to our crates
    let default_filter = format!(
        "storymix_gen={level},storymix_common={level},tower_http=info",
        level = config.logging.level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting storymix-gen on port {}", config.port);
    info!("Background assets: {}", config.assets_dir.display());
    info!("Artifact output: {}", config.output_dir.display());

    std::fs::create_dir_all(&config.output_dir).context("Failed to create output directory")?;

    // Shared job registry
    let state = Arc::new(SharedState::new());

    // HTTP collaborator client implements all three trait seams
    let client = Arc::new(HfClient::from_config(&config.collaborator));
    let collaborators = Collaborators {
        classifier: client.clone(),
        director: client.clone(),
        synthesizer: client,
    };

    // Retention sweep for terminal jobs and their artifacts
    let retention = Duration::from_secs(config.retention_secs);
    let sweep_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let evicted = sweep_state.sweep_expired(retention).await;
            if evicted > 0 {
                info!("Retention sweep evicted {} jobs", evicted);
            }
        }
    });

    let ctx = AppContext {
        state,
        collaborators,
        resolver: BackgroundResolver::new(config.assets_dir.clone()),
        output_dir: config.output_dir.clone(),
    };

    tokio::select! {
        result = api::server::run(ctx, config.port) => {
            result.context("Server error")?;
        }
        _ = shutdown_signal() => {}
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
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
