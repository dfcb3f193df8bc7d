//! audionest - personal audio library service
//!
//! Configuration is resolved from CLI arguments, `AUDIONEST_*` environment
//! variables and an optional TOML file, in that order of precedence.

use anyhow::{Context, Result};
use audionest_common::config::{CliArgs, Config};
use audionest_common::db::{init_database, load_token_secret};
use audionest_server::{build_router, AppState, ServiceContainer};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliArgs::parse();
    let config = Config::load(&cli).context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting audionest v{}", env!("CARGO_PKG_VERSION"));
    info!("Root folder: {}", config.root_folder.display());
    info!("Audio directory: {}", config.audio_directory.display());
    info!(
        "Audio target: {} at {} kbps",
        config.audio_target.codec, config.audio_target.bit_rate_kbps
    );

    config.ensure_directories()?;

    info!("Database path: {}", config.database_path.display());
    let pool = match init_database(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let token_secret = match &config.auth.jwt_secret {
        Some(secret) => {
            info!("Using configured token signing secret");
            secret.clone()
        }
        None => {
            let secret = load_token_secret(&pool).await?;
            info!("✓ Loaded persisted token signing secret");
            secret
        }
    };

    let services = ServiceContainer::new(&config, pool.clone(), &token_secret)?;
    let app = build_router(AppState::new(services));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("audionest listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("audionest stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
