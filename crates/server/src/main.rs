//! Checkwright server binary.

use anyhow::{Context, Result};
use checkwright_cache::{CacheSettings, ChecklistCache};
use checkwright_core::config::{AppConfig, StoreConfig};
use checkwright_server::audit::TracingAuditSink;
use checkwright_server::{AppState, create_router};
use checkwright_store::{SqliteStore, TrackerStore};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Checkwright - checklist tracking for press-machine manufacturing
#[derive(Parser, Debug)]
#[command(name = "checkwrightd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "CHECKWRIGHT_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Checkwright v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override
    // everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}, using defaults and environment", args.config);
    }
    let config: AppConfig = figment
        .merge(Env::prefixed("CHECKWRIGHT_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .context("invalid bind address")?;

    // Initialize the tracker store
    let StoreConfig::Sqlite { ref path } = config.store;
    let sqlite = Arc::new(
        SqliteStore::new(path)
            .await
            .context("failed to open tracker store")?,
    );
    sqlite
        .health_check()
        .await
        .context("store health check failed")?;
    tracing::info!("Tracker store initialized");

    // Checklist reads and writes go through the view cache
    let cache = Arc::new(ChecklistCache::new(
        sqlite.clone(),
        CacheSettings::from(&config.cache),
    ));
    let store: Arc<dyn TrackerStore> = sqlite;
    let state = AppState::new(config, store, cache, Arc::new(TracingAuditSink));

    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind")?;
    tracing::info!(%addr, "Listening");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
