use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use crate::config::{self, AppConfig};
use crate::database::DatabaseManager;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "project-tracker")]
#[command(about = "Project tracker - multi-tenant project tracking service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT / TRACKER_PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Create the projects table and indexes, then exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::config().clone();
    info!("Starting project tracker in {:?} mode", config.environment);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Migrate => migrate(config).await,
    }
}

async fn serve(config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    let port = port.unwrap_or(config.server.port);
    let state = Arc::new(AppState::from_config(config).await?);
    let purger = state.cache.spawn_purger(state.config.cache.ttl());
    let app = crate::app::app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Project tracker listening on http://{}", bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(purger) = purger {
        purger.abort();
    }
    Ok(())
}

async fn migrate(config: AppConfig) -> anyhow::Result<()> {
    let db = DatabaseManager::connect(&config.database).await?;
    db.ensure_schema().await?;
    info!("Schema is up to date");
    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
