use clap::Parser;
use project_tracker::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL and SESSION_SECRET are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("project_tracker=info,tower_http=info")),
        )
        .init();

    if project_tracker::is_production!() {
        tracing::info!("Production mode: secure session cookies enabled");
    }

    let cli = Cli::parse();

    if let Err(e) = cli::run(cli).await {
        match std::env::var("TRACKER_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
