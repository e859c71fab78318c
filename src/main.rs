use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use vibe_beer_finder::{AppState, PubFinder, VibeFinderConfig, telemetry, web};

#[derive(Parser)]
#[command(name = "vibe-beer-finder")]
#[command(about = "Find the pub near you in Antwerp that matches your vibe")]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind, overrides `server.host`
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides `server.port`
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine, the process environment is used as is
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config =
        VibeFinderConfig::load_from_path(cli.config).context("Failed to load configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    let provider = telemetry::init(&config.logging)?;
    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
    }

    let result = serve(&config).await;
    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }

    telemetry::shutdown(provider);
    result
}

async fn serve(config: &VibeFinderConfig) -> anyhow::Result<()> {
    let finder = PubFinder::from_config(config).context("Failed to set up the pub finder")?;

    tokio::fs::create_dir_all(&config.server.static_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.server.static_dir))?;

    let state = AppState::new(finder, &config.server.static_dir);
    web::run(state, &config.server.host, config.server.port).await
}
