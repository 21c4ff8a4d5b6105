use anyhow::Context;
use clap::Parser;
use poker_execution::FileSystemPlayerStore;
use poker_server::{Api, Config};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve the poker league over HTTP and WebSocket")]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,

    #[arg(short, long)]
    database: Option<String>,

    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Load config, letting flags override the file
    let mut config = match &args.config {
        Some(path) => Config::from_file(path).context("failed to load config")?,
        None => Config::default(),
    };
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = args.database {
        config.database = database;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }
    let config = config.validate().context("invalid config")?;

    // Create logger
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    // Open store
    let store = FileSystemPlayerStore::from_path(&config.database).with_context(|| {
        format!("problem creating player store from {:?}", config.database)
    })?;

    let api = Api::new(Arc::new(store), config.game_page, config.blind_unit);
    let app = api.router();

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {}", addr);
    axum::serve(listener, app)
        .await
        .context("axum server error")?;

    Ok(())
}
