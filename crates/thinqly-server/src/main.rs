use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use thinqly_config::{JsonHomesStore, Settings};
use thinqly_core::{HomesStore, Poller, ThinqRemote, TransportConfig};
use thinqly_server::{AppState, api};

#[derive(Parser)]
#[command(name = "thinqly-server")]
#[command(about = "Aggregated LG ThinQ status dashboard")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "thinqly.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "thinqly_server=info,thinqly_core=info".to_owned());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    if cli.config.exists() {
        info!(path = ?cli.config, "loading configuration");
    } else {
        info!("no configuration file found, using defaults and environment");
    }
    let settings = Settings::load_from(&cli.config)?;

    let homes: Arc<dyn HomesStore> = Arc::new(JsonHomesStore::new(&settings.homes_file));
    let transport = TransportConfig::with_timeout(settings.http_timeout());
    let remote = Arc::new(ThinqRemote::new(&transport)?);
    let poller = Poller::new(Arc::clone(&homes), remote, settings.refresh_interval());
    poller.start().await;

    let state = AppState {
        poller: poller.clone(),
        homes,
        admin_key: settings.admin_key.clone(),
    };
    let app = api::router(state);

    let listener = TcpListener::bind(settings.listen_addr).await?;
    info!(addr = %settings.listen_addr, "dashboard listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let an in-flight cycle finish before the process exits.
    poller.stop().await;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
