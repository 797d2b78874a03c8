//! weatherlog server binary.
//!
//! Reads `.env`, the optional config file (default `weatherlog.toml`) and the
//! environment, opens the SQLite observation store, and serves the JSON API
//! plus the static front-end over HTTP.
//!
//! ```
//! OPENWEATHER_API_KEY=... cargo run -p weatherlog-server
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use weatherlog_api::AppState;
use weatherlog_openweather::OpenWeatherClient;
use weatherlog_server::ServerConfig;
use weatherlog_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Weather lookup proxy with local history")]
struct Cli {
  /// Path to an optional configuration file. Environment variables win.
  #[arg(short, long, default_value = "weatherlog.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // A missing .env file is fine.
  dotenv::dotenv().ok();

  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Non-UTF-8 variables cannot be configuration keys; skip them.
  let vars = std::env::vars_os()
    .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
  let server_cfg = ServerConfig::load(cli.config, weatherlog_server::environment(vars))
    .context("failed to load configuration")?;

  // Open SQLite store. Running without persistence is not an option.
  let db_path = expand_tilde(&server_cfg.db_name);
  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?;
  let store = Arc::new(store);

  let provider = OpenWeatherClient::new(server_cfg.client_config())
    .context("failed to build HTTP client")?;
  if !provider.has_api_key() {
    tracing::warn!("OPENWEATHER_API_KEY is not set; weather lookups will fail");
  }

  let state = AppState::new(Arc::clone(&store), Arc::new(provider));
  let app = weatherlog_server::app(state, expand_tilde(&server_cfg.static_dir));
  let address = server_cfg.address();

  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  tracing::info!("Server running at http://{address}");
  tracing::info!("Environment: {}", server_cfg.app_env);

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  SqliteStore::clone(&store)
    .close()
    .await
    .context("failed to close store")?;

  Ok(())
}

async fn shutdown_signal() {
  match tokio::signal::ctrl_c().await {
    Ok(()) => tracing::info!("shutting down"),
    Err(e) => {
      tracing::error!("failed to listen for shutdown signal: {e}");
      std::future::pending::<()>().await;
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
