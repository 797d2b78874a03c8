//! Server assembly for weatherlog.
//!
//! Loads [`ServerConfig`] and wraps the JSON API with request tracing and a
//! static-file fallback for the front-end page.

use std::{collections::HashMap, path::PathBuf, time::Duration};

use axum::Router;
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};
use weatherlog_api::AppState;
use weatherlog_core::{provider::WeatherProvider, store::ObservationStore};
use weatherlog_openweather::{ClientConfig, DEFAULT_BASE_URL};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Layered as defaults, then the optional config file, then environment
/// variables. Environment keys are the upper-case field names listed in
/// [`ENV_KEYS`].
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub bind_host:             String,
  pub port:                  u16,
  pub db_name:               PathBuf,
  pub static_dir:            PathBuf,
  /// Missing is not fatal: weather endpoints then fail per request.
  pub openweather_api_key:   Option<String>,
  pub openweather_base_url:  String,
  pub upstream_timeout_secs: u64,
  pub app_env:               String,
}

impl ServerConfig {
  pub fn load(
    file: impl Into<PathBuf>,
    env: config::Environment,
  ) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("bind_host", "0.0.0.0")?
      .set_default("port", 3000)?
      .set_default("db_name", "weather.db")?
      .set_default("static_dir", "public")?
      .set_default("openweather_base_url", DEFAULT_BASE_URL)?
      .set_default("upstream_timeout_secs", 30)?
      .set_default("app_env", "development")?
      .add_source(config::File::from(file.into()).required(false))
      .add_source(env)
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.bind_host, self.port) }

  pub fn client_config(&self) -> ClientConfig {
    ClientConfig {
      api_key:  self.openweather_api_key.clone(),
      base_url: self.openweather_base_url.clone(),
      timeout:  Duration::from_secs(self.upstream_timeout_secs),
    }
  }
}

/// Environment variables consulted by [`ServerConfig::load`].
pub const ENV_KEYS: &[&str] = &[
  "BIND_HOST",
  "PORT",
  "DB_NAME",
  "STATIC_DIR",
  "OPENWEATHER_API_KEY",
  "OPENWEATHER_BASE_URL",
  "UPSTREAM_TIMEOUT_SECS",
  "APP_ENV",
];

/// An environment source holding only the [`ENV_KEYS`] found in `vars`.
///
/// Shells export unrelated variables (zsh sets `HOST`, for one); those never
/// reach the configuration.
pub fn environment(vars: impl IntoIterator<Item = (String, String)>) -> config::Environment {
  let known: HashMap<String, String> = vars
    .into_iter()
    .filter(|(key, _)| ENV_KEYS.contains(&key.as_str()))
    .collect();
  config::Environment::default().source(Some(known))
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: API routes, static files from `static_dir` for
/// everything else (`/` serves `index.html`), and per-request tracing.
pub fn app<S, P>(state: AppState<S, P>, static_dir: impl Into<PathBuf>) -> Router
where
  S: ObservationStore + 'static,
  P: WeatherProvider + 'static,
{
  weatherlog_api::api_router(state)
    .fallback_service(ServeDir::new(static_dir.into()))
    .layer(TraceLayer::new_for_http())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
