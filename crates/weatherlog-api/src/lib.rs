//! JSON API for weatherlog.
//!
//! Exposes an axum [`Router`] backed by any [`ObservationStore`] and
//! [`WeatherProvider`]. Static files, request logging and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = weatherlog_api::api_router(state).fallback_service(static_files);
//! ```

pub mod error;
pub mod history;
pub mod weather;

use std::sync::Arc;

use axum::{Router, routing::get};
use weatherlog_core::{provider::WeatherProvider, store::ObservationStore};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S, P> {
  pub store:    Arc<S>,
  pub provider: Arc<P>,
}

impl<S, P> AppState<S, P> {
  pub fn new(store: Arc<S>, provider: Arc<P>) -> Self { Self { store, provider } }
}

impl<S, P> Clone for AppState<S, P> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      provider: Arc::clone(&self.provider),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S, P>(state: AppState<S, P>) -> Router<()>
where
  S: ObservationStore + 'static,
  P: WeatherProvider + 'static,
{
  Router::new()
    .route("/api/weather/coords/{lat}/{lon}", get(weather::by_coordinates::<S, P>))
    .route("/api/weather/{location}",         get(weather::by_location::<S, P>))
    .route("/api/history/{location}",         get(history::handler::<S, P>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
