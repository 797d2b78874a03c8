//! Handlers for `/api/weather` endpoints.
//!
//! | Method | Path | Recorded `location` |
//! |--------|------|---------------------|
//! | `GET`  | `/api/weather/coords/{lat}/{lon}` | name reported by the provider |
//! | `GET`  | `/api/weather/{location}` | the caller's `location`, as given |
//!
//! Both respond with the provider's payload verbatim. The observation is
//! written by a spawned task; the response never waits for it.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use serde_json::Value;
use weatherlog_core::{
  observation::NewObservation,
  provider::{Coordinates, CurrentConditions, WeatherProvider},
  store::ObservationStore,
};

use crate::{AppState, error::ApiError};

// ─── By coordinates ───────────────────────────────────────────────────────────

/// `GET /api/weather/coords/{lat}/{lon}`
///
/// `lat` and `lon` are forwarded to the provider without validation.
pub async fn by_coordinates<S, P>(
  State(state): State<AppState<S, P>>,
  Path((lat, lon)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError>
where
  S: ObservationStore + 'static,
  P: WeatherProvider + 'static,
{
  tracing::info!("weather request for coordinates: {lat}, {lon}");

  let coordinates = Coordinates::new(lat, lon);
  let current = state
    .provider
    .current_conditions(&coordinates)
    .await
    .inspect_err(|e| tracing::error!(%coordinates, "/api/weather/coords failed: {e}"))?;

  let CurrentConditions {
    canonical_name,
    temperature_celsius,
    conditions_description,
    raw,
  } = current;
  record_in_background(
    &state.store,
    NewObservation::new(canonical_name, temperature_celsius, conditions_description),
  );

  Ok(Json(raw))
}

// ─── By location name ─────────────────────────────────────────────────────────

/// `GET /api/weather/{location}`
///
/// Geocodes `location`, then fetches conditions for the first match.
pub async fn by_location<S, P>(
  State(state): State<AppState<S, P>>,
  Path(location): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: ObservationStore + 'static,
  P: WeatherProvider + 'static,
{
  tracing::info!("weather request for location: {location}");

  let current = lookup(state.provider.as_ref(), &location)
    .await
    .inspect_err(|e| tracing::error!(%location, "/api/weather failed: {e}"))?;

  // History is keyed by what the caller asked for, not the provider's name.
  record_in_background(
    &state.store,
    NewObservation::new(
      location,
      current.temperature_celsius,
      current.conditions_description,
    ),
  );

  Ok(Json(current.raw))
}

async fn lookup<P: WeatherProvider>(
  provider: &P,
  location: &str,
) -> Result<CurrentConditions, ApiError> {
  let coordinates = provider.geocode(location).await?;
  tracing::debug!(%location, %coordinates, "geocoded");
  Ok(provider.current_conditions(&coordinates).await?)
}

// ─── Fire-and-forget write ────────────────────────────────────────────────────

/// Append `observation` on a spawned task. Failures are logged, never
/// retried, and never reach the client.
fn record_in_background<S>(store: &Arc<S>, observation: NewObservation)
where
  S: ObservationStore + 'static,
{
  let store = Arc::clone(store);
  tokio::spawn(async move {
    match store.record(observation).await {
      Ok(saved) => {
        tracing::debug!(id = saved.id, location = %saved.location, "observation recorded");
      }
      Err(e) => tracing::error!("failed to record observation: {e}"),
    }
  });
}
