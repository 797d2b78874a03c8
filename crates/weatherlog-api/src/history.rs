//! Handler for `GET /api/history/{location}`.

use axum::{
  Json,
  extract::{Path, State},
};
use weatherlog_core::{
  observation::{HISTORY_LIMIT, WeatherObservation},
  provider::WeatherProvider,
  store::ObservationStore,
};

use crate::{AppState, error::ApiError};

/// `GET /api/history/{location}` — the ten most recent observations recorded
/// under exactly `location`, newest first. Unknown locations yield `[]`.
pub async fn handler<S, P>(
  State(state): State<AppState<S, P>>,
  Path(location): Path<String>,
) -> Result<Json<Vec<WeatherObservation>>, ApiError>
where
  S: ObservationStore + 'static,
  P: WeatherProvider + 'static,
{
  let history = state
    .store
    .recent_by_location(&location, HISTORY_LIMIT)
    .await
    .map_err(|e| {
      tracing::error!(%location, "history query failed: {e}");
      ApiError::Store(Box::new(e))
    })?;
  Ok(Json(history))
}
