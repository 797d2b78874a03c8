//! The `ObservationStore` trait.
//!
//! Implemented by storage backends (e.g. `weatherlog-store-sqlite`). The API
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::observation::{NewObservation, WeatherObservation};

/// Append-only log of weather observations, queryable by location.
///
/// All methods return `Send` futures so the trait can be used from spawned
/// tasks in multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ObservationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append an observation. The store assigns `id` and `timestamp` and
  /// returns the persisted record.
  fn record(
    &self,
    input: NewObservation,
  ) -> impl Future<Output = Result<WeatherObservation, Self::Error>> + Send + '_;

  /// Return up to `limit` observations whose location equals `location`
  /// exactly, newest first. Observations sharing a timestamp are ordered by
  /// descending `id`.
  fn recent_by_location<'a>(
    &'a self,
    location: &'a str,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<WeatherObservation>, Self::Error>> + Send + 'a;
}
