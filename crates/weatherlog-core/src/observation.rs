//! WeatherObservation — one row of lookup history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of observations returned by a history lookup.
pub const HISTORY_LIMIT: usize = 10;

/// A persisted weather lookup.
///
/// `id` and `timestamp` are assigned by the store; a record is never updated
/// after it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
  pub id:          i64,
  pub location:    String,
  pub temperature: f64,
  pub conditions:  String,
  pub timestamp:   DateTime<Utc>,
}

/// The caller-supplied part of a [`WeatherObservation`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewObservation {
  pub location:    String,
  pub temperature: f64,
  pub conditions:  String,
}

impl NewObservation {
  pub fn new(
    location: impl Into<String>,
    temperature: f64,
    conditions: impl Into<String>,
  ) -> Self {
    Self {
      location: location.into(),
      temperature,
      conditions: conditions.into(),
    }
  }
}
