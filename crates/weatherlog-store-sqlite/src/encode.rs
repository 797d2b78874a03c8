//! Conversions between domain types and the plain-text column
//! representations stored in SQLite.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that ordering by the text column is ordering by
//! time.

use chrono::{DateTime, SecondsFormat, Utc};
use weatherlog_core::observation::WeatherObservation;

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// A `weather_data` row as it comes out of SQLite.
pub struct RawObservation {
  pub id:          i64,
  pub location:    String,
  pub temperature: f64,
  pub conditions:  String,
  pub timestamp:   String,
}

impl RawObservation {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      location:    row.get(1)?,
      temperature: row.get(2)?,
      conditions:  row.get(3)?,
      timestamp:   row.get(4)?,
    })
  }

  pub fn into_observation(self) -> Result<WeatherObservation> {
    Ok(WeatherObservation {
      id:          self.id,
      location:    self.location,
      temperature: self.temperature,
      conditions:  self.conditions,
      timestamp:   decode_dt(&self.timestamp)?,
    })
  }
}
