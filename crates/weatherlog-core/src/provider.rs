//! The `WeatherProvider` trait and the values that cross it.

use std::{fmt, future::Future};

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// A latitude/longitude pair.
///
/// Both halves are kept as the text that will be sent upstream: path
/// segments from the coordinates endpoint are forwarded verbatim, and the
/// upstream is responsible for rejecting malformed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
  pub lat: String,
  pub lon: String,
}

impl Coordinates {
  pub fn new(lat: impl Into<String>, lon: impl Into<String>) -> Self {
    Self { lat: lat.into(), lon: lon.into() }
  }
}

impl fmt::Display for Coordinates {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}, {}", self.lat, self.lon)
  }
}

/// Current conditions for a coordinate pair, in metric units.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
  /// The location name reported by the provider.
  pub canonical_name:         String,
  pub temperature_celsius:    f64,
  pub conditions_description: String,
  /// The provider's payload, untouched. Returned to API clients verbatim.
  pub raw:                    serde_json::Value,
}

/// Abstraction over an upstream weather service.
pub trait WeatherProvider: Send + Sync {
  /// Resolve a free-text location name to its best-match coordinates.
  fn geocode<'a>(
    &'a self,
    location_name: &'a str,
  ) -> impl Future<Output = Result<Coordinates, ProviderError>> + Send + 'a;

  /// Fetch current conditions for `coordinates`.
  fn current_conditions<'a>(
    &'a self,
    coordinates: &'a Coordinates,
  ) -> impl Future<Output = Result<CurrentConditions, ProviderError>> + Send + 'a;
}
