//! Shapes of the OpenWeather JSON payloads we read from.
//!
//! Only the fields weatherlog needs are modelled; the full payload is kept
//! as a [`serde_json::Value`] and handed back to API clients untouched.

use serde::Deserialize;
use serde_json::Value;
use weatherlog_core::ProviderError;

pub(crate) const GENERIC_UPSTREAM_MESSAGE: &str = "Error fetching weather data";

#[derive(Debug, Deserialize)]
pub(crate) struct GeoMatch {
  pub lat: f64,
  pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentPayload {
  #[serde(default)]
  pub name:    String,
  pub main:    MainBlock,
  pub weather: Vec<WeatherBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MainBlock {
  pub temp: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WeatherBlock {
  pub description: String,
}

/// Inspect the status code OpenWeather embeds in its payloads.
///
/// The code may be a number (`401`) or a string (`"404"`). An absent or null
/// `cod`, or `200` in either form, is success.
pub(crate) fn payload_error(payload: &Value) -> Option<ProviderError> {
  let ok = match payload.get("cod")? {
    Value::Null => true,
    Value::Number(n) => n.as_u64() == Some(200),
    Value::String(s) => s == "200",
    _ => false,
  };
  if ok {
    return None;
  }

  let message = payload
    .get("message")
    .and_then(Value::as_str)
    .filter(|m| !m.is_empty())
    .unwrap_or(GENERIC_UPSTREAM_MESSAGE);
  Some(ProviderError::Upstream(message.to_owned()))
}
