//! Async HTTP client for the OpenWeather API.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize as _;
use serde_json::Value;
use weatherlog_core::{
  ProviderError,
  provider::{Coordinates, CurrentConditions, WeatherProvider},
};

use crate::payload::{CurrentPayload, GeoMatch, payload_error};

/// Production OpenWeather origin.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Placeholder logged in place of the `appid` query parameter.
pub const REDACTED_KEY: &str = "API_KEY";

const GEOCODE_PATH: &str = "/geo/1.0/direct";
const WEATHER_PATH: &str = "/data/2.5/weather";

/// Connection settings for the OpenWeather API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// The `appid` credential. `None` or empty makes every call fail with
  /// [`ProviderError::Configuration`].
  pub api_key:  Option<String>,
  pub base_url: String,
  pub timeout:  Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      api_key:  None,
      base_url: DEFAULT_BASE_URL.to_owned(),
      timeout:  Duration::from_secs(30),
    }
  }
}

/// OpenWeather implementation of [`WeatherProvider`].
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OpenWeatherClient {
  http:   Client,
  config: ClientConfig,
}

impl OpenWeatherClient {
  pub fn new(config: ClientConfig) -> reqwest::Result<Self> {
    let http = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { http, config })
  }

  /// Whether a non-empty credential is configured.
  pub fn has_api_key(&self) -> bool { self.api_key().is_ok() }

  fn api_key(&self) -> Result<&str, ProviderError> {
    self
      .config
      .api_key
      .as_deref()
      .filter(|k| !k.is_empty())
      .ok_or(ProviderError::Configuration)
  }

  fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ProviderError> {
    let base = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
    Url::parse_with_params(&base, params)
      .map_err(|e| ProviderError::Transport(format!("invalid weather provider URL: {e}")))
  }

  /// GET `url` and parse the body as JSON, whatever the transport status.
  /// OpenWeather reports failures through the `cod` field of the payload.
  async fn get_json(&self, url: Url, what: &str) -> Result<Value, ProviderError> {
    tracing::info!(url = %redacted(&url), "fetching {what}");

    let resp = self
      .http
      .get(url)
      .send()
      .await
      .map_err(transport_error)?;

    let status = resp.status();
    let body = resp.text().await.map_err(transport_error)?;

    serde_json::from_str(&body).map_err(|e| {
      tracing::warn!(%status, body = %truncate_body(&body), "unparseable {what} response: {e}");
      ProviderError::Upstream(format!(
        "invalid response from weather provider (status {status})"
      ))
    })
  }
}

impl WeatherProvider for OpenWeatherClient {
  async fn geocode(&self, location_name: &str) -> Result<Coordinates, ProviderError> {
    let key = self.api_key()?;
    let url = self.url(GEOCODE_PATH, &[
      ("q", location_name),
      ("limit", "1"),
      ("appid", key),
    ])?;

    let payload = self.get_json(url, "geocode").await?;
    if let Some(err) = payload_error(&payload) {
      return Err(err);
    }

    let matches = Vec::<GeoMatch>::deserialize(&payload)
      .map_err(|_| ProviderError::LocationNotFound)?;
    let best = matches
      .into_iter()
      .next()
      .ok_or(ProviderError::LocationNotFound)?;

    Ok(Coordinates::new(best.lat.to_string(), best.lon.to_string()))
  }

  async fn current_conditions(
    &self,
    coordinates: &Coordinates,
  ) -> Result<CurrentConditions, ProviderError> {
    let key = self.api_key()?;
    let url = self.url(WEATHER_PATH, &[
      ("lat", coordinates.lat.as_str()),
      ("lon", coordinates.lon.as_str()),
      ("units", "metric"),
      ("appid", key),
    ])?;

    let raw = self.get_json(url, "current weather").await?;
    if let Some(err) = payload_error(&raw) {
      return Err(err);
    }

    let parsed = CurrentPayload::deserialize(&raw)
      .map_err(|e| ProviderError::Upstream(format!("malformed weather payload: {e}")))?;
    let conditions = parsed
      .weather
      .into_iter()
      .next()
      .ok_or_else(|| {
        ProviderError::Upstream("malformed weather payload: no conditions".to_owned())
      })?;

    Ok(CurrentConditions {
      canonical_name:         parsed.name,
      temperature_celsius:    parsed.main.temp,
      conditions_description: conditions.description,
      raw,
    })
  }
}

/// Render `url` with the `appid` value replaced by [`REDACTED_KEY`].
pub(crate) fn redacted(url: &Url) -> String {
  let pairs: Vec<(String, String)> = url
    .query_pairs()
    .map(|(k, v)| {
      let v = if k == "appid" { REDACTED_KEY.to_owned() } else { v.into_owned() };
      (k.into_owned(), v)
    })
    .collect();

  let mut shown = url.clone();
  shown.query_pairs_mut().clear().extend_pairs(pairs);
  shown.to_string()
}

fn transport_error(e: reqwest::Error) -> ProviderError {
  // The URL carries the credential; strip it before the message goes
  // anywhere.
  ProviderError::Transport(format!(
    "failed to reach weather provider: {}",
    e.without_url()
  ))
}

fn truncate_body(body: &str) -> &str {
  const MAX: usize = 200;
  match body.char_indices().nth(MAX) {
    Some((idx, _)) => &body[..idx],
    None => body,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use wiremock::matchers::{any, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  const KEY: &str = "s3cr3t-key";

  fn client(server: &MockServer, api_key: Option<&str>) -> OpenWeatherClient {
    OpenWeatherClient::new(ClientConfig {
      api_key:  api_key.map(str::to_owned),
      base_url: server.uri(),
      ..ClientConfig::default()
    })
    .unwrap()
  }

  fn paris_weather() -> Value {
    json!({
      "coord": { "lon": 2.3488, "lat": 48.8534 },
      "weather": [{ "id": 800, "main": "Clear", "description": "clear sky" }],
      "main": { "temp": 12.34, "humidity": 71 },
      "name": "Paris",
      "cod": 200
    })
  }

  // ── Credential ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_key_fails_without_network_calls() {
    let server = MockServer::start().await;
    Mock::given(any())
      .respond_with(ResponseTemplate::new(200))
      .expect(0)
      .mount(&server)
      .await;

    for key in [None, Some("")] {
      let c = client(&server, key);
      assert!(!c.has_api_key());
      assert_eq!(c.geocode("Paris").await, Err(ProviderError::Configuration));
      assert_eq!(
        c.current_conditions(&Coordinates::new("1", "2")).await,
        Err(ProviderError::Configuration)
      );
    }
  }

  // ── Geocoding ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn geocode_uses_first_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path(GEOCODE_PATH))
      .and(query_param("q", "Springfield, US"))
      .and(query_param("limit", "1"))
      .and(query_param("appid", KEY))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([
        { "name": "Springfield", "lat": 39.7817, "lon": -89.6501 },
        { "name": "Springfield", "lat": 37.2153, "lon": -93.2982 }
      ])))
      .expect(1)
      .mount(&server)
      .await;

    let coords = client(&server, Some(KEY))
      .geocode("Springfield, US")
      .await
      .unwrap();
    assert_eq!(coords, Coordinates::new("39.7817", "-89.6501"));
  }

  #[tokio::test]
  async fn geocode_empty_result_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(path(GEOCODE_PATH))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
      .mount(&server)
      .await;

    let err = client(&server, Some(KEY)).geocode("Atlantis").await.unwrap_err();
    assert_eq!(err, ProviderError::LocationNotFound);
    assert_eq!(err.to_string(), "Location not found");
  }

  #[tokio::test]
  async fn geocode_malformed_result_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(path(GEOCODE_PATH))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "name": "x" }])))
      .mount(&server)
      .await;

    let err = client(&server, Some(KEY)).geocode("x").await.unwrap_err();
    assert_eq!(err, ProviderError::LocationNotFound);
  }

  #[tokio::test]
  async fn geocode_error_payload_surfaces_message() {
    let server = MockServer::start().await;
    Mock::given(path(GEOCODE_PATH))
      .respond_with(ResponseTemplate::new(401).set_body_json(json!({
        "cod": 401, "message": "Invalid API key."
      })))
      .mount(&server)
      .await;

    let err = client(&server, Some(KEY)).geocode("Paris").await.unwrap_err();
    assert_eq!(err, ProviderError::Upstream("Invalid API key.".into()));
  }

  // ── Current conditions ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn current_conditions_extracts_fields_and_keeps_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path(WEATHER_PATH))
      .and(query_param("lat", "48.8534"))
      .and(query_param("lon", "2.3488"))
      .and(query_param("units", "metric"))
      .and(query_param("appid", KEY))
      .respond_with(ResponseTemplate::new(200).set_body_json(paris_weather()))
      .expect(1)
      .mount(&server)
      .await;

    let cc = client(&server, Some(KEY))
      .current_conditions(&Coordinates::new("48.8534", "2.3488"))
      .await
      .unwrap();
    assert_eq!(cc.canonical_name, "Paris");
    assert_eq!(cc.temperature_celsius, 12.34);
    assert_eq!(cc.conditions_description, "clear sky");
    assert_eq!(cc.raw, paris_weather());
  }

  #[tokio::test]
  async fn current_conditions_forwards_coordinates_verbatim() {
    let server = MockServer::start().await;
    Mock::given(path(WEATHER_PATH))
      .and(query_param("lat", "north"))
      .and(query_param("lon", "999"))
      .respond_with(ResponseTemplate::new(400).set_body_json(json!({
        "cod": "400", "message": "wrong latitude"
      })))
      .expect(1)
      .mount(&server)
      .await;

    let err = client(&server, Some(KEY))
      .current_conditions(&Coordinates::new("north", "999"))
      .await
      .unwrap_err();
    assert_eq!(err, ProviderError::Upstream("wrong latitude".into()));
  }

  #[tokio::test]
  async fn embedded_error_code_wins_over_transport_status() {
    let server = MockServer::start().await;
    Mock::given(path(WEATHER_PATH))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cod": 500 })))
      .mount(&server)
      .await;

    let err = client(&server, Some(KEY))
      .current_conditions(&Coordinates::new("1", "2"))
      .await
      .unwrap_err();
    assert_eq!(err, ProviderError::Upstream("Error fetching weather data".into()));
  }

  #[tokio::test]
  async fn non_json_body_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(path(WEATHER_PATH))
      .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
      .mount(&server)
      .await;

    let err = client(&server, Some(KEY))
      .current_conditions(&Coordinates::new("1", "2"))
      .await
      .unwrap_err();
    assert!(matches!(err, ProviderError::Upstream(ref m) if m.contains("502")), "{err:?}");
  }

  // ── Redaction ──────────────────────────────────────────────────────────────

  #[test]
  fn redacted_url_hides_the_key() {
    let url = Url::parse_with_params("https://api.openweathermap.org/data/2.5/weather", &[
      ("lat", "1"),
      ("lon", "2"),
      ("units", "metric"),
      ("appid", KEY),
    ])
    .unwrap();

    let shown = redacted(&url);
    assert!(!shown.contains(KEY), "{shown}");
    assert!(shown.contains("appid=API_KEY"), "{shown}");
    assert!(shown.contains("lat=1&lon=2&units=metric"), "{shown}");
  }

  #[tokio::test]
  async fn transport_errors_do_not_leak_the_key() {
    // Nothing listens on port 9 on the loopback interface.
    let c = OpenWeatherClient::new(ClientConfig {
      api_key:  Some(KEY.to_owned()),
      base_url: "http://127.0.0.1:9".to_owned(),
      timeout:  Duration::from_secs(2),
    })
    .unwrap();

    let err = c.geocode("Paris").await.unwrap_err();
    assert!(matches!(err, ProviderError::Transport(_)), "{err:?}");
    assert!(!err.to_string().contains(KEY));
  }
}
