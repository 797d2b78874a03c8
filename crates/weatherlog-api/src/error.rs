//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use weatherlog_core::ProviderError;

/// An error returned by an API handler.
///
/// Every variant is answered with `500` and `{"error": "<message>"}`, where
/// the message is the underlying failure's own text.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Provider(#[from] ProviderError),

  #[error("{0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let message = self.to_string();
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": message }))).into_response()
  }
}
