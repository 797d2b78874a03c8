//! Error types for `weatherlog-core`.

use thiserror::Error;

/// Failure of a call to the upstream weather provider.
///
/// The `Display` text of each variant is what API clients see in the
/// `{"error": ...}` body, so it never carries the credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
  /// No credential is configured. Raised before any network call.
  #[error("API key not configured")]
  Configuration,

  /// The geocoder returned no usable match.
  #[error("Location not found")]
  LocationNotFound,

  /// The provider reported a non-success code inside its payload, or the
  /// payload could not be understood.
  #[error("{0}")]
  Upstream(String),

  /// The provider could not be reached.
  #[error("{0}")]
  Transport(String),
}

pub type Result<T, E = ProviderError> = std::result::Result<T, E>;
