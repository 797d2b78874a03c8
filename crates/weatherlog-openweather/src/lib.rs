//! OpenWeather client for weatherlog.
//!
//! Implements [`weatherlog_core::provider::WeatherProvider`] against the
//! OpenWeather geocoding (`/geo/1.0/direct`) and current-weather
//! (`/data/2.5/weather`) endpoints.

mod client;
mod payload;

pub use client::{ClientConfig, DEFAULT_BASE_URL, OpenWeatherClient, REDACTED_KEY};
