//! Core types and trait definitions for weatherlog.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store, provider and API crates all depend on it.

pub mod error;
pub mod observation;
pub mod provider;
pub mod store;

pub use error::{ProviderError, Result};
