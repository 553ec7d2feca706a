//! Infrastructure layer - Adapters for external systems
//!
//! Implements the ports defined in the application layer using the
//! geocoding and routing integration clients, and loads the aggregate
//! application configuration.

pub mod adapters;
pub mod config;

pub use adapters::{NominatimGeocodingAdapter, RouteBackendAdapter};
pub use config::{AppConfig, ConfigError};
