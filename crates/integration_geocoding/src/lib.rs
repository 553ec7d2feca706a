//! Address geocoding for the walking-route planner
//!
//! Resolves free-text addresses to coordinates using the
//! [Nominatim](https://nominatim.openstreetmap.org) API (OpenStreetMap).
//! Searches are biased to a configured service-area bounding box, and only
//! the first candidate of a response is consumed.
//!
//! # Architecture
//!
//! [`GeocodingClient`] defines the interface, implemented by
//! [`NominatimClient`]. The client rate-limits to one request per second per
//! Nominatim usage policy and caches results in memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::Address;
//! use integration_geocoding::{GeocodingConfig, NominatimClient};
//!
//! let config = GeocodingConfig::default();
//! let client = NominatimClient::new(&config)?;
//!
//! let query = Address::new("Manchester Town Hall")?;
//! let coordinate = client.resolve(&query).await?;
//! ```

mod client;
mod config;
mod error;

pub use client::{GeocodingClient, NominatimClient};
pub use config::GeocodingConfig;
pub use error::GeocodingError;
