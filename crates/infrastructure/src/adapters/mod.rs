//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete integration clients.

mod geocoding_adapter;
mod routing_adapter;

pub use geocoding_adapter::NominatimGeocodingAdapter;
pub use routing_adapter::RouteBackendAdapter;
