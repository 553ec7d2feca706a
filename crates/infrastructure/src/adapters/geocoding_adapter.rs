//! Geocoding adapter - Implements GeocodingPort using integration_geocoding

use application::error::ApplicationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::{Address, Coordinate};
use integration_geocoding::{GeocodingClient, NominatimClient};
use tracing::{instrument, warn};

/// Adapter for address resolution using Nominatim
///
/// Every client failure (empty candidate list, transport error, parse
/// error) folds into `GeocodeNotFound` naming the query; the pipeline
/// treats them all as an unresolvable address. The underlying cause is
/// logged before it is folded.
#[derive(Debug)]
pub struct NominatimGeocodingAdapter {
    client: NominatimClient,
}

impl NominatimGeocodingAdapter {
    /// Create a new geocoding adapter
    pub fn new(client: NominatimClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GeocodingPort for NominatimGeocodingAdapter {
    #[instrument(skip(self))]
    async fn resolve(&self, query: &Address) -> Result<Coordinate, ApplicationError> {
        self.client.resolve(query).await.map_err(|error| {
            warn!(%query, %error, "Geocoding failed");
            ApplicationError::GeocodeNotFound {
                query: query.to_string(),
            }
        })
    }
}
