//! Connector synthesis
//!
//! Builds the two dashed "doorstep" segments joining the searched points to
//! the computed route: the approach (start → first route vertex) and the
//! egress (last route vertex → end). Pure geometry, recomputed per run.

use domain::{ConnectorFeatureCollection, Coordinate, LineFeature, RouteFeatureCollection};

use crate::error::ApplicationError;

/// Synthesize the connector segments for a route
///
/// # Errors
///
/// Returns `MalformedRoute` if the route has no features or its first
/// feature's coordinate sequence is empty.
pub fn synthesize(
    start: Coordinate,
    end: Coordinate,
    route: &RouteFeatureCollection,
) -> Result<ConnectorFeatureCollection, ApplicationError> {
    let (entry, exit) = route.endpoints()?;
    Ok(ConnectorFeatureCollection::new(
        LineFeature::segment(start, entry),
        LineFeature::segment(exit, end),
    ))
}
