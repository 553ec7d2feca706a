//! Route geometry model
//!
//! GeoJSON-shaped types for route and connector lines as exchanged with the
//! routing backend and consumed by the rendering surface. The route
//! collection carries a nonstandard top-level `metadata` record with the
//! route's distance and estimated walking time.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_objects::Coordinate;

/// A LineString geometry: an ordered sequence of positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "LineString")]
pub struct LineString {
    /// Positions as `[lon, lat]` pairs
    pub coordinates: Vec<Coordinate>,
}

impl LineString {
    /// Create a line through the given positions
    #[must_use]
    pub fn new(coordinates: Vec<Coordinate>) -> Self {
        Self { coordinates }
    }

    /// First position, if any
    #[must_use]
    pub fn first_vertex(&self) -> Option<Coordinate> {
        self.coordinates.first().copied()
    }

    /// Last position, if any
    #[must_use]
    pub fn last_vertex(&self) -> Option<Coordinate> {
        self.coordinates.last().copied()
    }
}

/// A GeoJSON Feature wrapping a LineString
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct LineFeature {
    /// The feature's geometry
    pub geometry: LineString,
    /// Free-form properties; empty for all lines this system produces
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl LineFeature {
    /// Create a feature from a line geometry with empty properties
    #[must_use]
    pub fn new(geometry: LineString) -> Self {
        Self {
            geometry,
            properties: serde_json::Map::new(),
        }
    }

    /// Create a two-point segment feature
    #[must_use]
    pub fn segment(from: Coordinate, to: Coordinate) -> Self {
        Self::new(LineString::new(vec![from, to]))
    }
}

/// Distance and estimated walking time for a computed route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Route length in metres
    pub distance_m: f64,
    /// Estimated walking time in minutes
    pub duration_min: f64,
}

impl RouteSummary {
    /// Distance formatted for the stats panel, e.g. "5.00 km"
    #[must_use]
    pub fn format_distance(&self) -> String {
        format!("{:.2} km", self.distance_m / 1000.0)
    }

    /// Duration formatted for the stats panel, e.g. "60 mins"
    #[must_use]
    pub fn format_duration(&self) -> String {
        format!("{} mins", self.duration_min.round())
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.format_distance(), self.format_duration())
    }
}

/// A malformed route response from the backend
///
/// The backend is assumed to return at least one feature whose geometry has
/// at least one position; these variants make the assumption explicit
/// instead of panicking on an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedRoute {
    /// The collection has no features
    #[error("Route has no features")]
    NoFeatures,
    /// The first feature's coordinate sequence is empty
    #[error("Route's first feature has no coordinates")]
    EmptyLine,
}

/// The route returned by the routing backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct RouteFeatureCollection {
    /// Route lines, ordered; the first feature carries the walking path
    pub features: Vec<LineFeature>,
    /// Distance/time summary, when the backend provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RouteSummary>,
}

impl RouteFeatureCollection {
    /// Create a collection without metadata
    #[must_use]
    pub fn new(features: Vec<LineFeature>) -> Self {
        Self {
            features,
            metadata: None,
        }
    }

    /// Attach a distance/time summary
    #[must_use]
    pub fn with_metadata(mut self, metadata: RouteSummary) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// First and last vertex of the first feature's line
    ///
    /// # Errors
    ///
    /// Returns `MalformedRoute` if the collection has no features or the
    /// first feature's coordinate sequence is empty.
    pub fn endpoints(&self) -> Result<(Coordinate, Coordinate), MalformedRoute> {
        let line = &self
            .features
            .first()
            .ok_or(MalformedRoute::NoFeatures)?
            .geometry;
        let first = line.first_vertex().ok_or(MalformedRoute::EmptyLine)?;
        let last = line.last_vertex().ok_or(MalformedRoute::EmptyLine)?;
        Ok((first, last))
    }
}

/// The two synthesized "doorstep" segments linking the searched points to
/// the route: (start → route entry) and (route exit → end)
///
/// Always exactly two two-point features; derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct ConnectorFeatureCollection {
    features: Vec<LineFeature>,
}

impl ConnectorFeatureCollection {
    /// Build from the approach segment (start → route entry) and the
    /// egress segment (route exit → end), in that order
    #[must_use]
    pub fn new(approach: LineFeature, egress: LineFeature) -> Self {
        Self {
            features: vec![approach, egress],
        }
    }

    /// The two segments, approach first
    #[must_use]
    pub fn features(&self) -> &[LineFeature] {
        &self.features
    }
}
