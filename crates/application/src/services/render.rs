//! Rendering constants for the map surface
//!
//! The rendering surface draws markers and lines from published pipeline
//! state; the styling is fixed and lives here so every surface renders the
//! route the same way.

use domain::Coordinate;
use serde::Serialize;

/// Styling for a drawn line layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineStyle {
    /// CSS color of the line
    pub color: &'static str,
    /// Line width in pixels
    pub width: f32,
    /// Line opacity (0.0 - 1.0)
    pub opacity: f32,
    /// Dash/gap lengths; `None` draws a solid line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<[u32; 2]>,
}

/// Styling for a point marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerStyle {
    /// CSS color of the marker
    pub color: &'static str,
}

/// Main route line: solid blue on the road
pub const ROUTE_LINE_STYLE: LineStyle = LineStyle {
    color: "#3b82f6",
    width: 6.0,
    opacity: 0.8,
    dash_array: None,
};

/// Connector lines: dashed grey to the doorstep
pub const CONNECTOR_LINE_STYLE: LineStyle = LineStyle {
    color: "#555",
    width: 3.0,
    opacity: 0.7,
    dash_array: Some([2, 2]),
};

/// Start-point marker
pub const START_MARKER_STYLE: MarkerStyle = MarkerStyle { color: "green" };

/// End-point marker
pub const END_MARKER_STYLE: MarkerStyle = MarkerStyle { color: "red" };

/// Initial map viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    /// Map centre
    pub center: Coordinate,
    /// Zoom level
    pub zoom: f32,
}

/// Where the map opens before any search: central Manchester
pub const INITIAL_VIEWPORT: Viewport = Viewport {
    center: Coordinate::manchester(),
    zoom: 13.0,
};
