//! Service-area bounding box value object

use std::fmt;

use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;

/// A rectangular lon/lat window used to bias geocoding to the service area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western edge (minimum longitude)
    pub min_lon: f64,
    /// Southern edge (minimum latitude)
    pub min_lat: f64,
    /// Eastern edge (maximum longitude)
    pub max_lon: f64,
    /// Northern edge (maximum latitude)
    pub max_lat: f64,
}

/// Error type for a degenerate or out-of-range bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidBoundingBox;

impl fmt::Display for InvalidBoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid bounding box: edges must be in range and min must be below max"
        )
    }
}

impl std::error::Error for InvalidBoundingBox {}

impl BoundingBox {
    /// Create a bounding box with validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidBoundingBox` if an edge is out of WGS84 range or
    /// the minimum edge is not strictly below the maximum.
    pub fn new(
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
    ) -> Result<Self, InvalidBoundingBox> {
        let lon_range = -180.0..=180.0;
        let lat_range = -90.0..=90.0;
        if !lon_range.contains(&min_lon)
            || !lon_range.contains(&max_lon)
            || !lat_range.contains(&min_lat)
            || !lat_range.contains(&max_lat)
            || min_lon >= max_lon
            || min_lat >= max_lat
        {
            return Err(InvalidBoundingBox);
        }
        Ok(Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        })
    }

    /// Central Manchester, the default service area
    #[must_use]
    pub const fn manchester() -> Self {
        Self {
            min_lon: -2.35,
            min_lat: 53.35,
            max_lon: -2.15,
            max_lat: 53.55,
        }
    }

    /// Whether a coordinate falls inside the window
    #[must_use]
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        (self.min_lon..=self.max_lon).contains(&coordinate.longitude())
            && (self.min_lat..=self.max_lat).contains(&coordinate.latitude())
    }

    /// Render as a Nominatim `viewbox` query value: `left,top,right,bottom`
    #[must_use]
    pub fn to_viewbox_param(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.max_lat, self.max_lon, self.min_lat
        )
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::manchester()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bounding_box() {
        let bbox = BoundingBox::new(-2.35, 53.35, -2.15, 53.55).expect("valid box");
        assert!((bbox.min_lon - -2.35).abs() < f64::EPSILON);
        assert!((bbox.max_lat - 53.55).abs() < f64::EPSILON);
    }

    #[test]
    fn test_degenerate_box_rejected() {
        assert!(BoundingBox::new(-2.15, 53.35, -2.35, 53.55).is_err());
        assert!(BoundingBox::new(-2.35, 53.55, -2.15, 53.35).is_err());
        assert!(BoundingBox::new(-2.35, 53.35, -2.35, 53.55).is_err());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(BoundingBox::new(-200.0, 53.35, -2.15, 53.55).is_err());
        assert!(BoundingBox::new(-2.35, -95.0, -2.15, 53.55).is_err());
    }

    #[test]
    fn test_contains() {
        let bbox = BoundingBox::manchester();
        assert!(bbox.contains(&Coordinate::manchester()));
        let london = Coordinate::new_unchecked(-0.1278, 51.5074);
        assert!(!bbox.contains(&london));
    }

    #[test]
    fn test_viewbox_param_order() {
        // Nominatim expects left,top,right,bottom
        let bbox = BoundingBox::manchester();
        assert_eq!(bbox.to_viewbox_param(), "-2.35,53.55,-2.15,53.35");
    }

    #[test]
    fn test_default_is_manchester() {
        assert_eq!(BoundingBox::default(), BoundingBox::manchester());
    }
}
