//! Validated coordinate value type
//!
//! A [`Coordinate`] is an immutable `(longitude, latitude)` pair in degrees. Range
//! checks happen against a [`CoordinateBounds`] when the coordinate is built from
//! untrusted input.

use crate::{DataError, Result};
use geo::Coord;
use serde::{Deserialize, Serialize};

/// Axis-aligned validation box for coordinates, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl CoordinateBounds {
    /// The box declared by the source document schema: `[0, 180]` on both axes.
    ///
    /// Note that this rejects negative longitudes and latitudes (the whole Western and
    /// Southern hemispheres). It is kept as the default so existing datasets validate
    /// exactly as before; use [`CoordinateBounds::WGS84`] for the full globe.
    pub const DECLARED: Self = Self {
        min_x: 0.0,
        max_x: 180.0,
        min_y: 0.0,
        max_y: 180.0,
    };

    /// Full longitude/latitude range
    pub const WGS84: Self = Self {
        min_x: -180.0,
        max_x: 180.0,
        min_y: -90.0,
        max_y: 90.0,
    };

    /// Check a raw pair, reporting the first offending axis
    pub fn check(&self, x: f64, y: f64) -> Result<()> {
        if !(self.min_x..=self.max_x).contains(&x) {
            return Err(DataError::CoordinateOutOfBounds {
                axis: "x",
                value: x,
                min: self.min_x,
                max: self.max_x,
            });
        }
        if !(self.min_y..=self.max_y).contains(&y) {
            return Err(DataError::CoordinateOutOfBounds {
                axis: "y",
                value: y,
                min: self.min_y,
                max: self.max_y,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.check(x, y).is_ok()
    }
}

impl Default for CoordinateBounds {
    fn default() -> Self {
        Self::DECLARED
    }
}

/// A `(longitude, latitude)` pair in degrees
///
/// Serialized as a two-element JSON array `[x, y]`. Deserializing checks the arity
/// and that both values are finite; the bounds check is applied to whole documents
/// by [`FeatureCollection::from_json_str`](crate::FeatureCollection::from_json_str).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Coordinate(Coord<f64>);

impl Coordinate {
    /// Create a coordinate, rejecting values outside `bounds`
    pub fn new(x: f64, y: f64, bounds: &CoordinateBounds) -> Result<Self> {
        bounds.check(x, y)?;
        Ok(Self(Coord { x, y }))
    }

    /// Wrap a coordinate derived from already-validated ones (e.g. interpolated
    /// between two in-bounds vertices, which stays inside the same box)
    #[inline]
    pub(crate) fn from_coord(coord: Coord<f64>) -> Self {
        Self(coord)
    }

    /// Longitude
    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    /// Latitude
    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.0.y
    }

    /// The underlying `geo` coordinate
    #[inline]
    pub fn coord(&self) -> Coord<f64> {
        self.0
    }

    /// Euclidean distance in input units (degrees)
    #[inline]
    pub fn distance(&self, other: &Coordinate) -> f64 {
        (other.0.x - self.0.x).hypot(other.0.y - self.0.y)
    }
}

impl TryFrom<Vec<f64>> for Coordinate {
    type Error = DataError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        match values.as_slice() {
            &[x, y] if x.is_finite() && y.is_finite() => Ok(Self(Coord { x, y })),
            &[x, y] => Err(DataError::InvalidGeometry(format!(
                "coordinate [{x}, {y}] is not finite"
            ))),
            other => Err(DataError::InvalidGeometry(format!(
                "coordinate must have exactly 2 values, got {}",
                other.len()
            ))),
        }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coordinate: Coordinate) -> Self {
        [coordinate.0.x, coordinate.0.y]
    }
}
