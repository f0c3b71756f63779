//! Road Hex Library - Road Geometries to H3 Hexagon Cells
//!
//! This library converts road line geometries (read from a shapefile or from the
//! intermediate GeoJSON-shaped document) into a deduplicated set of H3 cells at a
//! configurable resolution.
//!
//! # Architecture
//!
//! - **[`Coordinate`]**: Validated `(longitude, latitude)` pair, bounds-checked on construction
//! - **[`FeatureCollection`]**: Immutable set of road features sharing one CRS
//! - **[`segmentize`]**: Bounded-length resampling of a polyline
//! - **[`extract_coordinates`]**: Flattens a collection into one ordered coordinate sequence
//! - **[`map_to_cells`]**: Coordinates to H3 cells plus their neighbour disk, deduplicated
//! - **[`Pipeline`]**: Fixed-order batch run from input file to output files
//!
//! # Data Flow
//!
//! ```text
//! FeatureCollection -> segmentize_collection -> extract_coordinates -> map_to_cells -> CellSet
//! ```

mod cells;
mod collection;
mod coordinate;
mod feature;
pub mod ingest;
pub mod output;
mod pipeline;
mod segment;

// Public API exports
pub use cells::{
    CellSet, MAX_NEIGHBOR_RADIUS, NeighborPolicy, cell_for, map_to_cells, map_to_cells_with,
    parse_resolution,
};
pub use collection::{CollectionInfo, Crs, CrsProperties, FeatureCollection, extract_coordinates};
pub use coordinate::{Coordinate, CoordinateBounds};
pub use feature::{Feature, Geometry, GeometryType, Properties, RoadClass};
pub use pipeline::{Pipeline, PipelineConfig, PipelineReport};
pub use segment::{DEFAULT_MAX_SEGMENT_LENGTH, segmentize, segmentize_collection};

use std::path::PathBuf;

/// Error types for the conversion pipeline
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("Coordinate {axis} value {value} outside [{min}, {max}]")]
    CoordinateOutOfBounds {
        axis: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Feature {feature}: missing property `{name}`")]
    MissingProperty { feature: String, name: &'static str },

    #[error("Feature {feature}: invalid property `{name}`: {reason}")]
    InvalidProperty {
        feature: String,
        name: &'static str,
        reason: String,
    },

    #[error("Failed to ingest {}: {reason}", path.display())]
    Ingest { path: PathBuf, reason: String },

    #[error("H3 cell mapping error: {0}")]
    CellMapping(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DataError {
    /// Shorthand for an [`DataError::InvalidArgument`]
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Attach a path to an IO error
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
