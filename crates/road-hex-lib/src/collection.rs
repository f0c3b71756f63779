//! FeatureCollection - the GeoJSON-shaped document that flows through the pipeline
//!
//! A collection is built once (from ingestion or from JSON) and never mutated;
//! transforms such as segmentization produce a new collection.

use crate::{Coordinate, CoordinateBounds, Feature, GeometryType, Result};
use serde::{Deserialize, Serialize};

/// Default CRS name used when the source carries no projection information
pub const DEFAULT_CRS_NAME: &str = "urn:ogc:def:crs:OGC:1.3:CRS84";

/// Coordinate reference system properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrsProperties {
    pub name: String,
}

/// Named coordinate reference system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crs {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: CrsProperties,
}

impl Crs {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            kind: "name".to_string(),
            properties: CrsProperties { name: name.into() },
        }
    }

    pub fn name(&self) -> &str {
        &self.properties.name
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::named(DEFAULT_CRS_NAME)
    }
}

/// Summary statistics about a collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionInfo {
    /// Number of features
    pub feature_count: usize,
    /// Number of features with a `LineString` geometry
    pub line_string_count: usize,
    /// Total number of coordinates across all geometries
    pub point_count: usize,
}

/// Ordered set of road features sharing one CRS
///
/// Only [`FeatureCollection::from_json_str`] parses a document, so every parsed
/// collection has been checked against a coordinate box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<Feature>,
    crs: Crs,
}

/// Document shape before bounds validation
#[derive(Deserialize)]
struct RawCollection {
    #[serde(rename = "type", default = "FeatureCollection::default_kind")]
    kind: String,
    features: Vec<Feature>,
    crs: Crs,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl FeatureCollection {
    pub fn new(features: Vec<Feature>, crs: Crs) -> Self {
        Self {
            kind: Self::default_kind(),
            features,
            crs,
        }
    }

    fn default_kind() -> String {
        "FeatureCollection".to_string()
    }

    /// Parse and validate a JSON document
    ///
    /// Structural checks (coordinate arity, non-empty geometries, required
    /// properties) happen during parsing; every coordinate is then checked against
    /// `bounds`.
    pub fn from_json_str(json: &str, bounds: &CoordinateBounds) -> Result<Self> {
        let raw: RawCollection = serde_json::from_str(json)?;
        let collection = Self {
            kind: raw.kind,
            features: raw.features,
            crs: raw.crs,
        };
        collection.validate(bounds)?;
        Ok(collection)
    }

    /// Serialize to a compact JSON document
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check every coordinate against `bounds`
    pub fn validate(&self, bounds: &CoordinateBounds) -> Result<()> {
        for feature in &self.features {
            for coordinate in feature.geometry.coordinates() {
                bounds.check(coordinate.x(), coordinate.y()).map_err(|err| {
                    tracing::error!("Feature {} failed validation: {err}", feature.id);
                    err
                })?;
            }
        }
        Ok(())
    }

    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    #[inline]
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Build a new collection with the same CRS and transformed features
    pub fn map_features<F>(&self, f: F) -> Result<Self>
    where
        F: FnMut(&Feature) -> Result<Feature>,
    {
        let features = self.features.iter().map(f).collect::<Result<Vec<_>>>()?;
        Ok(Self {
            kind: self.kind.clone(),
            features,
            crs: self.crs.clone(),
        })
    }

    pub fn info(&self) -> CollectionInfo {
        CollectionInfo {
            feature_count: self.features.len(),
            line_string_count: self
                .features
                .iter()
                .filter(|f| f.geometry.geometry_type() == GeometryType::LineString)
                .count(),
            point_count: self
                .features
                .iter()
                .map(|f| f.geometry.point_count())
                .sum(),
        }
    }
}

/// Flatten a collection into one coordinate sequence
///
/// Order follows feature order, then point order within each geometry. No
/// deduplication and no filtering.
pub fn extract_coordinates(collection: &FeatureCollection) -> Vec<Coordinate> {
    #[cfg(feature = "profiling")]
    profiling::scope!("collection::extract_coordinates");

    let mut coordinates = Vec::with_capacity(collection.info().point_count);
    for feature in collection.features() {
        coordinates.extend(feature.geometry.coordinates().copied());
    }
    coordinates
}
