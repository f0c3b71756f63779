//! Road feature records: geometry plus the property bag carried through the pipeline

use crate::{Coordinate, DataError, Result};
use serde::{Deserialize, Serialize};

/// Road classification as found in the source attribute table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoadClass {
    #[serde(rename = "Principal Road")]
    PrincipalRoad,
    #[serde(rename = "Dual Carriageway")]
    DualCarriageway,
}

impl RoadClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrincipalRoad => "Principal Road",
            Self::DualCarriageway => "Dual Carriageway",
        }
    }

    /// Parse the attribute value; `None` if the label is unknown
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Principal Road" => Some(Self::PrincipalRoad),
            "Dual Carriageway" => Some(Self::DualCarriageway),
            _ => None,
        }
    }
}

/// Road attributes. The pipeline never interprets these, only carries them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub id_t1: f64,
    pub road_name: String,
    pub class: Option<RoadClass>,
    pub nrn: Option<String>,
}

/// Geometry kinds understood by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    LineString,
    MultiLineString,
}

/// A feature geometry with at least one coordinate per part
///
/// Only [`GeometryType::LineString`] is segmentized; multi-part lines pass through
/// unchanged but still contribute their coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates", try_from = "RawGeometry")]
pub enum Geometry {
    LineString(Vec<Coordinate>),
    MultiLineString(Vec<Vec<Coordinate>>),
}

/// Unvalidated mirror of [`Geometry`] used during deserialization
#[derive(Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum RawGeometry {
    LineString(Vec<Coordinate>),
    MultiLineString(Vec<Vec<Coordinate>>),
}

impl TryFrom<RawGeometry> for Geometry {
    type Error = DataError;

    fn try_from(raw: RawGeometry) -> Result<Self> {
        match raw {
            RawGeometry::LineString(coordinates) => Self::line_string(coordinates),
            RawGeometry::MultiLineString(parts) => Self::multi_line_string(parts),
        }
    }
}

impl Geometry {
    /// Build a line string, rejecting an empty point sequence
    pub fn line_string(coordinates: Vec<Coordinate>) -> Result<Self> {
        if coordinates.is_empty() {
            return Err(DataError::InvalidGeometry(
                "LineString must contain at least one coordinate".to_string(),
            ));
        }
        Ok(Self::LineString(coordinates))
    }

    /// Build a multi-part line, rejecting empty parts
    pub fn multi_line_string(parts: Vec<Vec<Coordinate>>) -> Result<Self> {
        if parts.is_empty() {
            return Err(DataError::InvalidGeometry(
                "MultiLineString must contain at least one part".to_string(),
            ));
        }
        if let Some(index) = parts.iter().position(Vec::is_empty) {
            return Err(DataError::InvalidGeometry(format!(
                "MultiLineString part {index} is empty"
            )));
        }
        Ok(Self::MultiLineString(parts))
    }

    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Self::LineString(_) => GeometryType::LineString,
            Self::MultiLineString(_) => GeometryType::MultiLineString,
        }
    }

    /// All coordinates in path order (parts concatenated for multi-part lines)
    pub fn coordinates(&self) -> impl Iterator<Item = &Coordinate> + '_ {
        let parts: &[Vec<Coordinate>] = match self {
            Self::LineString(coordinates) => std::slice::from_ref(coordinates),
            Self::MultiLineString(parts) => parts,
        };
        parts.iter().flatten()
    }

    pub fn point_count(&self) -> usize {
        match self {
            Self::LineString(coordinates) => coordinates.len(),
            Self::MultiLineString(parts) => parts.iter().map(Vec::len).sum(),
        }
    }
}

/// A single road feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    #[serde(rename = "type", default = "Feature::default_kind")]
    pub kind: String,
    pub properties: Properties,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(id: impl Into<String>, properties: Properties, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            kind: Self::default_kind(),
            properties,
            geometry,
        }
    }

    fn default_kind() -> String {
        "Feature".to_string()
    }

    /// Copy of this feature carrying a different geometry
    pub fn with_geometry(&self, geometry: Geometry) -> Self {
        Self {
            id: self.id.clone(),
            kind: self.kind.clone(),
            properties: self.properties.clone(),
            geometry,
        }
    }
}
