//! Input readers producing a validated [`FeatureCollection`]
//!
//! Shapefiles are read with their `.dbf` attribute table and optional `.prj`
//! projection sidecar. GeoJSON-shaped documents previously written by this crate
//! can be read back directly.

use crate::{
    Coordinate, CoordinateBounds, Crs, DataError, Feature, FeatureCollection, Geometry,
    Properties, Result, RoadClass,
};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{Point, PointM, PointZ, Shape};
use std::path::Path;

/// Read any supported input, dispatching on the file extension
pub fn read_path(path: &Path, bounds: &CoordinateBounds) -> Result<FeatureCollection> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("shp") => read_shapefile(path, bounds),
        Some("geojson") | Some("json") => read_geojson(path, bounds),
        _ => Err(DataError::Ingest {
            path: path.to_path_buf(),
            reason: "unsupported file type (expected .shp, .geojson or .json)".to_string(),
        }),
    }
}

/// Read a GeoJSON-shaped feature collection document
pub fn read_geojson(path: &Path, bounds: &CoordinateBounds) -> Result<FeatureCollection> {
    let json = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    let collection = FeatureCollection::from_json_str(&json, bounds)?;
    tracing::info!(
        "Read {} features from {}",
        collection.len(),
        path.display()
    );
    Ok(collection)
}

/// Read a polyline shapefile and its attribute table
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn read_shapefile(path: &Path, bounds: &CoordinateBounds) -> Result<FeatureCollection> {
    let ingest_error = |reason: String| DataError::Ingest {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader =
        shapefile::Reader::from_path(path).map_err(|e| ingest_error(e.to_string()))?;

    let mut features = Vec::new();
    for (index, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) =
            result.map_err(|e| ingest_error(format!("record {index}: {e}")))?;
        let id = index.to_string();

        let geometry = shape_to_geometry(&shape, bounds).map_err(|e| match e {
            DataError::InvalidGeometry(reason) => {
                DataError::InvalidGeometry(format!("record {index}: {reason}"))
            }
            other => ingest_error(format!("record {index}: {other}")),
        })?;
        let properties = record_to_properties(&id, &record)?;

        features.push(Feature::new(id, properties, geometry));
    }

    let crs = read_prj_crs(path)?;
    tracing::info!(
        "Read {} features from {} (CRS {})",
        features.len(),
        path.display(),
        crs.name()
    );

    Ok(FeatureCollection::new(features, crs))
}

/// Convert shape parts to validated coordinates
fn parts_to_coordinates<P, F>(
    parts: &[Vec<P>],
    bounds: &CoordinateBounds,
    xy: F,
) -> Result<Vec<Vec<Coordinate>>>
where
    F: Fn(&P) -> (f64, f64),
{
    parts
        .iter()
        .map(|part| {
            part.iter()
                .map(|p| {
                    let (x, y) = xy(p);
                    Coordinate::new(x, y, bounds)
                })
                .collect()
        })
        .collect()
}

/// Single-part polylines become `LineString`s, multi-part ones `MultiLineString`s
fn parts_to_geometry(mut parts: Vec<Vec<Coordinate>>) -> Result<Geometry> {
    if parts.len() == 1 {
        Geometry::line_string(parts.remove(0))
    } else {
        Geometry::multi_line_string(parts)
    }
}

fn shape_to_geometry(shape: &Shape, bounds: &CoordinateBounds) -> Result<Geometry> {
    let parts = match shape {
        Shape::Polyline(line) => {
            parts_to_coordinates(line.parts(), bounds, |p: &Point| (p.x, p.y))?
        }
        Shape::PolylineM(line) => {
            parts_to_coordinates(line.parts(), bounds, |p: &PointM| (p.x, p.y))?
        }
        Shape::PolylineZ(line) => {
            parts_to_coordinates(line.parts(), bounds, |p: &PointZ| (p.x, p.y))?
        }
        other => {
            return Err(DataError::InvalidGeometry(format!(
                "unsupported shape type {:?}",
                other.shapetype()
            )));
        }
    };
    parts_to_geometry(parts)
}

fn record_to_properties(feature: &str, record: &Record) -> Result<Properties> {
    let id_t1 = match required_field(feature, record, "id_t1")? {
        FieldValue::Numeric(Some(v)) | FieldValue::Double(v) | FieldValue::Currency(v) => *v,
        FieldValue::Float(Some(v)) => f64::from(*v),
        FieldValue::Integer(v) => f64::from(*v),
        FieldValue::Character(Some(s)) => {
            s.trim()
                .parse::<f64>()
                .map_err(|e| DataError::InvalidProperty {
                    feature: feature.to_string(),
                    name: "id_t1",
                    reason: format!("{s:?} is not a number: {e}"),
                })?
        }
        other => {
            return Err(DataError::InvalidProperty {
                feature: feature.to_string(),
                name: "id_t1",
                reason: format!("expected a number, got {other:?}"),
            });
        }
    };

    let road_name =
        optional_text(record, "road_name").ok_or_else(|| DataError::MissingProperty {
            feature: feature.to_string(),
            name: "road_name",
        })?;

    let class = match optional_text(record, "class") {
        None => None,
        Some(label) => Some(RoadClass::from_label(&label).ok_or_else(|| {
            DataError::InvalidProperty {
                feature: feature.to_string(),
                name: "class",
                reason: format!("unknown road class {label:?}"),
            }
        })?),
    };

    Ok(Properties {
        id_t1,
        road_name,
        class,
        nrn: optional_text(record, "nrn"),
    })
}

fn required_field<'a>(
    feature: &str,
    record: &'a Record,
    name: &'static str,
) -> Result<&'a FieldValue> {
    record.get(name).ok_or_else(|| DataError::MissingProperty {
        feature: feature.to_string(),
        name,
    })
}

/// Text attribute, `None` when absent, null or blank
fn optional_text(record: &Record, name: &str) -> Option<String> {
    let text = match record.get(name)? {
        FieldValue::Character(Some(s)) => s.trim().to_string(),
        FieldValue::Memo(s) => s.trim().to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// CRS name from the `.prj` sidecar, or the default CRS when there is none
fn read_prj_crs(shp_path: &Path) -> Result<Crs> {
    let prj_path = shp_path.with_extension("prj");
    if !prj_path.exists() {
        tracing::debug!("No projection file at {}", prj_path.display());
        return Ok(Crs::default());
    }

    let wkt = std::fs::read_to_string(&prj_path).map_err(|e| DataError::io(&prj_path, e))?;
    Ok(wkt_name(&wkt).map(Crs::named).unwrap_or_default())
}

/// First quoted name of a WKT definition, e.g. `PROJCS["British_National_Grid",...`
fn wkt_name(wkt: &str) -> Option<&str> {
    let start = wkt.find('"')? + 1;
    let len = wkt[start..].find('"')?;
    let name = &wkt[start..start + len];
    (!name.is_empty()).then_some(name)
}
