//! File writers for collections, coordinate lists and cell sets
//!
//! Every writer streams into a temporary sibling file and renames it over the
//! target once complete, so a failed write never leaves a truncated output behind.

use crate::{CellSet, Coordinate, DataError, FeatureCollection, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default number of decimals kept in coordinate CSVs
pub const DEFAULT_DECIMALS: u32 = 4;

/// Maximum number of decimals accepted; beyond this an `f64` has no more digits
pub const MAX_DECIMALS: u32 = 15;

/// One row of a coordinate CSV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateRow {
    pub index: usize,
    pub latitude: f64,
    pub longitude: f64,
}

/// One row of a cell CSV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRow {
    pub index: usize,
    pub h3_hexagon: String,
}

/// Round half away from zero to `decimals` places
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Sibling path the data is staged in before the final rename
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write through a staging file, renaming it into place on success
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DataError::io(parent, e))?;
    }

    let staging = staging_path(path);
    let result = File::create(&staging)
        .map_err(|e| DataError::io(&staging, e))
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;
            writer.flush().map_err(|e| DataError::io(&staging, e))
        })
        .and_then(|()| std::fs::rename(&staging, path).map_err(|e| DataError::io(path, e)));

    if result.is_err() {
        // Best effort, the original error is what matters
        let _ = std::fs::remove_file(&staging);
    }
    result
}

/// Write a feature collection as a compact JSON document
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn write_geojson(path: &Path, collection: &FeatureCollection) -> Result<()> {
    write_atomically(path, |writer| {
        serde_json::to_writer(&mut *writer, collection)?;
        Ok(())
    })?;
    tracing::info!(
        "Wrote {} features to {}",
        collection.len(),
        path.display()
    );
    Ok(())
}

/// Write coordinates as `index,latitude,longitude`, rounded to `decimals` places
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn write_coordinates_csv(
    path: &Path,
    coordinates: &[Coordinate],
    decimals: u32,
) -> Result<()> {
    if decimals > MAX_DECIMALS {
        return Err(DataError::invalid_argument(
            "decimals",
            format!("{decimals} exceeds the maximum of {MAX_DECIMALS}"),
        ));
    }

    write_atomically(path, |writer| {
        let mut csv = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut *writer);
        csv.write_record(["index", "latitude", "longitude"])?;
        for (index, coordinate) in coordinates.iter().enumerate() {
            csv.serialize(CoordinateRow {
                index,
                latitude: round_to(coordinate.latitude(), decimals),
                longitude: round_to(coordinate.longitude(), decimals),
            })?;
        }
        csv.flush().map_err(|e| DataError::io(path, e))
    })?;
    tracing::info!(
        "Wrote {} coordinates to {}",
        coordinates.len(),
        path.display()
    );
    Ok(())
}

/// Write cells as `index,h3_hexagon`
///
/// Rows are in ascending cell order; the index is a plain row counter.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn write_cells_csv(path: &Path, cells: &CellSet) -> Result<()> {
    write_atomically(path, |writer| {
        let mut csv = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut *writer);
        csv.write_record(["index", "h3_hexagon"])?;
        for (index, cell) in cells.sorted().into_iter().enumerate() {
            csv.serialize(CellRow {
                index,
                h3_hexagon: cell.to_string(),
            })?;
        }
        csv.flush().map_err(|e| DataError::io(path, e))
    })?;
    tracing::info!("Wrote {} cells to {}", cells.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoordinateBounds, Crs, map_to_cells};

    fn coord(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y, &CoordinateBounds::WGS84).unwrap()
    }

    fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Vec<T> {
        csv::Reader::from_path(path)
            .unwrap()
            .deserialize()
            .collect::<std::result::Result<Vec<T>, _>>()
            .unwrap()
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(51.50746, 4), 51.5075);
        assert_eq!(round_to(-0.12784, 4), -0.1278);
        assert_eq!(round_to(1.23456, 0), 1.0);
    }

    #[test]
    fn test_coordinates_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coordinates.csv");
        let coords = vec![
            coord(-0.127_812_3, 51.507_456_7),
            coord(0.000_049_9, -0.000_050_1),
            coord(179.999_99, 89.999_94),
        ];

        write_coordinates_csv(&path, &coords, 4).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("index,latitude,longitude\n"));

        let rows: Vec<CoordinateRow> = read_rows(&path);
        assert_eq!(rows.len(), coords.len());
        for (i, (row, c)) in rows.iter().zip(&coords).enumerate() {
            assert_eq!(row.index, i);
            assert_eq!(row.latitude, round_to(c.latitude(), 4));
            assert_eq!(row.longitude, round_to(c.longitude(), 4));
        }
    }

    #[test]
    fn test_coordinates_csv_rejects_excessive_decimals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coordinates.csv");
        assert!(write_coordinates_csv(&path, &[], MAX_DECIMALS + 1).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_cells_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cells.csv");
        let cells = map_to_cells(&[coord(-0.1278, 51.5074)], 8).unwrap();

        write_cells_csv(&path, &cells).unwrap();

        let rows: Vec<CellRow> = read_rows(&path);
        assert_eq!(rows.len(), cells.len());
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.index, i);
            let cell: h3o::CellIndex = row.h3_hexagon.parse().unwrap();
            assert!(cells.contains(&cell));
        }
    }

    #[test]
    fn test_empty_cells_csv_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cells.csv");
        write_cells_csv(&path, &CellSet::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "index,h3_hexagon\n");
    }

    #[test]
    fn test_geojson_written_and_staging_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roads.geojson");
        let collection = FeatureCollection::new(Vec::new(), Crs::default());

        write_geojson(&path, &collection).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let result = write_atomically(&path, |writer| {
            writer.write_all(b"partial").map_err(|e| DataError::io("out.csv", e))?;
            Err(DataError::invalid_argument("test", "forced failure"))
        });

        assert!(result.is_err());
        assert!(!path.exists());
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_existing_file_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cells.csv");
        std::fs::write(&path, "stale").unwrap();

        write_cells_csv(&path, &CellSet::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "index,h3_hexagon\n");
    }
}
