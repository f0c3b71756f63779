//! Pipeline - fixed-order batch conversion from an input file to output files
//!
//! Step order: ingest, extract raw coordinates, write the raw collection,
//! segmentize, extract segmentized coordinates, write the segmentized collection,
//! map to cells, write the cells. Each write happens only after its producing step
//! has completed, and any failure aborts the remaining steps.

use crate::segment::validate_max_segment_length;
use crate::{
    CoordinateBounds, DEFAULT_MAX_SEGMENT_LENGTH, DataError, NeighborPolicy, Result,
    extract_coordinates, ingest, map_to_cells_with, output, parse_resolution,
    segmentize_collection,
};
use std::path::{Path, PathBuf};

/// Configuration for a conversion run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Shapefile (`.shp`) or GeoJSON-shaped document to read
    pub input_path: PathBuf,
    /// Where the validated, unsegmented collection is written
    pub output_geojson: PathBuf,
    /// Where the segmentized collection is written
    pub output_geojson_segmentized: PathBuf,
    /// Where the cell identifiers are written
    pub output_h3_hexagons: PathBuf,
    /// Optional CSV of the raw coordinates
    pub output_coordinates: Option<PathBuf>,
    /// Optional CSV of the segmentized coordinates
    pub output_coordinates_segmentized: Option<PathBuf>,
    /// H3 resolution, 0 to 15
    pub resolution: u8,
    /// Maximum distance between consecutive points after segmentization, in degrees
    pub max_segment_length: f64,
    /// Neighbour disk radius around each sampled cell (0 disables the expansion)
    pub ring_radius: u32,
    /// Decimal places kept in coordinate CSVs
    pub decimals: u32,
    /// Validation box for input coordinates
    pub bounds: CoordinateBounds,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data_in/National Highways.shp"),
            output_geojson: PathBuf::from("data_out/highways.geojson"),
            output_geojson_segmentized: PathBuf::from("data_out/highways_segmentized.geojson"),
            output_h3_hexagons: PathBuf::from("data_out/h3_hexagons.csv"),
            output_coordinates: Some(PathBuf::from("data_out/coordinates.csv")),
            output_coordinates_segmentized: Some(PathBuf::from(
                "data_out/coordinates_segmentized.csv",
            )),
            resolution: 8,
            max_segment_length: DEFAULT_MAX_SEGMENT_LENGTH,
            ring_radius: 1,
            decimals: output::DEFAULT_DECIMALS,
            bounds: CoordinateBounds::default(),
        }
    }
}

fn require_path(name: &'static str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(DataError::invalid_argument(name, "path must not be empty"));
    }
    Ok(())
}

impl PipelineConfig {
    /// Reject invalid settings before any I/O happens
    pub fn validate(&self) -> Result<()> {
        require_path("input_path", &self.input_path)?;
        require_path("output_geojson", &self.output_geojson)?;
        require_path("output_geojson_segmentized", &self.output_geojson_segmentized)?;
        require_path("output_h3_hexagons", &self.output_h3_hexagons)?;
        if let Some(path) = &self.output_coordinates {
            require_path("output_coordinates", path)?;
        }
        if let Some(path) = &self.output_coordinates_segmentized {
            require_path("output_coordinates_segmentized", path)?;
        }

        parse_resolution(self.resolution)?;
        validate_max_segment_length(self.max_segment_length)?;
        NeighborPolicy::from_radius(self.ring_radius)?;

        if self.decimals > output::MAX_DECIMALS {
            return Err(DataError::invalid_argument(
                "decimals",
                format!(
                    "{} exceeds the maximum of {}",
                    self.decimals,
                    output::MAX_DECIMALS
                ),
            ));
        }

        if self.bounds.min_x > self.bounds.max_x || self.bounds.min_y > self.bounds.max_y {
            return Err(DataError::invalid_argument(
                "bounds",
                format!("empty validation box {:?}", self.bounds),
            ));
        }

        Ok(())
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Number of features read
    pub feature_count: usize,
    /// Coordinates before segmentization
    pub raw_coordinate_count: usize,
    /// Coordinates after segmentization
    pub segmentized_coordinate_count: usize,
    /// Distinct cells written
    pub cell_count: usize,
    /// Resolution the cells were computed at
    pub resolution: u8,
}

/// A validated, ready-to-run conversion
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    policy: NeighborPolicy,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Pipeline {
    /// Validate the configuration and build a pipeline
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let policy = NeighborPolicy::from_radius(config.ring_radius)?;
        Ok(Self { config, policy })
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every step in order
    pub fn run(&self) -> Result<PipelineReport> {
        let config = &self.config;
        if config.bounds == CoordinateBounds::DECLARED {
            tracing::warn!(
                "Validating against the declared [0, 180] box: negative longitudes and latitudes are rejected (use WGS84 bounds for the full globe)"
            );
        }

        tracing::info!("Reading {}", config.input_path.display());
        let collection = ingest::read_path(&config.input_path, &config.bounds)?;
        let raw_coordinates = extract_coordinates(&collection);
        tracing::info!(
            "Loaded {} features with {} coordinates",
            collection.len(),
            raw_coordinates.len()
        );

        output::write_geojson(&config.output_geojson, &collection)?;
        if let Some(path) = &config.output_coordinates {
            output::write_coordinates_csv(path, &raw_coordinates, config.decimals)?;
        }

        tracing::info!(
            "Segmentizing with max segment length {}",
            config.max_segment_length
        );
        let segmentized = segmentize_collection(&collection, config.max_segment_length)?;
        let segmentized_coordinates = extract_coordinates(&segmentized);
        tracing::info!(
            "Segmentized {} -> {} coordinates",
            raw_coordinates.len(),
            segmentized_coordinates.len()
        );

        output::write_geojson(&config.output_geojson_segmentized, &segmentized)?;
        if let Some(path) = &config.output_coordinates_segmentized {
            output::write_coordinates_csv(path, &segmentized_coordinates, config.decimals)?;
        }

        tracing::info!(
            "Mapping to H3 cells at resolution {} (ring radius {})",
            config.resolution,
            self.policy.radius()
        );
        let cells = map_to_cells_with(&segmentized_coordinates, config.resolution, self.policy)?;
        output::write_cells_csv(&config.output_h3_hexagons, &cells)?;

        Ok(PipelineReport {
            feature_count: collection.len(),
            raw_coordinate_count: raw_coordinates.len(),
            segmentized_coordinate_count: segmentized_coordinates.len(),
            cell_count: cells.len(),
            resolution: config.resolution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> PipelineConfig {
        PipelineConfig {
            input_path: dir.join("input.geojson"),
            output_geojson: dir.join("out/roads.geojson"),
            output_geojson_segmentized: dir.join("out/roads_segmentized.geojson"),
            output_h3_hexagons: dir.join("out/cells.csv"),
            output_coordinates: None,
            output_coordinates_segmentized: None,
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolution, 8);
        assert_eq!(config.max_segment_length, 0.001);
        assert_eq!(config.decimals, 4);
        assert_eq!(config.ring_radius, 1);
    }

    #[test]
    fn test_rejects_bad_resolution() {
        let config = PipelineConfig {
            resolution: 16,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            Pipeline::new(config),
            Err(DataError::InvalidArgument {
                name: "resolution",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_bad_segment_length() {
        let config = PipelineConfig {
            max_segment_length: -1.0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DataError::InvalidArgument {
                name: "max_segment_length",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_empty_paths() {
        let config = PipelineConfig {
            output_h3_hexagons: PathBuf::new(),
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DataError::InvalidArgument {
                name: "output_h3_hexagons",
                ..
            })
        ));

        let config = PipelineConfig {
            output_coordinates: Some(PathBuf::new()),
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_decimals_and_radius() {
        let config = PipelineConfig {
            decimals: 16,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            ring_radius: 100,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let pipeline = Pipeline::new(config.clone()).unwrap();

        assert!(matches!(pipeline.run(), Err(DataError::Io { .. })));
        assert!(!config.output_geojson.exists());
        assert!(!config.output_h3_hexagons.exists());
    }
}
