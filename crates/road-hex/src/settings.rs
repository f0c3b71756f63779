use clap::{Parser, ValueEnum};
use road_hex_lib::{CoordinateBounds, DEFAULT_MAX_SEGMENT_LENGTH, PipelineConfig};
use std::path::PathBuf;

/// Validation box applied to input coordinates
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    /// `[0, 180]` on both axes, as declared by the source schema
    Declared,
    /// Full longitude `[-180, 180]` and latitude `[-90, 90]` range
    Wgs84,
}

impl From<Bounds> for CoordinateBounds {
    fn from(bounds: Bounds) -> Self {
        match bounds {
            Bounds::Declared => CoordinateBounds::DECLARED,
            Bounds::Wgs84 => CoordinateBounds::WGS84,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Road Hex - Convert road line geometries into deduplicated H3 hexagon cells
pub struct Settings {
    /// Input shapefile (.shp) or GeoJSON document (.geojson, .json)
    #[clap(short, long, value_name = "FILE", default_value = "data_in/National Highways.shp")]
    pub input: PathBuf,

    /// Output path for the validated road collection
    #[clap(long, value_name = "FILE", default_value = "data_out/highways.geojson")]
    pub geojson: PathBuf,

    /// Output path for the segmentized road collection
    #[clap(
        long,
        value_name = "FILE",
        default_value = "data_out/highways_segmentized.geojson"
    )]
    pub geojson_segmentized: PathBuf,

    /// Output path for the H3 cell CSV
    #[clap(long, value_name = "FILE", default_value = "data_out/h3_hexagons.csv")]
    pub hexagons: PathBuf,

    /// Output path for the raw coordinate CSV
    #[clap(long, value_name = "FILE", default_value = "data_out/coordinates.csv")]
    pub coordinates: PathBuf,

    /// Output path for the segmentized coordinate CSV
    #[clap(
        long,
        value_name = "FILE",
        default_value = "data_out/coordinates_segmentized.csv"
    )]
    pub coordinates_segmentized: PathBuf,

    /// Skip writing both coordinate CSVs
    #[clap(long)]
    pub no_coordinates: bool,

    /// H3 resolution (0-15, higher = smaller cells)
    #[clap(short, long, default_value = "8")]
    pub resolution: u8,

    /// Maximum distance between consecutive points after segmentization, in degrees
    #[clap(long, default_value_t = DEFAULT_MAX_SEGMENT_LENGTH)]
    pub max_segment_length: f64,

    /// Neighbour ring radius added around each sampled cell (0 = no neighbours)
    #[clap(long, default_value = "1")]
    pub ring_radius: u32,

    /// Decimal places kept in coordinate CSVs
    #[clap(long, default_value = "4")]
    pub decimals: u32,

    /// Coordinate validation box
    #[clap(long, value_enum, default_value_t = Bounds::Declared)]
    pub bounds: Bounds,
}

impl Settings {
    /// Parse the command line, exiting with usage information on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    pub fn to_config(&self) -> PipelineConfig {
        PipelineConfig {
            input_path: self.input.clone(),
            output_geojson: self.geojson.clone(),
            output_geojson_segmentized: self.geojson_segmentized.clone(),
            output_h3_hexagons: self.hexagons.clone(),
            output_coordinates: (!self.no_coordinates).then(|| self.coordinates.clone()),
            output_coordinates_segmentized: (!self.no_coordinates)
                .then(|| self.coordinates_segmentized.clone()),
            resolution: self.resolution,
            max_segment_length: self.max_segment_length,
            ring_radius: self.ring_radius,
            decimals: self.decimals,
            bounds: self.bounds.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Settings::command().debug_assert();
    }

    #[test]
    fn test_defaults_match_library() {
        let settings = Settings::parse_from(["road-hex"]);
        let config = settings.to_config();
        let defaults = PipelineConfig::default();

        assert_eq!(config.input_path, defaults.input_path);
        assert_eq!(config.output_geojson, defaults.output_geojson);
        assert_eq!(config.output_h3_hexagons, defaults.output_h3_hexagons);
        assert_eq!(config.resolution, defaults.resolution);
        assert_eq!(config.max_segment_length, defaults.max_segment_length);
        assert_eq!(config.ring_radius, defaults.ring_radius);
        assert_eq!(config.decimals, defaults.decimals);
        assert_eq!(config.bounds, defaults.bounds);
        assert_eq!(config.output_coordinates, defaults.output_coordinates);
        assert_eq!(
            config.output_coordinates_segmentized,
            defaults.output_coordinates_segmentized
        );
    }

    #[test]
    fn test_no_coordinates_disables_csvs() {
        let config = Settings::parse_from(["road-hex", "--no-coordinates"]).to_config();
        assert!(config.output_coordinates.is_none());
        assert!(config.output_coordinates_segmentized.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::parse_from([
            "road-hex",
            "--input",
            "roads.geojson",
            "--resolution",
            "10",
            "--ring-radius",
            "0",
            "--bounds",
            "wgs84",
            "--coordinates",
            "out/coords.csv",
        ]);
        let config = settings.to_config();

        assert_eq!(config.input_path, PathBuf::from("roads.geojson"));
        assert_eq!(config.resolution, 10);
        assert_eq!(config.ring_radius, 0);
        assert_eq!(config.bounds, CoordinateBounds::WGS84);
        assert_eq!(
            config.output_coordinates,
            Some(PathBuf::from("out/coords.csv"))
        );
    }

    #[test]
    fn test_out_of_range_resolution_fails_validation() {
        let settings = Settings::parse_from(["road-hex", "-r", "16"]);
        assert!(settings.to_config().validate().is_err());
    }
}
