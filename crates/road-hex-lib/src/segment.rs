//! Bounded-length resampling of line geometries
//!
//! Each original segment of length `L` is split into `ceil(L / max_segment_length)`
//! equal sub-segments. Original vertices are kept in order and only new points are
//! inserted between them, so the output follows the original path exactly.
//!
//! The ratio is rounded with a relative slack of `1e-9`, so a sub-segment may exceed
//! `max_segment_length` by at most that factor.

use crate::{Coordinate, DataError, Feature, FeatureCollection, Geometry, Result};

/// Default maximum sub-segment length, in degrees
pub const DEFAULT_MAX_SEGMENT_LENGTH: f64 = 0.001;

/// Slack on `L / max_segment_length` before rounding up, so that a segment whose
/// length is a floating point hair above a multiple of the bound is not split again.
/// This keeps re-segmentization a fixed point.
const SEGMENT_RATIO_TOLERANCE: f64 = 1e-9;

/// Most sub-segments a single segment may be split into
const MAX_SUB_SEGMENTS: f64 = u32::MAX as f64;

/// Check that a maximum segment length is usable
pub(crate) fn validate_max_segment_length(max_segment_length: f64) -> Result<()> {
    if max_segment_length.is_finite() && max_segment_length > 0.0 {
        Ok(())
    } else {
        Err(DataError::invalid_argument(
            "max_segment_length",
            format!("must be a finite value > 0, got {max_segment_length}"),
        ))
    }
}

/// Number of equal pieces a segment of `length` is split into
#[inline]
fn sub_segment_count(length: f64, max_segment_length: f64) -> Result<usize> {
    if length <= 0.0 {
        return Ok(1);
    }
    let pieces = (length / max_segment_length - SEGMENT_RATIO_TOLERANCE).ceil();
    if pieces > MAX_SUB_SEGMENTS {
        return Err(DataError::invalid_argument(
            "max_segment_length",
            format!(
                "{max_segment_length} would split a segment of length {length} into more than {MAX_SUB_SEGMENTS} pieces"
            ),
        ));
    }
    Ok(pieces.max(1.0) as usize)
}

/// Resample a polyline so consecutive points are at most `max_segment_length` apart
/// (up to a relative `1e-9`)
///
/// # Arguments
/// * `line` - Ordered coordinates of the polyline
/// * `max_segment_length` - Maximum distance between consecutive output points, in
///   the same unit as the coordinates
///
/// # Returns
/// The resampled coordinates. A line with fewer than two points is returned
/// unchanged, as are zero-length segments (duplicate points are retained).
/// Fails when a segment would need more than `u32::MAX` pieces.
pub fn segmentize(line: &[Coordinate], max_segment_length: f64) -> Result<Vec<Coordinate>> {
    validate_max_segment_length(max_segment_length)?;

    let Some((first, _)) = line.split_first() else {
        return Ok(Vec::new());
    };

    let mut output = Vec::with_capacity(line.len());
    output.push(*first);

    for pair in line.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let pieces = sub_segment_count(start.distance(&end), max_segment_length)?;

        let origin = start.coord();
        let delta = end.coord() - origin;
        for i in 1..pieces {
            let t = i as f64 / pieces as f64;
            output.push(Coordinate::from_coord(origin + delta * t));
        }
        output.push(end);
    }

    Ok(output)
}

/// Segmentize every `LineString` feature of a collection into a new collection
///
/// The input collection is left untouched. Geometries of other types are copied
/// through unsegmented.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn segmentize_collection(
    collection: &FeatureCollection,
    max_segment_length: f64,
) -> Result<FeatureCollection> {
    validate_max_segment_length(max_segment_length)?;

    collection.map_features(|feature: &Feature| match &feature.geometry {
        Geometry::LineString(coordinates) => {
            let segmented = segmentize(coordinates, max_segment_length)?;
            tracing::debug!(
                "Feature {}: {} -> {} points",
                feature.id,
                coordinates.len(),
                segmented.len()
            );
            Ok(feature.with_geometry(Geometry::line_string(segmented)?))
        }
        other => {
            tracing::warn!(
                "Feature {}: {:?} geometry passed through unsegmented",
                feature.id,
                other.geometry_type()
            );
            Ok(feature.clone())
        }
    })
}
