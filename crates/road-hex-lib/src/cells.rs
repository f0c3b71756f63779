//! Coordinate to H3 cell mapping
//!
//! Every coordinate is resolved to its containing cell, and that cell is expanded
//! to its grid neighbourhood to cover cells a line crosses between two samples.
//! The expansion over-includes: cells near, but not touched by, the line end up in
//! the set too.

use crate::{Coordinate, DataError, Result};
use h3o::{CellIndex, LatLng, Resolution};
use std::collections::HashSet;

/// Largest neighbour disk radius accepted
pub const MAX_NEIGHBOR_RADIUS: u32 = 16;

/// Validate and convert an integer resolution
pub fn parse_resolution(resolution: u8) -> Result<Resolution> {
    Resolution::try_from(resolution).map_err(|_| {
        DataError::invalid_argument("resolution", format!("{resolution} is outside 0..=15"))
    })
}

/// How far each sampled cell is expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborPolicy {
    /// Only the cell containing each coordinate
    CellOnly,
    /// The cell plus every cell within `radius` grid steps. A radius of 1 adds the
    /// immediate ring (6 cells, fewer around pentagons).
    Disk { radius: u32 },
}

impl NeighborPolicy {
    /// Policy for a ring radius, `0` meaning no expansion
    pub fn from_radius(radius: u32) -> Result<Self> {
        match radius {
            0 => Ok(Self::CellOnly),
            r if r <= MAX_NEIGHBOR_RADIUS => Ok(Self::Disk { radius: r }),
            r => Err(DataError::invalid_argument(
                "ring_radius",
                format!("{r} exceeds the maximum of {MAX_NEIGHBOR_RADIUS}"),
            )),
        }
    }

    pub fn radius(&self) -> u32 {
        match self {
            Self::CellOnly => 0,
            Self::Disk { radius } => *radius,
        }
    }
}

impl Default for NeighborPolicy {
    fn default() -> Self {
        Self::Disk { radius: 1 }
    }
}

/// Deduplicated set of H3 cells
///
/// Membership is deterministic for given inputs; iteration order is not. Use
/// [`CellSet::sorted`] when a stable order matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSet {
    cells: HashSet<CellIndex>,
}

impl CellSet {
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, cell: &CellIndex) -> bool {
        self.cells.contains(cell)
    }

    /// Cells in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = &CellIndex> + '_ {
        self.cells.iter()
    }

    /// Cells in ascending index order
    pub fn sorted(&self) -> Vec<CellIndex> {
        let mut cells: Vec<CellIndex> = self.cells.iter().copied().collect();
        cells.sort_unstable();
        cells
    }
}

impl FromIterator<CellIndex> for CellSet {
    fn from_iter<I: IntoIterator<Item = CellIndex>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Resolve the cell containing a coordinate
pub fn cell_for(coordinate: &Coordinate, resolution: Resolution) -> Result<CellIndex> {
    let (lat, lng) = (coordinate.latitude(), coordinate.longitude());
    if !(-90.0..=90.0).contains(&lat) {
        return Err(DataError::CellMapping(format!(
            "latitude {lat} of ({lng}, {lat}) is outside [-90, 90]"
        )));
    }
    let latlng = LatLng::new(lat, lng)
        .map_err(|err| DataError::CellMapping(format!("({lng}, {lat}): {err}")))?;
    Ok(latlng.to_cell(resolution))
}

/// Map coordinates to cells with the default policy (cell plus its 1-ring)
pub fn map_to_cells(coordinates: &[Coordinate], resolution: u8) -> Result<CellSet> {
    map_to_cells_with(coordinates, resolution, NeighborPolicy::default())
}

/// Map coordinates to the deduplicated set of their cells and neighbourhoods
///
/// # Arguments
/// * `coordinates` - Sampled coordinates, typically a segmentized line
/// * `resolution` - H3 resolution, 0 to 15
/// * `policy` - Neighbour expansion applied to every resolved cell
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn map_to_cells_with(
    coordinates: &[Coordinate],
    resolution: u8,
    policy: NeighborPolicy,
) -> Result<CellSet> {
    let resolution = parse_resolution(resolution)?;

    let mut cells = HashSet::with_capacity(coordinates.len());
    let mut last_cell = None;
    for coordinate in coordinates {
        let cell = cell_for(coordinate, resolution)?;
        // Consecutive samples usually share a cell; its neighbourhood is already in.
        if last_cell == Some(cell) {
            continue;
        }
        last_cell = Some(cell);

        match policy {
            NeighborPolicy::CellOnly => {
                cells.insert(cell);
            }
            NeighborPolicy::Disk { radius } => {
                cells.extend(cell.grid_disk::<Vec<_>>(radius));
            }
        }
    }

    tracing::debug!(
        "Mapped {} coordinates to {} cells at resolution {}",
        coordinates.len(),
        cells.len(),
        u8::from(resolution)
    );

    Ok(CellSet { cells })
}
