//! Exclusion zone hosting with strict containment enforcement

use crate::io::error::{GenerationError, Result};
use crate::spatial::shapes::{Cell, ExclusionZone, Provenance};
use bitvec::{bitvec, vec::BitVec};
use geo::{Contains, Intersects, Polygon};

/// Whether `inner` lies in the interior of `outer` without touching its boundary
pub fn strictly_contains(outer: &Polygon<f64>, inner: &Polygon<f64>) -> bool {
    outer.contains(inner)
        && !outer.exterior().intersects(inner)
        && !outer.interiors().iter().any(|ring| ring.intersects(inner))
}

/// Which zones each cell of one partition hosts
#[derive(Clone, Debug)]
pub struct Classification {
    provenance: Provenance,
    zones_by_cell: Vec<Vec<usize>>,
    hosted: BitVec,
}

impl Classification {
    /// Partition kind that was classified
    pub const fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Zone indices hosted by the cell at `cell`
    pub fn zones_in(&self, cell: usize) -> &[usize] {
        self.zones_by_cell.get(cell).map_or(&[], Vec::as_slice)
    }

    /// Index of the first cell hosting `zone`
    pub fn host_of(&self, zone: usize) -> Option<usize> {
        self.zones_by_cell
            .iter()
            .position(|zones| zones.contains(&zone))
    }

    /// Number of cells that host at least one zone
    pub fn hosting_cell_count(&self) -> usize {
        self.zones_by_cell
            .iter()
            .filter(|zones| !zones.is_empty())
            .count()
    }

    /// Zones that no cell contains
    ///
    /// These straddle a seam or sit on a partition vertex.
    pub fn unhosted_zones(&self) -> Vec<usize> {
        self.hosted.iter_zeros().collect()
    }
}

/// Map every cell to the zones it contains
///
/// A cell that contains a zone must contain it strictly; a zone resting on a
/// cell boundary means the partition cannot produce a valid tiling.
///
/// # Errors
///
/// Returns `ContainmentViolation` for the first contained zone that touches
/// its cell's boundary
pub fn classify(cells: &[Cell], zones: &[ExclusionZone]) -> Result<Classification> {
    let provenance = cells
        .first()
        .map_or(Provenance::Voronoi, |cell| cell.provenance);
    let mut zones_by_cell = Vec::with_capacity(cells.len());
    let mut hosted = bitvec![0; zones.len()];

    for (cell_index, cell) in cells.iter().enumerate() {
        let mut contained = Vec::new();

        for (zone_index, zone) in zones.iter().enumerate() {
            if !cell.polygon.contains(&zone.polygon) {
                continue;
            }
            if !strictly_contains(&cell.polygon, &zone.polygon) {
                return Err(GenerationError::ContainmentViolation {
                    partition: cell.provenance.name(),
                    cell: cell_index,
                    zone: zone_index,
                });
            }
            contained.push(zone_index);
            hosted.set(zone_index, true);
        }

        zones_by_cell.push(contained);
    }

    let classification = Classification {
        provenance,
        zones_by_cell,
        hosted,
    };

    let unhosted = classification.unhosted_zones();
    if !unhosted.is_empty() {
        log::debug!(
            "{} of {} zones are not hosted by a single {} cell: {unhosted:?}",
            unhosted.len(),
            zones.len(),
            provenance.name()
        );
    }

    Ok(classification)
}
