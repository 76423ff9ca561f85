//! Cell clipping against the envelope

use crate::io::error::Result;
use crate::spatial::coercion::{coerce_to_polygon, intersection};
use crate::spatial::shapes::Cell;
use geo::Polygon;

/// Intersect a raw cell with the envelope and coerce the result to one polygon
///
/// # Errors
///
/// Returns `EmptyResult` when the cell lies outside the envelope and
/// `UnsupportedGeometry` when the intersection splits into several parts.
/// Both are non-fatal: callers drop the cell and continue.
pub fn clip(cell: &Cell, envelope: &Polygon<f64>) -> Result<Polygon<f64>> {
    coerce_to_polygon(intersection(&cell.polygon, envelope), "cell clipping")
}

/// Clip every cell, skipping those whose clip is not a single polygon
///
/// Returned cells keep their partition order and provenance.
///
/// # Errors
///
/// Propagates only fatal errors; skipped cells are logged
pub fn clip_all(cells: &[Cell], envelope: &Polygon<f64>) -> Result<Vec<Cell>> {
    let mut clipped = Vec::with_capacity(cells.len());

    for (index, cell) in cells.iter().enumerate() {
        match clip(cell, envelope) {
            Ok(polygon) => clipped.push(Cell {
                polygon,
                provenance: cell.provenance,
            }),
            Err(error) if !error.is_fatal() => {
                log::warn!(
                    "Skipping {} cell {index}: {error}",
                    cell.provenance.name()
                );
            }
            Err(error) => return Err(error),
        }
    }

    Ok(clipped)
}
