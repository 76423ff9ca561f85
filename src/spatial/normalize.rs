//! Canonical framing of raw template polygons
//!
//! Templates arrive in screen coordinates with y growing downwards. Rotating by
//! 180° and mirroring x about a shared origin turns them upright, and a final
//! translation puts the bounding box at a chosen lower-left corner.

use crate::io::error::{GenerationError, Result};
use geo::{BoundingRect, Centroid, Coord, MapCoords, Polygon, Translate};

/// Rotate, mirror and translate `polygon` into the canonical frame
///
/// Rotates 180° about `origin` when `rotate` is set, mirrors x about `origin`
/// when `flip` is set, then subtracts `(min_x, min_y)`. Missing minima are
/// taken from the transformed polygon's bounding box, which lands its
/// lower-left corner on the origin. `origin` defaults to the polygon's centroid.
///
/// Returns the transformed polygon with the minima that were subtracted, so
/// sibling polygons can be moved by the same offset.
///
/// # Errors
///
/// Returns an error if the polygon is empty and no origin or minima can be
/// derived from it
pub fn normalize(
    polygon: &Polygon<f64>,
    origin: Option<Coord<f64>>,
    rotate: bool,
    flip: bool,
    min_x: Option<f64>,
    min_y: Option<f64>,
) -> Result<(Polygon<f64>, f64, f64)> {
    let origin = match origin {
        Some(origin) => origin,
        None => polygon
            .centroid()
            .map(|point| point.0)
            .ok_or(GenerationError::EmptyResult {
                stage: "normalization origin",
            })?,
    };

    let mut transformed = polygon.clone();

    if rotate {
        transformed = transformed.map_coords(|c| Coord {
            x: 2.0f64.mul_add(origin.x, -c.x),
            y: 2.0f64.mul_add(origin.y, -c.y),
        });
    }

    if flip {
        transformed = transformed.map_coords(|c| Coord {
            x: 2.0f64.mul_add(origin.x, -c.x),
            y: c.y,
        });
    }

    let bounds = transformed
        .bounding_rect()
        .ok_or(GenerationError::EmptyResult {
            stage: "normalization bounds",
        })?;
    let min_x = min_x.unwrap_or(bounds.min().x);
    let min_y = min_y.unwrap_or(bounds.min().y);

    Ok((transformed.translate(-min_x, -min_y), min_x, min_y))
}
