//! Bounded rejection sampling inside polygons

use crate::io::error::{GenerationError, Result};
use geo::{BoundingRect, Contains, Coord, Intersects, LineString, Point, Polygon};
use rand::Rng;

/// Axis-aligned rectangle hanging down and right from `top_left`
///
/// Extends `width` along +x and `length` along -y.
pub fn rectangle_from_corner(top_left: Coord<f64>, length: f64, width: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            top_left,
            Coord {
                x: top_left.x + width,
                y: top_left.y,
            },
            Coord {
                x: top_left.x + width,
                y: top_left.y - length,
            },
            Coord {
                x: top_left.x,
                y: top_left.y - length,
            },
        ]),
        vec![],
    )
}

/// Uniform point strictly inside `polygon`, drawn from its bounding box
///
/// # Errors
///
/// Returns `SamplingExhausted` when `max_iterations` draws all miss, or
/// `EmptyResult` when the polygon has no bounding box
pub fn sample_point<R: Rng + ?Sized>(
    polygon: &Polygon<f64>,
    max_iterations: usize,
    rng: &mut R,
) -> Result<Coord<f64>> {
    let bounds = polygon.bounding_rect().ok_or(GenerationError::EmptyResult {
        stage: "point sampling",
    })?;
    let (min, max) = (bounds.min(), bounds.max());

    for _ in 0..max_iterations {
        let candidate = Coord {
            x: (max.x - min.x).mul_add(rng.random::<f64>(), min.x),
            y: (max.y - min.y).mul_add(rng.random::<f64>(), min.y),
        };
        if polygon.contains(&Point::from(candidate)) {
            return Ok(candidate);
        }
    }

    Err(GenerationError::SamplingExhausted {
        target: "point",
        iterations: max_iterations,
    })
}

/// Axis-aligned `length` x `width` rectangle fully inside `polygon`
///
/// Each attempt samples a top-left corner with [`sample_point`] under the same
/// cap; a corner draw running out of attempts ends the search.
///
/// # Errors
///
/// Returns `SamplingExhausted` when `max_iterations` rectangles all stick out
/// of the polygon or a corner cannot be sampled
pub fn sample_rectangle<R: Rng + ?Sized>(
    polygon: &Polygon<f64>,
    length: f64,
    width: f64,
    max_iterations: usize,
    rng: &mut R,
) -> Result<Polygon<f64>> {
    for _ in 0..max_iterations {
        let top_left = sample_point(polygon, max_iterations, rng)?;
        let rectangle = rectangle_from_corner(top_left, length, width);
        if polygon.contains(&rectangle) {
            return Ok(rectangle);
        }
    }

    Err(GenerationError::SamplingExhausted {
        target: "rectangle",
        iterations: max_iterations,
    })
}

/// First pair of indices whose polygons intersect, if any
pub fn find_overlap(polygons: &[Polygon<f64>]) -> Option<(usize, usize)> {
    polygons.iter().enumerate().find_map(|(i, first)| {
        polygons
            .iter()
            .enumerate()
            .skip(i + 1)
            .find(|(_, second)| first.intersects(*second))
            .map(|(j, _)| (i, j))
    })
}
