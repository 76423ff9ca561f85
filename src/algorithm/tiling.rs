//! Tile generation over oriented cell rectangles
//!
//! Every strategy works on the minimum-area bounding rectangle of a clipped
//! cell, never on the cell itself. The rectangle's corners are put in
//! canonical order (clockwise, starting at the lexicographically smallest
//! corner) so that patterns are stable for a given cell and seed. Each
//! produced tile is then cut back to `envelope ∩ cell` before it is emitted.

use crate::io::error::{GenerationError, Result};
use crate::spatial::coercion::{coerce_to_polygon, intersection3};
use crate::spatial::shapes::{Cell, Color, Tile};
use geo::{Area, Coord, LineString, MinimumRotatedRect, Polygon};
use rand::Rng;

/// Tiling pattern applied to one cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TilingStrategy {
    /// Four triangles fanned from the centroid, each randomly colored
    Wang,
    /// Two triangles split along a diagonal, colored oppositely
    Truchet,
    /// The whole rectangle in one random color
    Solid,
}

impl TilingStrategy {
    /// All strategies in panel order
    pub const ALL: [Self; 3] = [Self::Wang, Self::Truchet, Self::Solid];

    /// Lowercase name used in logs
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wang => "wang",
            Self::Truchet => "truchet",
            Self::Solid => "solid",
        }
    }

    /// Uniformly random strategy
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..Self::ALL.len()) {
            0 => Self::Wang,
            1 => Self::Truchet,
            _ => Self::Solid,
        }
    }

    /// Raw tiles of `rectangle`, before any clipping
    pub fn apply<R: Rng + ?Sized>(self, rectangle: &OrientedRectangle, rng: &mut R) -> Vec<Tile> {
        match self {
            Self::Wang => wang(rectangle, rng),
            Self::Truchet => truchet(rectangle, rng),
            Self::Solid => solid(rectangle, rng),
        }
    }
}

/// Minimum-area bounding rectangle with canonical corner order
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedRectangle {
    corners: [Coord<f64>; 4],
}

impl OrientedRectangle {
    /// Oriented bounding rectangle of `polygon`
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedGeometry` when the polygon collapses to a segment
    /// or point and has no rectangle with positive area
    pub fn from_polygon(polygon: &Polygon<f64>) -> Result<Self> {
        let degenerate = || GenerationError::UnsupportedGeometry {
            stage: "oriented rectangle",
            kind: "degenerate rectangle",
        };

        let rectangle = polygon.minimum_rotated_rect().ok_or_else(degenerate)?;
        if rectangle.unsigned_area() <= 0.0 {
            return Err(degenerate());
        }

        let ring = rectangle.exterior();
        let open_length = if ring.is_closed() {
            ring.0.len().saturating_sub(1)
        } else {
            ring.0.len()
        };
        let mut corners: [Coord<f64>; 4] = ring
            .0
            .get(..open_length)
            .and_then(|open| <[Coord<f64>; 4]>::try_from(open).ok())
            .ok_or_else(degenerate)?;

        if rectangle.signed_area() > 0.0 {
            corners.reverse();
        }

        let start = corners
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)))
            .map_or(0, |(index, _)| index);
        corners.rotate_left(start);

        Ok(Self { corners })
    }

    /// Corners in clockwise order from the lexicographically smallest
    pub const fn corners(&self) -> [Coord<f64>; 4] {
        self.corners
    }

    /// Intersection point of the diagonals
    pub fn centroid(&self) -> Coord<f64> {
        let [c0, _, c2, _] = self.corners;
        (c0 + c2) / 2.0
    }

    /// Rectangle as a closed polygon
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::from(self.corners.to_vec()), vec![])
    }

    /// Area of the rectangle
    pub fn area(&self) -> f64 {
        self.to_polygon().unsigned_area()
    }
}

fn triangle(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> Polygon<f64> {
    Polygon::new(LineString::from(vec![a, b, c]), vec![])
}

/// Four centroid triangles, one per rectangle side
pub fn wang<R: Rng + ?Sized>(rectangle: &OrientedRectangle, rng: &mut R) -> Vec<Tile> {
    let centroid = rectangle.centroid();
    let corners = rectangle.corners();

    corners
        .iter()
        .zip(corners.iter().cycle().skip(1))
        .map(|(&from, &to)| Tile {
            polygon: triangle(centroid, from, to),
            color: Color::random(rng),
        })
        .collect()
}

/// Two triangles sharing one diagonal, in opposite colors
///
/// One of four patterns is drawn uniformly: main or anti diagonal, with the
/// first triangle black or white.
pub fn truchet<R: Rng + ?Sized>(rectangle: &OrientedRectangle, rng: &mut R) -> Vec<Tile> {
    let [c0, c1, c2, c3] = rectangle.corners();
    // (diagonal through c0/c2, color of the first triangle)
    let (main_diagonal, first) = match rng.random_range(0..4_u8) {
        0 => (false, Color::White),
        1 => (true, Color::Black),
        2 => (false, Color::Black),
        _ => (true, Color::White),
    };

    let (first_triangle, second_triangle) = if main_diagonal {
        (triangle(c0, c1, c2), triangle(c0, c2, c3))
    } else {
        (triangle(c1, c2, c3), triangle(c1, c3, c0))
    };

    vec![
        Tile {
            polygon: first_triangle,
            color: first,
        },
        Tile {
            polygon: second_triangle,
            color: first.inverse(),
        },
    ]
}

/// The rectangle itself in one random color
pub fn solid<R: Rng + ?Sized>(rectangle: &OrientedRectangle, rng: &mut R) -> Vec<Tile> {
    vec![Tile {
        polygon: rectangle.to_polygon(),
        color: Color::random(rng),
    }]
}

/// Applies tiling strategies to clipped cells of one envelope
#[derive(Clone, Debug)]
pub struct TileGenerator<'a> {
    envelope: &'a Polygon<f64>,
}

impl<'a> TileGenerator<'a> {
    /// Generator cutting tiles back to `envelope`
    pub const fn new(envelope: &'a Polygon<f64>) -> Self {
        Self { envelope }
    }

    /// Tiles of one cell, each clipped to `envelope ∩ cell`
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedGeometry` when the cell has no oriented rectangle;
    /// fatal clip errors are propagated
    pub fn tile<R: Rng + ?Sized>(
        &self,
        cell: &Cell,
        strategy: TilingStrategy,
        rng: &mut R,
    ) -> Result<Vec<Tile>> {
        let rectangle = OrientedRectangle::from_polygon(&cell.polygon)?;
        self.tile_rectangle(cell, &rectangle, strategy, rng)
    }

    /// Tiles of a cell whose oriented rectangle is already known
    ///
    /// Tiles whose clip is empty or not a single polygon are skipped.
    ///
    /// # Errors
    ///
    /// Propagates fatal clip errors only
    pub fn tile_rectangle<R: Rng + ?Sized>(
        &self,
        cell: &Cell,
        rectangle: &OrientedRectangle,
        strategy: TilingStrategy,
        rng: &mut R,
    ) -> Result<Vec<Tile>> {
        let mut tiles = Vec::new();

        for raw in strategy.apply(rectangle, rng) {
            let clipped = intersection3(&raw.polygon, self.envelope, &cell.polygon);
            match coerce_to_polygon(clipped, "tile clipping") {
                Ok(polygon) => tiles.push(Tile {
                    polygon,
                    color: raw.color,
                }),
                Err(error) if !error.is_fatal() => {
                    log::warn!("Skipping {} tile: {error}", strategy.name());
                }
                Err(error) => return Err(error),
            }
        }

        Ok(tiles)
    }
}
