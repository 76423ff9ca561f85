//! Template documents and the board normalisation front-end
//!
//! A template is a JSON document of polygons in screen coordinates:
//!
//! ```json
//! {
//!   "polygons": [[[0, 0], [10, 0], [10, 10], [0, 10]], [[2, 2], [3, 2], [3, 3]]],
//!   "footprints": [[[4, 4], [5, 4], [5, 5], [4, 5]]]
//! }
//! ```
//!
//! Element 0 of `polygons` is the board envelope and the rest are contours.
//! `footprints` are optional white-enforced zones already in board coordinates.

use crate::io::configuration::{FOOTPRINT_LENGTH, FOOTPRINT_WIDTH, MAX_SAMPLING_ITERATIONS};
use crate::io::error::{GenerationError, Result};
use crate::spatial::normalize::normalize;
use crate::spatial::sampling::{find_overlap, sample_rectangle};
use crate::spatial::shapes::{Board, Color, ExclusionZone};
use geo::{BooleanOps, Centroid, Contains, Coord, Intersects, LineString, MultiPolygon, Polygon};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Raw ring as a list of `[x, y]` vertices
pub type Ring = Vec<[f64; 2]>;

/// Parsed template document
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Envelope followed by contours, in screen coordinates
    pub polygons: Vec<Ring>,
    /// White-enforced footprints in board coordinates
    #[serde(default)]
    pub footprints: Vec<Ring>,
}

impl Template {
    /// Read and decode a template file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid template
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| GenerationError::FileSystem {
            path: path.to_path_buf(),
            operation: "read template",
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| GenerationError::TemplateLoad {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Normalise the template into a board
    ///
    /// The rotation origin is the centroid of the union of all template
    /// polygons. The envelope is rotated and mirrored about it and moved to the
    /// origin; contours get the same transform and offset, then each is
    /// assigned white or black by a fair coin from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template has no envelope, a ring has fewer
    /// than three vertices, or footprints overlap each other, leave the
    /// envelope or touch a contour
    pub fn to_board<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Board> {
        let polygons = self
            .polygons
            .iter()
            .map(|ring| to_polygon(ring))
            .collect::<Result<Vec<_>>>()?;
        let footprints = self
            .footprints
            .iter()
            .map(|ring| to_polygon(ring))
            .collect::<Result<Vec<_>>>()?;

        let Some((raw_envelope, raw_contours)) = polygons.split_first() else {
            return Err(GenerationError::InvalidTemplate {
                reason: "template has no envelope polygon".to_string(),
            });
        };

        if let Some((first, second)) = find_overlap(&footprints) {
            return Err(GenerationError::InvalidTemplate {
                reason: format!("footprints {first} and {second} overlap"),
            });
        }

        let origin = union_centroid(&polygons)?;
        let (envelope, min_x, min_y) = normalize(raw_envelope, Some(origin), true, true, None, None)?;
        log::debug!("Normalised envelope with offset ({min_x}, {min_y})");

        let contours = raw_contours
            .iter()
            .map(|contour| {
                normalize(contour, Some(origin), true, true, Some(min_x), Some(min_y))
                    .map(|(polygon, _, _)| polygon)
            })
            .collect::<Result<Vec<_>>>()?;
        check_footprints(&envelope, &contours, &footprints)?;

        let mut board = Board::new(envelope);

        for footprint in footprints {
            board.push_zone(ExclusionZone::new(footprint, Color::White));
        }

        for polygon in contours {
            board.push_zone(ExclusionZone::new(polygon, Color::random(rng)));
        }

        log::debug!(
            "Board has {} white and {} black zones",
            board.white_zones.len(),
            board.black_zones.len()
        );

        Ok(board)
    }
}

// Footprints use board coordinates: inside the envelope, clear of every contour
fn check_footprints(
    envelope: &Polygon<f64>,
    contours: &[Polygon<f64>],
    footprints: &[Polygon<f64>],
) -> Result<()> {
    for (index, footprint) in footprints.iter().enumerate() {
        if !envelope.contains(footprint) {
            return Err(GenerationError::InvalidTemplate {
                reason: format!("footprint {index} is not inside the envelope"),
            });
        }
        if let Some(contour) = contours.iter().position(|contour| contour.intersects(footprint)) {
            return Err(GenerationError::InvalidTemplate {
                reason: format!("footprint {index} touches contour {contour}"),
            });
        }
    }
    Ok(())
}

fn to_polygon(ring: &[[f64; 2]]) -> Result<Polygon<f64>> {
    let coords: Vec<Coord<f64>> = ring.iter().map(|&[x, y]| Coord { x, y }).collect();
    let mut distinct = coords.clone();
    distinct.dedup();
    if distinct.first() == distinct.last() {
        distinct.pop();
    }

    if distinct.len() < 3 {
        return Err(GenerationError::InvalidTemplate {
            reason: format!("ring with {} distinct vertices", distinct.len()),
        });
    }

    Ok(Polygon::new(LineString::from(coords), vec![]))
}

fn union_centroid(polygons: &[Polygon<f64>]) -> Result<Coord<f64>> {
    polygons
        .iter()
        .fold(MultiPolygon::new(Vec::new()), |union, polygon| {
            union.union(polygon)
        })
        .centroid()
        .map(|point| point.0)
        .ok_or(GenerationError::EmptyResult {
            stage: "template union",
        })
}

/// Place `count` non-overlapping footprints inside the envelope as white zones
///
/// Each footprint is drawn by rectangle rejection sampling and redrawn while
/// it touches an existing zone, up to the sampling cap.
///
/// # Errors
///
/// Returns `SamplingExhausted` when a footprint cannot be placed
pub fn place_footprints<R: Rng + ?Sized>(board: &mut Board, count: usize, rng: &mut R) -> Result<()> {
    for placed in 0..count {
        let mut footprint = None;

        for _ in 0..MAX_SAMPLING_ITERATIONS {
            let candidate = sample_rectangle(
                &board.envelope,
                FOOTPRINT_LENGTH,
                FOOTPRINT_WIDTH,
                MAX_SAMPLING_ITERATIONS,
                rng,
            )?;
            if !board.zones().any(|zone| zone.polygon.intersects(&candidate)) {
                footprint = Some(candidate);
                break;
            }
        }

        let footprint = footprint.ok_or(GenerationError::SamplingExhausted {
            target: "footprint placement",
            iterations: MAX_SAMPLING_ITERATIONS,
        })?;
        log::trace!("Placed footprint {} of {count}", placed + 1);
        board.push_zone(ExclusionZone::new(footprint, Color::White));
    }

    Ok(())
}
