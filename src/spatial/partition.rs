//! Voronoi and Delaunay partitions of a site cloud
//!
//! Both partitions come from one Delaunay triangulation. Delaunay cells are its
//! inner triangles; the Voronoi cell of a site is a frame rectangle clipped by
//! the bisector half-plane of every Delaunay neighbour. The frame covers the
//! envelope and the sites' bounding box grown by its larger side, so clipped
//! cells always tile the whole envelope.

use crate::io::error::{Result, computation_error};
use crate::spatial::coercion::flatten_polygons;
use crate::spatial::shapes::{Board, Cell, Provenance};
use geo::{
    BoundingRect, Coord, Geometry, GeometryCollection, LineString, MultiPoint, Point, Polygon, Rect,
};
use rand::Rng;
use rand::seq::SliceRandom;
use spade::{DelaunayTriangulation, Point2, Triangulation};

/// Partition input: control points plus optional anchors
///
/// Zone centroids pin a site inside every exclusion zone, and envelope
/// vertices pin sites along the board outline. Each envelope vertex is added
/// once, without the ring's closing duplicate.
pub fn collect_sites(
    control_points: &[Coord<f64>],
    board: &Board,
    on_zone_centroids: bool,
    on_envelope: bool,
) -> Vec<Coord<f64>> {
    let mut sites = control_points.to_vec();

    if on_zone_centroids {
        sites.extend(board.zones().filter_map(|zone| zone.centroid()));
    }

    if on_envelope {
        sites.extend(board.envelope.exterior().lines().map(|line| line.start));
    }

    sites
}

/// Builds partitions framed around one envelope
#[derive(Clone, Debug)]
pub struct PartitionBuilder {
    envelope_bounds: Rect<f64>,
}

impl PartitionBuilder {
    /// Create a builder for `envelope`
    ///
    /// # Errors
    ///
    /// Returns an error if the envelope has no vertices
    pub fn new(envelope: &Polygon<f64>) -> Result<Self> {
        let envelope_bounds = envelope
            .bounding_rect()
            .ok_or_else(|| computation_error("partition frame", &"envelope has no vertices"))?;
        Ok(Self { envelope_bounds })
    }

    /// Partition `sites` into cells of the given kind, in shuffled order
    ///
    /// # Errors
    ///
    /// Returns an error if a site cannot be triangulated or a cell is not a polygon
    pub fn build<R: Rng + ?Sized>(
        &self,
        provenance: Provenance,
        sites: &[Coord<f64>],
        rng: &mut R,
    ) -> Result<Vec<Cell>> {
        match provenance {
            Provenance::Voronoi => self.voronoi(sites, rng),
            Provenance::Delaunay => Self::delaunay(sites, rng),
        }
    }

    /// One cell per distinct site, framed to cover the envelope
    ///
    /// # Errors
    ///
    /// Returns an error if a site cannot be triangulated or a cell degenerates
    /// to something other than a polygon
    pub fn voronoi<R: Rng + ?Sized>(&self, sites: &[Coord<f64>], rng: &mut R) -> Result<Vec<Cell>> {
        let triangulation = triangulate(sites)?;
        let frame = self.frame(sites);
        let (min, max) = (frame.min(), frame.max());
        let frame_ring = vec![
            min,
            Coord { x: max.x, y: min.y },
            max,
            Coord { x: min.x, y: max.y },
        ];

        let regions = triangulation
            .vertices()
            .map(|vertex| {
                let site = to_coord(vertex.position());
                let ring = vertex.out_edges().fold(frame_ring.clone(), |ring, edge| {
                    clip_half_plane(&ring, site, to_coord(edge.to().position()))
                });
                ring_to_geometry(ring)
            })
            .collect();

        let polygons = flatten_polygons(
            Geometry::GeometryCollection(GeometryCollection(regions)),
            "voronoi partition",
        )?;
        Ok(into_shuffled_cells(polygons, Provenance::Voronoi, rng))
    }

    /// Inner triangles of the Delaunay triangulation of `sites`
    ///
    /// Fewer than three non-collinear sites produce no cells.
    ///
    /// # Errors
    ///
    /// Returns an error if a site cannot be triangulated
    pub fn delaunay<R: Rng + ?Sized>(sites: &[Coord<f64>], rng: &mut R) -> Result<Vec<Cell>> {
        let triangulation = triangulate(sites)?;

        let triangles = triangulation
            .inner_faces()
            .map(|face| {
                let corners = face.vertices().map(|vertex| to_coord(vertex.position()));
                Geometry::Polygon(Polygon::new(LineString::from(corners.to_vec()), vec![]))
            })
            .collect();

        let polygons = flatten_polygons(
            Geometry::GeometryCollection(GeometryCollection(triangles)),
            "delaunay partition",
        )?;
        Ok(into_shuffled_cells(polygons, Provenance::Delaunay, rng))
    }

    /// Rectangle every Voronoi cell is cut from
    pub fn frame(&self, sites: &[Coord<f64>]) -> Rect<f64> {
        let Some(site_bounds) = sites
            .iter()
            .map(|&site| Point::from(site))
            .collect::<MultiPoint<f64>>()
            .bounding_rect()
        else {
            return self.envelope_bounds;
        };

        let grow = site_bounds.width().max(site_bounds.height());
        let (site_min, site_max) = (site_bounds.min(), site_bounds.max());
        let (envelope_min, envelope_max) = (self.envelope_bounds.min(), self.envelope_bounds.max());

        Rect::new(
            Coord {
                x: (site_min.x - grow).min(envelope_min.x),
                y: (site_min.y - grow).min(envelope_min.y),
            },
            Coord {
                x: (site_max.x + grow).max(envelope_max.x),
                y: (site_max.y + grow).max(envelope_max.y),
            },
        )
    }
}

fn triangulate(sites: &[Coord<f64>]) -> Result<DelaunayTriangulation<Point2<f64>>> {
    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    for site in sites {
        triangulation
            .insert(Point2::new(site.x, site.y))
            .map_err(|error| {
                computation_error(
                    "delaunay insertion",
                    &format!("site ({}, {}): {error:?}", site.x, site.y),
                )
            })?;
    }
    Ok(triangulation)
}

const fn to_coord(point: Point2<f64>) -> Coord<f64> {
    Coord {
        x: point.x,
        y: point.y,
    }
}

// Keeps the part of a convex ring on the site's side of the site/neighbour bisector
fn clip_half_plane(ring: &[Coord<f64>], site: Coord<f64>, neighbor: Coord<f64>) -> Vec<Coord<f64>> {
    let normal = neighbor - site;
    let midpoint = (site + neighbor) / 2.0;
    let side = |point: Coord<f64>| {
        (point.x - midpoint.x).mul_add(normal.x, (point.y - midpoint.y) * normal.y)
    };

    let mut clipped = Vec::with_capacity(ring.len() + 1);
    for (&current, &next) in ring.iter().zip(ring.iter().cycle().skip(1)) {
        let (current_side, next_side) = (side(current), side(next));
        if current_side <= 0.0 {
            clipped.push(current);
        }
        if (current_side < 0.0 && next_side > 0.0) || (current_side > 0.0 && next_side < 0.0) {
            let t = current_side / (current_side - next_side);
            clipped.push(current + (next - current) * t);
        }
    }
    clipped
}

fn ring_to_geometry(ring: Vec<Coord<f64>>) -> Geometry<f64> {
    match ring.len() {
        0 => Geometry::GeometryCollection(GeometryCollection(Vec::new())),
        1 => ring.first().map_or_else(
            || Geometry::GeometryCollection(GeometryCollection(Vec::new())),
            |&coord| Geometry::Point(Point::from(coord)),
        ),
        2 => Geometry::LineString(LineString::from(ring)),
        _ => Geometry::Polygon(Polygon::new(LineString::from(ring), vec![])),
    }
}

fn into_shuffled_cells<R: Rng + ?Sized>(
    polygons: Vec<Polygon<f64>>,
    provenance: Provenance,
    rng: &mut R,
) -> Vec<Cell> {
    let mut cells: Vec<Cell> = polygons
        .into_iter()
        .map(|polygon| Cell {
            polygon,
            provenance,
        })
        .collect();
    cells.shuffle(rng);
    log::debug!("Built {} {} cells", cells.len(), provenance.name());
    cells
}
