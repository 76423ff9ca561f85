//! Board, zone, cell and tile types shared across the pipeline

use geo::{Centroid, Coord, Polygon};
use rand::Rng;
use std::fmt;

/// Tile and zone color, always exactly one of two tones
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// Black tone
    Black,
    /// White tone
    White,
}

impl Color {
    /// Uniformly random tone
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random::<bool>() {
            Self::Black
        } else {
            Self::White
        }
    }

    /// The other tone
    pub const fn inverse(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => write!(f, "black"),
            Self::White => write!(f, "white"),
        }
    }
}

/// Partition kind a cell came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Voronoi region of one site
    Voronoi,
    /// Delaunay triangle
    Delaunay,
}

impl Provenance {
    /// Both partition kinds in pipeline order
    pub const ALL: [Self; 2] = [Self::Voronoi, Self::Delaunay];

    /// Lowercase name used in logs and errors
    pub const fn name(self) -> &'static str {
        match self {
            Self::Voronoi => "voronoi",
            Self::Delaunay => "delaunay",
        }
    }
}

/// One region of a spatial partition
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// Region outline
    pub polygon: Polygon<f64>,
    /// Partition kind that produced it
    pub provenance: Provenance,
}

/// Fixed region whose rendered color is mandated
#[derive(Clone, Debug, PartialEq)]
pub struct ExclusionZone {
    /// Zone outline
    pub polygon: Polygon<f64>,
    /// Color every overlapping tile is forced to
    pub color: Color,
}

impl ExclusionZone {
    /// Create a zone enforcing `color`
    pub const fn new(polygon: Polygon<f64>, color: Color) -> Self {
        Self { polygon, color }
    }

    /// Area-weighted centroid, `None` for an empty outline
    pub fn centroid(&self) -> Option<Coord<f64>> {
        self.polygon.centroid().map(|point| point.0)
    }
}

/// Colored polygon handed to rendering
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// Tile outline
    pub polygon: Polygon<f64>,
    /// Tile tone
    pub color: Color,
}

/// Envelope and exclusion zones for a generation run
///
/// Zones are kept in two lists by enforced color; the white list includes
/// component footprints.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    /// Universe boundary of the run
    pub envelope: Polygon<f64>,
    /// Zones forced to white
    pub white_zones: Vec<ExclusionZone>,
    /// Zones forced to black
    pub black_zones: Vec<ExclusionZone>,
}

impl Board {
    /// Board without exclusion zones
    pub const fn new(envelope: Polygon<f64>) -> Self {
        Self {
            envelope,
            white_zones: Vec::new(),
            black_zones: Vec::new(),
        }
    }

    /// Add a zone to the list matching its color
    pub fn push_zone(&mut self, zone: ExclusionZone) {
        match zone.color {
            Color::White => self.white_zones.push(zone),
            Color::Black => self.black_zones.push(zone),
        }
    }

    /// All zones, white first
    pub fn zones(&self) -> impl Iterator<Item = &ExclusionZone> {
        self.white_zones.iter().chain(&self.black_zones)
    }

    /// Number of zones across both lists
    pub fn zone_count(&self) -> usize {
        self.white_zones.len() + self.black_zones.len()
    }
}
