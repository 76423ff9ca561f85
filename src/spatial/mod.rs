//! Spatial data model and geometry plumbing
//!
//! This module contains spatial-related functionality including:
//! - Board, zone, cell and tile types
//! - Canonical framing of template polygons
//! - Bounded rejection sampling
//! - Geometry variant flattening and coercion
//! - Voronoi and Delaunay partitioning

/// Geometry variant flattening and polygon coercion
pub mod coercion;
/// Canonical framing of template polygons
pub mod normalize;
/// Voronoi and Delaunay partitions of a site cloud
pub mod partition;
/// Bounded rejection sampling inside polygons
pub mod sampling;
/// Board, zone, cell and tile types
pub mod shapes;

pub use shapes::{Board, Cell, Color, ExclusionZone, Provenance, Tile};
