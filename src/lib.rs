//! Randomized two-tone dazzle tilings of polygonal board outlines
//!
//! A board is an envelope polygon with exclusion zones whose color is fixed.
//! Control points drawn from a fitted Gaussian mixture seed a Voronoi and a
//! Delaunay partition of the board; every cell is clipped to the envelope,
//! reduced to its oriented bounding rectangle and tiled with wang, truchet or
//! solid patterns, with zone colors enforced on the tiles they touch.

#![forbid(unsafe_code)]

/// Partition classification, clipping, tiling and run orchestration
pub mod algorithm;
/// Template input, figure output, progress, configuration and errors
pub mod io;
/// Covariance algebra, Gaussian densities and the cluster model
pub mod math;
/// Board data model, normalisation, sampling and partitioning
pub mod spatial;

pub use io::error::{GenerationError, Result};
