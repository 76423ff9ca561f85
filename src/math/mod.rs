//! Mathematical utilities for the cluster model

/// Symmetric 2x2 covariance matrices
pub mod covariance;
/// Gaussian mixture fitting and sampling
pub mod mixture;
/// Gaussian densities and weighted selection
pub mod probability;
