/// Command-line interface and sweep driver
pub mod cli;
/// Generation constants and runtime defaults
pub mod configuration;
/// Error types and helpers
pub mod error;
/// Raster figure export
pub mod image;
/// Progress display and log backend
pub mod progress;
/// Template documents and board normalisation
pub mod template;
