/// Exclusion zone hosting per partition cell
pub mod classification;
/// Cell clipping against the envelope
pub mod clipping;
/// Zone-driven tile color overrides
pub mod constraints;
/// Single seeded generation run
pub mod executor;
/// Parameter sweep with bounded retries
pub mod sweep;
/// Oriented rectangles and tiling strategies
pub mod tiling;
