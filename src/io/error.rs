//! Error types for generation runs, sweeps and their file boundaries

use std::fmt;
use std::path::PathBuf;

/// Main error type for all generation operations
#[derive(Debug)]
pub enum GenerationError {
    /// A partition or clip result is a geometry kind the coercion rule does not handle
    ///
    /// Skipped and logged when raised while clipping or tiling, fatal when a
    /// partition itself produces it.
    UnsupportedGeometry {
        /// Pipeline stage that produced the geometry
        stage: &'static str,
        /// Geometry kind that could not be handled
        kind: &'static str,
    },

    /// A clip or tiling step collapsed to an empty geometry
    EmptyResult {
        /// Pipeline stage that produced the empty geometry
        stage: &'static str,
    },

    /// A bounded rejection-sampling loop exceeded its iteration cap
    SamplingExhausted {
        /// What was being sampled
        target: &'static str,
        /// Number of attempts made before giving up
        iterations: usize,
    },

    /// An exclusion zone is contained by a cell but touches its boundary
    ContainmentViolation {
        /// Partition kind the cell came from
        partition: &'static str,
        /// Index of the offending cell in partition order
        cell: usize,
        /// Index of the offending zone
        zone: usize,
    },

    /// Numerical computation produced invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Template document is well-formed but unusable
    InvalidTemplate {
        /// Description of what's wrong with the template
        reason: String,
    },

    /// Failed to read or decode a template document
    TemplateLoad {
        /// Path to the template file
        path: PathBuf,
        /// Underlying decoding error
        source: serde_json::Error,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Some sweep combinations exhausted their retry budget
    SweepIncomplete {
        /// Number of combinations that failed
        failed: usize,
        /// Number of combinations attempted
        total: usize,
    },
}

impl GenerationError {
    /// Whether the error ends the current generation run
    ///
    /// Non-fatal kinds only abandon the cell or tile being processed.
    pub const fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::UnsupportedGeometry { .. } | Self::EmptyResult { .. }
        )
    }

    /// Whether a sweep may retry the run with a fresh subseed
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SamplingExhausted { .. }
                | Self::ContainmentViolation { .. }
                | Self::Computation { .. }
                | Self::UnsupportedGeometry { .. }
                | Self::EmptyResult { .. }
        )
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedGeometry { stage, kind } => {
                write!(f, "Unsupported geometry during {stage}: {kind}")
            }
            Self::EmptyResult { stage } => {
                write!(f, "Empty geometry during {stage}")
            }
            Self::SamplingExhausted { target, iterations } => {
                write!(
                    f,
                    "Maximum iterations exceeded sampling for a {target}: {iterations}"
                )
            }
            Self::ContainmentViolation {
                partition,
                cell,
                zone,
            } => {
                write!(
                    f,
                    "Exclusion zone {zone} touches the boundary of {partition} cell {cell}"
                )
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidTemplate { reason } => {
                write!(f, "Invalid template: {reason}")
            }
            Self::TemplateLoad { path, source } => {
                write!(f, "Failed to load template '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::SweepIncomplete { failed, total } => {
                write!(
                    f,
                    "{failed} of {total} sweep combinations exhausted their retry budget"
                )
            }
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TemplateLoad { source, .. } => Some(source),
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GenerationError {
    GenerationError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> GenerationError {
    GenerationError::Computation {
        operation,
        reason: reason.to_string(),
    }
}
