//! Tests for error classification, source chaining and messages

#[cfg(test)]
mod tests {
    use dazzle::GenerationError;
    use dazzle::io::error::{computation_error, invalid_parameter};
    use std::error::Error;

    // Tests skip-and-log kinds are not fatal
    #[test]
    fn test_fatal_classification() {
        let unsupported = GenerationError::UnsupportedGeometry {
            stage: "cell clipping",
            kind: "multi polygon",
        };
        let empty = GenerationError::EmptyResult {
            stage: "tile clipping",
        };
        let violation = GenerationError::ContainmentViolation {
            partition: "voronoi",
            cell: 3,
            zone: 1,
        };

        assert!(!unsupported.is_fatal());
        assert!(!empty.is_fatal());
        assert!(violation.is_fatal());
    }

    // Tests only run-level failures are retried
    #[test]
    fn test_retryable_classification() {
        let exhausted = GenerationError::SamplingExhausted {
            target: "point",
            iterations: 100,
        };
        let computation = computation_error("mixture fit", &"singular covariance");
        let parameter = invalid_parameter("num_clusters", &0, &"at least one cluster is required");
        let template = GenerationError::InvalidTemplate {
            reason: "no envelope".to_string(),
        };
        let incomplete = GenerationError::SweepIncomplete {
            failed: 1,
            total: 4,
        };

        assert!(exhausted.is_retryable());
        assert!(computation.is_retryable());
        assert!(!parameter.is_retryable());
        assert!(!template.is_retryable());
        assert!(!incomplete.is_retryable());
    }

    // Tests wrapped errors expose their source
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = GenerationError::FileSystem {
            path: "/tmp/board.json".into(),
            operation: "read template",
            source: io_error,
        };

        assert!(error.source().is_some());
        assert!(
            GenerationError::EmptyResult { stage: "x" }
                .source()
                .is_none()
        );
    }

    // Tests messages name the values involved
    #[test]
    fn test_error_messages() {
        let violation = GenerationError::ContainmentViolation {
            partition: "delaunay",
            cell: 7,
            zone: 2,
        };
        let parameter = invalid_parameter("points_step", &0, &"step must be positive");
        let incomplete = GenerationError::SweepIncomplete {
            failed: 2,
            total: 9,
        };

        assert_eq!(
            violation.to_string(),
            "Exclusion zone 2 touches the boundary of delaunay cell 7"
        );
        assert_eq!(
            parameter.to_string(),
            "Invalid parameter 'points_step' = '0': step must be positive"
        );
        assert!(incomplete.to_string().starts_with("2 of 9"));
    }
}
