//! Ingester quorum validation
//!
//! Each span is replicated to `replicationFactor` ingesters and a write is
//! acknowledged once a quorum of them accepted it. A replica count below
//! the quorum could never acknowledge a write, so such specs are rejected
//! outright.

use crate::admission::types::{FieldError, ValidationReport};
use crate::crd::TempoStackSpec;

/// Minimum ingester count able to form a write quorum for `factor`.
pub fn quorum(factor: i32) -> i32 {
    factor / 2 + 1
}

/// Reject specs whose ingester replica count cannot satisfy the write
/// quorum of the replication factor. Both fields are defaulted before
/// validation runs, so absent values fall back to the defaulted `1`.
pub fn validate_quorum(spec: &TempoStackSpec, report: &mut ValidationReport) {
    let factor = spec.replication_factor.unwrap_or(1);
    let replicas = spec.template.ingester.replicas.unwrap_or(1);

    let minimum = quorum(factor);
    if replicas < minimum {
        report.add_error(FieldError::consistency(
            "spec.template.ingester.replicas",
            replicas,
            format!("replica count must be at least {minimum} (replication factor {factor})"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with(factor: i32, replicas: i32) -> TempoStackSpec {
        let mut spec = TempoStackSpec::default();
        spec.replication_factor = Some(factor);
        spec.template.ingester.replicas = Some(replicas);
        spec
    }

    #[test]
    fn test_below_quorum_rejected() {
        let mut report = ValidationReport::new();
        validate_quorum(&spec_with(3, 1), &mut report);

        assert_eq!(report.errors().len(), 1);
        let err = &report.errors()[0];
        assert_eq!(err.field, "spec.template.ingester.replicas");
        assert!(err.message.contains("at least 2"));
        assert!(err.message.contains("replication factor 3"));
    }

    #[test]
    fn test_quorum_boundary() {
        // r=3 needs n >= 2
        for (factor, replicas, valid) in [
            (3, 1, false),
            (3, 2, true),
            (3, 3, true),
            (1, 1, true),
            (2, 1, false),
            (2, 2, true),
            (5, 2, false),
            (5, 3, true),
        ] {
            let mut report = ValidationReport::new();
            validate_quorum(&spec_with(factor, replicas), &mut report);
            assert_eq!(report.is_valid(), valid, "r={factor} n={replicas}");
        }
    }

    #[test]
    fn test_defaults_assumed_when_absent() {
        let mut report = ValidationReport::new();
        validate_quorum(&TempoStackSpec::default(), &mut report);
        assert!(report.is_valid());
    }
}
