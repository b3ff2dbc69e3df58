//! Validation result types shared by all admission validators

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidSpec;

/// Classification of a fatal validation finding.
///
/// Every kind is aggregated and every kind blocks acceptance; the
/// classification exists so operators and dashboards can distinguish a
/// malformed field from a cluster capability that simply is not enabled.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required field missing or malformed (unparseable URL, duration, float).
    Structural,
    /// Cross-field contradiction within the spec.
    Consistency,
    /// Feature requested without its prerequisite feature gate.
    PolicyGate,
}

/// A single rejected field: path, rejected value, human-readable reason.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub value: String,
    pub message: String,
    pub kind: ErrorKind,
}

impl FieldError {
    pub fn new(
        kind: ErrorKind,
        field: impl Into<String>,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.to_string(),
            message: message.into(),
            kind,
        }
    }

    pub fn structural(
        field: impl Into<String>,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::Structural, field, value, message)
    }

    pub fn consistency(
        field: impl Into<String>,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::Consistency, field, value, message)
    }

    pub fn policy_gate(
        field: impl Into<String>,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::PolicyGate, field, value, message)
    }
}

impl fmt::Display for FieldError {
    /// Field path, rejected value, reason, in that order. The format is
    /// part of the observable contract; tests and operators read it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: invalid value \"{}\": {}",
            self.field, self.value, self.message
        )
    }
}

/// Aggregate of warnings and errors produced by one validation pass.
///
/// Validators append through [`add_error`](Self::add_error) and
/// [`add_warning`](Self::add_warning); the orchestrator owns the single
/// report per call, so two concurrent validation calls can never share a
/// backing list. Ordering is deterministic: findings appear in the order
/// validators ran.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    warnings: Vec<String>,
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// True when the spec must be accepted. Warnings never block acceptance.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fold the report into the caller-facing shape: the warnings on
    /// acceptance, or an [`InvalidSpec`] carrying every field error.
    pub fn into_result(self) -> Result<Vec<String>, InvalidSpec> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(InvalidSpec {
                errors: self.errors,
            })
        }
    }
}
