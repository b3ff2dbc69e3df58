//! Admission-time defaulting and validation
//!
//! This module is the decision core of the operator: before a submitted
//! TempoStack or TempoMonolithic is accepted, a working copy is defaulted
//! ([`mutation`]) and then checked by a battery of validators
//! ([`validation`]). Errors are aggregated with precise field paths;
//! warnings never block acceptance.
//!
//! # Example
//!
//! ```rust,ignore
//! use tempo_k8s::admission::{apply_defaults, validate};
//!
//! let defaulted = apply_defaults(&stack, &config.feature_gates);
//! let report = validate(&stack, &config.feature_gates, &lookup).await?;
//! let warnings = report.into_result()?;
//! ```

pub mod gates;
pub mod mutation;
pub mod quorum;
pub mod storage;
pub mod tenants;
pub mod types;
pub mod validation;

pub use mutation::{apply_defaults, apply_monolithic_defaults};
pub use storage::CredentialType;
pub use types::{ErrorKind, FieldError, ValidationReport};
pub use validation::{validate, validate_monolithic};
