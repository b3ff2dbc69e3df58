//! Error types for the tempo-k8s admission engine

use std::fmt;

use thiserror::Error;

use crate::admission::FieldError;
use crate::lookup::LookupError;

/// Top-level error returned by the validation entry points.
#[derive(Error, Debug)]
pub enum Error {
    /// The submitted spec was rejected. Carries every problem found in the
    /// pass, so a single resubmission can fix all of them.
    #[error(transparent)]
    Invalid(#[from] InvalidSpec),

    /// A referenced object could not be fetched for a reason other than
    /// "not found" (permission denied, malformed response, cancellation).
    /// "Not found" is downgraded to a warning by the orchestrator and never
    /// surfaces here.
    #[error("lookup of {kind} {namespace}/{name} failed: {source}")]
    Lookup {
        kind: &'static str,
        namespace: String,
        name: String,
        #[source]
        source: LookupError,
    },
}

/// Aggregate rejection of a spec, carrying the full list of field errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSpec {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for InvalidSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spec rejected: ")?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for InvalidSpec {}

pub type Result<T> = std::result::Result<T, Error>;
