//! Raw-configuration overlay merging
//!
//! Users can attach a free-form configuration fragment to a resource
//! (`spec.extraConfig.tempo`). The manifest generator renders the full Tempo
//! configuration and then merges the user fragment over it: the overlay wins
//! on conflicting keys, sibling keys in the generated document survive, and
//! sequences are replaced wholesale rather than merged index-wise.

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("generated configuration is not valid YAML: {0}")]
    ParseGenerated(#[source] serde_yaml::Error),

    #[error("merged configuration could not be rendered: {0}")]
    Render(#[source] serde_yaml::Error),
}

/// Deep-merge `overlay` over `generated`.
///
/// Maps merge recursively key-by-key with the overlay taking precedence.
/// Arrays and scalars are atomic: an overlay value replaces the generated
/// value wholesale. A `null` overlay leaves the generated value untouched,
/// so merging an empty fragment is a no-op.
pub fn merge(generated: &Value, overlay: &Value) -> Value {
    match (generated, overlay) {
        (base, Value::Null) => base.clone(),
        (Value::Object(base), Value::Object(over)) => {
            let mut merged = base.clone();
            for (key, value) in over {
                let entry = match merged.get(key) {
                    Some(existing) => merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), entry);
            }
            Value::Object(merged)
        }
        (_, over) => over.clone(),
    }
}

/// Merge a user overlay into a rendered YAML configuration document.
///
/// This is the entry point used by the manifest generator: it parses the
/// generated `tempo.yaml`, applies [`merge`], and re-renders the result.
pub fn apply_overlay(generated_yaml: &str, overlay: &Value) -> Result<String, OverlayError> {
    let generated: Value =
        serde_yaml::from_str(generated_yaml).map_err(OverlayError::ParseGenerated)?;
    let merged = merge(&generated, overlay);
    serde_yaml::to_string(&merged).map_err(OverlayError::Render)
}
