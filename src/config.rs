//! Operator configuration and feature gates
//!
//! The operator process loads an [`OperatorConfig`] once at startup (and on
//! config reload). The contained [`FeatureGates`] bundle is handed read-only
//! to every defaulting/validation call; the engine consults gates but never
//! sets them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read operator config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse operator config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Capability flags describing what the surrounding cluster supports.
///
/// Constructed once per process, immutable afterwards. Validators consult
/// these to decide whether a requested feature can actually be served
/// (e.g. a `route` ingress only works when the cluster has OpenShift routes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureGates {
    /// Cluster supports OpenShift `Route` objects.
    pub openshift_route: bool,

    /// Prometheus operator (ServiceMonitor/PrometheusRule CRDs) is installed.
    pub prometheus_operator: bool,

    /// Grafana operator (GrafanaDatasource CRD) is installed.
    pub grafana_operator: bool,

    /// Serve Tempo internal HTTP endpoints over TLS.
    pub http_encryption: bool,
}

/// Top-level operator configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatorConfig {
    pub feature_gates: FeatureGates,
}

impl OperatorConfig {
    /// Parse a config document from YAML.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Load a config document from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }
}
