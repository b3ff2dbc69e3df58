//! TempoMonolithic Custom Resource Definition
//!
//! The TempoMonolithic CRD represents a single-process Tempo deployment.
//! All components run in one container, traces can be kept in memory, on a
//! PersistentVolume, or in object storage. Suited for development setups
//! and small installations; TempoStack is the horizontally scalable form.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{Condition, ExtraConfigSpec, TenantsSpec, TlsRouteTermination};

#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "tempo.grafana.com",
    version = "v1alpha1",
    kind = "TempoMonolithic",
    namespaced,
    status = "TempoMonolithicStatus",
    shortname = "tempomono",
    printcolumn = r#"{"name":"Backend","type":"string","jsonPath":".spec.storage.traces.backend"}"#,
    printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct TempoMonolithicSpec {
    /// Trace storage. Absent means in-memory storage with default sizing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<MonolithicStorageSpec>,

    /// Embedded Jaeger UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jaegerui: Option<MonolithicJaegerUiSpec>,

    /// Multi-tenancy configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multitenancy: Option<MonolithicMultitenancySpec>,

    /// Raw overrides merged over the generated configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_config: Option<ExtraConfigSpec>,
}

impl TempoMonolithicSpec {
    /// Whether multi-tenancy is switched on.
    pub fn multitenancy_enabled(&self) -> bool {
        self.multitenancy.as_ref().is_some_and(|m| m.enabled)
    }
}

/// Trace storage for the monolithic deployment.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonolithicStorageSpec {
    #[serde(default)]
    pub traces: MonolithicTracesStorageSpec,
}

/// Where trace blocks are kept.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonolithicTracesStorageSpec {
    /// Storage backend.
    #[serde(default)]
    pub backend: MonolithicStorageBackend,

    /// Size of the tmpfs or PersistentVolumeClaim for the `memory` and `pv`
    /// backends (e.g. `"2Gi"`). Ignored for object storage backends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// S3 credentials, required when the backend is `s3`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3: Option<MonolithicObjectStorageSpec>,

    /// Azure credentials, required when the backend is `azure`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure: Option<MonolithicObjectStorageSpec>,

    /// GCS credentials, required when the backend is `gcs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcs: Option<MonolithicObjectStorageSpec>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MonolithicStorageBackend {
    /// Traces live in a tmpfs and are lost on restart.
    #[default]
    Memory,
    /// Traces live on a PersistentVolume.
    Pv,
    S3,
    Azure,
    Gcs,
}

impl std::fmt::Display for MonolithicStorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonolithicStorageBackend::Memory => write!(f, "memory"),
            MonolithicStorageBackend::Pv => write!(f, "pv"),
            MonolithicStorageBackend::S3 => write!(f, "s3"),
            MonolithicStorageBackend::Azure => write!(f, "azure"),
            MonolithicStorageBackend::Gcs => write!(f, "gcs"),
        }
    }
}

/// Reference to an object storage credential secret.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonolithicObjectStorageSpec {
    /// Name of the secret in the same namespace.
    pub secret: String,
}

/// Embedded Jaeger UI settings.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonolithicJaegerUiSpec {
    #[serde(default)]
    pub enabled: bool,

    /// Expose the UI via a Kubernetes Ingress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress: Option<MonolithicJaegerUiIngressSpec>,

    /// Expose the UI via an OpenShift Route. Requires the `openshiftRoute`
    /// feature gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<MonolithicJaegerUiRouteSpec>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonolithicJaegerUiIngressSpec {
    #[serde(default)]
    pub enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonolithicJaegerUiRouteSpec {
    #[serde(default)]
    pub enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination: Option<TlsRouteTermination>,
}

/// Multi-tenancy for the monolithic deployment.
///
/// Embeds the same tenant configuration as TempoStack behind an `enabled`
/// switch; when enabled, the built-in gateway fronts all tenant traffic.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonolithicMultitenancySpec {
    #[serde(default)]
    pub enabled: bool,

    #[serde(flatten)]
    pub tenants: TenantsSpec,
}

/// Status subresource for TempoMonolithic.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TempoMonolithicStatus {
    /// Version of Tempo deployed by the operator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo_version: Option<String>,

    /// Readiness conditions following Kubernetes conventions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}
