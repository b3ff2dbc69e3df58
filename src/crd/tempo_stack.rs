//! TempoStack Custom Resource Definition
//!
//! The TempoStack CRD represents a horizontally scalable, microservices-mode
//! Tempo deployment: distributor, ingester, querier, query-frontend,
//! compactor, and an optional multi-tenant gateway.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{
    Condition, ExtraConfigSpec, ObjectStorageSpec, ObservabilitySpec, RetentionSpec, SearchSpec,
    TempoTemplateSpec, TenantsSpec,
};

#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "tempo.grafana.com",
    version = "v1alpha1",
    kind = "TempoStack",
    namespaced,
    status = "TempoStackStatus",
    shortname = "tempo",
    printcolumn = r#"{"name":"Tenancy","type":"string","jsonPath":".spec.tenants.mode"}"#,
    printcolumn = r#"{"name":"Storage","type":"string","jsonPath":".spec.storage.secret.type"}"#,
    printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct TempoStackSpec {
    /// Object storage backend holding the trace blocks.
    pub storage: ObjectStorageSpec,

    /// StorageClass for the ingester write-ahead-log volumes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class_name: Option<String>,

    /// Number of ingesters each span is written to. Absent means "use the
    /// operator default"; an explicit value is never overwritten.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replication_factor: Option<i32>,

    /// Trace retention policy.
    #[serde(default)]
    pub retention: RetentionSpec,

    /// Search and query limits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSpec>,

    /// Per-component deployment settings.
    #[serde(default)]
    pub template: TempoTemplateSpec,

    /// Multi-tenancy configuration. Absent disables tenancy entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenants: Option<TenantsSpec>,

    /// Observability integration of the Tempo components.
    #[serde(default)]
    pub observability: ObservabilitySpec,

    /// ServiceAccount the Tempo pods run as.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,

    /// Raw overrides merged over the generated configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_config: Option<ExtraConfigSpec>,
}

impl TempoStackSpec {
    /// Whether the multi-tenant gateway component will be deployed.
    pub fn gateway_enabled(&self) -> bool {
        self.template.gateway.enabled
    }
}

/// Status subresource for TempoStack.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TempoStackStatus {
    /// Version of Tempo deployed by the operator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo_version: Option<String>,

    /// Observed generation for status sync detection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// Readiness conditions following Kubernetes conventions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl TempoStackStatus {
    /// Get a condition by type.
    pub fn get_condition(&self, condition_type: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.type_ == condition_type)
    }

    pub fn is_ready(&self) -> bool {
        self.get_condition("Ready")
            .is_some_and(|c| c.status == "True")
    }
}
