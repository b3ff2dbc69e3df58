//! Shared types for Tempo resource specifications
//!
//! These types are used across the CRD definitions and admission logic.
//! They define object storage, multi-tenancy, per-component deployment
//! templates, observability integration, and retention policies.
//!
//! # Type Hierarchy
//!
//! - [`ObjectStorageSpec`] - Trace block storage backend and its credentials
//! - [`TenantsSpec`] - Multi-tenancy mode and per-tenant authentication/authorization
//! - [`TempoTemplateSpec`] - Per-component settings (distributor, ingester, querier, ...)
//! - [`ObservabilitySpec`] - Metrics, tracing, and Grafana integration of Tempo itself
//! - [`RetentionSpec`] / [`SearchSpec`] - Data lifecycle and query limits
//! - [`ExtraConfigSpec`] - Raw configuration overrides merged over generated config

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Object storage configuration for trace blocks.
///
/// Tempo persists trace blocks in object storage. The credentials live in a
/// Kubernetes Secret referenced here; the secret layout depends on the
/// declared backend type and is validated at admission time.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectStorageSpec {
    /// Reference to the secret holding the storage credentials.
    pub secret: ObjectStorageSecretSpec,

    /// TLS settings for the object storage endpoint.
    #[serde(default)]
    pub tls: ObjectStorageTlsSpec,
}

/// Reference to a credential secret for the object storage backend.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectStorageSecretSpec {
    /// Name of the secret in the same namespace as the resource.
    pub name: String,

    /// Backend type the secret holds credentials for (`s3`, `azure`, `gcs`).
    #[serde(rename = "type", default)]
    pub credential_type: String,
}

/// TLS settings for the object storage endpoint.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectStorageTlsSpec {
    /// Enable TLS to the object storage endpoint.
    #[serde(default)]
    pub enabled: bool,

    /// ConfigMap containing the CA certificate under the `ca.crt` key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_name: Option<String>,
}

/// Multi-tenancy mode.
///
/// `static` tenants are declared inline with OIDC authentication and
/// role-based authorization. `openshift` delegates both to the OpenShift
/// platform (TokenReview / SubjectAccessReview).
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModeType {
    #[default]
    Static,
    Openshift,
}

impl std::fmt::Display for ModeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeType::Static => write!(f, "static"),
            ModeType::Openshift => write!(f, "openshift"),
        }
    }
}

/// Multi-tenancy configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TenantsSpec {
    /// Tenancy mode governing authentication and authorization.
    #[serde(default)]
    pub mode: ModeType,

    /// Per-tenant authentication configuration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authentication: Vec<AuthenticationSpec>,

    /// Role-based authorization. Only valid in `static` mode; `openshift`
    /// mode supplies its own authorization mechanism.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<AuthorizationSpec>,
}

/// Authentication settings for a single tenant.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationSpec {
    /// Tenant name as it appears in incoming requests.
    pub tenant_name: String,

    /// Unique identifier of the tenant, used to segregate stored blocks.
    pub tenant_id: String,

    /// OIDC configuration. Required in `static` mode, forbidden in
    /// `openshift` mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc: Option<OidcSpec>,
}

/// OIDC identity provider settings for a tenant.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OidcSpec {
    /// URL of the OIDC issuer.
    pub issuer_url: String,

    /// Secret holding `clientID` and `clientSecret` for the tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<TenantSecretSpec>,

    /// Callback URL registered with the issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,

    /// JWT claim holding the user's group memberships.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_claim: Option<String>,

    /// JWT claim holding the username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username_claim: Option<String>,
}

/// Reference to a secret holding OIDC client credentials.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TenantSecretSpec {
    /// Name of the secret in the same namespace.
    pub name: String,
}

/// Role-based authorization for static-mode tenancy.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationSpec {
    /// Roles granting permissions on tenant trace data.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<RoleSpec>,

    /// Bindings of subjects to roles.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role_bindings: Vec<RoleBindingSpec>,
}

/// A named set of permissions over tenant resources.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoleSpec {
    pub name: String,

    /// Tenants the role applies to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tenants: Vec<String>,

    /// Resources within the tenant the role applies to (e.g. `traces`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<PermissionType>,
}

/// Permission granted by a role.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    Read,
    Write,
}

/// Binding of subjects to a set of roles.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoleBindingSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<Subject>,
}

/// A user or group a role binding applies to.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: String,

    #[serde(default)]
    pub kind: SubjectKind,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    #[default]
    User,
    Group,
}

// ============================================================================
// Per-component deployment template
// ============================================================================

/// Per-component settings for the microservices deployment.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TempoTemplateSpec {
    #[serde(default)]
    pub distributor: TempoDistributorSpec,

    #[serde(default)]
    pub ingester: TempoComponentSpec,

    #[serde(default)]
    pub querier: TempoComponentSpec,

    #[serde(default)]
    pub query_frontend: TempoQueryFrontendSpec,

    #[serde(default)]
    pub compactor: TempoComponentSpec,

    #[serde(default)]
    pub gateway: TempoGatewaySpec,
}

/// Settings common to all stateless Tempo components.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TempoComponentSpec {
    /// Number of replicas. Absent means "use the operator default".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Node selector constraints for scheduling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,
}

/// Distributor settings. The distributor terminates the trace receiver
/// endpoints, so it additionally carries receiver-side TLS settings.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TempoDistributorSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// TLS for the trace receiver endpoints (OTLP, Jaeger, Zipkin).
    #[serde(default)]
    pub tls: ReceiversTlsSpec,
}

/// TLS settings for trace receiver endpoints.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReceiversTlsSpec {
    #[serde(default)]
    pub enabled: bool,

    /// ConfigMap containing the CA certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_name: Option<String>,

    /// Secret containing the server certificate and key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_name: Option<String>,
}

/// Query-frontend settings, including the optional embedded Jaeger UI.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TempoQueryFrontendSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    #[serde(default)]
    pub jaeger_query: JaegerQuerySpec,
}

/// Jaeger query UI served from the query-frontend.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JaegerQuerySpec {
    #[serde(default)]
    pub enabled: bool,

    /// How the Jaeger UI is exposed outside the cluster. Mutually exclusive
    /// with enabling the gateway, which becomes the single entry point.
    #[serde(default)]
    pub ingress: IngressSpec,
}

/// Gateway component fronting all tenant traffic.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TempoGatewaySpec {
    /// Deploy the gateway. Requires `spec.tenants` to be configured.
    #[serde(default)]
    pub enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// How the gateway is exposed outside the cluster.
    #[serde(default)]
    pub ingress: IngressSpec,
}

/// Exposure of a component outside the cluster.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngressSpec {
    /// Kind of exposure. Absent means the component is cluster-internal.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ingress_type: Option<IngressType>,

    /// Hostname for the Ingress or Route object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Annotations applied to the created Ingress or Route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,

    /// Route-specific settings, only consulted when the type is `route`.
    #[serde(default)]
    pub route: RouteSpec,
}

/// Kind of external exposure.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IngressType {
    /// A Kubernetes Ingress object.
    Ingress,
    /// An OpenShift Route object. Requires the `openshiftRoute` feature gate.
    Route,
}

/// OpenShift Route settings.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    /// TLS termination of the route. Defaults to `edge` when a route is
    /// selected and no termination was chosen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination: Option<TlsRouteTermination>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TlsRouteTermination {
    Insecure,
    Edge,
    Passthrough,
    Reencrypt,
}

// ============================================================================
// Observability, retention, search, raw overrides
// ============================================================================

/// Observability integration of the Tempo deployment itself.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservabilitySpec {
    #[serde(default)]
    pub metrics: MetricsSpec,

    #[serde(default)]
    pub tracing: TracingSpec,

    #[serde(default)]
    pub grafana: GrafanaSpec,
}

/// Prometheus integration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSpec {
    /// Create ServiceMonitor objects for all Tempo components. Requires the
    /// `prometheusOperator` feature gate.
    #[serde(default)]
    pub create_service_monitors: bool,

    /// Create PrometheusRule alerts. Alerts fire on metrics collected by the
    /// service monitors, so those must be requested as well.
    #[serde(default)]
    pub create_prometheus_rules: bool,
}

/// Tracing of the Tempo components themselves.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TracingSpec {
    /// Fraction of spans to sample, as a decimal string (e.g. `"0.5"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_fraction: Option<String>,

    /// `host:port` of the Jaeger agent to ship spans to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jaeger_agent_endpoint: Option<String>,
}

/// Grafana integration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GrafanaSpec {
    /// Create a GrafanaDatasource pointing at this deployment. Requires the
    /// `grafanaOperator` feature gate.
    #[serde(default)]
    pub create_datasource: bool,
}

/// Trace retention policy.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RetentionSpec {
    /// Retention applied to all tenants without an explicit override.
    #[serde(default)]
    pub global: RetentionConfig,

    /// Per-tenant retention overrides, keyed by tenant name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub per_tenant: BTreeMap<String, RetentionConfig>,
}

/// Retention settings for one scope.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RetentionConfig {
    /// How long to keep trace blocks, as a duration string (e.g. `"48h"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traces: Option<String>,
}

/// Search and query limits.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchSpec {
    /// Number of results a search returns when the query does not specify
    /// a limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_result_limit: Option<u32>,

    /// Maximum time range of a search, as a duration string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<String>,

    /// Deprecated: no longer honored by Tempo and rejected at admission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_search_bytes_per_trace: Option<u64>,
}

/// Raw configuration overrides.
///
/// The fragment is merged over the generated Tempo configuration by the
/// manifest generator; overlay values win on conflicts. Using it bypasses
/// validation of the affected settings, so admission surfaces a warning
/// whenever it is set.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtraConfigSpec {
    /// Overrides for the rendered `tempo.yaml`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo: Option<serde_json::Value>,
}

/// Readiness condition following Kubernetes conventions.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition type (e.g. `Ready`, `Failed`, `ConfigurationError`).
    #[serde(rename = "type")]
    pub type_: String,

    /// `True`, `False`, or `Unknown`.
    pub status: String,

    /// Machine-readable reason for the last transition.
    #[serde(default)]
    pub reason: String,

    /// Human-readable message.
    #[serde(default)]
    pub message: String,

    /// When the condition last changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}
