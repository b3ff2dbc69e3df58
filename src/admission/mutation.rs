//! Defaulting stage
//!
//! Applies computed defaults to a working copy of a submitted spec before
//! validation runs. Defaulting never fails and never overwrites a value the
//! caller set explicitly, including explicit zero/false values: every
//! defaultable field is optional in the CRD so that "absent" is
//! distinguishable from "set to the zero value".
//!
//! The rules run in a fixed, documented order because later rules may read
//! fields earlier rules filled in (rule 7 reads the ingress type rule 6 may
//! have just set). The order lives in one table so a reordering is visible
//! in review.

use tracing::debug;

use crate::config::FeatureGates;
use crate::crd::{
    IngressType, ModeType, MonolithicStorageBackend, SearchSpec, TempoMonolithic,
    TempoMonolithicSpec, TempoStack, TempoStackSpec, TlsRouteTermination,
};

/// Defaults applied when the caller left the field unset.
pub const DEFAULT_REPLICATION_FACTOR: i32 = 1;
pub const DEFAULT_COMPONENT_REPLICAS: i32 = 1;
pub const DEFAULT_RETENTION: &str = "48h";
pub const DEFAULT_SEARCH_RESULT_LIMIT: u32 = 20;
pub const DEFAULT_MONOLITHIC_STORAGE_SIZE: &str = "2Gi";

struct DefaultContext {
    name: String,
    gates: FeatureGates,
}

/// Ordered defaulting rules for TempoStack.
///
/// 1. replication factor
/// 2. per-component replica counts
/// 3. global trace retention
/// 4. search result limit
/// 5. service account name
/// 6. gateway ingress type (reads tenancy mode and the route gate)
/// 7. route TLS termination (reads the ingress type set by rule 6)
static STACK_DEFAULT_RULES: &[(&str, fn(&mut TempoStackSpec, &DefaultContext))] = &[
    ("replicationFactor", default_replication_factor),
    ("componentReplicas", default_component_replicas),
    ("retention", default_retention),
    ("searchDefaults", default_search_limits),
    ("serviceAccountName", default_service_account),
    ("gatewayIngressType", default_gateway_ingress_type),
    ("routeTermination", default_route_termination),
];

/// Produce a defaulted copy of a TempoStack spec.
///
/// Pure and total: the caller's resource is never mutated, and defaulting
/// has no error conditions. Applying it twice yields the same spec.
pub fn apply_defaults(stack: &TempoStack, gates: &FeatureGates) -> TempoStackSpec {
    let mut spec = stack.spec.clone();
    let ctx = DefaultContext {
        name: stack.metadata.name.clone().unwrap_or_default(),
        gates: *gates,
    };

    for (rule, apply) in STACK_DEFAULT_RULES {
        apply(&mut spec, &ctx);
        debug!("applied default rule {rule}");
    }

    spec
}

fn default_replication_factor(spec: &mut TempoStackSpec, _ctx: &DefaultContext) {
    spec.replication_factor
        .get_or_insert(DEFAULT_REPLICATION_FACTOR);
}

fn default_component_replicas(spec: &mut TempoStackSpec, _ctx: &DefaultContext) {
    let template = &mut spec.template;
    for replicas in [
        &mut template.distributor.replicas,
        &mut template.ingester.replicas,
        &mut template.querier.replicas,
        &mut template.query_frontend.replicas,
        &mut template.compactor.replicas,
    ] {
        replicas.get_or_insert(DEFAULT_COMPONENT_REPLICAS);
    }
    if template.gateway.enabled {
        template.gateway.replicas.get_or_insert(DEFAULT_COMPONENT_REPLICAS);
    }
}

fn default_retention(spec: &mut TempoStackSpec, _ctx: &DefaultContext) {
    spec.retention
        .global
        .traces
        .get_or_insert_with(|| DEFAULT_RETENTION.to_string());
}

fn default_search_limits(spec: &mut TempoStackSpec, _ctx: &DefaultContext) {
    spec.search
        .get_or_insert_with(SearchSpec::default)
        .default_result_limit
        .get_or_insert(DEFAULT_SEARCH_RESULT_LIMIT);
}

fn default_service_account(spec: &mut TempoStackSpec, ctx: &DefaultContext) {
    if spec.service_account_name.is_none() && !ctx.name.is_empty() {
        spec.service_account_name = Some(format!("tempo-{}", ctx.name));
    }
}

/// OpenShift-mode tenancy is served through a Route when the cluster has
/// them; only fills the gap when no ingress type was chosen.
fn default_gateway_ingress_type(spec: &mut TempoStackSpec, ctx: &DefaultContext) {
    let openshift_mode = spec
        .tenants
        .as_ref()
        .is_some_and(|t| t.mode == ModeType::Openshift);

    let gateway = &mut spec.template.gateway;
    if openshift_mode
        && gateway.enabled
        && gateway.ingress.ingress_type.is_none()
        && ctx.gates.openshift_route
    {
        gateway.ingress.ingress_type = Some(IngressType::Route);
    }
}

fn default_route_termination(spec: &mut TempoStackSpec, _ctx: &DefaultContext) {
    for ingress in [
        &mut spec.template.gateway.ingress,
        &mut spec.template.query_frontend.jaeger_query.ingress,
    ] {
        if ingress.ingress_type == Some(IngressType::Route) {
            ingress
                .route
                .termination
                .get_or_insert(TlsRouteTermination::Edge);
        }
    }
}

/// Produce a defaulted copy of a TempoMonolithic spec.
///
/// 1. storage defaults to the in-memory backend
/// 2. tmpfs/PVC size defaults for the `memory` and `pv` backends
pub fn apply_monolithic_defaults(mono: &TempoMonolithic) -> TempoMonolithicSpec {
    let mut spec = mono.spec.clone();

    let storage = spec.storage.get_or_insert_with(Default::default);
    if matches!(
        storage.traces.backend,
        MonolithicStorageBackend::Memory | MonolithicStorageBackend::Pv
    ) {
        storage
            .traces
            .size
            .get_or_insert_with(|| DEFAULT_MONOLITHIC_STORAGE_SIZE.to_string());
    }

    debug!("applied monolithic storage defaults");
    spec
}
