//! Feature-gate-aware field validation
//!
//! Independent per-field rules of the form "feature X requires capability Y"
//! or "feature A requires prerequisite feature B". Each rule consults the
//! read-only [`FeatureGates`] bundle and emits at most one error naming the
//! offending field, its value, and (for gate violations) the gate to enable.

use crate::admission::types::{FieldError, ValidationReport};
use crate::config::FeatureGates;
use crate::crd::{IngressSpec, IngressType, TempoStackSpec};

/// Resource names end up as label values, which Kubernetes caps at 63
/// characters.
pub const MAX_NAME_LENGTH: usize = 63;

pub fn validate_name(name: &str, report: &mut ValidationReport) {
    if name.len() > MAX_NAME_LENGTH {
        report.add_error(FieldError::structural(
            "metadata.name",
            name,
            format!("name must be no more than {MAX_NAME_LENGTH} characters"),
        ));
    }
}

/// Run every independent gate/consistency rule against a defaulted spec.
pub fn validate_feature_gates(
    spec: &TempoStackSpec,
    gates: &FeatureGates,
    report: &mut ValidationReport,
) {
    validate_gateway(spec, report);
    validate_route_ingress(
        "spec.template.gateway.ingress.type",
        &spec.template.gateway.ingress,
        gates,
        report,
    );
    validate_route_ingress(
        "spec.template.queryFrontend.jaegerQuery.ingress.type",
        &spec.template.query_frontend.jaeger_query.ingress,
        gates,
        report,
    );
    validate_observability(spec, gates, report);
    validate_tracing_config(spec, report);
    validate_deprecated_fields(spec, report);
    validate_retention(spec, report);
}

/// The gateway becomes the single public entry point and terminates tenant
/// traffic itself, so it conflicts with a separate Jaeger query ingress and
/// with receiver-side TLS, and it is pointless without tenants.
fn validate_gateway(spec: &TempoStackSpec, report: &mut ValidationReport) {
    if !spec.template.gateway.enabled {
        return;
    }

    if spec.tenants.is_none() {
        report.add_error(FieldError::consistency(
            "spec.template.gateway.enabled",
            true,
            "tenants must be configured to enable the gateway",
        ));
    }

    if spec
        .template
        .query_frontend
        .jaeger_query
        .ingress
        .ingress_type
        .is_some()
    {
        report.add_error(FieldError::consistency(
            "spec.template.gateway.enabled",
            true,
            "cannot enable the gateway and a Jaeger query ingress at the same time; the gateway is the single entry point",
        ));
    }

    if spec.template.distributor.tls.enabled {
        report.add_error(FieldError::consistency(
            "spec.template.gateway.enabled",
            true,
            "cannot enable the gateway and receiver TLS at the same time",
        ));
    }
}

fn validate_route_ingress(
    field: &str,
    ingress: &IngressSpec,
    gates: &FeatureGates,
    report: &mut ValidationReport,
) {
    if ingress.ingress_type == Some(IngressType::Route) && !gates.openshift_route {
        report.add_error(FieldError::policy_gate(
            field,
            "route",
            "the openshiftRoute feature gate must be enabled to create a route",
        ));
    }
}

fn validate_observability(
    spec: &TempoStackSpec,
    gates: &FeatureGates,
    report: &mut ValidationReport,
) {
    let metrics = &spec.observability.metrics;

    if metrics.create_service_monitors && !gates.prometheus_operator {
        report.add_error(FieldError::policy_gate(
            "spec.observability.metrics.createServiceMonitors",
            true,
            "the prometheusOperator feature gate must be enabled to create service monitors",
        ));
    }

    if metrics.create_prometheus_rules && !metrics.create_service_monitors {
        report.add_error(FieldError::consistency(
            "spec.observability.metrics.createPrometheusRules",
            true,
            "the Prometheus rules alert on collected metrics, so createServiceMonitors must be enabled as well",
        ));
    }

    if spec.observability.grafana.create_datasource && !gates.grafana_operator {
        report.add_error(FieldError::policy_gate(
            "spec.observability.grafana.createDatasource",
            true,
            "the grafanaOperator feature gate must be enabled to create a Grafana datasource",
        ));
    }
}

fn validate_tracing_config(spec: &TempoStackSpec, report: &mut ValidationReport) {
    let tracing = &spec.observability.tracing;

    if let Some(fraction) = &tracing.sampling_fraction {
        if fraction.parse::<f64>().is_err() {
            report.add_error(FieldError::structural(
                "spec.observability.tracing.samplingFraction",
                fraction,
                format!("\"{fraction}\" is not a valid sampling fraction"),
            ));
        }
    }

    if let Some(endpoint) = &tracing.jaeger_agent_endpoint {
        if parse_host_port(endpoint).is_none() {
            report.add_error(FieldError::structural(
                "spec.observability.tracing.jaegerAgentEndpoint",
                endpoint,
                format!("\"{endpoint}\" is not a valid host:port address"),
            ));
        }
    }
}

fn validate_deprecated_fields(spec: &TempoStackSpec, report: &mut ValidationReport) {
    if let Some(search) = &spec.search {
        if let Some(bytes) = search.max_search_bytes_per_trace {
            report.add_error(FieldError::structural(
                "spec.search.maxSearchBytesPerTrace",
                bytes,
                "field is deprecated and no longer honored; remove it",
            ));
        }
    }
}

fn validate_retention(spec: &TempoStackSpec, report: &mut ValidationReport) {
    validate_duration(
        "spec.retention.global.traces",
        spec.retention.global.traces.as_deref(),
        report,
    );
    for (tenant, retention) in &spec.retention.per_tenant {
        validate_duration(
            &format!("spec.retention.perTenant.{tenant}.traces"),
            retention.traces.as_deref(),
            report,
        );
    }
}

fn validate_duration(field: &str, value: Option<&str>, report: &mut ValidationReport) {
    let Some(value) = value else { return };
    if humantime::parse_duration(value).is_err() {
        report.add_error(FieldError::structural(
            field,
            value,
            format!("\"{value}\" is not a valid duration"),
        ));
    }
}

/// Split a `host:port` address. Both parts must be present, the port must
/// be numeric, and the host must not be a URL.
fn parse_host_port(address: &str) -> Option<(&str, u16)> {
    let (host, port) = address.rsplit_once(':')?;
    if host.is_empty() || host.contains('/') {
        return None;
    }
    port.parse::<u16>().ok().map(|port| (host, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{SearchSpec, TenantsSpec};

    fn gates(openshift_route: bool, prometheus: bool, grafana: bool) -> FeatureGates {
        FeatureGates {
            openshift_route,
            prometheus_operator: prometheus,
            grafana_operator: grafana,
            http_encryption: false,
        }
    }

    fn run(spec: &TempoStackSpec, gates: &FeatureGates) -> ValidationReport {
        let mut report = ValidationReport::new();
        validate_feature_gates(spec, gates, &mut report);
        report
    }

    #[test]
    fn test_default_spec_passes() {
        let report = run(&TempoStackSpec::default(), &FeatureGates::default());
        assert!(report.is_valid(), "{:?}", report.errors());
    }

    #[test]
    fn test_route_ingress_requires_gate() {
        let mut spec = TempoStackSpec::default();
        spec.tenants = Some(TenantsSpec::default());
        spec.template.gateway.enabled = true;
        spec.template.gateway.ingress.ingress_type = Some(IngressType::Route);

        let report = run(&spec, &gates(false, false, false));
        assert_eq!(report.errors().len(), 1);
        assert!(report.errors()[0].message.contains("openshiftRoute"));

        assert!(run(&spec, &gates(true, false, false)).is_valid());
    }

    #[test]
    fn test_jaeger_query_route_requires_gate() {
        let mut spec = TempoStackSpec::default();
        spec.template.query_frontend.jaeger_query.enabled = true;
        spec.template.query_frontend.jaeger_query.ingress.ingress_type = Some(IngressType::Route);

        let report = run(&spec, &gates(false, false, false));
        assert_eq!(report.errors().len(), 1);
        assert_eq!(
            report.errors()[0].field,
            "spec.template.queryFrontend.jaegerQuery.ingress.type"
        );
    }

    #[test]
    fn test_gateway_requires_tenants() {
        let mut spec = TempoStackSpec::default();
        spec.template.gateway.enabled = true;

        let report = run(&spec, &FeatureGates::default());
        assert_eq!(report.errors().len(), 1);
        assert!(report.errors()[0].message.contains("tenants"));
    }

    #[test]
    fn test_gateway_conflicts_with_jaeger_query_ingress() {
        let mut spec = TempoStackSpec::default();
        spec.tenants = Some(TenantsSpec::default());
        spec.template.gateway.enabled = true;
        spec.template.query_frontend.jaeger_query.enabled = true;
        spec.template.query_frontend.jaeger_query.ingress.ingress_type =
            Some(IngressType::Ingress);

        let report = run(&spec, &FeatureGates::default());
        assert_eq!(report.errors().len(), 1);
        assert!(report.errors()[0].message.contains("single entry point"));
    }

    #[test]
    fn test_gateway_conflicts_with_receiver_tls() {
        let mut spec = TempoStackSpec::default();
        spec.tenants = Some(TenantsSpec::default());
        spec.template.gateway.enabled = true;
        spec.template.distributor.tls.enabled = true;

        let report = run(&spec, &FeatureGates::default());
        assert_eq!(report.errors().len(), 1);
        assert!(report.errors()[0].message.contains("receiver TLS"));
    }

    #[test]
    fn test_service_monitors_require_gate() {
        let mut spec = TempoStackSpec::default();
        spec.observability.metrics.create_service_monitors = true;

        let report = run(&spec, &gates(false, false, false));
        assert_eq!(report.errors().len(), 1);
        assert!(report.errors()[0].message.contains("prometheusOperator"));

        assert!(run(&spec, &gates(false, true, false)).is_valid());
    }

    #[test]
    fn test_prometheus_rules_require_service_monitors() {
        let mut spec = TempoStackSpec::default();
        spec.observability.metrics.create_prometheus_rules = true;

        let report = run(&spec, &gates(false, true, false));
        assert_eq!(report.errors().len(), 1);
        assert_eq!(
            report.errors()[0].field,
            "spec.observability.metrics.createPrometheusRules"
        );
    }

    #[test]
    fn test_grafana_datasource_requires_gate() {
        let mut spec = TempoStackSpec::default();
        spec.observability.grafana.create_datasource = true;

        let report = run(&spec, &gates(false, false, false));
        assert_eq!(report.errors().len(), 1);
        assert!(report.errors()[0].message.contains("grafanaOperator"));

        assert!(run(&spec, &gates(false, false, true)).is_valid());
    }

    #[test]
    fn test_sampling_fraction_must_parse() {
        let mut spec = TempoStackSpec::default();
        spec.observability.tracing.sampling_fraction = Some("0.5".to_string());
        assert!(run(&spec, &FeatureGates::default()).is_valid());

        spec.observability.tracing.sampling_fraction = Some("half".to_string());
        let report = run(&spec, &FeatureGates::default());
        assert_eq!(report.errors().len(), 1);
        assert_eq!(
            report.errors()[0].field,
            "spec.observability.tracing.samplingFraction"
        );
    }

    #[test]
    fn test_jaeger_agent_endpoint_must_be_host_port() {
        for (endpoint, valid) in [
            ("jaeger-agent:6831", true),
            ("localhost:6831", true),
            ("jaeger-agent", false),
            (":6831", false),
            ("jaeger-agent:port", false),
            ("http://jaeger-agent:6831", false),
        ] {
            let mut spec = TempoStackSpec::default();
            spec.observability.tracing.jaeger_agent_endpoint = Some(endpoint.to_string());
            let report = run(&spec, &FeatureGates::default());
            assert_eq!(report.is_valid(), valid, "endpoint {endpoint:?}");
        }
    }

    #[test]
    fn test_deprecated_search_field_rejected() {
        let mut spec = TempoStackSpec::default();
        spec.search = Some(SearchSpec {
            max_search_bytes_per_trace: Some(0),
            ..Default::default()
        });

        let report = run(&spec, &FeatureGates::default());
        assert_eq!(report.errors().len(), 1);
        assert!(report.errors()[0].message.contains("deprecated"));
    }

    #[test]
    fn test_retention_durations_must_parse() {
        let mut spec = TempoStackSpec::default();
        spec.retention.global.traces = Some("48h".to_string());
        assert!(run(&spec, &FeatureGates::default()).is_valid());

        spec.retention.global.traces = Some("two days".to_string());
        let report = run(&spec, &FeatureGates::default());
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].field, "spec.retention.global.traces");
    }

    #[test]
    fn test_name_length() {
        let mut report = ValidationReport::new();
        validate_name(&"t".repeat(63), &mut report);
        assert!(report.is_valid());

        let mut report = ValidationReport::new();
        validate_name(&"t".repeat(64), &mut report);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].field, "metadata.name");
    }
}
