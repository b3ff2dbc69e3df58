//! Validation orchestrator
//!
//! Runs every validator against a defaulted spec, aggregates their findings
//! into one [`ValidationReport`], and is the only place that talks to the
//! external lookup collaborator. Validators never short-circuit each other:
//! a rejection carries the full list of problems so a spec can be fixed in
//! one round-trip.
//!
//! Lookup failures follow a strict policy: "not found" becomes a warning
//! (the referenced object may legitimately be created later), every other
//! failure is a hard error because it says nothing about whether the object
//! exists.

use tracing::debug;

use crate::admission::types::{FieldError, ValidationReport};
use crate::admission::{gates, quorum, storage, tenants};
use crate::config::FeatureGates;
use crate::crd::{
    MonolithicObjectStorageSpec, MonolithicStorageBackend, TempoMonolithic, TempoMonolithicSpec,
    TempoStack, TempoStackSpec,
};
use crate::error::Error;
use crate::lookup::ObjectLookup;

const EXTRA_CONFIG_WARNING: &str =
    "raw configuration overrides bypass validation and take precedence over generated settings; use with caution";

/// Validate a TempoStack against the feature gates and referenced objects.
///
/// The spec is expected to be defaulted already (see
/// [`apply_defaults`](crate::admission::apply_defaults)). Returns the
/// aggregated report on a completed pass; `Err` only for hard lookup
/// failures.
pub async fn validate(
    stack: &TempoStack,
    feature_gates: &FeatureGates,
    lookup: &dyn ObjectLookup,
) -> Result<ValidationReport, Error> {
    let mut report = ValidationReport::new();
    let name = stack.metadata.name.as_deref().unwrap_or_default();
    let namespace = stack.metadata.namespace.as_deref().unwrap_or_default();

    gates::validate_name(name, &mut report);
    validate_storage(&stack.spec, namespace, lookup, &mut report).await?;
    quorum::validate_quorum(&stack.spec, &mut report);
    tenants::validate_tenants(&stack.spec, &mut report);
    gates::validate_feature_gates(&stack.spec, feature_gates, &mut report);

    if stack
        .spec
        .extra_config
        .as_ref()
        .is_some_and(|e| e.tempo.is_some())
    {
        report.add_warning(format!("spec.extraConfig.tempo: {EXTRA_CONFIG_WARNING}"));
    }

    debug!(
        errors = report.errors().len(),
        warnings = report.warnings().len(),
        "validated TempoStack {namespace}/{name}"
    );
    Ok(report)
}

async fn validate_storage(
    spec: &TempoStackSpec,
    namespace: &str,
    lookup: &dyn ObjectLookup,
    report: &mut ValidationReport,
) -> Result<(), Error> {
    let secret_ref = &spec.storage.secret;
    if secret_ref.name.is_empty() {
        report.add_error(FieldError::structural(
            "spec.storage.secret.name",
            "",
            "storage secret name is required",
        ));
    } else {
        match lookup.get_secret(namespace, &secret_ref.name).await {
            Ok(payload) => storage::validate_secret_schema(
                "spec.storage.secret",
                &secret_ref.credential_type,
                &secret_ref.name,
                &payload,
                report,
            ),
            Err(err) if err.is_not_found() => {
                report.add_warning(format!(
                    "spec.storage.secret.name: secret \"{}\" does not exist yet",
                    secret_ref.name
                ));
            }
            Err(source) => {
                return Err(Error::Lookup {
                    kind: "secret",
                    namespace: namespace.to_string(),
                    name: secret_ref.name.clone(),
                    source,
                });
            }
        }
    }

    let ca_name = spec
        .storage
        .tls
        .ca_name
        .as_deref()
        .filter(|name| !name.is_empty());
    if let Some(ca_name) = ca_name {
        match lookup.get_config_map(namespace, ca_name).await {
            Ok(data) => {
                storage::validate_ca_config_map("spec.storage.tls.caName", ca_name, &data, report);
            }
            Err(err) if err.is_not_found() => {
                report.add_warning(format!(
                    "spec.storage.tls.caName: configmap \"{ca_name}\" does not exist yet"
                ));
            }
            Err(source) => {
                return Err(Error::Lookup {
                    kind: "configmap",
                    namespace: namespace.to_string(),
                    name: ca_name.to_string(),
                    source,
                });
            }
        }
    }

    Ok(())
}

/// Validate a TempoMonolithic against the feature gates and referenced
/// objects. Shares the secret schema and tenancy machinery with TempoStack.
pub async fn validate_monolithic(
    mono: &TempoMonolithic,
    feature_gates: &FeatureGates,
    lookup: &dyn ObjectLookup,
) -> Result<ValidationReport, Error> {
    let mut report = ValidationReport::new();
    let name = mono.metadata.name.as_deref().unwrap_or_default();
    let namespace = mono.metadata.namespace.as_deref().unwrap_or_default();

    gates::validate_name(name, &mut report);
    validate_monolithic_storage(&mono.spec, namespace, lookup, &mut report).await?;
    validate_jaegerui(&mono.spec, feature_gates, &mut report);

    if let Some(multitenancy) = &mono.spec.multitenancy {
        if multitenancy.enabled {
            // The built-in gateway fronts tenant traffic whenever
            // multi-tenancy is on.
            tenants::validate_tenant_configs(
                &multitenancy.tenants,
                true,
                "spec.multitenancy",
                &mut report,
            );
        }
    }

    if mono
        .spec
        .extra_config
        .as_ref()
        .is_some_and(|e| e.tempo.is_some())
    {
        report.add_warning(format!("spec.extraConfig.tempo: {EXTRA_CONFIG_WARNING}"));
    }

    debug!(
        errors = report.errors().len(),
        warnings = report.warnings().len(),
        "validated TempoMonolithic {namespace}/{name}"
    );
    Ok(report)
}

async fn validate_monolithic_storage(
    spec: &TempoMonolithicSpec,
    namespace: &str,
    lookup: &dyn ObjectLookup,
    report: &mut ValidationReport,
) -> Result<(), Error> {
    let Some(storage) = &spec.storage else {
        return Ok(());
    };
    let traces = &storage.traces;

    let (field, object_storage): (&str, &Option<MonolithicObjectStorageSpec>) = match traces.backend
    {
        MonolithicStorageBackend::Memory | MonolithicStorageBackend::Pv => return Ok(()),
        MonolithicStorageBackend::S3 => ("spec.storage.traces.s3", &traces.s3),
        MonolithicStorageBackend::Azure => ("spec.storage.traces.azure", &traces.azure),
        MonolithicStorageBackend::Gcs => ("spec.storage.traces.gcs", &traces.gcs),
    };

    let Some(object_storage) = object_storage else {
        report.add_error(FieldError::structural(
            field,
            "",
            format!(
                "object storage configuration is required for the {} backend",
                traces.backend
            ),
        ));
        return Ok(());
    };

    if object_storage.secret.is_empty() {
        report.add_error(FieldError::structural(
            format!("{field}.secret"),
            "",
            "storage secret name is required",
        ));
        return Ok(());
    }

    match lookup.get_secret(namespace, &object_storage.secret).await {
        Ok(payload) => storage::validate_secret_schema(
            &format!("{field}.secret"),
            &traces.backend.to_string(),
            &object_storage.secret,
            &payload,
            report,
        ),
        Err(err) if err.is_not_found() => {
            report.add_warning(format!(
                "{field}.secret: secret \"{}\" does not exist yet",
                object_storage.secret
            ));
        }
        Err(source) => {
            return Err(Error::Lookup {
                kind: "secret",
                namespace: namespace.to_string(),
                name: object_storage.secret.clone(),
                source,
            });
        }
    }

    Ok(())
}

fn validate_jaegerui(
    spec: &TempoMonolithicSpec,
    feature_gates: &FeatureGates,
    report: &mut ValidationReport,
) {
    let Some(jaegerui) = &spec.jaegerui else {
        return;
    };

    if jaegerui.ingress.as_ref().is_some_and(|i| i.enabled) && !jaegerui.enabled {
        report.add_error(FieldError::consistency(
            "spec.jaegerui.ingress.enabled",
            true,
            "the Jaeger UI must be enabled to create an ingress for it",
        ));
    }

    if let Some(route) = &jaegerui.route {
        if route.enabled {
            if !jaegerui.enabled {
                report.add_error(FieldError::consistency(
                    "spec.jaegerui.route.enabled",
                    true,
                    "the Jaeger UI must be enabled to create a route for it",
                ));
            }
            if !feature_gates.openshift_route {
                report.add_error(FieldError::policy_gate(
                    "spec.jaegerui.route.enabled",
                    true,
                    "the openshiftRoute feature gate must be enabled to create a route",
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use async_trait::async_trait;
    use kube::core::ErrorResponse;

    use super::*;
    use crate::crd::{
        ExtraConfigSpec, MonolithicJaegerUiRouteSpec, MonolithicJaegerUiSpec,
        MonolithicStorageSpec, ObjectStorageSecretSpec,
    };
    use crate::lookup::{LookupError, SecretPayload};

    /// In-memory lookup keyed by object name.
    #[derive(Default)]
    struct FakeLookup {
        secrets: BTreeMap<String, SecretPayload>,
        config_maps: BTreeMap<String, BTreeMap<String, String>>,
        deny: bool,
    }

    impl FakeLookup {
        fn with_s3_secret(name: &str) -> Self {
            let payload: SecretPayload = [
                ("endpoint", "http://minio.local:9000"),
                ("bucket", "tempo"),
                ("access_key_id", "tempo"),
                ("access_key_secret", "supersecret"),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
            .collect();

            let mut lookup = Self::default();
            lookup.secrets.insert(name.to_string(), payload);
            lookup
        }

        fn forbidden() -> LookupError {
            LookupError::Api(kube::Error::Api(ErrorResponse {
                status: "Failure".to_string(),
                message: "forbidden".to_string(),
                reason: "Forbidden".to_string(),
                code: 403,
            }))
        }
    }

    #[async_trait]
    impl ObjectLookup for FakeLookup {
        async fn get_secret(
            &self,
            namespace: &str,
            name: &str,
        ) -> Result<SecretPayload, LookupError> {
            if self.deny {
                return Err(Self::forbidden());
            }
            self.secrets
                .get(name)
                .cloned()
                .ok_or_else(|| LookupError::NotFound {
                    kind: "secret",
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                })
        }

        async fn get_config_map(
            &self,
            namespace: &str,
            name: &str,
        ) -> Result<BTreeMap<String, String>, LookupError> {
            if self.deny {
                return Err(Self::forbidden());
            }
            self.config_maps
                .get(name)
                .cloned()
                .ok_or_else(|| LookupError::NotFound {
                    kind: "configmap",
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                })
        }
    }

    fn stack_with_secret(name: &str) -> TempoStack {
        let mut spec = TempoStackSpec::default();
        spec.storage.secret = ObjectStorageSecretSpec {
            name: name.to_string(),
            credential_type: "s3".to_string(),
        };
        TempoStack::new("simplest", spec)
    }

    #[tokio::test]
    async fn test_valid_stack_accepted() {
        let lookup = FakeLookup::with_s3_secret("tempo-storage");
        let report = validate(
            &stack_with_secret("tempo-storage"),
            &FeatureGates::default(),
            &lookup,
        )
        .await
        .unwrap();

        assert!(report.is_valid(), "{:?}", report.errors());
        assert!(report.warnings().is_empty());
    }

    #[tokio::test]
    async fn test_missing_secret_is_warning_not_error() {
        let lookup = FakeLookup::default();
        let report = validate(
            &stack_with_secret("tempo-storage"),
            &FeatureGates::default(),
            &lookup,
        )
        .await
        .unwrap();

        assert!(report.is_valid());
        assert_eq!(report.warnings().len(), 1);
        assert!(report.warnings()[0].contains("does not exist yet"));
    }

    #[tokio::test]
    async fn test_denied_lookup_is_hard_error() {
        let mut lookup = FakeLookup::default();
        lookup.deny = true;

        let err = validate(
            &stack_with_secret("tempo-storage"),
            &FeatureGates::default(),
            &lookup,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Lookup { kind: "secret", .. }));
    }

    #[tokio::test]
    async fn test_cancelled_lookup_is_hard_error() {
        struct CancelledLookup;

        #[async_trait]
        impl ObjectLookup for CancelledLookup {
            async fn get_secret(&self, _: &str, _: &str) -> Result<SecretPayload, LookupError> {
                Err(LookupError::Cancelled)
            }
            async fn get_config_map(
                &self,
                _: &str,
                _: &str,
            ) -> Result<BTreeMap<String, String>, LookupError> {
                Err(LookupError::Cancelled)
            }
        }

        let err = validate(
            &stack_with_secret("tempo-storage"),
            &FeatureGates::default(),
            &CancelledLookup,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Lookup {
                source: LookupError::Cancelled,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_empty_secret_name_rejected() {
        let mut spec = TempoStackSpec::default();
        spec.storage.secret.credential_type = "s3".to_string();

        let report = validate(
            &TempoStack::new("simplest", spec),
            &FeatureGates::default(),
            &FakeLookup::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].field, "spec.storage.secret.name");
    }

    #[tokio::test]
    async fn test_malformed_secret_errors_aggregated_with_other_findings() {
        // A secret missing two keys plus a quorum violation: all three
        // errors surface in one pass.
        let mut lookup = FakeLookup::with_s3_secret("tempo-storage");
        let payload = lookup.secrets.get_mut("tempo-storage").unwrap();
        payload.remove("bucket");
        payload.remove("access_key_id");

        let mut stack = stack_with_secret("tempo-storage");
        stack.spec.replication_factor = Some(3);
        stack.spec.template.ingester.replicas = Some(1);

        let report = validate(&stack, &FeatureGates::default(), &lookup)
            .await
            .unwrap();

        assert_eq!(report.errors().len(), 3);
    }

    #[tokio::test]
    async fn test_ca_config_map_checked_when_referenced() {
        let mut lookup = FakeLookup::with_s3_secret("tempo-storage");
        lookup
            .config_maps
            .insert("tempo-ca".to_string(), BTreeMap::new());

        let mut stack = stack_with_secret("tempo-storage");
        stack.spec.storage.tls.enabled = true;
        stack.spec.storage.tls.ca_name = Some("tempo-ca".to_string());

        let report = validate(&stack, &FeatureGates::default(), &lookup)
            .await
            .unwrap();

        assert_eq!(report.errors().len(), 1);
        assert!(report.errors()[0].message.contains("ca.crt"));
    }

    #[tokio::test]
    async fn test_missing_ca_config_map_is_warning() {
        let lookup = FakeLookup::with_s3_secret("tempo-storage");

        let mut stack = stack_with_secret("tempo-storage");
        stack.spec.storage.tls.enabled = true;
        stack.spec.storage.tls.ca_name = Some("tempo-ca".to_string());

        let report = validate(&stack, &FeatureGates::default(), &lookup)
            .await
            .unwrap();

        assert!(report.is_valid());
        assert_eq!(report.warnings().len(), 1);
    }

    #[tokio::test]
    async fn test_extra_config_surfaces_warning() {
        let lookup = FakeLookup::with_s3_secret("tempo-storage");
        let mut stack = stack_with_secret("tempo-storage");
        stack.spec.extra_config = Some(ExtraConfigSpec {
            tempo: Some(serde_json::json!({"compactor": {"block_retention": "24h"}})),
        });

        let report = validate(&stack, &FeatureGates::default(), &lookup)
            .await
            .unwrap();

        assert!(report.is_valid());
        assert_eq!(report.warnings().len(), 1);
        assert!(report.warnings()[0].contains("take precedence"));
    }

    #[tokio::test]
    async fn test_monolithic_memory_backend_needs_no_lookup() {
        let mono = TempoMonolithic::new("mono", TempoMonolithicSpec::default());
        let report = validate_monolithic(&mono, &FeatureGates::default(), &FakeLookup::default())
            .await
            .unwrap();
        assert!(report.is_valid());
    }

    #[tokio::test]
    async fn test_monolithic_s3_backend_requires_config() {
        let mut spec = TempoMonolithicSpec::default();
        let mut storage = MonolithicStorageSpec::default();
        storage.traces.backend = MonolithicStorageBackend::S3;
        spec.storage = Some(storage);

        let report = validate_monolithic(
            &TempoMonolithic::new("mono", spec),
            &FeatureGates::default(),
            &FakeLookup::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].field, "spec.storage.traces.s3");
    }

    #[tokio::test]
    async fn test_monolithic_s3_secret_schema_validated() {
        let mut lookup = FakeLookup::with_s3_secret("mono-storage");
        lookup
            .secrets
            .get_mut("mono-storage")
            .unwrap()
            .remove("bucket");

        let mut spec = TempoMonolithicSpec::default();
        let mut storage = MonolithicStorageSpec::default();
        storage.traces.backend = MonolithicStorageBackend::S3;
        storage.traces.s3 = Some(MonolithicObjectStorageSpec {
            secret: "mono-storage".to_string(),
        });
        spec.storage = Some(storage);

        let report = validate_monolithic(
            &TempoMonolithic::new("mono", spec),
            &FeatureGates::default(),
            &lookup,
        )
        .await
        .unwrap();

        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].field, "spec.storage.traces.s3.secret");
        assert!(report.errors()[0].message.contains("\"bucket\""));
    }

    #[tokio::test]
    async fn test_monolithic_jaegerui_route_requires_ui_and_gate() {
        let mut spec = TempoMonolithicSpec::default();
        spec.jaegerui = Some(MonolithicJaegerUiSpec {
            enabled: false,
            ingress: None,
            route: Some(MonolithicJaegerUiRouteSpec {
                enabled: true,
                ..Default::default()
            }),
        });

        let report = validate_monolithic(
            &TempoMonolithic::new("mono", spec),
            &FeatureGates::default(),
            &FakeLookup::default(),
        )
        .await
        .unwrap();

        // Both independent findings surface: UI disabled and gate missing.
        assert_eq!(report.errors().len(), 2);
    }
}
