//! Tenancy mode validation
//!
//! A state machine over the tenancy mode. Unlike the storage secret
//! validator this one is deliberately fail-fast: the checks are staged
//! (there is no point validating role bindings before authorization itself
//! exists), so the first missing precondition returns a single targeted
//! error.

use crate::admission::types::{FieldError, ValidationReport};
use crate::crd::{ModeType, TempoStackSpec, TenantsSpec};

pub fn validate_tenants(spec: &TempoStackSpec, report: &mut ValidationReport) {
    // Tenancy not in use.
    let Some(tenants) = &spec.tenants else {
        return;
    };

    validate_tenant_configs(tenants, spec.gateway_enabled(), "spec.tenants", report);
}

/// Mode-dependent required/forbidden field combinations. Shared between
/// TempoStack and the monolithic multi-tenancy block, which differ only in
/// the field path and what "gateway enabled" means.
pub(crate) fn validate_tenant_configs(
    tenants: &TenantsSpec,
    gateway_enabled: bool,
    base_field: &str,
    report: &mut ValidationReport,
) {
    match tenants.mode {
        ModeType::Static => {
            // Tenancy constraints only matter once a gateway consumes them.
            if !gateway_enabled {
                return;
            }

            if tenants.authentication.is_empty() {
                report.add_error(FieldError::structural(
                    format!("{base_field}.authentication"),
                    "",
                    "authentication is required in static mode",
                ));
                return;
            }

            let Some(authorization) = &tenants.authorization else {
                report.add_error(FieldError::structural(
                    format!("{base_field}.authorization"),
                    "",
                    "authorization is required in static mode",
                ));
                return;
            };

            if authorization.roles.is_empty() {
                report.add_error(FieldError::structural(
                    format!("{base_field}.authorization.roles"),
                    "",
                    "roles are required in static mode",
                ));
                return;
            }

            if authorization.role_bindings.is_empty() {
                report.add_error(FieldError::structural(
                    format!("{base_field}.authorization.roleBindings"),
                    "",
                    "role bindings are required in static mode",
                ));
                return;
            }

            for (i, auth) in tenants.authentication.iter().enumerate() {
                if auth.oidc.is_none() {
                    report.add_error(FieldError::structural(
                        format!("{base_field}.authentication[{i}].oidc"),
                        &auth.tenant_name,
                        "OIDC configuration is required in static mode",
                    ));
                    return;
                }
            }
        }
        ModeType::Openshift => {
            if !gateway_enabled {
                report.add_error(FieldError::consistency(
                    format!("{base_field}.mode"),
                    ModeType::Openshift,
                    "the gateway must be enabled in openshift mode",
                ));
                return;
            }

            if tenants.authorization.is_some() {
                report.add_error(FieldError::consistency(
                    format!("{base_field}.authorization"),
                    "",
                    "authorization should not be defined in openshift mode",
                ));
                return;
            }

            for (i, auth) in tenants.authentication.iter().enumerate() {
                if auth.oidc.is_some() {
                    report.add_error(FieldError::consistency(
                        format!("{base_field}.authentication[{i}].oidc"),
                        &auth.tenant_name,
                        "OIDC should not be defined in openshift mode",
                    ));
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{
        AuthenticationSpec, AuthorizationSpec, OidcSpec, PermissionType, RoleBindingSpec, RoleSpec,
        Subject, SubjectKind,
    };

    fn oidc() -> OidcSpec {
        OidcSpec {
            issuer_url: "https://issuer.example.com".to_string(),
            ..Default::default()
        }
    }

    fn authentication(with_oidc: bool) -> Vec<AuthenticationSpec> {
        vec![AuthenticationSpec {
            tenant_name: "dev".to_string(),
            tenant_id: "1610b0c3-c509-4592-a256-a1871353dbfa".to_string(),
            oidc: with_oidc.then(oidc),
        }]
    }

    fn authorization() -> AuthorizationSpec {
        AuthorizationSpec {
            roles: vec![RoleSpec {
                name: "read-write".to_string(),
                tenants: vec!["dev".to_string()],
                resources: vec!["traces".to_string()],
                permissions: vec![PermissionType::Read, PermissionType::Write],
            }],
            role_bindings: vec![RoleBindingSpec {
                name: "dev-team".to_string(),
                roles: vec!["read-write".to_string()],
                subjects: vec![Subject {
                    name: "dev-group".to_string(),
                    kind: SubjectKind::Group,
                }],
            }],
        }
    }

    fn static_tenants() -> TenantsSpec {
        TenantsSpec {
            mode: ModeType::Static,
            authentication: authentication(true),
            authorization: Some(authorization()),
        }
    }

    fn run(tenants: TenantsSpec, gateway_enabled: bool) -> ValidationReport {
        let mut spec = TempoStackSpec::default();
        spec.tenants = Some(tenants);
        spec.template.gateway.enabled = gateway_enabled;
        let mut report = ValidationReport::new();
        validate_tenants(&spec, &mut report);
        report
    }

    #[test]
    fn test_no_tenants_is_noop() {
        let mut report = ValidationReport::new();
        validate_tenants(&TempoStackSpec::default(), &mut report);
        assert!(report.is_valid());
    }

    #[test]
    fn test_static_fully_specified_accepted() {
        let report = run(static_tenants(), true);
        assert!(report.is_valid(), "{:?}", report.errors());
    }

    #[test]
    fn test_static_without_gateway_skips_all_checks() {
        let tenants = TenantsSpec {
            mode: ModeType::Static,
            authentication: Vec::new(),
            authorization: None,
        };
        assert!(run(tenants, false).is_valid());
    }

    #[test]
    fn test_static_missing_authentication() {
        let mut tenants = static_tenants();
        tenants.authentication = Vec::new();

        let report = run(tenants, true);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].field, "spec.tenants.authentication");
    }

    #[test]
    fn test_static_missing_authorization_fails_fast() {
        // Authorization, roles, and role bindings are all absent, but the
        // staged checks surface only the first missing precondition.
        let mut tenants = static_tenants();
        tenants.authorization = None;

        let report = run(tenants, true);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].field, "spec.tenants.authorization");
    }

    #[test]
    fn test_static_empty_roles() {
        let mut tenants = static_tenants();
        tenants.authorization.as_mut().unwrap().roles = Vec::new();

        let report = run(tenants, true);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].field, "spec.tenants.authorization.roles");
    }

    #[test]
    fn test_static_empty_role_bindings() {
        let mut tenants = static_tenants();
        tenants.authorization.as_mut().unwrap().role_bindings = Vec::new();

        let report = run(tenants, true);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(
            report.errors()[0].field,
            "spec.tenants.authorization.roleBindings"
        );
    }

    #[test]
    fn test_static_tenant_without_oidc() {
        let mut tenants = static_tenants();
        tenants.authentication = authentication(false);

        let report = run(tenants, true);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(
            report.errors()[0].field,
            "spec.tenants.authentication[0].oidc"
        );
    }

    #[test]
    fn test_openshift_with_authorization_rejected() {
        let tenants = TenantsSpec {
            mode: ModeType::Openshift,
            authentication: authentication(false),
            authorization: Some(authorization()),
        };

        let report = run(tenants, true);
        assert_eq!(report.errors().len(), 1);
        assert!(report.errors()[0]
            .message
            .contains("should not be defined in openshift mode"));
    }

    #[test]
    fn test_openshift_with_oidc_rejected() {
        let tenants = TenantsSpec {
            mode: ModeType::Openshift,
            authentication: authentication(true),
            authorization: None,
        };

        let report = run(tenants, true);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(
            report.errors()[0].field,
            "spec.tenants.authentication[0].oidc"
        );
    }

    #[test]
    fn test_openshift_requires_gateway() {
        let tenants = TenantsSpec {
            mode: ModeType::Openshift,
            authentication: authentication(false),
            authorization: None,
        };

        let report = run(tenants, false);
        assert_eq!(report.errors().len(), 1);
        assert!(report.errors()[0].message.contains("gateway"));
    }

    #[test]
    fn test_openshift_valid() {
        let tenants = TenantsSpec {
            mode: ModeType::Openshift,
            authentication: authentication(false),
            authorization: None,
        };
        assert!(run(tenants, true).is_valid());
    }
}
