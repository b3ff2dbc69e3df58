//! Object storage secret schema validation
//!
//! Storage credentials are opaque key/value secrets whose required layout
//! depends on the declared backend type. Malformed secrets are caught here,
//! at admission time, instead of surfacing much later as a crash-looping
//! Tempo pod. Unlike the tenancy validator this one reports *every* problem
//! it finds: the key-presence checks are independent of each other.

use url::Url;

use crate::admission::types::{FieldError, ValidationReport};
use crate::lookup::SecretPayload;

/// Object storage backend a credential secret is declared for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialType {
    S3,
    Azure,
    Gcs,
}

impl CredentialType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "s3" => Some(CredentialType::S3),
            "azure" => Some(CredentialType::Azure),
            "gcs" => Some(CredentialType::Gcs),
            _ => None,
        }
    }

    /// Registry of required secret keys per backend. Adding a backend means
    /// adding a variant and its entry here, plus tests.
    pub fn required_keys(self) -> &'static [&'static str] {
        match self {
            CredentialType::S3 => &["endpoint", "bucket", "access_key_id", "access_key_secret"],
            CredentialType::Azure => &["container", "account_name", "account_key"],
            CredentialType::Gcs => &["bucket", "key.json"],
        }
    }

    /// Key whose value must be a well-formed absolute URL, if any.
    pub fn endpoint_key(self) -> Option<&'static str> {
        match self {
            CredentialType::S3 => Some("endpoint"),
            CredentialType::Azure | CredentialType::Gcs => None,
        }
    }
}

impl std::fmt::Display for CredentialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialType::S3 => write!(f, "s3"),
            CredentialType::Azure => write!(f, "azure"),
            CredentialType::Gcs => write!(f, "gcs"),
        }
    }
}

/// Validate a fetched credential secret against the schema of its declared
/// backend type.
///
/// `base_field` is the path of the secret reference in the owning spec
/// (e.g. `spec.storage.secret`). One error is emitted per missing-or-empty
/// required key; the declared type and overall payload presence are checked
/// first, since structural checks against an unknown type or an empty
/// payload would not be informative.
pub fn validate_secret_schema(
    base_field: &str,
    declared_type: &str,
    secret_name: &str,
    payload: &SecretPayload,
    report: &mut ValidationReport,
) {
    if declared_type.is_empty() {
        report.add_error(FieldError::structural(
            format!("{base_field}.type"),
            "",
            "storage secret type is required",
        ));
        return;
    }

    let Some(credential_type) = CredentialType::parse(declared_type) else {
        report.add_error(FieldError::structural(
            format!("{base_field}.type"),
            declared_type,
            format!("\"{declared_type}\" is not an allowed storage secret type"),
        ));
        return;
    };

    if payload.is_empty() {
        report.add_error(FieldError::structural(
            base_field,
            secret_name,
            "storage secret is empty",
        ));
        return;
    }

    for key in credential_type.required_keys() {
        let missing = payload.get(*key).is_none_or(|value| value.is_empty());
        if missing {
            report.add_error(FieldError::structural(
                base_field,
                secret_name,
                format!("storage secret must contain \"{key}\" field"),
            ));
        }
    }

    if let Some(endpoint_key) = credential_type.endpoint_key() {
        if let Some(value) = payload.get(endpoint_key) {
            if !value.is_empty() {
                validate_endpoint(base_field, endpoint_key, value, report);
            }
        }
    }
}

/// An endpoint value must be an absolute URL. `Url::parse` is given no base
/// here, so relative references like `/path` fail along with garbage input.
fn validate_endpoint(base_field: &str, key: &str, value: &[u8], report: &mut ValidationReport) {
    let field = format!("{base_field}.{key}");

    let Ok(endpoint) = std::str::from_utf8(value) else {
        report.add_error(FieldError::structural(
            field,
            "<binary>",
            "endpoint value is not valid UTF-8",
        ));
        return;
    };

    match Url::parse(endpoint) {
        Ok(_) => {}
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            report.add_error(FieldError::structural(
                field,
                endpoint,
                "endpoint URL must be absolute and include a scheme",
            ));
        }
        Err(_) => {
            report.add_error(FieldError::structural(
                field,
                endpoint,
                format!("\"{endpoint}\" is not a valid endpoint URL"),
            ));
        }
    }
}

/// Validate a fetched CA ConfigMap: it must carry the certificate under the
/// `ca.crt` key.
pub fn validate_ca_config_map(
    field: &str,
    config_map_name: &str,
    data: &std::collections::BTreeMap<String, String>,
    report: &mut ValidationReport,
) {
    if data.get("ca.crt").is_none_or(|pem| pem.is_empty()) {
        report.add_error(FieldError::structural(
            field,
            config_map_name,
            "CA ConfigMap must contain a \"ca.crt\" entry",
        ));
    }
}
