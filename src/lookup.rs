//! Read-only lookups for referenced Secrets and ConfigMaps
//!
//! The validation orchestrator never talks to the Kubernetes API directly;
//! it goes through the object-safe [`ObjectLookup`] trait so that tests can
//! substitute an in-memory implementation. [`KubeLookup`] is the production
//! implementation backed by a shared [`kube::Client`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::{Api, Client};
use thiserror::Error;

/// Decoded key/value payload of a Kubernetes Secret.
pub type SecretPayload = BTreeMap<String, Vec<u8>>;

/// Failure modes of an external lookup.
///
/// `NotFound` is the only variant the orchestrator downgrades to a warning;
/// a referenced object may legitimately not exist yet. Everything else,
/// including a cancelled or timed-out request, is a hard error because it
/// gives no information about whether the object exists.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: &'static str,
        namespace: String,
        name: String,
    },

    #[error("api request failed: {0}")]
    Api(#[source] kube::Error),

    #[error("lookup cancelled or timed out")]
    Cancelled,
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }
}

/// Read-only access to referenced cluster objects.
#[async_trait]
pub trait ObjectLookup: Send + Sync {
    async fn get_secret(&self, namespace: &str, name: &str)
        -> Result<SecretPayload, LookupError>;

    async fn get_config_map(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, String>, LookupError>;
}

/// [`ObjectLookup`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeLookup {
    client: Client,
}

impl KubeLookup {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn map_kube_error(
    err: kube::Error,
    kind: &'static str,
    namespace: &str,
    name: &str,
) -> LookupError {
    match err {
        kube::Error::Api(ref response) if response.code == 404 => LookupError::NotFound {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        other => LookupError::Api(other),
    }
}

#[async_trait]
impl ObjectLookup for KubeLookup {
    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<SecretPayload, LookupError> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = api
            .get(name)
            .await
            .map_err(|e| map_kube_error(e, "secret", namespace, name))?;

        Ok(secret
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (key, value.0))
            .collect())
    }

    async fn get_config_map(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, String>, LookupError> {
        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
        let config_map = api
            .get(name)
            .await
            .map_err(|e| map_kube_error(e, "configmap", namespace, name))?;

        Ok(config_map.data.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = LookupError::NotFound {
            kind: "secret",
            namespace: "observability".to_string(),
            name: "tempo-storage".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!LookupError::Cancelled.is_not_found());
    }

    #[test]
    fn test_not_found_message_names_object() {
        let err = LookupError::NotFound {
            kind: "configmap",
            namespace: "observability".to_string(),
            name: "tempo-ca".to_string(),
        };
        assert_eq!(err.to_string(), "configmap observability/tempo-ca not found");
    }
}
