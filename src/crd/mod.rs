//! Custom Resource Definitions for Tempo-K8s
//!
//! This module defines the Kubernetes CRDs for managing Tempo tracing
//! deployments: the microservices-mode `TempoStack` and the single-process
//! `TempoMonolithic`.

mod tempo_monolithic;
mod tempo_stack;
pub mod types;


pub use tempo_monolithic::{
    MonolithicJaegerUiIngressSpec, MonolithicJaegerUiRouteSpec, MonolithicJaegerUiSpec,
    MonolithicMultitenancySpec, MonolithicObjectStorageSpec, MonolithicStorageBackend,
    MonolithicStorageSpec, MonolithicTracesStorageSpec, TempoMonolithic, TempoMonolithicSpec,
    TempoMonolithicStatus,
};
pub use tempo_stack::{TempoStack, TempoStackSpec, TempoStackStatus};
pub use types::*;
