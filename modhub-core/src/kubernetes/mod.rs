//! Kubernetes integration for modhub
//!
//! The module engine needs these capabilities from a cluster:
//! - looking up a deployment's container images ([`WorkloadLookup`])
//! - reading and conditionally writing the Kyma resource ([`KymaStore`])
//! - listing module templates and release metadata ([`ModuleResourceLister`])
//!
//! All are traits so the engine can run against in-memory fakes. The
//! kube-rs backed [`K8sClient`] implements them when the `kubernetes`
//! feature is enabled.

pub mod error;
pub mod types;

#[cfg(feature = "kubernetes")]
pub mod client;
#[cfg(feature = "kubernetes")]
pub mod deployments;
#[cfg(feature = "kubernetes")]
pub mod kyma;
#[cfg(feature = "kubernetes")]
pub mod module_resources;

use async_trait::async_trait;

#[cfg(feature = "kubernetes")]
pub use client::K8sClient;
pub use error::{K8sError, K8sResult};
pub use types::{
    ChannelVersion, DeploymentInfo, FieldManagerRecord, Kyma, KymaRef, ModuleReleaseMeta,
    ModuleTemplate,
};

/// Read access to deployments
#[async_trait]
pub trait WorkloadLookup: Send + Sync {
    /// Get a deployment, `Ok(None)` when it does not exist
    async fn get_deployment(&self, namespace: &str, name: &str)
        -> K8sResult<Option<DeploymentInfo>>;
}

/// Access to the single tracked Kyma resource
#[async_trait]
pub trait KymaStore: Send + Sync {
    /// Read the Kyma resource, `Ok(None)` when it does not exist
    async fn get_kyma(&self) -> K8sResult<Option<Kyma>>;

    /// Field ownership records of the Kyma resource, `Ok(None)` when it
    /// does not exist
    ///
    /// Must not depend on decoding the resource's spec.
    async fn get_kyma_managed_fields(&self) -> K8sResult<Option<Vec<FieldManagerRecord>>>;

    /// Write back `spec.modules` of a previously read Kyma
    ///
    /// Fails with [`K8sError::Conflict`] when the resource changed since it
    /// was read and with [`K8sError::ResourceNotFound`] when it is gone.
    async fn update_kyma_modules(&self, kyma: &Kyma) -> K8sResult<Kyma>;
}

/// Listing of the Kyma operator's module resources across namespaces
#[async_trait]
pub trait ModuleResourceLister: Send + Sync {
    async fn list_module_templates(&self) -> K8sResult<Vec<ModuleTemplate>>;

    async fn list_module_release_metas(&self) -> K8sResult<Vec<ModuleReleaseMeta>>;
}
