//! Deployment lookups

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::Api;

use super::client::K8sClient;
use super::error::K8sResult;
use super::types::DeploymentInfo;
use super::WorkloadLookup;

#[async_trait]
impl WorkloadLookup for K8sClient {
    async fn get_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> K8sResult<Option<DeploymentInfo>> {
        let deployments: Api<Deployment> = Api::namespaced(self.inner().clone(), namespace);
        let deployment = deployments.get_opt(name).await?;

        Ok(deployment.map(deployment_to_info))
    }
}

/// Convert k8s Deployment to DeploymentInfo
fn deployment_to_info(deployment: Deployment) -> DeploymentInfo {
    let metadata = deployment.metadata;

    let images = deployment
        .spec
        .and_then(|spec| spec.template.spec)
        .map(|pod| {
            pod.containers
                .into_iter()
                .map(|c| c.image.unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();

    DeploymentInfo {
        name: metadata.name.unwrap_or_default(),
        namespace: metadata.namespace.unwrap_or_default(),
        images,
    }
}
