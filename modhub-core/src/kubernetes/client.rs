//! Kubernetes client wrapper
//!
//! Wraps the kube-rs Client with the context and Kyma resource it targets.

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;

use super::error::{K8sError, K8sResult};
use super::types::KymaRef;
use crate::config::ClusterConfig;

/// Wrapper around kube-rs Client with cluster context
#[derive(Clone)]
pub struct K8sClient {
    inner: Client,
    api_server: String,
    kyma: KymaRef,
}

impl K8sClient {
    /// Create client from the cluster section of the configuration
    pub async fn from_config(config: &ClusterConfig) -> K8sResult<Self> {
        let client = Self::connect(config.kubeconfig.as_deref(), config.context.as_deref()).await?;

        Ok(client.with_kyma(KymaRef {
            name: config.kyma_name.clone(),
            namespace: config.kyma_namespace.clone(),
        }))
    }

    /// Connect using an explicit kubeconfig file, or the usual inference
    /// chain (`KUBECONFIG`, `~/.kube/config`, in-cluster) when none is given
    pub async fn connect(kubeconfig: Option<&Path>, context: Option<&str>) -> K8sResult<Self> {
        let options = KubeConfigOptions {
            context: context.map(String::from),
            ..Default::default()
        };

        let config = match kubeconfig {
            Some(path) => {
                let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                    K8sError::InvalidKubeconfig(format!(
                        "Failed to read kubeconfig {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| {
                        K8sError::InvalidKubeconfig(format!("Failed to create config: {}", e))
                    })?
            }
            None if context.is_some() => Config::from_kubeconfig(&options).await.map_err(|e| {
                K8sError::InvalidKubeconfig(format!("Failed to create config: {}", e))
            })?,
            None => Config::infer().await.map_err(|e| {
                K8sError::InvalidKubeconfig(format!("Failed to infer config: {}", e))
            })?,
        };

        Self::from_kube_config(config)
    }

    /// Create client from kubeconfig YAML with optional context
    pub async fn from_kubeconfig(kubeconfig_yaml: &str, context: Option<&str>) -> K8sResult<Self> {
        let kubeconfig = Kubeconfig::from_yaml(kubeconfig_yaml).map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to parse kubeconfig: {}", e))
        })?;

        let config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.map(String::from),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create config: {}", e)))?;

        Self::from_kube_config(config)
    }

    pub(crate) fn from_kube_config(config: Config) -> K8sResult<Self> {
        let api_server = config.cluster_url.to_string();

        let client = Client::try_from(config)
            .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            inner: client,
            api_server,
            kyma: KymaRef::default(),
        })
    }

    /// Point the client at a different Kyma resource
    pub fn with_kyma(mut self, kyma: KymaRef) -> Self {
        self.kyma = kyma;
        self
    }

    /// Get the inner kube-rs Client
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Get API server URL
    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    /// Kyma resource read and written by this client
    pub fn kyma(&self) -> &KymaRef {
        &self.kyma
    }
}

/// Client against a plain-HTTP test server such as a wiremock instance
#[cfg(test)]
pub(crate) fn client_for(url: &str) -> K8sClient {
    let config = Config::new(url.parse().expect("valid server url"));
    K8sClient::from_kube_config(config).expect("client for test server")
}

impl std::fmt::Debug for K8sClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("K8sClient")
            .field("api_server", &self.api_server)
            .field("kyma", &self.kyma)
            .finish()
    }
}
