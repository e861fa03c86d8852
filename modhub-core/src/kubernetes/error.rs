//! Kubernetes error types
//!
//! Classifies kube-rs failures so callers can tell "absent" and "stale
//! write" apart from transport problems.

use thiserror::Error;

/// Kubernetes-specific errors
#[derive(Debug, Error)]
pub enum K8sError {
    /// Kubernetes resource not found
    #[error("Resource not found: {kind}/{name} in namespace {namespace}")]
    ResourceNotFound {
        kind: String,
        name: String,
        namespace: String,
    },

    /// Write rejected because the resource changed since it was read
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Error from kube-rs client
    #[cfg(feature = "kubernetes")]
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    /// Invalid kubeconfig
    #[error("Invalid kubeconfig: {0}")]
    InvalidKubeconfig(String),

    /// Resource exists but its content could not be decoded
    #[error("Invalid {kind}/{name}: {reason}")]
    InvalidResource {
        kind: String,
        name: String,
        reason: String,
    },

    /// Internal system error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl K8sError {
    /// HTTP status code reported by the API server, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            K8sError::ResourceNotFound { .. } => Some(404),
            K8sError::Conflict(_) => Some(409),
            #[cfg(feature = "kubernetes")]
            K8sError::KubeError(kube::Error::Api(response)) => Some(response.code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(409)
    }
}

/// Result type alias for Kubernetes operations
pub type K8sResult<T> = std::result::Result<T, K8sError>;
