//! Error types of the module engine
//!
//! "Not found" never shows up here: a missing Kyma or manager deployment is
//! an empty result, not an error.

use crate::kubernetes::K8sError;
use thiserror::Error;

/// Retrieving or decoding the module catalog failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("while building the HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("while getting modules list from {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("error response from {url}: {status}")]
    Status { url: String, status: String },

    #[error("while decoding the modules list")]
    Decode(#[from] serde_json::Error),
}

/// Field ownership metadata could not be decoded
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("while decoding fields owned by manager '{manager}': {reason}")]
    Decode { manager: String, reason: String },
}

/// Looking up a module's manager deployment failed
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("while getting the {manager} deployment")]
    Lookup {
        manager: String,
        #[source]
        source: K8sError,
    },

    #[error("deployment {manager} has no containers")]
    NoContainers { manager: String },
}

/// Any failure of a module engine operation
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("while getting managed modules")]
    Extract(#[from] ExtractError),

    #[error("while getting installed modules")]
    Probe(#[from] ProbeError),

    #[error("while getting Kyma CR")]
    Read(#[source] K8sError),

    #[error("while updating Kyma CR")]
    Write(#[source] K8sError),
}
