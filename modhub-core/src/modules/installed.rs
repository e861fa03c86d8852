//! Installed module detection
//!
//! A module counts as installed when the manager deployment of its latest
//! catalog version exists in the modules namespace. The installed version is
//! the tag of that deployment's first container image.

use modhub_common::CatalogModule;

use super::error::ProbeError;
use super::version::latest_version;
use crate::kubernetes::WorkloadLookup;

/// Namespace the module managers are deployed to
pub const MODULES_NAMESPACE: &str = "kyma-system";

const OUTDATED_PREFIX: &str = "outdated moduleVersion, latest is ";

/// A catalog module whose manager deployment was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledModule {
    pub name: String,
    /// Deployment the installed tag was read from
    pub manager: String,
    pub installed_tag: String,
    pub latest_version: String,
}

impl InstalledModule {
    /// Plain string comparison, no version semantics
    pub fn is_outdated(&self) -> bool {
        self.installed_tag != self.latest_version
    }

    /// The installed tag, or a note pointing at the latest version
    pub fn display_version(&self) -> String {
        calculate_version(&self.latest_version, &self.installed_tag)
    }
}

/// Tag part of a container image reference
///
/// `registry/path/mod:1.2.3` gives `1.2.3`. A reference without a tag gives
/// its last path segment.
pub fn image_tag(image: &str) -> &str {
    let last_segment = image.rsplit('/').next().unwrap_or(image);
    last_segment.rsplit(':').next().unwrap_or(last_segment)
}

pub fn calculate_version(latest_version: &str, installed_version: &str) -> String {
    if latest_version == installed_version {
        installed_version.to_string()
    } else {
        format!("{}{}", OUTDATED_PREFIX, latest_version)
    }
}

/// Probe the cluster for each catalog module's manager deployment
///
/// Modules without versions or without a deployment are left out. Any
/// lookup failure other than "not found" aborts the whole probe.
pub async fn probe_installed<L: WorkloadLookup + ?Sized>(
    modules: &[CatalogModule],
    lookup: &L,
    namespace: &str,
) -> Result<Vec<InstalledModule>, ProbeError> {
    let mut installed = Vec::new();

    for module in modules {
        let Some(latest) = latest_version(&module.versions) else {
            tracing::debug!(module = %module.name, "Skipping module without versions");
            continue;
        };
        let manager = latest.manager_name();

        let deployment = lookup
            .get_deployment(namespace, manager)
            .await
            .map_err(|source| ProbeError::Lookup {
                manager: manager.to_string(),
                source,
            })?;

        let Some(deployment) = deployment else {
            tracing::debug!(module = %module.name, manager, "Manager deployment not found");
            continue;
        };

        let image = deployment
            .images
            .first()
            .ok_or_else(|| ProbeError::NoContainers {
                manager: manager.to_string(),
            })?;

        installed.push(InstalledModule {
            name: module.name.clone(),
            manager: manager.to_string(),
            installed_tag: image_tag(image).to_string(),
            latest_version: latest.version.clone(),
        });
    }

    Ok(installed)
}
