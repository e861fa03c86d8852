//! Module state reconciliation
//!
//! Merges three views of the cluster's modules:
//! - the published community catalog
//! - modules declared as managed in the Kyma resource
//! - modules whose manager deployment is running
//!
//! and mutates the Kyma module list for enable/disable requests.

pub mod catalog;
pub mod error;
pub mod installed;
pub mod managed;
pub mod mutator;
pub mod reconcile;
pub mod service;
pub mod version;

pub use catalog::{CatalogFetcher, DEFAULT_CATALOG_URL};
pub use error::{ExtractError, FetchError, ModuleError, ProbeError};
pub use installed::{probe_installed, InstalledModule, MODULES_NAMESPACE};
pub use managed::{extract_managed_names, managed_names, ManagedExtractor, ModuleKeyDecoder, NameKeyDecoder};
pub use mutator::{disable_module, enable_module};
pub use reconcile::{catalog_view, installed_view, join_views, managed_view, ModuleMap};
pub use service::SaveOutcome;
pub use version::latest_version;

use crate::config::ModhubConfig;
use crate::kubernetes::{KymaStore, WorkloadLookup};

/// Entry point for module queries and mutations
///
/// Holds no cluster state: every call reads its sources again.
#[derive(Debug, Clone)]
pub struct ModuleManager {
    fetcher: CatalogFetcher,
    modules_namespace: String,
}

impl ModuleManager {
    pub fn new(fetcher: CatalogFetcher) -> Self {
        Self {
            fetcher,
            modules_namespace: MODULES_NAMESPACE.to_string(),
        }
    }

    pub fn from_config(config: &ModhubConfig) -> Result<Self, FetchError> {
        let fetcher = CatalogFetcher::from_config(&config.catalog)?;

        Ok(Self::new(fetcher).with_modules_namespace(config.cluster.modules_namespace.clone()))
    }

    /// Look for manager deployments in another namespace
    pub fn with_modules_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.modules_namespace = namespace.into();
        self
    }

    pub fn fetcher(&self) -> &CatalogFetcher {
        &self.fetcher
    }

    pub fn modules_namespace(&self) -> &str {
        &self.modules_namespace
    }

    /// Every catalog module with its repository and latest version
    pub async fn catalog(&self) -> Result<ModuleMap, ModuleError> {
        let modules = self.fetcher.fetch().await?;
        Ok(catalog_view(&modules))
    }

    /// Modules declared as managed in the Kyma resource
    pub async fn managed(&self, store: &dyn KymaStore) -> Result<ModuleMap, ModuleError> {
        let names = managed_names(store).await?;
        Ok(managed_view(names))
    }

    /// Catalog modules with a running manager deployment
    pub async fn installed(&self, lookup: &dyn WorkloadLookup) -> Result<ModuleMap, ModuleError> {
        let modules = self.fetcher.fetch().await?;
        let installed = probe_installed(&modules, lookup, &self.modules_namespace).await?;

        tracing::debug!(
            catalog = modules.len(),
            installed = installed.len(),
            "Probed installed modules"
        );

        Ok(installed_view(installed))
    }

    /// Add a module to the Kyma resource, or change its channel
    pub async fn enable(
        &self,
        store: &dyn KymaStore,
        name: &str,
        channel: &str,
    ) -> Result<SaveOutcome, ModuleError> {
        service::enable(store, name, channel).await
    }

    /// Remove a module from the Kyma resource
    pub async fn disable(&self, store: &dyn KymaStore, name: &str) -> Result<SaveOutcome, ModuleError> {
        service::disable(store, name).await
    }
}

impl Default for ModuleManager {
    fn default() -> Self {
        Self::new(CatalogFetcher::default())
    }
}
