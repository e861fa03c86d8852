//! Common types shared between modhub-core and modhub-cli

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One entry of the published community module catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogModule {
    pub name: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub versions: Vec<CatalogVersion>,
}

/// A single released version of a catalog module
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogVersion {
    pub version: String,
    /// Overrides the module-level repository when non-empty
    #[serde(default)]
    pub repository: String,
    /// Slash-delimited path, the last segment names the manager deployment
    #[serde(default)]
    pub manager_path: String,
}

impl CatalogVersion {
    /// Name of the workload implementing this version
    pub fn manager_name(&self) -> &str {
        self.manager_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.manager_path)
    }
}

/// Element of `spec.modules` in the Kyma custom resource
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleDeclaration {
    pub name: String,
    /// Empty means "no channel override"
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel: String,
    /// Fields modhub does not interpret (customResourcePolicy, managed, ...)
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl ModuleDeclaration {
    pub fn new(name: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channel: channel.into(),
            extra: BTreeMap::new(),
        }
    }
}

/// Decoded `spec` of the Kyma custom resource
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KymaSpec {
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub modules: Vec<ModuleDeclaration>,
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

/// Row of one reconciliation view
///
/// Each view fills only the fields it knows about; the presentation layer
/// joins views by `name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledRow {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repository: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub latest_version: String,
    /// Installed tag, or an "outdated" annotation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default)]
    pub managed: bool,
}

impl ReconciledRow {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// "True" for managed rows, empty otherwise
    pub fn managed_label(&self) -> &'static str {
        if self.managed {
            "True"
        } else {
            ""
        }
    }
}
