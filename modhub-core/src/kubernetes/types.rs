//! Kubernetes types for modhub
//!
//! Simplified representations of the resources the module engine reads.

use modhub_common::KymaSpec;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// API group of the Kyma custom resource
pub const KYMA_GROUP: &str = "operator.kyma-project.io";
/// Served version of the Kyma custom resource
pub const KYMA_VERSION: &str = "v1beta2";
/// Kind of the Kyma custom resource
pub const KYMA_KIND: &str = "Kyma";
/// Resource name of the Kyma custom resource
pub const KYMA_PLURAL: &str = "kymas";
/// Kind of the module template custom resource
pub const MODULE_TEMPLATE_KIND: &str = "ModuleTemplate";
/// Resource name of the module template custom resource
pub const MODULE_TEMPLATE_PLURAL: &str = "moduletemplates";
/// Kind of the module release metadata custom resource
pub const MODULE_RELEASE_META_KIND: &str = "ModuleReleaseMeta";
/// Resource name of the module release metadata custom resource
pub const MODULE_RELEASE_META_PLURAL: &str = "modulereleasemetas";

/// Name and namespace of the tracked Kyma resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KymaRef {
    pub name: String,
    pub namespace: String,
}

impl Default for KymaRef {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            namespace: "kyma-system".to_string(),
        }
    }
}

/// One entry of `metadata.managedFields`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldManagerRecord {
    /// Actor that last applied the owned fields
    pub manager: String,
    /// "Apply" or "Update"
    pub operation: String,
    /// Ownership tree (`fieldsV1`), either decoded or as its raw JSON string
    pub fields: Option<Value>,
}

/// The Kyma custom resource as seen by the module engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kyma {
    pub name: String,
    pub namespace: String,
    /// Version the resource was read at, sent back as a write precondition
    pub resource_version: Option<String>,
    pub managed_fields: Vec<FieldManagerRecord>,
    pub spec: KymaSpec,
}

impl Kyma {
    /// JSON merge patch replacing `spec.modules` only
    ///
    /// Merge patches replace lists wholesale, so the patch carries the full
    /// declaration list. The resource version turns the patch into a
    /// conditional write.
    pub fn modules_patch(&self) -> Value {
        let mut patch = json!({
            "spec": {
                "modules": self.spec.modules,
            }
        });

        if let Some(resource_version) = &self.resource_version {
            patch["metadata"] = json!({ "resourceVersion": resource_version });
        }

        patch
    }
}

/// A published module version as offered to the cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleTemplate {
    pub name: String,
    pub namespace: String,
    pub module_name: String,
    pub version: String,
    /// Channel the template is assigned to, empty for release-meta driven modules
    pub channel: String,
}

/// Version assigned to a release channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelVersion {
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub version: String,
}

/// Channel to version assignments of one module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleReleaseMeta {
    pub name: String,
    pub namespace: String,
    pub module_name: String,
    pub channels: Vec<ChannelVersion>,
}

/// Deployment information relevant to module detection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentInfo {
    pub name: String,
    pub namespace: String,
    /// Container images in pod template order
    pub images: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use modhub_common::ModuleDeclaration;

    #[test]
    fn test_modules_patch_with_resource_version() {
        let kyma = Kyma {
            name: "default".to_string(),
            namespace: "kyma-system".to_string(),
            resource_version: Some("4711".to_string()),
            managed_fields: vec![],
            spec: KymaSpec {
                channel: "fast".to_string(),
                modules: vec![
                    ModuleDeclaration::new("istio", ""),
                    ModuleDeclaration::new("serverless", "regular"),
                ],
                ..Default::default()
            },
        };

        assert_eq!(
            kyma.modules_patch(),
            json!({
                "metadata": { "resourceVersion": "4711" },
                "spec": {
                    "modules": [
                        { "name": "istio" },
                        { "name": "serverless", "channel": "regular" }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_modules_patch_empty_list() {
        let kyma = Kyma::default();
        assert_eq!(kyma.modules_patch(), json!({ "spec": { "modules": [] } }));
    }

    #[test]
    fn test_default_kyma_ref() {
        let kyma = KymaRef::default();
        assert_eq!(kyma.name, "default");
        assert_eq!(kyma.namespace, "kyma-system");
    }
}
