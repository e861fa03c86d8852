//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use modhub_common::{CatalogModule, CatalogVersion, KymaSpec, ModuleDeclaration};
use modhub_core::kubernetes::{
    DeploymentInfo, FieldManagerRecord, K8sError, K8sResult, Kyma, KymaStore, WorkloadLookup,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const NAMESPACE: &str = "kyma-system";

/// Catalog version whose manager deployment is `manager`
pub fn catalog_version(version: &str, manager: &str) -> CatalogVersion {
    CatalogVersion {
        version: version.to_string(),
        repository: String::new(),
        manager_path: format!("/apis/apps/v1/namespaces/kyma-system/deployments/{}", manager),
    }
}

pub fn catalog_module(name: &str, versions: Vec<CatalogVersion>) -> CatalogModule {
    CatalogModule {
        name: name.to_string(),
        repository: format!("https://github.com/kyma-project/{}", name),
        versions,
    }
}

/// Ownership record declaring `modules` the way the API server serializes it
pub fn managed_record(manager: &str, modules: &[&str]) -> FieldManagerRecord {
    let items: Map<String, Value> = modules
        .iter()
        .map(|name| {
            (
                format!(r#"k:{{"name":"{}"}}"#, name),
                json!({ ".": {}, "f:name": {} }),
            )
        })
        .collect();

    FieldManagerRecord {
        manager: manager.to_string(),
        operation: "Apply".to_string(),
        fields: Some(json!({
            "f:spec": {
                "f:channel": {},
                "f:modules": items,
            }
        })),
    }
}

pub fn kyma(modules: Vec<ModuleDeclaration>, managed_fields: Vec<FieldManagerRecord>) -> Kyma {
    Kyma {
        name: "default".to_string(),
        namespace: NAMESPACE.to_string(),
        resource_version: Some("1".to_string()),
        managed_fields,
        spec: KymaSpec {
            channel: "regular".to_string(),
            modules,
            ..Default::default()
        },
    }
}

/// In-memory deployments keyed by namespace and name
#[derive(Default)]
pub struct FakeWorkloads {
    deployments: HashMap<(String, String), DeploymentInfo>,
    failing: HashMap<String, String>,
    lookups: Mutex<Vec<String>>,
}

impl FakeWorkloads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deployment(mut self, name: &str, images: &[&str]) -> Self {
        let info = DeploymentInfo {
            name: name.to_string(),
            namespace: NAMESPACE.to_string(),
            images: images.iter().map(|i| i.to_string()).collect(),
        };
        self.deployments
            .insert((NAMESPACE.to_string(), name.to_string()), info);
        self
    }

    /// Lookups of `name` fail with an internal error
    pub fn with_failure(mut self, name: &str, reason: &str) -> Self {
        self.failing.insert(name.to_string(), reason.to_string());
        self
    }

    /// Deployment names looked up so far, in call order
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkloadLookup for FakeWorkloads {
    async fn get_deployment(&self, namespace: &str, name: &str) -> K8sResult<Option<DeploymentInfo>> {
        self.lookups.lock().unwrap().push(name.to_string());

        if let Some(reason) = self.failing.get(name) {
            return Err(K8sError::Internal(reason.clone()));
        }

        Ok(self
            .deployments
            .get(&(namespace.to_string(), name.to_string()))
            .cloned())
    }
}

/// In-memory Kyma resource with resource version checks
#[derive(Default)]
pub struct FakeKymaStore {
    kyma: Mutex<Option<Kyma>>,
    /// Another writer bumps the resource version right after each read
    interfere: bool,
    /// Typed reads fail as if the spec could not be decoded
    undecodable_spec: bool,
    /// Reads fail with an internal error
    read_failure: Option<String>,
    /// Writes fail with an internal error
    write_failure: Option<String>,
    writes: AtomicUsize,
}

impl FakeKymaStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(kyma: Kyma) -> Self {
        Self {
            kyma: Mutex::new(Some(kyma)),
            ..Default::default()
        }
    }

    pub fn with_concurrent_writer(mut self) -> Self {
        self.interfere = true;
        self
    }

    pub fn with_undecodable_spec(mut self) -> Self {
        self.undecodable_spec = true;
        self
    }

    pub fn with_read_failure(mut self, reason: &str) -> Self {
        self.read_failure = Some(reason.to_string());
        self
    }

    pub fn with_write_failure(mut self, reason: &str) -> Self {
        self.write_failure = Some(reason.to_string());
        self
    }

    /// Current stored resource
    pub fn stored(&self) -> Option<Kyma> {
        self.kyma.lock().unwrap().clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

fn bump(resource_version: &Option<String>) -> Option<String> {
    let current = resource_version
        .as_deref()
        .and_then(|rv| rv.parse::<u64>().ok())
        .unwrap_or(0);
    Some((current + 1).to_string())
}

#[async_trait]
impl KymaStore for FakeKymaStore {
    async fn get_kyma(&self) -> K8sResult<Option<Kyma>> {
        if let Some(reason) = &self.read_failure {
            return Err(K8sError::Internal(reason.clone()));
        }

        let mut stored = self.kyma.lock().unwrap();
        if self.undecodable_spec {
            if let Some(kyma) = stored.as_ref() {
                return Err(K8sError::InvalidResource {
                    kind: "Kyma".to_string(),
                    name: kyma.name.clone(),
                    reason: "invalid type: null, expected a string".to_string(),
                });
            }
        }
        let read = stored.clone();

        if self.interfere {
            if let Some(kyma) = stored.as_mut() {
                kyma.resource_version = bump(&kyma.resource_version);
            }
        }

        Ok(read)
    }

    async fn get_kyma_managed_fields(&self) -> K8sResult<Option<Vec<FieldManagerRecord>>> {
        if let Some(reason) = &self.read_failure {
            return Err(K8sError::Internal(reason.clone()));
        }

        Ok(self
            .kyma
            .lock()
            .unwrap()
            .as_ref()
            .map(|kyma| kyma.managed_fields.clone()))
    }

    async fn update_kyma_modules(&self, kyma: &Kyma) -> K8sResult<Kyma> {
        if let Some(reason) = &self.write_failure {
            return Err(K8sError::Internal(reason.clone()));
        }

        let mut stored = self.kyma.lock().unwrap();
        let Some(current) = stored.as_mut() else {
            return Err(K8sError::ResourceNotFound {
                kind: "Kyma".to_string(),
                name: kyma.name.clone(),
                namespace: kyma.namespace.clone(),
            });
        };

        if kyma.resource_version.is_some() && kyma.resource_version != current.resource_version {
            return Err(K8sError::Conflict(format!(
                "the object has been modified; resource version {:?} is stale",
                kyma.resource_version
            )));
        }

        current.spec.modules = kyma.spec.modules.clone();
        current.resource_version = bump(&current.resource_version);
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(current.clone())
    }
}
