//! Kyma custom resource access
//!
//! The Kyma CRD is not part of k8s-openapi, so the resource is handled as a
//! `DynamicObject` and converted to the simplified [`Kyma`] type.

use async_trait::async_trait;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ManagedFieldsEntry;
use kube::api::{Api, ApiResource, DynamicObject, GroupVersionKind, Patch, PatchParams};
use modhub_common::KymaSpec;

use super::client::K8sClient;
use super::error::{K8sError, K8sResult};
use super::types::{FieldManagerRecord, Kyma, KYMA_GROUP, KYMA_KIND, KYMA_PLURAL, KYMA_VERSION};
use super::KymaStore;

fn kyma_api(client: &K8sClient) -> Api<DynamicObject> {
    let gvk = GroupVersionKind::gvk(KYMA_GROUP, KYMA_VERSION, KYMA_KIND);
    let resource = ApiResource::from_gvk_with_plural(&gvk, KYMA_PLURAL);

    Api::namespaced_with(client.inner().clone(), &client.kyma().namespace, &resource)
}

#[async_trait]
impl KymaStore for K8sClient {
    async fn get_kyma(&self) -> K8sResult<Option<Kyma>> {
        let object = kyma_api(self).get_opt(&self.kyma().name).await?;

        object.map(object_to_kyma).transpose()
    }

    async fn get_kyma_managed_fields(&self) -> K8sResult<Option<Vec<FieldManagerRecord>>> {
        let object = kyma_api(self).get_opt(&self.kyma().name).await?;

        Ok(object.map(|object| managed_fields(object.metadata.managed_fields)))
    }

    async fn update_kyma_modules(&self, kyma: &Kyma) -> K8sResult<Kyma> {
        let patch = kyma.modules_patch();

        let result = kyma_api(self)
            .patch(&kyma.name, &PatchParams::default(), &Patch::Merge(&patch))
            .await;

        match result {
            Ok(object) => {
                tracing::debug!(
                    name = %kyma.name,
                    resource_version = ?object.metadata.resource_version,
                    "Kyma modules updated"
                );
                object_to_kyma(object)
            }
            Err(kube::Error::Api(response)) if response.code == 404 => {
                Err(K8sError::ResourceNotFound {
                    kind: KYMA_KIND.to_string(),
                    name: kyma.name.clone(),
                    namespace: kyma.namespace.clone(),
                })
            }
            Err(kube::Error::Api(response)) if response.code == 409 => {
                Err(K8sError::Conflict(response.message))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn managed_fields(entries: Option<Vec<ManagedFieldsEntry>>) -> Vec<FieldManagerRecord> {
    entries
        .unwrap_or_default()
        .into_iter()
        .map(|entry| FieldManagerRecord {
            manager: entry.manager.unwrap_or_default(),
            operation: entry.operation.unwrap_or_default(),
            fields: entry.fields_v1.map(|fields| fields.0),
        })
        .collect()
}

/// Convert a dynamic Kyma object to the simplified type
fn object_to_kyma(object: DynamicObject) -> K8sResult<Kyma> {
    let metadata = object.metadata;
    let name = metadata.name.unwrap_or_default();
    let managed_fields = managed_fields(metadata.managed_fields);

    let spec = match object.data.get("spec") {
        Some(spec) => serde_json::from_value::<KymaSpec>(spec.clone()).map_err(|e| {
            K8sError::InvalidResource {
                kind: KYMA_KIND.to_string(),
                name: name.clone(),
                reason: e.to_string(),
            }
        })?,
        None => KymaSpec::default(),
    };

    Ok(Kyma {
        name,
        namespace: metadata.namespace.unwrap_or_default(),
        resource_version: metadata.resource_version,
        managed_fields,
        spec,
    })
}
