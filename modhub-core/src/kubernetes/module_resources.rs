//! Module template and release metadata listing
//!
//! Both kinds belong to the Kyma operator group and are read as
//! `DynamicObject`s across all namespaces.

use async_trait::async_trait;
use kube::api::{Api, ApiResource, DynamicObject, GroupVersionKind, ListParams};
use serde::Deserialize;

use super::client::K8sClient;
use super::error::{K8sError, K8sResult};
use super::types::{
    ChannelVersion, ModuleReleaseMeta, ModuleTemplate, KYMA_GROUP, KYMA_VERSION,
    MODULE_RELEASE_META_KIND, MODULE_RELEASE_META_PLURAL, MODULE_TEMPLATE_KIND,
    MODULE_TEMPLATE_PLURAL,
};
use super::ModuleResourceLister;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateSpec {
    module_name: Option<String>,
    version: Option<String>,
    channel: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseMetaSpec {
    module_name: Option<String>,
    channels: Option<Vec<ChannelVersion>>,
}

async fn list_objects(client: &K8sClient, kind: &str, plural: &str) -> K8sResult<Vec<DynamicObject>> {
    let gvk = GroupVersionKind::gvk(KYMA_GROUP, KYMA_VERSION, kind);
    let resource = ApiResource::from_gvk_with_plural(&gvk, plural);
    let api: Api<DynamicObject> = Api::all_with(client.inner().clone(), &resource);

    let list = api.list(&ListParams::default()).await?;
    tracing::debug!(kind, count = list.items.len(), "Listed resources");

    Ok(list.items)
}

/// Decode `spec` of a dynamic object, an absent spec decodes as default
fn decode_spec<T>(object: &DynamicObject, kind: &str) -> K8sResult<T>
where
    T: Default + for<'de> Deserialize<'de>,
{
    match object.data.get("spec") {
        Some(spec) => serde_json::from_value(spec.clone()).map_err(|e| K8sError::InvalidResource {
            kind: kind.to_string(),
            name: object.metadata.name.clone().unwrap_or_default(),
            reason: e.to_string(),
        }),
        None => Ok(T::default()),
    }
}

fn object_to_template(object: DynamicObject) -> K8sResult<ModuleTemplate> {
    let spec: TemplateSpec = decode_spec(&object, MODULE_TEMPLATE_KIND)?;

    Ok(ModuleTemplate {
        name: object.metadata.name.unwrap_or_default(),
        namespace: object.metadata.namespace.unwrap_or_default(),
        module_name: spec.module_name.unwrap_or_default(),
        version: spec.version.unwrap_or_default(),
        channel: spec.channel.unwrap_or_default(),
    })
}

fn object_to_release_meta(object: DynamicObject) -> K8sResult<ModuleReleaseMeta> {
    let spec: ReleaseMetaSpec = decode_spec(&object, MODULE_RELEASE_META_KIND)?;

    Ok(ModuleReleaseMeta {
        name: object.metadata.name.unwrap_or_default(),
        namespace: object.metadata.namespace.unwrap_or_default(),
        module_name: spec.module_name.unwrap_or_default(),
        channels: spec.channels.unwrap_or_default(),
    })
}

#[async_trait]
impl ModuleResourceLister for K8sClient {
    async fn list_module_templates(&self) -> K8sResult<Vec<ModuleTemplate>> {
        list_objects(self, MODULE_TEMPLATE_KIND, MODULE_TEMPLATE_PLURAL)
            .await?
            .into_iter()
            .map(object_to_template)
            .collect()
    }

    async fn list_module_release_metas(&self) -> K8sResult<Vec<ModuleReleaseMeta>> {
        list_objects(self, MODULE_RELEASE_META_KIND, MODULE_RELEASE_META_PLURAL)
            .await?
            .into_iter()
            .map(object_to_release_meta)
            .collect()
    }
}
