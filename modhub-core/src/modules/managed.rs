//! Managed module detection
//!
//! Recovers the module names declared in the Kyma resource from its
//! server-side-apply field ownership (`metadata.managedFields`) instead of
//! the decoded spec. Each owned list item under `spec.modules` is keyed as
//! `k:{"name":"<module>"}` in the ownership tree.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use super::error::{ExtractError, ModuleError};
use crate::kubernetes::{FieldManagerRecord, KymaStore};

/// Ownership tree key of the Kyma spec
pub const SPEC_FIELD: &str = "f:spec";
/// Ownership tree key of the module list inside the spec
pub const MODULES_FIELD: &str = "f:modules";

/// Turns an ownership key of a `spec.modules` item into a module name
pub trait ModuleKeyDecoder {
    /// `None` for keys that do not identify a module
    fn module_name(&self, key: &str) -> Option<String>;
}

/// Decoder for the `k:{"name":"<module>"}` key convention
#[derive(Debug, Default, Clone, Copy)]
pub struct NameKeyDecoder;

const NAME_KEY_PREFIX: &str = r#"k:{"name":""#;

impl ModuleKeyDecoder for NameKeyDecoder {
    fn module_name(&self, key: &str) -> Option<String> {
        let name = key
            .strip_prefix(NAME_KEY_PREFIX)?
            .trim_end_matches(['"', '}']);

        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

/// Extracts managed module names from field ownership records
#[derive(Debug, Default, Clone)]
pub struct ManagedExtractor<D = NameKeyDecoder> {
    decoder: D,
}

impl ManagedExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: ModuleKeyDecoder> ManagedExtractor<D> {
    pub fn with_decoder(decoder: D) -> Self {
        Self { decoder }
    }

    /// Union of module names owned by any field manager
    ///
    /// Records without `f:spec` / `f:modules` are skipped. Only an ownership
    /// tree that is not a JSON object is an error.
    pub fn extract(&self, records: &[FieldManagerRecord]) -> Result<BTreeSet<String>, ExtractError> {
        let mut names = BTreeSet::new();

        for record in records {
            let Some(tree) = decode_tree(record)? else {
                continue;
            };

            let modules = tree
                .get(SPEC_FIELD)
                .and_then(Value::as_object)
                .and_then(|spec| spec.get(MODULES_FIELD))
                .and_then(Value::as_object);

            let Some(modules) = modules else {
                continue;
            };

            names.extend(modules.keys().filter_map(|key| self.decoder.module_name(key)));
        }

        Ok(names)
    }
}

/// Ownership tree of a record, decoding it first if it arrived serialized
fn decode_tree(record: &FieldManagerRecord) -> Result<Option<Map<String, Value>>, ExtractError> {
    let decode_error = |reason: String| ExtractError::Decode {
        manager: record.manager.clone(),
        reason,
    };

    match &record.fields {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(tree)) => Ok(Some(tree.clone())),
        Some(Value::String(raw)) => serde_json::from_str::<Option<Map<String, Value>>>(raw)
            .map_err(|e| decode_error(e.to_string())),
        Some(other) => Err(decode_error(format!(
            "expected an object, found {}",
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Shorthand for [`ManagedExtractor::extract`] with the default decoder
pub fn extract_managed_names(records: &[FieldManagerRecord]) -> Result<BTreeSet<String>, ExtractError> {
    ManagedExtractor::new().extract(records)
}

/// Read the Kyma field ownership and extract its managed module names
///
/// Only metadata is consulted, so a spec the typed model cannot decode does
/// not hide the declarations. A missing Kyma resource yields an empty set.
pub async fn managed_names<S: KymaStore + ?Sized>(store: &S) -> Result<BTreeSet<String>, ModuleError> {
    let records = store
        .get_kyma_managed_fields()
        .await
        .map_err(ModuleError::Read)?;

    let Some(records) = records else {
        tracing::debug!("Kyma resource not found, no managed modules");
        return Ok(BTreeSet::new());
    };

    Ok(extract_managed_names(&records)?)
}
