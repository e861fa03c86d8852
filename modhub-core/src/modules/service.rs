//! Save-back of module declarations
//!
//! One get → mutate → update cycle against the Kyma resource. The update is
//! conditional on the resource version that was read; a stale write is
//! reported as [`SaveOutcome::Conflict`] and never retried here.

use modhub_common::ModuleDeclaration;

use super::error::ModuleError;
use super::mutator::{disable_module, enable_module};
use crate::kubernetes::KymaStore;

/// Result of a save-back cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The new module list was written
    Committed,
    /// The module list already had the requested shape, nothing was written
    Unchanged,
    /// The Kyma resource changed after it was read
    Conflict,
    /// There is no Kyma resource to write to
    KymaMissing,
}

impl std::fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Committed => write!(f, "committed"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::Conflict => write!(f, "conflict"),
            Self::KymaMissing => write!(f, "kyma missing"),
        }
    }
}

/// Apply `mutate` to the declared modules and write the result back
pub async fn save_modules<S, F>(store: &S, mutate: F) -> Result<SaveOutcome, ModuleError>
where
    S: KymaStore + ?Sized,
    F: FnOnce(&[ModuleDeclaration]) -> Vec<ModuleDeclaration>,
{
    let Some(mut kyma) = store.get_kyma().await.map_err(ModuleError::Read)? else {
        return Ok(SaveOutcome::KymaMissing);
    };

    let modules = mutate(&kyma.spec.modules);
    if modules == kyma.spec.modules {
        return Ok(SaveOutcome::Unchanged);
    }
    kyma.spec.modules = modules;

    match store.update_kyma_modules(&kyma).await {
        Ok(_) => {
            tracing::info!(kyma = %kyma.name, modules = kyma.spec.modules.len(), "Kyma modules updated");
            Ok(SaveOutcome::Committed)
        }
        Err(e) if e.is_conflict() => {
            tracing::warn!(kyma = %kyma.name, "Kyma changed since it was read: {}", e);
            Ok(SaveOutcome::Conflict)
        }
        Err(e) if e.is_not_found() => Ok(SaveOutcome::KymaMissing),
        Err(e) => Err(ModuleError::Write(e)),
    }
}

/// Declare a module in the Kyma resource
pub async fn enable<S: KymaStore + ?Sized>(
    store: &S,
    name: &str,
    channel: &str,
) -> Result<SaveOutcome, ModuleError> {
    save_modules(store, |modules| enable_module(modules, name, channel)).await
}

/// Remove a module declaration from the Kyma resource
pub async fn disable<S: KymaStore + ?Sized>(store: &S, name: &str) -> Result<SaveOutcome, ModuleError> {
    save_modules(store, |modules| disable_module(modules, name)).await
}
