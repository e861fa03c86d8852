//! Reconciliation views
//!
//! Three independent views of the module state, each keyed by module name:
//! what the catalog offers, what the Kyma resource manages, and what is
//! installed. None of them touches the cluster state.

use modhub_common::{CatalogModule, CatalogVersion, ReconciledRow};
use std::collections::{BTreeMap, HashMap};

use super::installed::InstalledModule;
use super::version::latest_version;

/// Rows of one view keyed by module name
pub type ModuleMap = HashMap<String, ReconciledRow>;

/// Repository shown when neither the version nor the module names one
pub const UNKNOWN_REPOSITORY: &str = "Unknown";

/// Repository of a module version, falling back to the module's own
pub fn choose_repository(module: &CatalogModule, version: &CatalogVersion) -> String {
    if !version.repository.is_empty() {
        return version.repository.clone();
    }
    if !module.repository.is_empty() {
        return module.repository.clone();
    }
    UNKNOWN_REPOSITORY.to_string()
}

/// Catalog view: repository and latest version per module
pub fn catalog_view(modules: &[CatalogModule]) -> ModuleMap {
    let mut catalog = ModuleMap::new();

    for module in modules {
        let Some(latest) = latest_version(&module.versions) else {
            continue;
        };

        catalog.insert(
            module.name.clone(),
            ReconciledRow {
                name: module.name.clone(),
                repository: choose_repository(module, latest),
                latest_version: latest.version.clone(),
                ..Default::default()
            },
        );
    }

    catalog
}

/// Managed view: one row per declared module name
pub fn managed_view<I>(names: I) -> ModuleMap
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    names
        .into_iter()
        .map(|name| {
            let name = name.into();
            let row = ReconciledRow {
                managed: true,
                ..ReconciledRow::named(name.clone())
            };
            (name, row)
        })
        .collect()
}

/// Installed view: installed tag or an "outdated" note per module
pub fn installed_view(installed: Vec<InstalledModule>) -> ModuleMap {
    installed
        .into_iter()
        .map(|module| {
            let row = ReconciledRow {
                version: module.display_version(),
                ..ReconciledRow::named(module.name.clone())
            };
            (module.name, row)
        })
        .collect()
}

/// Join views by module name for display
///
/// Later views only fill fields that are still empty; the managed flag is
/// set if any view sets it. Rows come out sorted by name.
pub fn join_views(views: &[&ModuleMap]) -> Vec<ReconciledRow> {
    let mut joined: BTreeMap<String, ReconciledRow> = BTreeMap::new();

    for view in views {
        for (name, row) in view.iter() {
            let target = joined
                .entry(name.clone())
                .or_insert_with(|| ReconciledRow::named(name.clone()));

            fill(&mut target.repository, &row.repository);
            fill(&mut target.latest_version, &row.latest_version);
            fill(&mut target.version, &row.version);
            target.managed |= row.managed;
        }
    }

    joined.into_values().collect()
}

fn fill(target: &mut String, value: &str) {
    if target.is_empty() && !value.is_empty() {
        *target = value.to_string();
    }
}
