//! Module list mutations
//!
//! `spec.modules` is stored as a list but treated as a set keyed by name.
//! Both operations return a new list and keep untouched entries in place.

use modhub_common::ModuleDeclaration;

/// Declare `name` with `channel`, an empty channel clears the override
///
/// An existing entry is updated where it stands, anything else is appended.
/// Later duplicates of `name` are dropped.
pub fn enable_module(
    modules: &[ModuleDeclaration],
    name: &str,
    channel: &str,
) -> Vec<ModuleDeclaration> {
    let mut result = Vec::with_capacity(modules.len() + 1);
    let mut found = false;

    for module in modules {
        if module.name != name {
            result.push(module.clone());
            continue;
        }
        if found {
            continue;
        }

        found = true;
        result.push(ModuleDeclaration {
            channel: channel.to_string(),
            ..module.clone()
        });
    }

    if !found {
        result.push(ModuleDeclaration::new(name, channel));
    }

    result
}

/// Remove `name` from the list, a no-op when it is not declared
///
/// Duplicates of `name` are removed as well, so the module is gone from the
/// list afterwards.
pub fn disable_module(modules: &[ModuleDeclaration], name: &str) -> Vec<ModuleDeclaration> {
    modules
        .iter()
        .filter(|module| module.name != name)
        .cloned()
        .collect()
}
