//! modhub core library
//!
//! Reconciles the community module catalog, the modules declared in the
//! Kyma resource and the modules running in the cluster, and edits the
//! Kyma module list.

pub mod config;
pub mod kubernetes;
pub mod modules;

pub use config::{ConfigError, ModhubConfig};
pub use modules::{ModuleError, ModuleManager, ModuleMap, SaveOutcome};
