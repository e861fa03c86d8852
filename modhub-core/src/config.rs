//! Configuration management for modhub
//!
//! Settings are layered, later sources win:
//! 1. Default values
//! 2. Configuration file (TOML format)
//! 3. Environment variables
//!
//! Command-line flags are applied on top by the CLI.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::modules::DEFAULT_CATALOG_URL;

/// Main configuration struct for modhub
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModhubConfig {
    /// Community module catalog
    pub catalog: CatalogConfig,
    /// Cluster access and Kyma resource location
    pub cluster: ClusterConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Catalog configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// URL of the catalog document
    pub url: String,
    /// HTTP timeout in seconds, 0 disables it
    pub timeout_secs: u64,
}

/// Cluster configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Kubeconfig file, the kube-rs inference chain is used when unset
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context to use instead of the current one
    pub context: Option<String>,
    /// Name of the Kyma resource
    pub kyma_name: String,
    /// Namespace of the Kyma resource
    pub kyma_namespace: String,
    /// Namespace the module manager deployments run in
    pub modules_namespace: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Directory for a daily rolling log file
    pub file_path: Option<PathBuf>,
    /// Use JSON formatting on the console
    pub json_format: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            context: None,
            kyma_name: "default".to_string(),
            kyma_namespace: "kyma-system".to_string(),
            modules_namespace: "kyma-system".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file_path: None,
            json_format: false,
        }
    }
}

impl ModhubConfig {
    /// Load configuration from the standard file locations and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// Like [`ModhubConfig::load`], reading `path` instead of searching
    pub fn load_with(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).or_else(Self::find_config_file);

        let mut config = match path {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        // Override with environment variables
        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_path_buf(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            // Environment variable override
            std::env::var("MODHUB_CONFIG").ok().map(PathBuf::from),
            // Standard locations
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".config/modhub/config.toml")),
            Some(PathBuf::from("./modhub.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Catalog
        if let Some(url) = var("MODHUB_CATALOG_URL") {
            self.catalog.url = url;
        }
        if let Some(timeout) = var("MODHUB_CATALOG_TIMEOUT") {
            if let Ok(timeout) = timeout.parse() {
                self.catalog.timeout_secs = timeout;
            }
        }

        // Cluster
        if let Some(path) = var("MODHUB_KUBECONFIG") {
            self.cluster.kubeconfig = Some(PathBuf::from(path));
        }
        if let Some(context) = var("MODHUB_CONTEXT") {
            self.cluster.context = Some(context);
        }
        if let Some(name) = var("MODHUB_KYMA_NAME") {
            self.cluster.kyma_name = name;
        }
        if let Some(namespace) = var("MODHUB_KYMA_NAMESPACE") {
            self.cluster.kyma_namespace = namespace;
        }
        if let Some(namespace) = var("MODHUB_MODULES_NAMESPACE") {
            self.cluster.modules_namespace = namespace;
        }

        // Logging
        if let Some(level) = var("MODHUB_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(path) = var("MODHUB_LOG_DIR") {
            self.logging.file_path = Some(PathBuf::from(path));
        }
        if let Some(json) = var("MODHUB_LOG_JSON") {
            self.logging.json_format = json.parse().unwrap_or(false);
        }
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.catalog.url).map_err(|e| {
            ConfigError::Validation(format!("Invalid catalog URL '{}': {}", self.catalog.url, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Catalog URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        let required = [
            ("kyma_name", &self.cluster.kyma_name),
            ("kyma_namespace", &self.cluster.kyma_namespace),
            ("modules_namespace", &self.cluster.modules_namespace),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
            }
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file {0:?}: {1}")]
    FileRead(PathBuf, String),
    /// Failed to parse configuration
    #[error("Failed to parse config: {0}")]
    Parse(String),
    /// Configuration validation failed
    #[error("Config validation failed: {0}")]
    Validation(String),
}
