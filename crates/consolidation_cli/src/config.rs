//! Configuration management for the consolidation rules CLI.
//!
//! The configuration file is TOML and holds the reference catalog the
//! validator resolves regions, supplier configs and enrichment datasets
//! against. It is loaded from the path given with `--config`, or from
//! `consolidation.toml` in the current directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use consolidation_rules::ReferenceCatalog;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "consolidation.toml";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the CLI.
///
/// # Example TOML Configuration
///
/// ```toml
/// [[advertisers]]
/// id = "planet_art_demo"
///
/// [[advertisers.regions]]
/// id = "US"
/// countries = ["us"]
///
/// [[supplier_configs]]
/// id = "appsflyer-1"
/// connector_type = "appsflyer"
///
/// [[enrichment_datasets]]
/// id = "s3_data_import"
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Reference catalog used to resolve rule set references.
    #[serde(flatten)]
    pub catalog: ReferenceCatalog,
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist, cannot be read,
    /// or does not match the expected structure.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::path::Path;
    /// use consolidation_cli::config::AppConfig;
    ///
    /// let config_path = Path::new("./consolidation.toml");
    /// match AppConfig::load(&config_path) {
    ///     Ok(config) => println!("Loaded {} advertisers", config.catalog.advertisers.len()),
    ///     Err(e) => eprintln!("Failed to load config: {}", e),
    /// }
    /// ```
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))?;

        info!(
            advertisers = config.catalog.advertisers.len(),
            supplier_configs = config.catalog.supplier_configs.len(),
            enrichment_datasets = config.catalog.enrichment_datasets.len(),
            "Loaded reference catalog"
        );
        Ok(config)
    }
}

/// Resolves the path to the configuration file.
///
/// Uses `config_path` when given, otherwise `consolidation.toml` in the
/// current directory.
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}
