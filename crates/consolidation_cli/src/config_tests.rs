use super::*;
use consolidation_rules::{ConnectorType, ReferenceResolver, ResolutionContext};
use std::fs;
use tempfile::TempDir;

const CONFIG_TOML: &str = r#"
[[advertisers]]
id = "planet_art_demo"

[[advertisers.regions]]
id = "US"
countries = ["us"]

[[supplier_configs]]
id = "appsflyer-1"
connector_type = "appsflyer"

[[supplier_configs]]
id = "gcs-old"
connector_type = "gcs"
deleted = true

[[enrichment_datasets]]
id = "s3_data_import"
name = "Cost And Attribution"
"#;

#[test]
fn test_app_config_default_is_empty() {
    let config = AppConfig::default();

    assert!(config.catalog.advertisers.is_empty());
    assert!(config.catalog.supplier_configs.is_empty());
}

#[test]
fn test_app_config_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("consolidation.toml");
    fs::write(&config_path, CONFIG_TOML).expect("Failed to write config");

    let config = AppConfig::load(&config_path).expect("Failed to load config");

    assert_eq!(config.catalog.advertisers.len(), 1);
    assert_eq!(
        config.catalog.supplier_configs[1].connector_type,
        ConnectorType::Gcs
    );

    let context = ResolutionContext::new("planet_art_demo");
    assert!(config.catalog.resolve_region(&context, "US"));
    assert!(config.catalog.resolve_supplier_config(&context, "appsflyer-1"));
    assert!(!config.catalog.resolve_supplier_config(&context, "gcs-old"));
}

#[test]
fn test_app_config_load_invalid_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("invalid_config.toml");

    fs::write(&config_path, "invalid = toml = syntax").expect("Failed to write invalid TOML");

    let result = AppConfig::load(&config_path);

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("Failed to parse configuration file"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_app_config_load_unknown_connector() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("consolidation.toml");
    fs::write(
        &config_path,
        "[[supplier_configs]]\nid = \"x\"\nconnector_type = \"fax\"\n",
    )
    .expect("Failed to write config");

    assert!(matches!(
        AppConfig::load(&config_path),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_app_config_load_nonexistent_file() {
    let nonexistent_path = PathBuf::from("nonexistent_consolidation.toml");
    let result = AppConfig::load(&nonexistent_path);

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("Configuration file not found"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_get_config_path_with_custom_path() {
    let custom_path = "/custom/path/consolidation.toml";
    let result = get_config_path(Some(custom_path));

    assert_eq!(result, PathBuf::from(custom_path));
}

#[test]
fn test_get_config_path_default() {
    let result = get_config_path(None);

    assert!(result.ends_with(DEFAULT_CONFIG_FILENAME));
}
