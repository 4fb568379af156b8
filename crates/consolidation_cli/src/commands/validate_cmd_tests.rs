//! Tests for the validate command.

use super::*;
use consolidation_rules::{
    ConsolidationRule, FusionType, ResolutionContext, SupplierRule, ValidationErrorType,
};
use std::fs;
use tempfile::TempDir;

// ============================================================================
// Mock ReferenceResolver for Testing
// ============================================================================

/// Resolves only the supplier configs it was given; regions and datasets always resolve.
struct MockResolver {
    supplier_configs: Vec<&'static str>,
}

impl ReferenceResolver for MockResolver {
    fn resolve_region(&self, _context: &ResolutionContext, _region_ref: &str) -> bool {
        true
    }

    fn resolve_supplier_config(&self, _context: &ResolutionContext, supplier_ref: &str) -> bool {
        self.supplier_configs.contains(&supplier_ref)
    }

    fn resolve_enrichment_dataset(&self, _context: &ResolutionContext, _dataset_ref: &str) -> bool {
        true
    }
}

fn resolver() -> MockResolver {
    MockResolver {
        supplier_configs: vec!["appsflyer-1", "s3-import"],
    }
}

fn create_rule_set(suppliers: &[&str]) -> ConsolidationRuleSet {
    let mut rule = ConsolidationRule::for_region("r1", "US");
    rule.supplier_chain = suppliers
        .iter()
        .enumerate()
        .map(|(i, s)| SupplierRule::with_id(format!("s{}", i).as_str(), *s, FusionType::Union))
        .collect();
    let mut rule_set = ConsolidationRuleSet::new("planet_art_demo");
    rule_set.rules.push(rule);
    rule_set
}

fn write_rule_set(dir: &TempDir, rule_set: &ConsolidationRuleSet) -> PathBuf {
    let path = dir.path().join("rules.json");
    fs::write(&path, rule_set.to_json_pretty().expect("serializes")).expect("writes");
    path
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_validate_rule_set_reports_unknown_supplier() {
    let rule_set = create_rule_set(&["appsflyer-1", "branch-9"]);

    let result = validate_rule_set(&rule_set, &resolver());

    assert!(result.has_error_type(ValidationErrorType::ReferenceNotFound));
}

#[test]
fn test_validate_rule_set_reports_duplicate_supplier() {
    let rule_set = create_rule_set(&["appsflyer-1", "appsflyer-1"]);

    let result = validate_rule_set(&rule_set, &resolver());

    assert!(result.has_error_type(ValidationErrorType::DuplicateSupplierInChain));
}

#[test]
fn test_format_json() {
    let rule_set = create_rule_set(&["appsflyer-1", "appsflyer-1"]);
    let result = validate_rule_set(&rule_set, &resolver());

    let output = format_validation_result(&rule_set, &result, "json").expect("formats");

    let json: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
    assert_eq!(json["errors"][0]["errorType"], "DuplicateSupplierInChain");
    assert_eq!(
        json["errors"][0]["fieldPath"],
        "rules[0].supplierChain[1].supplierConfigRef"
    );
}

#[test]
fn test_format_pretty_lists_errors_and_warnings() {
    let rule_set = create_rule_set(&["appsflyer-1", "missing"]);
    let result = validate_rule_set(&rule_set, &resolver());

    let output = format_validation_result(&rule_set, &result, "pretty").expect("formats");

    assert!(output.contains("planet_art_demo"));
    assert!(output.contains("Rule set validation FAILED"));
    assert!(output.contains("rules[0].supplierChain[1].supplierConfigRef"));
    assert!(output.contains("rules[0].supplierChain[0].fusionType"));
}

#[test]
fn test_format_pretty_valid() {
    let rule_set = create_rule_set(&["appsflyer-1"]);
    let mut result = validate_rule_set(&rule_set, &resolver());
    result.warnings.clear();

    let output = format_validation_result(&rule_set, &result, "pretty").expect("formats");

    assert!(output.contains("Rule set is VALID"));
}

#[test]
fn test_format_rejects_unknown_format() {
    let rule_set = create_rule_set(&[]);
    let result = validate_rule_set(&rule_set, &resolver());

    let output = format_validation_result(&rule_set, &result, "yaml");

    assert!(matches!(output, Err(Error::InvalidArguments(_))));
}

#[test]
fn test_execute_fails_on_invalid_rule_set() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = write_rule_set(&dir, &create_rule_set(&["appsflyer-1", "appsflyer-1"]));
    let args = ValidateArgs {
        file: path,
        format: "pretty".to_string(),
    };

    let result = execute(&args, &resolver());

    assert!(matches!(result, Err(Error::Validation { error_count: 1 })));
}

#[test]
fn test_execute_succeeds_on_valid_rule_set() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = write_rule_set(&dir, &create_rule_set(&["appsflyer-1", "s3-import"]));
    let args = ValidateArgs {
        file: path,
        format: "json".to_string(),
    };

    assert!(execute(&args, &resolver()).is_ok());
}
