//! Tests for validation result types.

use super::*;

fn missing_region_error() -> ValidationError {
    ValidationError {
        error_type: ValidationErrorType::MissingRequiredField,
        field_path: "rules[0].region".to_string(),
        message: "Region is required".to_string(),
        suggestion: None,
    }
}

#[test]
fn test_new_result_is_valid() {
    let result = ValidationResult::new();

    assert!(result.is_valid());
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_warnings_do_not_invalidate() {
    let mut result = ValidationResult::new();
    result.add_warning(ValidationWarning {
        field_path: "rules[0].supplierChain".to_string(),
        message: "Supplier chain is empty".to_string(),
        recommendation: None,
    });

    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_add_errors_accumulates() {
    let mut result = ValidationResult::new();
    result.add_error(missing_region_error());
    result.add_errors(vec![missing_region_error(), missing_region_error()]);

    assert!(!result.is_valid());
    assert_eq!(result.errors.len(), 3);
    assert!(result.has_error_type(ValidationErrorType::MissingRequiredField));
    assert!(!result.has_error_type(ValidationErrorType::InvalidPattern));
}

#[test]
fn test_error_type_display() {
    assert_eq!(
        ValidationErrorType::DuplicateSupplierInChain.to_string(),
        "DuplicateSupplierInChain"
    );
    assert_eq!(
        ValidationErrorType::InconsistentEnrichmentConfig.to_string(),
        "InconsistentEnrichmentConfig"
    );
}

#[test]
fn test_error_serializes_camel_case() {
    let json = serde_json::to_value(missing_region_error()).expect("Failed to serialize");

    assert_eq!(json["errorType"], "MissingRequiredField");
    assert_eq!(json["fieldPath"], "rules[0].region");
}
