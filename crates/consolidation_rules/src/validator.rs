//! Validation result types.
//!
//! Validation never aborts on the first problem. Every check contributes
//! field-scoped errors and warnings to one [`ValidationResult`] so the
//! editing surface can show all problems at once.
//!
//! # Examples
//!
//! ```rust
//! use consolidation_rules::{ValidationError, ValidationErrorType, ValidationResult};
//!
//! let mut result = ValidationResult::new();
//!
//! result.add_error(ValidationError {
//!     error_type: ValidationErrorType::MissingRequiredField,
//!     field_path: "rules[0].region".to_string(),
//!     message: "Region is required".to_string(),
//!     suggestion: Some("Select a region for the rule".to_string()),
//! });
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.errors.len(), 1);
//! ```

use serde::Serialize;

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

/// Result of rule set validation.
///
/// Validation is considered successful only if no errors are present.
/// Warnings never block persistence or compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Blocking problems.
    pub errors: Vec<ValidationError>,
    /// Non-blocking observations.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Create a new empty validation result.
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add a validation error.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a validation warning.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Add multiple errors at once.
    pub fn add_errors(&mut self, errors: Vec<ValidationError>) {
        self.errors.extend(errors);
    }

    /// Add multiple warnings at once.
    pub fn add_warnings(&mut self, warnings: Vec<ValidationWarning>) {
        self.warnings.extend(warnings);
    }

    /// Returns true if any error has the given type.
    pub fn has_error_type(&self, error_type: ValidationErrorType) -> bool {
        self.errors.iter().any(|e| e.error_type == error_type)
    }
}

/// Individual validation error with context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// The category of validation error.
    pub error_type: ValidationErrorType,
    /// Path to the offending field, e.g. `rules[1].supplierChain[0].supplierConfigRef`.
    pub field_path: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    pub suggestion: Option<String>,
}

/// Validation error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValidationErrorType {
    /// A region, supplier config, or enrichment dataset id does not resolve.
    ReferenceNotFound,
    /// A campaign exclusion pattern does not compile.
    InvalidPattern,
    /// Two supplier rules in one chain use the same supplier config.
    DuplicateSupplierInChain,
    /// A required field is empty.
    MissingRequiredField,
    /// Enrichment toggle and dataset list disagree.
    InconsistentEnrichmentConfig,
    /// Two consolidation rules target the same region.
    DuplicateRegionRule,
    /// Two rules share an id within the same parent.
    DuplicateRuleId,
}

impl std::fmt::Display for ValidationErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReferenceNotFound => write!(f, "ReferenceNotFound"),
            Self::InvalidPattern => write!(f, "InvalidPattern"),
            Self::DuplicateSupplierInChain => write!(f, "DuplicateSupplierInChain"),
            Self::MissingRequiredField => write!(f, "MissingRequiredField"),
            Self::InconsistentEnrichmentConfig => write!(f, "InconsistentEnrichmentConfig"),
            Self::DuplicateRegionRule => write!(f, "DuplicateRegionRule"),
            Self::DuplicateRuleId => write!(f, "DuplicateRuleId"),
        }
    }
}

/// Non-blocking validation warning.
///
/// Warnings flag configuration that is legal but probably not what the
/// editor intended, such as a fusion type that will be ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    /// Path to the field that triggered the warning.
    pub field_path: String,
    /// Human-readable warning message.
    pub message: String,
    /// Optional recommendation.
    pub recommendation: Option<String>,
}
