//! Consolidation rule error types.
//!
//! Domain-specific errors for editing, loading, and compiling consolidation
//! rule sets. Validation findings are not errors in this sense; they are
//! collected into a [`ValidationResult`](crate::ValidationResult) instead.

use thiserror::Error;

use crate::validator::ValidationError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Consolidation rule errors.
///
/// These errors occur when an edit operation targets something that does
/// not exist, when a document cannot be (de)serialized, or when a caller
/// asks for a compiled plan from a rule set that failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsolidationError {
    #[error("Supplier rule not found in chain: {id}")]
    SupplierRuleNotFound { id: String },

    #[error("Position {index} is out of range for a chain of {len} supplier rule(s)")]
    PositionOutOfRange { index: usize, len: usize },

    #[error("Consolidation rule not found: {id}")]
    ConsolidationRuleNotFound { id: String },

    #[error("Invalid campaign pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to (de)serialize document: {reason}")]
    Serialization { reason: String },

    #[error("Rule set validation failed with {error_count} error(s)")]
    ValidationFailed {
        error_count: usize,
        errors: Vec<ValidationError>,
    },
}

/// Result type alias for consolidation rule operations.
pub type ConsolidationResult<T> = Result<T, ConsolidationError>;
