//! Rule set validation.
//!
//! Checks a [`ConsolidationRuleSet`] before it is persisted or compiled:
//! - required fields (advertiser, region, supplier config)
//! - reference resolution through a [`ReferenceResolver`]
//! - duplicate ids, duplicate regions and duplicate suppliers per chain
//! - campaign exclusion patterns that do not compile
//! - enrichment toggle / dataset list consistency
//!
//! Every check reports field-scoped errors into one [`ValidationResult`];
//! nothing aborts early and the input is never mutated.
//!
//! # Examples
//!
//! ```rust
//! use consolidation_rules::{
//!     ConsolidationRuleSet, PermissiveResolver, RuleSetValidator, ValidationErrorType,
//! };
//!
//! let mut rule_set = ConsolidationRuleSet::new("planet_art_demo");
//! rule_set.enrichment_enabled = true;
//!
//! let validator = RuleSetValidator::new(&PermissiveResolver);
//! let result = validator.validate(&rule_set);
//!
//! assert!(result.has_error_type(ValidationErrorType::InconsistentEnrichmentConfig));
//! ```

use std::collections::{HashMap, HashSet};

use tracing::{info, instrument};

use crate::{
    errors::{ConsolidationError, ConsolidationResult},
    resolver::{ReferenceResolver, ResolutionContext},
    rules::{ConsolidationRule, ConsolidationRuleSet},
    validator::{ValidationError, ValidationErrorType, ValidationResult, ValidationWarning},
};

#[cfg(test)]
#[path = "rule_set_validator_tests.rs"]
mod tests;

/// Validates consolidation rule sets against a reference resolver.
pub struct RuleSetValidator<'a> {
    resolver: &'a dyn ReferenceResolver,
}

impl<'a> RuleSetValidator<'a> {
    /// Create a validator that resolves references through `resolver`.
    pub fn new(resolver: &'a dyn ReferenceResolver) -> Self {
        Self { resolver }
    }

    /// Validate the rule set, collecting every problem found.
    ///
    /// References are resolved in the context of the rule set's own
    /// advertiser. When the advertiser is missing, region resolution is
    /// skipped (regions are advertiser-scoped) but all other checks run.
    #[instrument(skip_all, fields(advertiser = %rule_set.advertiser_ref, rules = rule_set.rules.len()))]
    pub fn validate(&self, rule_set: &ConsolidationRuleSet) -> ValidationResult {
        let mut result = ValidationResult::new();
        let context = ResolutionContext::new(rule_set.advertiser_ref.trim());

        result.add_errors(self.validate_advertiser(rule_set));
        result.add_errors(self.validate_rule_ids(rule_set));
        result.add_errors(self.validate_regions(rule_set, &context));

        for (index, rule) in rule_set.rules.iter().enumerate() {
            let (errors, warnings) = self.validate_exclusion_filters(index, rule);
            result.add_errors(errors);
            result.add_warnings(warnings);

            let (errors, warnings) = self.validate_supplier_chain(index, rule, &context);
            result.add_errors(errors);
            result.add_warnings(warnings);
        }

        result.add_errors(self.validate_enrichment(rule_set, &context));

        info!(
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "Rule set validation finished"
        );
        result
    }

    /// Validate and, on success, return a normalized copy that can be compiled.
    ///
    /// # Errors
    ///
    /// Returns `ConsolidationError::ValidationFailed` carrying every
    /// validation error if the rule set is not valid.
    pub fn validate_for_compile(
        &self,
        rule_set: &ConsolidationRuleSet,
    ) -> ConsolidationResult<ValidatedRuleSet> {
        let result = self.validate(rule_set);
        if !result.is_valid() {
            return Err(ConsolidationError::ValidationFailed {
                error_count: result.errors.len(),
                errors: result.errors,
            });
        }

        let mut normalized = rule_set.clone();
        normalized.normalize();
        Ok(ValidatedRuleSet {
            rule_set: normalized,
            warnings: result.warnings,
        })
    }

    // ========================================================================
    // Rule set level
    // ========================================================================

    fn validate_advertiser(&self, rule_set: &ConsolidationRuleSet) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if rule_set.advertiser_ref.trim().is_empty() {
            errors.push(ValidationError {
                error_type: ValidationErrorType::MissingRequiredField,
                field_path: "advertiserRef".to_string(),
                message: "Advertiser reference is required".to_string(),
                suggestion: Some("Select the advertiser that owns this rule set".to_string()),
            });
        }

        errors
    }

    fn validate_rule_ids(&self, rule_set: &ConsolidationRuleSet) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for (index, rule) in rule_set.rules.iter().enumerate() {
            if rule.id.trim().is_empty() {
                errors.push(ValidationError {
                    error_type: ValidationErrorType::MissingRequiredField,
                    field_path: format!("rules[{}].id", index),
                    message: "Consolidation rule id is required".to_string(),
                    suggestion: None,
                });
            } else if !seen.insert(rule.id.as_str()) {
                errors.push(ValidationError {
                    error_type: ValidationErrorType::DuplicateRuleId,
                    field_path: format!("rules[{}].id", index),
                    message: format!("Consolidation rule id '{}' is used more than once", rule.id),
                    suggestion: Some("Give every consolidation rule a unique id".to_string()),
                });
            }
        }

        errors
    }

    fn validate_regions(
        &self,
        rule_set: &ConsolidationRuleSet,
        context: &ResolutionContext,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut first_rule_for_region: HashMap<&str, usize> = HashMap::new();
        let can_resolve = !context.advertiser().is_empty();

        for (index, rule) in rule_set.rules.iter().enumerate() {
            let field_path = format!("rules[{}].region", index);

            if !rule.has_region() {
                errors.push(ValidationError {
                    error_type: ValidationErrorType::MissingRequiredField,
                    field_path,
                    message: format!("Consolidation rule '{}' has no region", rule.id),
                    suggestion: Some("Select a region for the rule".to_string()),
                });
                continue;
            }

            let region = rule.region.trim();
            if can_resolve && !self.resolver.resolve_region(context, region) {
                errors.push(ValidationError {
                    error_type: ValidationErrorType::ReferenceNotFound,
                    field_path: field_path.clone(),
                    message: format!(
                        "Region '{}' is not a region of advertiser '{}'",
                        region,
                        context.advertiser()
                    ),
                    suggestion: Some("Pick one of the advertiser's configured regions".to_string()),
                });
            }

            if let Some(first) = first_rule_for_region.get(region) {
                errors.push(ValidationError {
                    error_type: ValidationErrorType::DuplicateRegionRule,
                    field_path,
                    message: format!(
                        "Region '{}' is already configured by rules[{}]",
                        region, first
                    ),
                    suggestion: Some(
                        "Merge the supplier chains into a single rule for the region".to_string(),
                    ),
                });
            } else {
                first_rule_for_region.insert(region, index);
            }
        }

        errors
    }

    fn validate_enrichment(
        &self,
        rule_set: &ConsolidationRuleSet,
        context: &ResolutionContext,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !rule_set.enrichment_enabled {
            if !rule_set.enrichment_dataset_refs.is_empty() {
                errors.push(ValidationError {
                    error_type: ValidationErrorType::InconsistentEnrichmentConfig,
                    field_path: "enrichmentDatasetRefs".to_string(),
                    message: "Enrichment datasets are selected but enrichment is disabled"
                        .to_string(),
                    suggestion: Some(
                        "Enable enrichment or clear the selected datasets".to_string(),
                    ),
                });
            }
            return errors;
        }

        if rule_set.enrichment_dataset_refs.is_empty() {
            errors.push(ValidationError {
                error_type: ValidationErrorType::InconsistentEnrichmentConfig,
                field_path: "enrichmentDatasetRefs".to_string(),
                message: "Enrichment is enabled but no enrichment dataset is selected".to_string(),
                suggestion: Some(
                    "Select at least one enrichment dataset or disable enrichment".to_string(),
                ),
            });
        }

        for dataset_ref in &rule_set.enrichment_dataset_refs {
            if !self.resolver.resolve_enrichment_dataset(context, dataset_ref) {
                errors.push(ValidationError {
                    error_type: ValidationErrorType::ReferenceNotFound,
                    field_path: format!("enrichmentDatasetRefs[{}]", dataset_ref),
                    message: format!("Enrichment dataset '{}' does not exist", dataset_ref),
                    suggestion: None,
                });
            }
        }

        errors
    }

    // ========================================================================
    // Consolidation rule level
    // ========================================================================

    fn validate_exclusion_filters(
        &self,
        index: usize,
        rule: &ConsolidationRule,
    ) -> (Vec<ValidationError>, Vec<ValidationWarning>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let field_path = format!("rules[{}].exclusionFilters", index);

        for (pattern, reason) in rule.exclusion_filters.invalid_patterns() {
            errors.push(ValidationError {
                error_type: ValidationErrorType::InvalidPattern,
                field_path: format!("{}.excludedCampaignRegexes", field_path),
                message: format!(
                    "Campaign pattern '{}' in rule '{}' does not compile: {}",
                    pattern, rule.id, reason
                ),
                suggestion: Some("Fix the regular expression or remove it".to_string()),
            });
        }

        if rule.exclusion_filters.needs_normalization() {
            warnings.push(ValidationWarning {
                field_path,
                message: "Exclusion filters contain blank or padded entries".to_string(),
                recommendation: Some(
                    "Blank entries are dropped and padding is trimmed when the rule is compiled"
                        .to_string(),
                ),
            });
        }

        (errors, warnings)
    }

    fn validate_supplier_chain(
        &self,
        index: usize,
        rule: &ConsolidationRule,
        context: &ResolutionContext,
    ) -> (Vec<ValidationError>, Vec<ValidationWarning>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let chain_path = format!("rules[{}].supplierChain", index);

        if rule.supplier_chain.is_empty() {
            warnings.push(ValidationWarning {
                field_path: chain_path,
                message: format!(
                    "Consolidation rule '{}' has no supplier rules and consolidates nothing",
                    rule.id
                ),
                recommendation: Some("Add at least one supplier rule".to_string()),
            });
            return (errors, warnings);
        }

        for id in rule.supplier_chain.duplicate_ids() {
            errors.push(ValidationError {
                error_type: ValidationErrorType::DuplicateRuleId,
                field_path: format!("{}.id", chain_path),
                message: format!("Supplier rule id '{}' is used more than once", id),
                suggestion: Some("Give every supplier rule a unique id".to_string()),
            });
        }

        let mut first_priority_for_supplier: HashMap<&str, usize> = HashMap::new();

        for (position, supplier) in rule.supplier_chain.iter().enumerate() {
            let priority = position + 1;
            let field_path = format!("{}[{}].supplierConfigRef", chain_path, position);
            let supplier_ref = supplier.supplier_config_ref.trim();

            if supplier.id.as_str().trim().is_empty() {
                errors.push(ValidationError {
                    error_type: ValidationErrorType::MissingRequiredField,
                    field_path: format!("{}[{}].id", chain_path, position),
                    message: "Supplier rule id is required".to_string(),
                    suggestion: None,
                });
            }

            if supplier_ref.is_empty() {
                errors.push(ValidationError {
                    error_type: ValidationErrorType::MissingRequiredField,
                    field_path,
                    message: format!("Supplier rule '{}' has no supplier config", supplier.id),
                    suggestion: Some("Select a data supplier config".to_string()),
                });
                continue;
            }

            if !self.resolver.resolve_supplier_config(context, supplier_ref) {
                errors.push(ValidationError {
                    error_type: ValidationErrorType::ReferenceNotFound,
                    field_path: field_path.clone(),
                    message: format!(
                        "Supplier config '{}' does not exist or has been deleted",
                        supplier_ref
                    ),
                    suggestion: Some(
                        "Select an existing supplier config or remove the rule".to_string(),
                    ),
                });
            }

            if let Some(first) = first_priority_for_supplier.get(supplier_ref) {
                errors.push(ValidationError {
                    error_type: ValidationErrorType::DuplicateSupplierInChain,
                    field_path,
                    message: format!(
                        "Supplier config '{}' appears at priority {} and {} in rule '{}'",
                        supplier_ref, first, priority, rule.id
                    ),
                    suggestion: Some(
                        "Each supplier config may appear only once per region".to_string(),
                    ),
                });
            } else {
                first_priority_for_supplier.insert(supplier_ref, priority);
            }

            if priority == 1 && supplier.fusion_type.is_merging() {
                warnings.push(ValidationWarning {
                    field_path: format!("{}[0].fusionType", chain_path),
                    message: format!(
                        "Fusion type {} at priority 1 is ignored; the first supplier seeds the dataset",
                        supplier.fusion_type
                    ),
                    recommendation: Some("Set the first supplier's fusion type to None".to_string()),
                });
            } else if priority > 1 && !supplier.fusion_type.is_merging() {
                warnings.push(ValidationWarning {
                    field_path: format!("{}[{}].fusionType", chain_path, position),
                    message: format!(
                        "Supplier '{}' at priority {} has fusion type None and will not be merged",
                        supplier_ref, priority
                    ),
                    recommendation: Some(
                        "Choose Union, LeftJoin or FullOuterJoin to merge this supplier".to_string(),
                    ),
                });
            }
        }

        (errors, warnings)
    }
}

/// A rule set that passed validation.
///
/// Only [`RuleSetValidator::validate_for_compile`] creates this type, so
/// holding one proves every compile precondition was checked. Its
/// exclusion filters are already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRuleSet {
    rule_set: ConsolidationRuleSet,
    warnings: Vec<ValidationWarning>,
}

impl ValidatedRuleSet {
    /// The validated, normalized rule set.
    pub fn rule_set(&self) -> &ConsolidationRuleSet {
        &self.rule_set
    }

    /// Warnings reported during validation.
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// Give up the validation guarantee and return the rule set.
    pub fn into_inner(self) -> ConsolidationRuleSet {
        self.rule_set
    }
}
