//! Consolidation rules for multi-supplier marketing data.
//!
//! An advertiser's [`ConsolidationRuleSet`] holds one [`ConsolidationRule`]
//! per region. Each rule carries an ordered [`SupplierRuleChain`] saying how
//! the raw events of several data suppliers fold into one dataset, plus an
//! [`ExclusionFilterSet`] applied to every supplier's rows.
//!
//! The flow is:
//! 1. an editor mutates a rule set in memory
//! 2. [`RuleSetValidator`] checks it against a [`ReferenceResolver`]
//! 3. the rule set is persisted elsewhere as a JSON document
//! 4. [`MergePlanCompiler`] turns the validated rule set into a
//!    [`MergePlan`] per region for an external engine to execute
//!
//! Everything in this crate is synchronous and free of I/O.

pub mod catalog;
pub mod errors;
pub mod merge_plan;
pub mod plan_compiler;
pub mod resolver;
pub mod rule_set_validator;
pub mod rules;
pub mod validator;

pub use catalog::{
    AdvertiserEntry, ConnectorType, EnrichmentDatasetEntry, ReferenceCatalog, RegionEntry,
    SupplierConfigEntry,
};
pub use errors::{ConsolidationError, ConsolidationResult};
pub use merge_plan::{ConflictPolicy, FusionStep, MergePlan, StepAction};
pub use plan_compiler::MergePlanCompiler;
pub use resolver::{PermissiveResolver, ReferenceResolver, ResolutionContext};
pub use rule_set_validator::{RuleSetValidator, ValidatedRuleSet};
pub use rules::{
    CandidateRow, ConsolidationRule, ConsolidationRuleSet, ExclusionCandidate,
    ExclusionFilterSet, ExclusionMatcher, FusionType, SupplierRule, SupplierRuleChain,
    SupplierRuleId, DEFAULT_REGION,
};
pub use validator::{ValidationError, ValidationErrorType, ValidationResult, ValidationWarning};
