//! Consolidation rule data model.
//!
//! Pure value types: they carry no I/O and no hidden state, and they
//! serialize to the JSON document shape shared with the editing surface.

pub mod consolidation_rule;
pub mod exclusion_filter;
pub mod rule_set;
pub mod supplier_chain;
pub mod supplier_rule;

pub use consolidation_rule::{ConsolidationRule, DEFAULT_REGION};
pub use exclusion_filter::{CandidateRow, ExclusionCandidate, ExclusionFilterSet, ExclusionMatcher};
pub use rule_set::ConsolidationRuleSet;
pub use supplier_chain::SupplierRuleChain;
pub use supplier_rule::{FusionType, SupplierRule, SupplierRuleId};
