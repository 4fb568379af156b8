//! Compiled merge plans.
//!
//! A [`MergePlan`] is the ordered instruction list an external engine runs
//! against real event rows for one region. The plan only describes what to
//! do; it carries no rows and performs no merging itself.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::errors::{ConsolidationError, ConsolidationResult};
use crate::rules::{ExclusionFilterSet, FusionType, SupplierRuleId};

#[cfg(test)]
#[path = "merge_plan_tests.rs"]
mod tests;

/// What the engine does with one supplier's filtered rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepAction {
    /// Rows become the initial accumulated dataset.
    Seed,

    /// Append rows whose composite key is not yet accumulated.
    Union,

    /// Enrich keys already accumulated; rows with new keys are discarded.
    LeftJoin,

    /// Keep keys from both sides, backfilling missing fields on shared keys.
    FullOuterJoin,

    /// Recorded for audit only; the accumulator is left untouched.
    Inactive,
}

impl StepAction {
    /// The action for a supplier at the given 1-based priority.
    ///
    /// Priority 1 always seeds, whatever its fusion type says.
    pub fn for_priority(priority: usize, fusion_type: FusionType) -> Self {
        if priority == 1 {
            return Self::Seed;
        }
        match fusion_type {
            FusionType::None => Self::Inactive,
            FusionType::Union => Self::Union,
            FusionType::LeftJoin => Self::LeftJoin,
            FusionType::FullOuterJoin => Self::FullOuterJoin,
        }
    }

    /// Returns true if executing this step can change the accumulator.
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Inactive)
    }
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seed => write!(f, "Seed"),
            Self::Union => write!(f, "Union"),
            Self::LeftJoin => write!(f, "LeftJoin"),
            Self::FullOuterJoin => write!(f, "FullOuterJoin"),
            Self::Inactive => write!(f, "Inactive"),
        }
    }
}

/// How a merge resolves a field defined on both sides of a shared key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictPolicy {
    /// The already-accumulated (higher priority) value is kept; only null or
    /// missing fields are backfilled from the incoming supplier.
    #[default]
    AccumulatorWins,
}

/// One supplier's step in a merge plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionStep {
    /// 1-based position in the chain the step was compiled from.
    pub priority: usize,

    pub supplier_rule_id: SupplierRuleId,

    pub supplier_config_ref: String,

    pub action: StepAction,

    pub conflict_policy: ConflictPolicy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<String>,
}

/// The compiled plan for one advertiser region.
///
/// Exclusion filters apply to every supplier's rows before the supplier's
/// step is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePlan {
    pub advertiser_ref: String,

    pub rule_id: String,

    pub region: String,

    /// Copied from the rule set; the engine decides whether to skip inactive plans.
    pub active: bool,

    /// Version of the rule set document the plan was compiled from.
    pub version: u64,

    pub cross_platform_enabled: bool,

    pub web_to_cross_platform_enabled: bool,

    pub exclusion_filters: ExclusionFilterSet,

    /// Datasets to enrich the merged output with. Empty when enrichment is off.
    pub enrichment_dataset_refs: Vec<String>,

    pub steps: Vec<FusionStep>,
}

impl MergePlan {
    /// The seed step, if the chain was not empty.
    pub fn base(&self) -> Option<&FusionStep> {
        self.steps.first()
    }

    /// Steps that change the accumulator, in execution order.
    pub fn active_steps(&self) -> impl Iterator<Item = &FusionStep> {
        self.steps.iter().filter(|step| step.action.is_active())
    }

    /// Steps recorded for audit only.
    pub fn inactive_steps(&self) -> impl Iterator<Item = &FusionStep> {
        self.steps.iter().filter(|step| !step.action.is_active())
    }

    /// Serialize the plan for the execution engine.
    ///
    /// # Errors
    ///
    /// Returns `ConsolidationError::Serialization` if encoding fails.
    pub fn to_json_pretty(&self) -> ConsolidationResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConsolidationError::Serialization {
            reason: e.to_string(),
        })
    }

    /// SHA-256 of the plan's canonical JSON, hex encoded.
    ///
    /// Canonical JSON is compact with object keys in sorted order, so two
    /// plans compiled from the same validated rule set always share a
    /// fingerprint.
    ///
    /// # Errors
    ///
    /// Returns `ConsolidationError::Serialization` if encoding fails.
    pub fn fingerprint(&self) -> ConsolidationResult<String> {
        let bytes = canonical_json(self)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

// serde_json's default map is ordered by key, so the round trip through
// Value sorts every object.
fn canonical_json<T: Serialize>(value: &T) -> ConsolidationResult<Vec<u8>> {
    let value = serde_json::to_value(value).map_err(|e| ConsolidationError::Serialization {
        reason: e.to_string(),
    })?;
    serde_json::to_vec(&value).map_err(|e| ConsolidationError::Serialization {
        reason: e.to_string(),
    })
}
