//! Merge plan compiler.
//!
//! Turns a validated rule set into per-region [`MergePlan`]s. Compilation is
//! a pure function of its input: no I/O, no clock, no randomness, so the
//! same validated rule set always compiles to byte-identical plans and an
//! external job can retry safely.
//!
//! # Fusion semantics
//!
//! For a chain in priority order 1..N:
//! 1. The priority-1 supplier seeds the accumulated dataset. Its own fusion
//!    type is ignored.
//! 2. Every later supplier is merged according to its fusion type
//!    (`Union`, `LeftJoin`, `FullOuterJoin`), always with the accumulated
//!    side winning on conflicts.
//! 3. A later supplier with fusion type `None` is still emitted, as an
//!    inactive step, so configured but unwired sources stay visible.
//!
//! # Examples
//!
//! ```rust
//! use consolidation_rules::{
//!     ConsolidationRule, ConsolidationRuleSet, FusionType, MergePlanCompiler,
//!     PermissiveResolver, RuleSetValidator, StepAction, SupplierRule,
//! };
//!
//! let mut rule = ConsolidationRule::for_region("r1", "US");
//! rule.supplier_chain = vec![
//!     SupplierRule::with_id("s1", "af", FusionType::None),
//!     SupplierRule::with_id("s2", "s3", FusionType::Union),
//! ]
//! .into();
//! let mut rule_set = ConsolidationRuleSet::new("planet_art_demo");
//! rule_set.add_rule(rule);
//!
//! let validated = RuleSetValidator::new(&PermissiveResolver).validate_for_compile(&rule_set)?;
//! let plan = MergePlanCompiler::new().compile(&validated, "US").expect("US rule exists");
//!
//! assert_eq!(plan.steps[0].action, StepAction::Seed);
//! assert_eq!(plan.steps[1].action, StepAction::Union);
//! # Ok::<(), consolidation_rules::ConsolidationError>(())
//! ```

use tracing::{debug, info, instrument};

use crate::{
    merge_plan::{ConflictPolicy, FusionStep, MergePlan, StepAction},
    rule_set_validator::ValidatedRuleSet,
    rules::{ConsolidationRule, ConsolidationRuleSet},
};

#[cfg(test)]
#[path = "plan_compiler_tests.rs"]
mod tests;

/// Compiles validated rule sets into merge plans.
///
/// Stateless. Accepts only [`ValidatedRuleSet`], so every precondition has
/// already been checked and compilation has no error path.
#[derive(Debug, Clone, Default)]
pub struct MergePlanCompiler {}

impl MergePlanCompiler {
    /// Creates a new compiler.
    pub fn new() -> Self {
        Self {}
    }

    /// Compile the plan for one region.
    ///
    /// Returns `None` if the rule set has no rule for the region. Region
    /// names are compared after trimming.
    #[instrument(skip_all, fields(advertiser = %validated.rule_set().advertiser_ref, region = %region))]
    pub fn compile(&self, validated: &ValidatedRuleSet, region: &str) -> Option<MergePlan> {
        let rule_set = validated.rule_set();

        let Some(rule) = rule_set.rule_for_region(region) else {
            info!("No consolidation rule for region");
            return None;
        };

        let plan = self.compile_rule(rule_set, rule);
        info!(
            rule_id = %plan.rule_id,
            steps = plan.steps.len(),
            active_steps = plan.active_steps().count(),
            "Compiled merge plan"
        );
        Some(plan)
    }

    /// Compile one plan per consolidation rule, in rule order.
    #[instrument(skip_all, fields(advertiser = %validated.rule_set().advertiser_ref))]
    pub fn compile_all(&self, validated: &ValidatedRuleSet) -> Vec<MergePlan> {
        let rule_set = validated.rule_set();
        let plans: Vec<MergePlan> = rule_set
            .rules
            .iter()
            .map(|rule| self.compile_rule(rule_set, rule))
            .collect();

        info!(plans = plans.len(), "Compiled merge plans for all regions");
        plans
    }

    fn compile_rule(&self, rule_set: &ConsolidationRuleSet, rule: &ConsolidationRule) -> MergePlan {
        let steps = rule
            .supplier_chain
            .prioritized()
            .map(|(priority, supplier)| {
                let action = StepAction::for_priority(priority, supplier.fusion_type);
                debug!(
                    rule_id = %rule.id,
                    priority,
                    supplier_config_ref = %supplier.supplier_config_ref,
                    %action,
                    "Compiled fusion step"
                );
                FusionStep {
                    priority,
                    supplier_rule_id: supplier.id.clone(),
                    supplier_config_ref: supplier.supplier_config_ref.trim().to_string(),
                    action,
                    conflict_policy: ConflictPolicy::AccumulatorWins,
                    events: supplier.events.clone(),
                }
            })
            .collect();

        let enrichment_dataset_refs = if rule_set.enrichment_enabled {
            rule_set.enrichment_dataset_refs.iter().cloned().collect()
        } else {
            Vec::new()
        };

        MergePlan {
            advertiser_ref: rule_set.advertiser_ref.trim().to_string(),
            rule_id: rule.id.clone(),
            region: rule.region.trim().to_string(),
            active: rule_set.active,
            version: rule_set.version,
            cross_platform_enabled: rule.cross_platform_enabled,
            web_to_cross_platform_enabled: rule.web_to_cross_platform_enabled,
            exclusion_filters: rule.exclusion_filters.clone(),
            enrichment_dataset_refs,
            steps,
        }
    }
}
