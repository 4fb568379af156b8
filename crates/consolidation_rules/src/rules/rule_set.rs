//! Advertiser-level consolidation rule set.
//!
//! The rule set is persisted as one JSON document keyed by advertiser and
//! is replaced wholesale on every save. The enrichment invariant (no
//! datasets while enrichment is off) is checked by the validator rather
//! than enforced here, so editors may pass through inconsistent states.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use super::consolidation_rule::ConsolidationRule;
use crate::errors::{ConsolidationError, ConsolidationResult};

#[cfg(test)]
#[path = "rule_set_tests.rs"]
mod tests;

/// Ordered consolidation rules plus enrichment settings for one advertiser.
///
/// # Examples
///
/// ```rust
/// use consolidation_rules::{ConsolidationRule, ConsolidationRuleSet};
///
/// let mut rule_set = ConsolidationRuleSet::new("planet_art_demo");
/// rule_set.add_rule(ConsolidationRule::for_region("r1", "US"));
/// rule_set.add_rule(ConsolidationRule::for_region("r2", "EMEA"));
///
/// assert_eq!(rule_set.rules[0].id, "r2");
/// assert!(rule_set.rule_for_region("US").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationRuleSet {
    /// The owning advertiser.
    #[serde(default)]
    pub advertiser_ref: String,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    pub enrichment_enabled: bool,

    #[serde(default)]
    pub enrichment_dataset_refs: BTreeSet<String>,

    #[serde(default)]
    pub rules: Vec<ConsolidationRule>,

    /// Document version, incremented by the persistence collaborator on
    /// every save and compared on write to detect concurrent editors.
    #[serde(default)]
    pub version: u64,
}

fn default_active() -> bool {
    true
}

impl ConsolidationRuleSet {
    /// Create an active, empty rule set for the advertiser.
    pub fn new(advertiser_ref: impl Into<String>) -> Self {
        Self {
            advertiser_ref: advertiser_ref.into(),
            active: true,
            enrichment_enabled: false,
            enrichment_dataset_refs: BTreeSet::new(),
            rules: Vec::new(),
            version: 0,
        }
    }

    /// Parse a rule set document.
    ///
    /// # Errors
    ///
    /// Returns `ConsolidationError::Serialization` if the JSON is malformed
    /// or does not have the rule set shape.
    pub fn from_json(json: &str) -> ConsolidationResult<Self> {
        serde_json::from_str(json).map_err(|e| ConsolidationError::Serialization {
            reason: e.to_string(),
        })
    }

    /// Render the document as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> ConsolidationResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConsolidationError::Serialization {
            reason: e.to_string(),
        })
    }

    /// JSON Schema of the document, for the editing surface.
    pub fn json_schema() -> ConsolidationResult<serde_json::Value> {
        let schema = schemars::schema_for!(ConsolidationRuleSet);
        serde_json::to_value(&schema).map_err(|e| ConsolidationError::Serialization {
            reason: e.to_string(),
        })
    }

    /// Insert a rule at the head of the list (newest first).
    pub fn add_rule(&mut self, rule: ConsolidationRule) {
        debug!(id = %rule.id, region = %rule.region, "Adding consolidation rule");
        self.rules.insert(0, rule);
    }

    /// Remove the rule with the given id. Unknown ids are a no-op.
    pub fn remove_rule(&mut self, id: &str) -> Option<ConsolidationRule> {
        let index = self.rules.iter().position(|r| r.id == id)?;
        Some(self.rules.remove(index))
    }

    /// Replace the rule with the same id, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns `ConsolidationError::ConsolidationRuleNotFound` for an unknown id.
    pub fn update_rule(&mut self, rule: ConsolidationRule) -> ConsolidationResult<()> {
        let slot = self
            .rules
            .iter_mut()
            .find(|r| r.id == rule.id)
            .ok_or_else(|| ConsolidationError::ConsolidationRuleNotFound {
                id: rule.id.clone(),
            })?;
        *slot = rule;
        Ok(())
    }

    /// Look up a rule by id.
    pub fn rule(&self, id: &str) -> Option<&ConsolidationRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Mutable lookup by id, for in-place edits of a rule's chain or filters.
    pub fn rule_mut(&mut self, id: &str) -> Option<&mut ConsolidationRule> {
        self.rules.iter_mut().find(|r| r.id == id)
    }

    /// The first rule targeting the region. Regions are compared after trimming.
    pub fn rule_for_region(&self, region: &str) -> Option<&ConsolidationRule> {
        let region = region.trim();
        self.rules.iter().find(|r| r.region.trim() == region)
    }

    /// Select the dataset if absent, deselect it if present.
    ///
    /// Returns true if the dataset is selected afterwards.
    pub fn toggle_enrichment_dataset(&mut self, dataset_ref: &str) -> bool {
        if self.enrichment_dataset_refs.remove(dataset_ref) {
            false
        } else {
            self.enrichment_dataset_refs.insert(dataset_ref.to_string());
            true
        }
    }

    /// Normalize the exclusion filters of every rule.
    pub fn normalize(&mut self) {
        for rule in &mut self.rules {
            rule.exclusion_filters.normalize();
        }
    }

    /// Advance the document version before a save.
    pub fn bump_version(&mut self) -> u64 {
        self.version = self.version.saturating_add(1);
        self.version
    }
}
