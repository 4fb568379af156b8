//! Ordered, re-orderable supplier rule chain.
//!
//! Priority is derived from position (priority 1 is the head) and is never
//! stored, so reordering cannot desynchronize priority from order.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::supplier_rule::{SupplierRule, SupplierRuleId};
use crate::errors::{ConsolidationError, ConsolidationResult};

#[cfg(test)]
#[path = "supplier_chain_tests.rs"]
mod tests;

/// Supplier rules of one consolidation rule, in priority order.
///
/// # Examples
///
/// ```rust
/// use consolidation_rules::{FusionType, SupplierRule, SupplierRuleChain};
///
/// let mut chain = SupplierRuleChain::new();
/// chain.add(SupplierRule::with_id("s3", "s3-import", FusionType::Union));
/// chain.add(SupplierRule::with_id("af", "appsflyer-1", FusionType::None));
///
/// // Newest rule lands at the head.
/// assert_eq!(chain.priority_of("af"), Some(1));
/// assert_eq!(chain.priority_of("s3"), Some(2));
///
/// chain.move_to("af", 1)?;
/// assert_eq!(chain.priority_of("af"), Some(2));
/// # Ok::<(), consolidation_rules::ConsolidationError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SupplierRuleChain {
    rules: Vec<SupplierRule>,
}

impl SupplierRuleChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rules in the chain.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the chain has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, SupplierRule> {
        self.rules.iter()
    }

    /// Rules in priority order, as a slice.
    pub fn as_slice(&self) -> &[SupplierRule] {
        &self.rules
    }

    /// Rules paired with their 1-based priority.
    pub fn prioritized(&self) -> impl Iterator<Item = (usize, &SupplierRule)> {
        self.rules.iter().enumerate().map(|(i, r)| (i + 1, r))
    }

    /// The priority-1 rule, which seeds the merge.
    pub fn head(&self) -> Option<&SupplierRule> {
        self.rules.first()
    }

    /// Look up a rule by id.
    pub fn get(&self, id: &str) -> Option<&SupplierRule> {
        self.rules.iter().find(|r| r.id.as_str() == id)
    }

    /// 1-based priority of the rule with the given id.
    pub fn priority_of(&self, id: &str) -> Option<usize> {
        self.position(id).map(|i| i + 1)
    }

    /// Insert a rule at the head of the chain (newest first).
    pub fn add(&mut self, rule: SupplierRule) {
        debug!(id = %rule.id, supplier = %rule.supplier_config_ref, "Adding supplier rule at head");
        self.rules.insert(0, rule);
    }

    /// Remove the rule with the given id.
    ///
    /// Removing an id that is not in the chain is a no-op and returns `None`.
    pub fn remove(&mut self, id: &str) -> Option<SupplierRule> {
        let index = self.position(id)?;
        debug!(id, priority = index + 1, "Removing supplier rule");
        Some(self.rules.remove(index))
    }

    /// Replace the rule that has the same id, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns `ConsolidationError::SupplierRuleNotFound` if no rule has that id.
    pub fn update(&mut self, rule: SupplierRule) -> ConsolidationResult<()> {
        let index = self
            .position(&rule.id)
            .ok_or_else(|| ConsolidationError::SupplierRuleNotFound {
                id: rule.id.to_string(),
            })?;
        self.rules[index] = rule;
        Ok(())
    }

    /// Move the rule with the given id to the 0-based `index`.
    ///
    /// Other rules keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns `SupplierRuleNotFound` for an unknown id and
    /// `PositionOutOfRange` if `index` is not a valid position.
    pub fn move_to(&mut self, id: &str, index: usize) -> ConsolidationResult<()> {
        let from = self
            .position(id)
            .ok_or_else(|| ConsolidationError::SupplierRuleNotFound { id: id.to_string() })?;
        self.move_entry(from, index)
    }

    /// Move the entry at position `from` to position `to` (both 0-based).
    ///
    /// Same semantics as a drag-and-drop list move: the entry is taken out
    /// and reinserted, shifting the entries in between by one.
    ///
    /// # Errors
    ///
    /// Returns `PositionOutOfRange` if either position is outside the chain.
    pub fn move_entry(&mut self, from: usize, to: usize) -> ConsolidationResult<()> {
        let len = self.rules.len();
        for index in [from, to] {
            if index >= len {
                return Err(ConsolidationError::PositionOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }

        let rule = self.rules.remove(from);
        debug!(id = %rule.id, from_priority = from + 1, to_priority = to + 1, "Moving supplier rule");
        self.rules.insert(to, rule);
        Ok(())
    }

    /// Ids that occur more than once, each reported once in first-seen order.
    pub fn duplicate_ids(&self) -> Vec<&SupplierRuleId> {
        let mut seen = std::collections::HashSet::new();
        let mut reported = std::collections::HashSet::new();
        self.rules
            .iter()
            .map(|r| &r.id)
            .filter(|id| !id.as_str().trim().is_empty())
            .filter(|id| !seen.insert(*id) && reported.insert(*id))
            .collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.id.as_str() == id)
    }
}

impl From<Vec<SupplierRule>> for SupplierRuleChain {
    /// Build a chain whose priority order is the vector order.
    fn from(rules: Vec<SupplierRule>) -> Self {
        Self { rules }
    }
}

impl FromIterator<SupplierRule> for SupplierRuleChain {
    fn from_iter<I: IntoIterator<Item = SupplierRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SupplierRuleChain {
    type Item = &'a SupplierRule;
    type IntoIter = std::slice::Iter<'a, SupplierRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
