//! One region's consolidation configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::exclusion_filter::ExclusionFilterSet;
use super::supplier_chain::SupplierRuleChain;

#[cfg(test)]
#[path = "consolidation_rule_tests.rs"]
mod tests;

/// Region used for rules created without an explicit region.
pub const DEFAULT_REGION: &str = "US";

/// Platform toggles, exclusions and the ordered supplier chain for one region.
///
/// The chain may be empty, meaning the region currently consolidates
/// nothing. The region must be set before the rule passes validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationRule {
    /// Unique within the parent rule set.
    pub id: String,

    /// Key into the advertiser's region catalog.
    #[serde(default)]
    pub region: String,

    #[serde(default)]
    pub cross_platform_enabled: bool,

    #[serde(default)]
    pub web_to_cross_platform_enabled: bool,

    #[serde(default)]
    pub exclusion_filters: ExclusionFilterSet,

    #[serde(default)]
    pub supplier_chain: SupplierRuleChain,
}

impl ConsolidationRule {
    /// Create a rule for the default region with everything switched off.
    pub fn new(id: impl Into<String>) -> Self {
        Self::for_region(id, DEFAULT_REGION)
    }

    /// Create an empty rule for the given region.
    pub fn for_region(id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            region: region.into(),
            cross_platform_enabled: false,
            web_to_cross_platform_enabled: false,
            exclusion_filters: ExclusionFilterSet::default(),
            supplier_chain: SupplierRuleChain::default(),
        }
    }

    /// Generate a rule id of the form `rule_<uuid>`.
    pub fn generate_id() -> String {
        format!("rule_{}", uuid::Uuid::new_v4().simple())
    }

    /// Returns true if the region is set to something other than whitespace.
    pub fn has_region(&self) -> bool {
        !self.region.trim().is_empty()
    }
}
