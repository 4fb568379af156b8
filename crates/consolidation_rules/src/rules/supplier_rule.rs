//! Supplier rules: one link in a region's supplier chain.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

#[cfg(test)]
#[path = "supplier_rule_tests.rs"]
mod tests;

/// Identity of a supplier rule within its chain.
///
/// Identity never changes when the rule is edited or moved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SupplierRuleId(String);

impl SupplierRuleId {
    /// Wrap an existing id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id of the form `supplier_<uuid>`.
    pub fn generate() -> Self {
        Self(format!("supplier_{}", uuid::Uuid::new_v4().simple()))
    }

    /// Get the underlying string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SupplierRuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for SupplierRuleId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for SupplierRuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SupplierRuleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// How a supplier's rows are combined into the accumulated dataset.
///
/// Serialized with the same names the editing surface uses.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum FusionType {
    /// Configured but not merged.
    #[default]
    None,
    /// Append rows whose key is not yet present.
    Union,
    /// Enrich existing keys only.
    LeftJoin,
    /// Keep keys from both sides, backfilling missing fields.
    FullOuterJoin,
}

impl FusionType {
    /// All fusion types in declaration order.
    pub const ALL: [FusionType; 4] = [
        FusionType::None,
        FusionType::Union,
        FusionType::LeftJoin,
        FusionType::FullOuterJoin,
    ];

    /// Returns true if rows from a supplier with this fusion type reach the accumulator.
    pub fn is_merging(self) -> bool {
        !matches!(self, FusionType::None)
    }
}

impl fmt::Display for FusionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Union => write!(f, "Union"),
            Self::LeftJoin => write!(f, "LeftJoin"),
            Self::FullOuterJoin => write!(f, "FullOuterJoin"),
        }
    }
}

/// One data supplier in a region's chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierRule {
    /// Unique within the parent chain.
    pub id: SupplierRuleId,

    /// Reference to an externally defined data supplier configuration.
    pub supplier_config_ref: String,

    /// Merge strategy for this supplier. Ignored at priority 1.
    #[serde(default)]
    pub fusion_type: FusionType,

    /// Free-text note on which events the supplier contributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<String>,
}

impl SupplierRule {
    /// Create a rule with a generated id and `FusionType::None`.
    pub fn new(supplier_config_ref: impl Into<String>) -> Self {
        Self {
            id: SupplierRuleId::generate(),
            supplier_config_ref: supplier_config_ref.into(),
            fusion_type: FusionType::None,
            events: None,
        }
    }

    /// Create a rule with an explicit id and fusion type.
    pub fn with_id(
        id: impl Into<SupplierRuleId>,
        supplier_config_ref: impl Into<String>,
        fusion_type: FusionType,
    ) -> Self {
        Self {
            id: id.into(),
            supplier_config_ref: supplier_config_ref.into(),
            fusion_type,
            events: None,
        }
    }
}
