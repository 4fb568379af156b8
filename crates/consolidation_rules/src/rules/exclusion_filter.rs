//! Exclusion filters attached to a consolidation rule.
//!
//! A row is excluded when its network id is listed, or when its campaign
//! name contains a match for any of the campaign patterns.

use regex::{Regex, RegexSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::errors::{ConsolidationError, ConsolidationResult};

#[cfg(test)]
#[path = "exclusion_filter_tests.rs"]
mod tests;

/// Network ids and campaign-name patterns whose rows must be dropped.
///
/// Both lists are stored as sorted sets so that serialized documents and
/// compiled plans are reproducible regardless of insertion order.
///
/// # Examples
///
/// ```rust
/// use consolidation_rules::{CandidateRow, ExclusionFilterSet};
///
/// let mut filters = ExclusionFilterSet::new();
/// filters.insert_network_ids("123, 456");
/// filters.insert_campaign_regex("^test_");
///
/// assert!(filters.matches(&CandidateRow::new("123", "spring_sale")));
/// assert!(filters.matches(&CandidateRow::new("999", "test_campaign")));
/// assert!(!filters.matches(&CandidateRow::new("999", "spring_sale")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionFilterSet {
    /// Network ids to exclude. Compared case-sensitively.
    #[serde(default)]
    pub excluded_network_ids: BTreeSet<String>,

    /// Campaign-name patterns to exclude.
    #[serde(default)]
    pub excluded_campaign_regexes: BTreeSet<String>,
}

impl ExclusionFilterSet {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if neither list has entries.
    pub fn is_empty(&self) -> bool {
        self.excluded_network_ids.is_empty() && self.excluded_campaign_regexes.is_empty()
    }

    /// Add network ids from comma-separated editor input.
    ///
    /// Entries are trimmed, empty entries are dropped and duplicates are
    /// ignored. Returns the number of ids actually added.
    pub fn insert_network_ids(&mut self, input: &str) -> usize {
        insert_split(&mut self.excluded_network_ids, input)
    }

    /// Add a single campaign pattern.
    ///
    /// Returns false if the pattern is blank or already present.
    pub fn insert_campaign_regex(&mut self, pattern: &str) -> bool {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return false;
        }
        self.excluded_campaign_regexes.insert(pattern.to_string())
    }

    /// Add campaign patterns from comma-separated editor input.
    ///
    /// Patterns that themselves contain commas (such as `a{1,3}`) must be
    /// added with [`insert_campaign_regex`](Self::insert_campaign_regex).
    pub fn insert_campaign_regexes(&mut self, input: &str) -> usize {
        insert_split(&mut self.excluded_campaign_regexes, input)
    }

    /// Remove one network id. Returns true if it was present.
    pub fn remove_network_id(&mut self, id: &str) -> bool {
        self.excluded_network_ids.remove(id)
    }

    /// Remove one campaign pattern. Returns true if it was present.
    pub fn remove_campaign_regex(&mut self, pattern: &str) -> bool {
        self.excluded_campaign_regexes.remove(pattern)
    }

    /// Trim every entry and drop the blank ones.
    ///
    /// Documents deserialized from the editing surface may carry padded or
    /// empty entries; after this call the set holds only canonical values.
    pub fn normalize(&mut self) {
        let before = self.excluded_network_ids.len() + self.excluded_campaign_regexes.len();

        self.excluded_network_ids = canonical(&self.excluded_network_ids);
        self.excluded_campaign_regexes = canonical(&self.excluded_campaign_regexes);

        let after = self.excluded_network_ids.len() + self.excluded_campaign_regexes.len();
        if after < before {
            warn!(
                dropped = before - after,
                "Dropped blank or duplicate exclusion entries"
            );
        }
    }

    /// Returns a normalized copy, leaving `self` untouched.
    pub fn normalized(&self) -> Self {
        Self {
            excluded_network_ids: canonical(&self.excluded_network_ids),
            excluded_campaign_regexes: canonical(&self.excluded_campaign_regexes),
        }
    }

    /// Returns true if [`normalize`](Self::normalize) would change anything.
    pub fn needs_normalization(&self) -> bool {
        self.excluded_network_ids
            .iter()
            .chain(self.excluded_campaign_regexes.iter())
            .any(|entry| entry.trim() != entry || entry.is_empty())
    }

    /// Compile every campaign pattern individually and report the ones that fail.
    ///
    /// Returns `(pattern, reason)` pairs in sorted pattern order.
    pub fn invalid_patterns(&self) -> Vec<(String, String)> {
        canonical_entries(&self.excluded_campaign_regexes)
            .filter_map(|p| match Regex::new(p) {
                Ok(_) => None,
                Err(e) => Some((p.to_string(), e.to_string())),
            })
            .collect()
    }

    /// Build a reusable matcher for the downstream engine.
    ///
    /// # Errors
    ///
    /// Returns `ConsolidationError::InvalidPattern` naming the first pattern
    /// that does not compile. Validated rule sets never hit this path.
    pub fn compile(&self) -> ConsolidationResult<ExclusionMatcher> {
        if let Some((pattern, reason)) = self.invalid_patterns().into_iter().next() {
            return Err(ConsolidationError::InvalidPattern { pattern, reason });
        }

        let normalized = self.normalized();
        let campaign_patterns = RegexSet::new(&normalized.excluded_campaign_regexes).map_err(
            |e| ConsolidationError::InvalidPattern {
                pattern: normalized
                    .excluded_campaign_regexes
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(","),
                reason: e.to_string(),
            },
        )?;

        Ok(ExclusionMatcher {
            network_ids: normalized.excluded_network_ids,
            campaign_patterns,
        })
    }

    /// Returns true if the row must be dropped.
    ///
    /// Entries are compared in their trimmed form and blank entries never
    /// match, so the answer is the same as the compiled matcher's even for a
    /// set that has not been normalized. A pattern that does not compile is
    /// skipped here, since such patterns are rejected during validation.
    ///
    /// Patterns are compiled on every call. When evaluating many rows, build
    /// an [`ExclusionMatcher`] once with [`compile`](Self::compile).
    pub fn matches<R: ExclusionCandidate + ?Sized>(&self, row: &R) -> bool {
        let by_network = row.network_id().is_some_and(|id| {
            canonical_entries(&self.excluded_network_ids).any(|entry| entry == id)
        });
        if by_network {
            return true;
        }

        let Some(campaign) = row.campaign_name() else {
            return false;
        };

        canonical_entries(&self.excluded_campaign_regexes)
            .filter_map(|p| Regex::new(p).ok())
            .any(|re| re.is_match(campaign))
    }
}

/// Compiled form of an [`ExclusionFilterSet`].
///
/// Holds all campaign patterns in one `RegexSet`, so evaluating a row costs
/// one pass over the campaign name regardless of the number of patterns.
#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    network_ids: BTreeSet<String>,
    campaign_patterns: RegexSet,
}

impl ExclusionMatcher {
    /// Returns true if the row must be dropped.
    pub fn matches<R: ExclusionCandidate + ?Sized>(&self, row: &R) -> bool {
        let by_network = row
            .network_id()
            .is_some_and(|id| self.network_ids.contains(id));
        if by_network {
            return true;
        }

        row.campaign_name()
            .is_some_and(|name| self.campaign_patterns.is_match(name))
    }
}

/// The fields of a raw event row that exclusion filters inspect.
///
/// Implemented by the downstream engine's row type; [`CandidateRow`] is a
/// plain owned implementation.
pub trait ExclusionCandidate {
    /// The row's network id, if present.
    fn network_id(&self) -> Option<&str>;

    /// The row's campaign name, if present.
    fn campaign_name(&self) -> Option<&str>;
}

/// Owned candidate row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRow {
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub campaign_name: Option<String>,
}

impl CandidateRow {
    /// Create a row with both fields set.
    pub fn new(network_id: impl Into<String>, campaign_name: impl Into<String>) -> Self {
        Self {
            network_id: Some(network_id.into()),
            campaign_name: Some(campaign_name.into()),
        }
    }
}

impl ExclusionCandidate for CandidateRow {
    fn network_id(&self) -> Option<&str> {
        self.network_id.as_deref()
    }

    fn campaign_name(&self) -> Option<&str> {
        self.campaign_name.as_deref()
    }
}

fn insert_split(target: &mut BTreeSet<String>, input: &str) -> usize {
    let added = input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter(|entry| target.insert(entry.to_string()))
        .count();
    debug!(added, "Inserted exclusion entries");
    added
}

fn canonical_entries(entries: &BTreeSet<String>) -> impl Iterator<Item = &str> {
    entries
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
}

fn canonical(entries: &BTreeSet<String>) -> BTreeSet<String> {
    canonical_entries(entries).map(str::to_string).collect()
}
