//! Command modules for the consolidation rules CLI.
//!
//! - `validate_cmd`: validate a rule set document against the reference catalog
//! - `compile_cmd`: compile merge plans from a rule set document
//! - `exclusion_cmd`: evaluate a region's exclusion filters against one row
//! - `schema_cmd`: print the JSON schema of the rule set document

use std::{fs, path::Path};

use consolidation_rules::ConsolidationRuleSet;
use tracing::debug;

use crate::errors::Error;

pub mod compile_cmd;
pub mod exclusion_cmd;
pub mod schema_cmd;
pub mod validate_cmd;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// Read and parse a rule set JSON document.
pub fn load_rule_set(path: &Path) -> Result<ConsolidationRuleSet, Error> {
    debug!("Loading rule set from {:?}", path);

    let content = fs::read_to_string(path).map_err(Error::LoadFile)?;
    ConsolidationRuleSet::from_json(&content).map_err(Error::ParseRuleSet)
}
