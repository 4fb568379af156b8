//! Rule set document schema command.

use consolidation_rules::ConsolidationRuleSet;
use tracing::instrument;

use crate::errors::Error;

#[cfg(test)]
#[path = "schema_cmd_tests.rs"]
mod tests;

/// Print the JSON schema of the rule set document.
#[instrument]
pub fn execute() -> Result<(), Error> {
    println!("{}", render_schema()?);
    Ok(())
}

/// Render the rule set document schema as pretty JSON.
pub fn render_schema() -> Result<String, Error> {
    let schema = ConsolidationRuleSet::json_schema()?;
    serde_json::to_string_pretty(&schema)
        .map_err(|e| Error::Serialization(format!("Failed to serialize schema: {}", e)))
}
