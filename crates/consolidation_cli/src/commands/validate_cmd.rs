//! Rule set validation command.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use consolidation_rules::{
    ConsolidationRuleSet, ReferenceResolver, RuleSetValidator, ValidationResult,
};
use tracing::{debug, instrument};

use crate::commands::load_rule_set;
use crate::errors::Error;

#[cfg(test)]
#[path = "validate_cmd_tests.rs"]
mod tests;

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the rule set JSON document.
    pub file: PathBuf,

    /// Output format: "pretty" or "json".
    #[arg(long, default_value = "pretty")]
    pub format: String,
}

/// Validate the rule set document and print every problem found.
///
/// # Errors
///
/// Returns `Error::Validation` if the rule set has validation errors, after
/// the report has been printed.
#[instrument(skip(resolver))]
pub fn execute(args: &ValidateArgs, resolver: &dyn ReferenceResolver) -> Result<(), Error> {
    let rule_set = load_rule_set(&args.file)?;
    let result = validate_rule_set(&rule_set, resolver);

    let output = format_validation_result(&rule_set, &result, &args.format)?;
    println!("{}", output);

    if !result.is_valid() {
        return Err(Error::Validation {
            error_count: result.errors.len(),
        });
    }

    Ok(())
}

/// Validate a rule set against the resolver.
pub fn validate_rule_set(
    rule_set: &ConsolidationRuleSet,
    resolver: &dyn ReferenceResolver,
) -> ValidationResult {
    debug!(advertiser = %rule_set.advertiser_ref, "Validating rule set");
    RuleSetValidator::new(resolver).validate(rule_set)
}

/// Format a validation result for display.
pub fn format_validation_result(
    rule_set: &ConsolidationRuleSet,
    result: &ValidationResult,
    format: &str,
) -> Result<String, Error> {
    match format {
        "json" => serde_json::to_string_pretty(result)
            .map_err(|e| Error::Serialization(format!("Failed to serialize to JSON: {}", e))),
        "pretty" => Ok(format_validation_result_pretty(rule_set, result)),
        _ => Err(Error::InvalidArguments(format!(
            "Invalid format: '{}'. Use 'json' or 'pretty'.",
            format
        ))),
    }
}

fn format_validation_result_pretty(
    rule_set: &ConsolidationRuleSet,
    result: &ValidationResult,
) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} {}\n\n",
        "Validating rule set for advertiser:".bold(),
        rule_set.advertiser_ref.bright_cyan()
    ));

    if result.is_valid() {
        output.push_str(&format!("{}\n\n", "✓ Rule set is VALID".green().bold()));
    } else {
        output.push_str(&format!(
            "{}\n\n",
            "✗ Rule set validation FAILED".red().bold()
        ));
    }

    if !result.errors.is_empty() {
        output.push_str(&format!("{}:\n", "Errors".red().bold()));
        for error in &result.errors {
            output.push_str(&format!(
                "  {} [{}] {}: {}\n",
                "✗".red(),
                error.error_type,
                error.field_path.dimmed(),
                error.message
            ));
            if let Some(ref suggestion) = error.suggestion {
                output.push_str(&format!("      {}\n", suggestion.dimmed()));
            }
        }
        output.push('\n');
    }

    if !result.warnings.is_empty() {
        output.push_str(&format!(
            "{} ({}):\n",
            "Warnings".yellow().bold(),
            result.warnings.len()
        ));
        for warning in &result.warnings {
            output.push_str(&format!(
                "  {} {}: {}\n",
                "⚠".yellow(),
                warning.field_path.dimmed(),
                warning.message
            ));
        }
        output.push('\n');
    }

    output
}
