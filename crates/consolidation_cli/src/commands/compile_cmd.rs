//! Merge plan compilation command.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use consolidation_rules::{
    ConsolidationRuleSet, MergePlan, MergePlanCompiler, ReferenceResolver, RuleSetValidator,
};
use tracing::{info, instrument, warn};

use crate::commands::load_rule_set;
use crate::errors::Error;

#[cfg(test)]
#[path = "compile_cmd_tests.rs"]
mod tests;

/// Arguments for the compile command.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Path to the rule set JSON document.
    pub file: PathBuf,

    /// Region to compile. Compiles every region when omitted.
    #[arg(long)]
    pub region: Option<String>,

    /// Print each plan's fingerprint instead of the plan itself.
    #[arg(long)]
    pub fingerprint: bool,
}

/// Compile merge plans and print them as JSON.
///
/// # Errors
///
/// Returns `Error::Validation` if the rule set does not validate, and
/// `Error::RegionNotFound` if the requested region has no rule.
#[instrument(skip(resolver))]
pub fn execute(args: &CompileArgs, resolver: &dyn ReferenceResolver) -> Result<(), Error> {
    let rule_set = load_rule_set(&args.file)?;
    let plans = compile_plans(&rule_set, resolver, args.region.as_deref())?;

    let output = if args.fingerprint {
        format_fingerprints(&plans)?
    } else {
        format_plans(&plans, args.region.is_some())?
    };
    println!("{}", output);

    Ok(())
}

/// Validate the rule set and compile the requested plans.
///
/// Validation warnings are logged; validation errors abort compilation.
pub fn compile_plans(
    rule_set: &ConsolidationRuleSet,
    resolver: &dyn ReferenceResolver,
    region: Option<&str>,
) -> Result<Vec<MergePlan>, Error> {
    let validated = RuleSetValidator::new(resolver).validate_for_compile(rule_set)?;
    for warning in validated.warnings() {
        warn!(field = %warning.field_path, "{}", warning.message);
    }

    let compiler = MergePlanCompiler::new();
    let plans = match region {
        Some(region) => {
            let plan = compiler
                .compile(&validated, region)
                .ok_or_else(|| Error::RegionNotFound(region.to_string()))?;
            vec![plan]
        }
        None => compiler.compile_all(&validated),
    };

    info!(plans = plans.len(), "Compiled merge plans");
    Ok(plans)
}

/// Render plans as pretty JSON: a single object for one region, an array otherwise.
pub fn format_plans(plans: &[MergePlan], single: bool) -> Result<String, Error> {
    let rendered = match (single, plans.first()) {
        (true, Some(plan)) => serde_json::to_string_pretty(plan),
        _ => serde_json::to_string_pretty(plans),
    };
    rendered.map_err(|e| Error::Serialization(format!("Failed to serialize to JSON: {}", e)))
}

/// Render one `region fingerprint` line per plan.
pub fn format_fingerprints(plans: &[MergePlan]) -> Result<String, Error> {
    let mut lines = Vec::with_capacity(plans.len());
    for plan in plans {
        let fingerprint = plan.fingerprint()?;
        lines.push(format!("{} {}", plan.region.bold(), fingerprint));
    }
    Ok(lines.join("\n"))
}
