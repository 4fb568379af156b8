//! Exclusion filter evaluation command.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use consolidation_rules::{CandidateRow, ConsolidationRuleSet};
use tracing::{debug, instrument};

use crate::commands::load_rule_set;
use crate::errors::Error;

#[cfg(test)]
#[path = "exclusion_cmd_tests.rs"]
mod tests;

/// Arguments for the check-exclusion command.
#[derive(Args, Debug)]
pub struct CheckExclusionArgs {
    /// Path to the rule set JSON document.
    pub file: PathBuf,

    /// Region whose exclusion filters are evaluated.
    #[arg(long)]
    pub region: String,

    /// Network id of the candidate row.
    #[arg(long)]
    pub network_id: Option<String>,

    /// Campaign name of the candidate row.
    #[arg(long)]
    pub campaign: Option<String>,
}

/// Print whether the region's exclusion filters drop the described row.
#[instrument]
pub fn execute(args: &CheckExclusionArgs) -> Result<(), Error> {
    if args.network_id.is_none() && args.campaign.is_none() {
        return Err(Error::InvalidArguments(
            "Provide --network-id, --campaign or both".to_string(),
        ));
    }

    let rule_set = load_rule_set(&args.file)?;
    let row = CandidateRow {
        network_id: args.network_id.clone(),
        campaign_name: args.campaign.clone(),
    };

    let excluded = check_exclusion(&rule_set, &args.region, &row)?;
    if excluded {
        println!("{}", "excluded".red().bold());
    } else {
        println!("{}", "kept".green().bold());
    }

    Ok(())
}

/// Returns true if the region's exclusion filters drop the row.
///
/// # Errors
///
/// Returns `Error::RegionNotFound` if the rule set has no rule for the
/// region, and `Error::InvalidArguments` if one of its campaign patterns
/// does not compile.
pub fn check_exclusion(
    rule_set: &ConsolidationRuleSet,
    region: &str,
    row: &CandidateRow,
) -> Result<bool, Error> {
    let rule = rule_set
        .rule_for_region(region)
        .ok_or_else(|| Error::RegionNotFound(region.to_string()))?;

    let matcher = rule.exclusion_filters.compile()?;
    let excluded = matcher.matches(row);
    debug!(rule_id = %rule.id, excluded, "Evaluated exclusion filters");

    Ok(excluded)
}
