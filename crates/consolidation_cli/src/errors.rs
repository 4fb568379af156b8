use std::io;

use consolidation_rules::ConsolidationError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the consolidation rules CLI.
///
/// Each variant maps onto a process exit code through [`Error::exit_code`]:
/// problems with the user's input exit with 1, problems reading
/// configuration or files exit with 2.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Failed to read a rule set document from the filesystem.
    #[error("Failed to load file.")]
    LoadFile(io::Error),

    /// The rule set document is not valid JSON or does not have the expected shape.
    #[error("Failed to parse rule set document: {0}")]
    ParseRuleSet(ConsolidationError),

    /// The rule set failed validation.
    #[error("Rule set is invalid: {error_count} error(s)")]
    Validation { error_count: usize },

    /// The rule set has no consolidation rule for the requested region.
    #[error("No consolidation rule for region '{0}'")]
    RegionNotFound(String),

    /// Failed to render output.
    #[error("Failed to serialize output: {0}")]
    Serialization(String),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArguments(_)
            | Error::ParseRuleSet(_)
            | Error::Validation { .. }
            | Error::RegionNotFound(_) => 1,
            Error::Config(_) | Error::LoadFile(_) | Error::Serialization(_) => 2,
        }
    }
}

impl From<ConsolidationError> for Error {
    fn from(error: ConsolidationError) -> Self {
        match error {
            ConsolidationError::ValidationFailed { error_count, .. } => {
                Error::Validation { error_count }
            }
            ConsolidationError::Serialization { reason } => Error::Serialization(reason),
            other => Error::InvalidArguments(other.to_string()),
        }
    }
}
