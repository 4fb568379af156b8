use clap::{Parser, Subcommand};
use consolidation_cli::commands::{
    compile_cmd::{self, CompileArgs},
    exclusion_cmd::{self, CheckExclusionArgs},
    schema_cmd,
    validate_cmd::{self, ValidateArgs},
};
use consolidation_cli::config::{get_config_path, AppConfig};
use consolidation_cli::errors::Error;
use consolidation_rules::{PermissiveResolver, ReferenceResolver};
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Consolidation rules CLI: validate rule sets and compile merge plans
#[derive(Parser)]
#[command(name = "consolidation-rules")]
#[command(about = "Validate consolidation rule sets and compile merge plans", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file holding the reference catalog.
    #[arg(long, global = true)]
    config: Option<String>,

    /// Resolve every reference without a catalog.
    #[arg(long, global = true)]
    permissive: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a rule set document
    Validate(ValidateArgs),

    /// Compile merge plans from a rule set document
    Compile(CompileArgs),

    /// Evaluate a region's exclusion filters against one row
    CheckExclusion(CheckExclusionArgs),

    /// Print the JSON schema of the rule set document
    Schema,

    /// Show the CLI version
    Version,
}

fn load_resolver(cli: &Cli) -> Result<Box<dyn ReferenceResolver>, Error> {
    if cli.permissive {
        warn!("Resolving references permissively; no catalog is consulted");
        return Ok(Box::new(PermissiveResolver));
    }

    let config = AppConfig::load(&get_config_path(cli.config.as_deref()))?;
    Ok(Box::new(config.catalog))
}

fn run(cli: &Cli) -> Result<(), Error> {
    match &cli.command {
        Commands::Validate(args) => {
            let resolver = load_resolver(cli)?;
            validate_cmd::execute(args, resolver.as_ref())
        }
        Commands::Compile(args) => {
            let resolver = load_resolver(cli)?;
            compile_cmd::execute(args, resolver.as_ref())
        }
        Commands::CheckExclusion(args) => exclusion_cmd::execute(args),
        Commands::Schema => schema_cmd::execute(),
        Commands::Version => {
            println!(
                "consolidation-rules version {}",
                option_env!("CONSOLIDATION_RULES_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
            );
            Ok(())
        }
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("CONSOLIDATION_LOG"))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("Error: {e}");
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
