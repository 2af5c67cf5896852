//! envgate
//!
//! Validates the process environment against a TOML schema.

use clap::{Parser, ValueEnum};
use envgate::{
    ProcessEnv,
    config::{DEFAULT_SCHEMA_PATH, load_schema},
};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Validate environment variables against typed constraints
#[derive(Parser, Debug)]
#[command(name = "envgate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the schema file
    #[arg(short, long, env = "ENVGATE_SCHEMA", default_value = DEFAULT_SCHEMA_PATH)]
    schema: String,

    /// Directory env files are resolved against (default: current directory)
    #[arg(long)]
    base_path: Option<String>,

    /// Env file to load; repeat for several (overrides the schema's list)
    #[arg(short, long = "file")]
    files: Vec<String>,

    /// Write declared defaults for unset variables
    #[arg(long)]
    apply_defaults: bool,

    /// Report errors and exit non-zero instead of exiting immediately
    #[arg(long)]
    no_exit: bool,

    /// Do not log warnings or errors
    #[arg(long)]
    silent: bool,

    /// Validate the current environment without loading env files
    #[arg(long)]
    skip_load: bool,

    /// Output format for the error report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ENVGATE_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn init_logging(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    if args.log_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

fn print_report(errors: &[String], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for err in errors {
                println!("{err}");
            }
        }
        OutputFormat::Json => {
            let report = serde_json::json!({
                "valid": errors.is_empty(),
                "errors": errors,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(&args);

    let mut schema = load_schema(&args.schema)
        .inspect_err(|e| error!(error = %e, "Failed to load schema"))?;

    // CLI flags take precedence over the schema file and ENVGATE_* variables
    if let Some(base) = &args.base_path {
        schema.options.base_path = Some(base.clone());
    }
    if !args.files.is_empty() {
        schema.options.files = Some(args.files.clone());
    }
    if args.apply_defaults {
        schema.options.apply_defaults = true;
    }
    if args.no_exit {
        schema.options.exit_on_error = false;
    }
    if args.silent {
        schema.options.silent = true;
    }

    info!(
        schema = %args.schema,
        variables = schema.constraints.len(),
        "Validating environment"
    );

    let validator = schema.into_validator();
    let mut env = ProcessEnv::new();

    let result = if args.skip_load {
        validator.validate(&mut env)
    } else {
        validator.load_and_validate(&mut env)
    };

    match result {
        None => {
            info!("Environment is valid");
            if args.format == OutputFormat::Json {
                print_report(&[], args.format)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(errors) => {
            print_report(&errors, args.format)?;
            Ok(ExitCode::FAILURE)
        }
    }
}
