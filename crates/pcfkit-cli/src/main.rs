//! # pcfkit CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros for argument parsing; verbosity maps onto the
//! tracing filter.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pcfkit_cli::generate::{run_generate, GenerateArgs};
use pcfkit_cli::import::{run_import_xml, ImportXmlArgs};
use pcfkit_cli::schema::{run_export_json_schema, ExportJsonSchemaArgs};
use pcfkit_cli::validate::{run_validate, ValidateArgs};

/// Power Apps component framework manifest tooling.
///
/// Validates manifest documents, renders canonical
/// `ControlManifest.Input.xml`, converts existing XML back to YAML/JSON,
/// and exports the manifest JSON Schema for editor integration.
#[derive(Parser, Debug)]
#[command(name = "pcfkit", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a manifest document and report every schema issue.
    Validate(ValidateArgs),

    /// Render canonical ControlManifest.Input.xml from a manifest source.
    Generate(GenerateArgs),

    /// Convert existing manifest XML to YAML or JSON.
    ImportXml(ImportXmlArgs),

    /// Emit the manifest JSON Schema.
    ExportJsonSchema(ExportJsonSchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Generate(args) => run_generate(&args),
        Commands::ImportXml(args) => run_import_xml(&args),
        Commands::ExportJsonSchema(args) => run_export_json_schema(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
