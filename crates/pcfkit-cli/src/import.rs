//! # Import Subcommand
//!
//! Converts an existing `ControlManifest.Input.xml` into the YAML or JSON
//! source form. By default the imported document is validated and emitted
//! from the typed model; `--no-validate` skips validation and emits the
//! raw tree as read, misspellings and all.
//!
//! Generated YAML starts with a `yaml-language-server` schema directive
//! and generated JSON carries a `$schema` member, so editors pick up
//! completion for the converted file. `--no-schema-directive` drops both.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::Value;

use pcfkit_manifest::model::Manifest;
use pcfkit_manifest::{raw_from_xml_str, validate, ManifestError};

/// Arguments for the `pcfkit import-xml` subcommand.
#[derive(Args, Debug)]
pub struct ImportXmlArgs {
    /// Manifest XML to convert (`-` reads standard input).
    pub path: PathBuf,

    /// Write the converted document here instead of standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output syntax.
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Emit the document as read, without validating it first.
    #[arg(long)]
    pub no_validate: bool,

    /// Omit the editor schema reference from the output.
    #[arg(long)]
    pub no_schema_directive: bool,

    /// Schema URL the editor directive points at.
    #[arg(long, default_value = pcfkit_schema::DEFAULT_SCHEMA_URL)]
    pub schema_path: String,
}

/// Output syntaxes for converted manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// JSON rendering of a validated manifest with an optional `$schema`
/// member ahead of the document body.
#[derive(Serialize)]
struct JsonDocument<'a> {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    schema: Option<&'a str>,
    #[serde(flatten)]
    manifest: &'a Manifest,
}

/// Execute the import-xml subcommand.
pub fn run_import_xml(args: &ImportXmlArgs) -> Result<u8> {
    let text = crate::read_input(&args.path)?;
    let raw = raw_from_xml_str(&text)?;

    let body = if args.no_validate {
        render_raw(&raw, args)?
    } else {
        match validate(&raw) {
            Ok(manifest) => render_manifest(&manifest, args)?,
            Err(ManifestError::Invalid(report)) => {
                eprintln!("{report}");
                eprintln!("{} issue(s) found.", report.len());
                return Ok(1);
            }
            Err(err @ ManifestError::MalformedDocument(_)) => return Err(err.into()),
        }
    };

    crate::write_output(args.output.as_deref(), &body)?;
    Ok(0)
}

fn render_manifest(manifest: &Manifest, args: &ImportXmlArgs) -> Result<String> {
    match args.format {
        OutputFormat::Yaml => {
            let mut out = String::new();
            if !args.no_schema_directive {
                out.push_str(&yaml_directive(&args.schema_path));
            }
            out.push_str(&serde_yaml::to_string(manifest)?);
            Ok(out)
        }
        OutputFormat::Json => {
            let doc = JsonDocument {
                schema: (!args.no_schema_directive).then_some(args.schema_path.as_str()),
                manifest,
            };
            let mut out = serde_json::to_string_pretty(&doc)?;
            out.push('\n');
            Ok(out)
        }
    }
}

fn render_raw(raw: &Value, args: &ImportXmlArgs) -> Result<String> {
    match args.format {
        OutputFormat::Yaml => {
            let mut out = String::new();
            if !args.no_schema_directive {
                out.push_str(&yaml_directive(&args.schema_path));
            }
            out.push_str(&serde_yaml::to_string(raw)?);
            Ok(out)
        }
        OutputFormat::Json => {
            let mut raw = raw.clone();
            if !args.no_schema_directive {
                if let Some(obj) = raw.as_object_mut() {
                    obj.insert(
                        "$schema".to_string(),
                        Value::String(args.schema_path.clone()),
                    );
                }
            }
            let mut out = serde_json::to_string_pretty(&raw)?;
            out.push('\n');
            Ok(out)
        }
    }
}

fn yaml_directive(url: &str) -> String {
    format!("# yaml-language-server: $schema={url}\n")
}
