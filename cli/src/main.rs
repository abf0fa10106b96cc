#![deny(missing_docs)]

//! # Apigen CLI
//!
//! Command line front-end for the apigen normalization core.
//!
//! Loads an OpenAPI document (JSON or YAML), applies the operation
//! filters given on the command line, runs the normalization pass and
//! prints either a human summary or the normalized spec as JSON for an
//! emission backend.

use apigen_core::{parse_document, AppError, AppResult, GenerationConfig, Spec};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI client generator front-end")]
struct Cli {
    /// Path to the OpenAPI document (JSON or YAML).
    input: PathBuf,

    /// Keep only the listed operation ids (repeatable). Absent keeps all.
    #[clap(long = "include-op", value_name = "ID")]
    include_ops: Vec<String>,

    /// Rename an operation for the emitter, as OLD=NEW (repeatable).
    #[clap(long = "rename", value_name = "OLD=NEW")]
    renames: Vec<String>,

    /// Output format.
    #[clap(long, value_enum, default_value_t = Emit::Summary)]
    emit: Emit,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Emit {
    /// Human-readable overview of the normalized spec.
    Summary,
    /// The full normalized spec as pretty-printed JSON.
    Json,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.input)?;
    let document: serde_json::Value = serde_yaml::from_str(&raw)
        .map_err(|e| AppError::General(format!("Failed to parse document: {}", e)))?;

    let config = build_config(&cli)?;
    let spec = parse_document(document, &config)?;

    match cli.emit {
        Emit::Json => {
            let rendered = serde_json::to_string_pretty(&spec)
                .map_err(|e| AppError::General(format!("Failed to render spec: {}", e)))?;
            println!("{}", rendered);
        }
        Emit::Summary => print_summary(&spec, &config),
    }

    Ok(())
}

fn build_config(cli: &Cli) -> AppResult<GenerationConfig> {
    let mut config = GenerationConfig::new();

    if !cli.include_ops.is_empty() {
        let keep: BTreeSet<String> = cli.include_ops.iter().cloned().collect();
        config = config.with_operation_filter(move |id| keep.contains(id));
    }

    if !cli.renames.is_empty() {
        let mut renames: BTreeMap<String, String> = BTreeMap::new();
        for pair in &cli.renames {
            let Some((old, new)) = pair.split_once('=') else {
                return Err(AppError::General(format!(
                    "Invalid --rename '{}', expected OLD=NEW",
                    pair
                )));
            };
            renames.insert(old.to_string(), new.to_string());
        }
        config = config.with_operation_rename(move |id| {
            renames.get(id).cloned().unwrap_or_else(|| id.to_string())
        });
    }

    Ok(config)
}

fn print_summary(spec: &Spec, config: &GenerationConfig) {
    let heading = if spec.info.title.is_empty() {
        "(untitled)".to_string()
    } else {
        spec.info.title.clone()
    };
    println!(
        "{} {} {}",
        heading.bold(),
        spec.info.version,
        format!(
            "({} operations, {} models)",
            spec.operations.len(),
            spec.models.len()
        )
        .dimmed()
    );

    for operation in &spec.operations {
        let emitted = config.rename_operation(&operation.id);
        println!(
            "  {} {} {}",
            operation.method.to_uppercase().green(),
            operation.path,
            format!("-> {}", emitted).cyan()
        );
    }

    for model in &spec.models {
        println!("  {} {}", "model".yellow(), model.name);
    }
}
