use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::automap::apply_auto_map;
use crate::diff::{diff_models, ModelDiff};
use crate::generator::generate_script;
use crate::model::{MappingModel, MAIN_MODULE};
use crate::parser::{parse_template, ParseOutcome};
use crate::schema::flatten_schema;

/// Command-line interface for MapForge
///
/// Provides commands for rendering mapping models to transformation
/// scripts, re-parsing previously generated scripts, and comparing model
/// snapshots.
#[derive(Parser)]
#[command(name = "mapforge")]
#[command(about = "MapForge mapping transducer CLI", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands for MapForge
#[derive(Subcommand)]
pub enum Commands {
    /// Render a mapping model (JSON) to a transformation script
    Generate {
        /// Path to the mapping model JSON file
        #[arg(short, long)]
        model: PathBuf,

        /// Output path for the script (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Recover a mapping model from a previously generated script
    Parse {
        /// Path to the generated script
        #[arg(short, long)]
        script: PathBuf,

        /// Write the recovered model as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare two generated scripts and report model changes
    Diff {
        /// Script holding the original snapshot
        #[arg(long)]
        original: PathBuf,

        /// Script holding the current snapshot
        #[arg(long)]
        current: PathBuf,

        /// Emit the report as JSON instead of a text summary
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Propose direct mappings by normalized field-name equality
    Automap {
        /// Sample INPUT record (JSON) to flatten into source fields
        #[arg(long)]
        input_schema: PathBuf,

        /// Sample OUTPUT record (JSON) to flatten into target fields
        #[arg(long)]
        output_schema: PathBuf,

        /// Write the resulting model as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the generated script instead of the model JSON
        #[arg(long, default_value_t = false)]
        emit_script: bool,
    },
    /// Flatten a record schema into its dotted field index
    Index {
        /// Sample record (JSON) to flatten
        #[arg(short, long)]
        schema: PathBuf,
    },
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if an input file cannot be read or parsed as JSON, or
/// an output file cannot be written. A template in which no mappings are
/// recognized is reported as a non-fatal condition, not an error.
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Generate { model, output } => {
            let model = read_model(model)?;
            let script = generate_script(&model);
            match output {
                Some(path) => {
                    fs::write(path, &script)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), "wrote generated script");
                }
                None => print!("{script}"),
            }
            Ok(())
        }
        Commands::Parse { script, output } => {
            let text = read_text(script)?;
            match parse_template(&text) {
                ParseOutcome::NoMappings => {
                    warn!(path = %script.display(), "no mappings recognized");
                    println!("No mappings found in template; existing configuration is left untouched.");
                }
                ParseOutcome::Parsed(parsed) => {
                    println!(
                        "Recovered {} mapping(s) across {} module(s).",
                        parsed.total_mappings,
                        parsed.model.modules.len()
                    );
                    if let Some(path) = output {
                        write_model(path, &parsed.model)?;
                    }
                }
            }
            Ok(())
        }
        Commands::Diff {
            original,
            current,
            json,
        } => {
            let original_text = read_text(original)?;
            let current_text = read_text(current)?;
            let baseline = match parse_template(&original_text) {
                ParseOutcome::Parsed(parsed) => Some(parsed.model),
                ParseOutcome::NoMappings => None,
            };
            let current_model = match parse_template(&current_text) {
                ParseOutcome::Parsed(parsed) => parsed.model,
                ParseOutcome::NoMappings => {
                    warn!(path = %current.display(), "no mappings recognized");
                    println!("No mappings found in current template; nothing to compare.");
                    return Ok(());
                }
            };
            let report = diff_models(baseline.as_ref(), &current_model);
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_diff(&report);
            }
            Ok(())
        }
        Commands::Automap {
            input_schema,
            output_schema,
            output,
            emit_script,
        } => {
            let input_fields = flatten_schema(&read_json(input_schema)?);
            let output_fields = flatten_schema(&read_json(output_schema)?);

            let mut model = MappingModel::new();
            let installed =
                apply_auto_map(&mut model, MAIN_MODULE, &input_fields, &output_fields)
                    .unwrap_or(0);
            println!(
                "Auto-mapped {} of {} output field(s).",
                installed,
                output_fields.len()
            );
            if *emit_script {
                print!("{}", generate_script(&model));
            }
            if let Some(path) = output {
                write_model(path, &model)?;
            }
            Ok(())
        }
        Commands::Index { schema } => {
            let fields = flatten_schema(&read_json(schema)?);
            for field in &fields {
                println!(
                    "{:indent$}{} ({})",
                    "",
                    field.path,
                    field.field_type,
                    indent = field.depth * 2
                );
            }
            println!("{} field(s).", fields.len());
            Ok(())
        }
    }
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = read_text(path)?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))
}

fn read_model(path: &Path) -> anyhow::Result<MappingModel> {
    let text = read_text(path)?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid mapping model", path.display()))
}

fn write_model(path: &Path, model: &MappingModel) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(model)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote mapping model");
    Ok(())
}

fn print_diff(report: &ModelDiff) {
    if !report.has_baseline {
        println!("New configuration: no original snapshot to compare against.");
        return;
    }
    println!(
        "added: {}  removed: {}  modified: {}  unchanged: {}",
        report.added.len(),
        report.removed.len(),
        report.modified.len(),
        report.unchanged.len()
    );
    for entry in &report.added {
        println!("  + {}/{}", entry.module, entry.key);
    }
    for entry in &report.removed {
        println!("  - {}/{}", entry.module, entry.key);
    }
    for pair in &report.modified {
        println!(
            "  ~ {}/{} ({} -> {})",
            pair.current.module,
            pair.current.key,
            pair.original.source.as_deref().unwrap_or("-"),
            pair.current.source.as_deref().unwrap_or("-")
        );
    }
}
