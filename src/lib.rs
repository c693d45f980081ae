// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod document;
pub mod errors;
pub mod logging;
pub mod types;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::ConfigFile;
use crate::dag::{Field, GraphModel};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution
/// - document loading + validation
/// - the requested subcommand
pub fn run(args: CliArgs) -> Result<()> {
    let cfg = config::resolve(args.config.as_deref())?;
    let doc_path = document_path(&args.command, &cfg);

    let mut options = cfg.model_options();
    if let Some(policy) = args.logic_inputs {
        options.logic_inputs = policy;
    }

    let model = document::load_model(&doc_path, &options)
        .with_context(|| format!("failed to load graph from {}", doc_path.display()))?;

    info!(
        path = %doc_path.display(),
        nodes = model.node_count(),
        fields = model.field_count(),
        "graph is valid"
    );

    match args.command {
        Command::Validate { .. } => print_summary(&model),
        Command::Order { fields, .. } => print_order(&model, fields),
        Command::Fields { node, .. } => print_node_fields(&model, &node)?,
        Command::Normalize { output, .. } => {
            let doc = model.to_document();
            match output {
                Some(path) => document::write_document(&path, &doc)?,
                None => println!("{}", document::to_json_string(&doc)?),
            }
        }
    }

    Ok(())
}

/// Document from the command line, falling back to `[document].path`.
fn document_path(command: &Command, cfg: &ConfigFile) -> PathBuf {
    command
        .document()
        .cloned()
        .unwrap_or_else(|| cfg.document.path.clone())
}

fn print_summary(model: &GraphModel) {
    match model.name() {
        Some(name) => println!("valid: {name}"),
        None => println!("valid"),
    }
    println!("  nodes:  {}", model.node_count());
    println!("  edges:  {}", model.edge_count());
    println!("  fields: {}", model.field_count());
    println!("  logics: {}", model.logic_count());
    println!("  roots:  {:?}", model.roots());
}

fn print_order(model: &GraphModel, fields: bool) {
    let order: Vec<&str> = if fields {
        model.field_evaluation_order().collect()
    } else {
        model.topological_order().collect()
    };

    for id in order {
        println!("{id}");
    }
    debug!(fields, "order printed");
}

fn print_node_fields(model: &GraphModel, node: &str) -> Result<()> {
    let produced = model.fields_produced_by(node)?;
    let consumed = model.fields_consumed_by(node)?;

    println!("node {node}");
    println!("  produces:");
    for field in produced {
        print_field(model, field);
    }
    println!("  consumes:");
    for field in consumed {
        print_field(model, field);
    }
    Ok(())
}

fn print_field(model: &GraphModel, field: &Field) {
    println!("    - {} ({})", field.id, field.name);
    if !field.depends_on.is_empty() {
        println!("        depends on: {:?}", field.depends_on);
    }
    if let Some(logic) = model.logic_for(&field.id) {
        if !logic.description.is_empty() {
            println!("        logic: {}", logic.description);
        }
    }
}
