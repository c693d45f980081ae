// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::LogicInputsPolicy;

/// Command-line arguments for `fielddag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fielddag",
    version,
    about = "Validate node/field dependency graphs and print their evaluation order.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `FieldDag.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FIELDDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Override `[model].logic_inputs` from the config file.
    #[arg(long, value_enum, value_name = "POLICY", global = true)]
    pub logic_inputs: Option<LogicInputsPolicy>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Load a graph document and report whether it is valid.
    Validate {
        /// Graph document (JSON). Defaults to `[document].path`.
        document: Option<PathBuf>,
    },

    /// Print the dependency-respecting evaluation order.
    Order {
        document: Option<PathBuf>,

        /// Order fields instead of nodes.
        #[arg(long)]
        fields: bool,
    },

    /// Print the fields a node produces and consumes.
    Fields {
        document: Option<PathBuf>,

        #[arg(long, value_name = "ID")]
        node: String,
    },

    /// Re-serialize a validated graph with every collection sorted by id.
    Normalize {
        document: Option<PathBuf>,

        /// Write to this file instead of stdout.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

impl Command {
    /// The document path given on the command line, if any.
    pub fn document(&self) -> Option<&PathBuf> {
        match self {
            Command::Validate { document }
            | Command::Order { document, .. }
            | Command::Fields { document, .. }
            | Command::Normalize { document, .. } => document.as_ref(),
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
