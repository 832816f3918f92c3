//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod annotate;
mod config_cmd;
mod helpers;
mod lookup;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};
use crate::lexical::LexicalBackendKind;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "biolex")]
#[command(about = "Linguistic and biomedical annotation of natural-language questions")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Resolve relative paths from current working directory instead of config file location
    #[arg(long, global = true)]
    cwd: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate every sentence of a newline-delimited corpus
    Annotate {
        /// Corpus file, one sentence per line
        input: PathBuf,
        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Limit number of sentences considered (0 = all)
        #[arg(short, long, default_value = "0")]
        limit: usize,
        /// Lexical backend (overrides config)
        #[arg(long, value_enum)]
        lexical: Option<LexicalBackendKind>,
    },

    /// Look up candidate identifiers for a term
    Lookup {
        /// Term to resolve
        term: String,
    },

    /// Normalize an identifier (CURIE) to its equivalents
    Normalize {
        /// Identifier, e.g. MESH:D001241
        curie: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective settings
    Show,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        use_cwd: cli.cwd,
    };
    let (mut settings, config) = load_settings_with_options(options)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Commands::Annotate {
            input,
            output,
            format,
            limit,
            lexical,
        } => {
            if let Some(dir) = output {
                settings.output_dir = dir;
            }
            if let Some(format) = format {
                settings.format = format;
            }
            if let Some(kind) = lexical {
                settings.lexical.backend = kind;
            }
            annotate::cmd_annotate(&settings, &input, limit).await
        }
        Commands::Lookup { term } => lookup::cmd_lookup(&settings, &term).await,
        Commands::Normalize { curie } => lookup::cmd_normalize(&settings, &curie).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&settings, &config),
        },
    }
}
