use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct DtogenCli {
    /// Log every resolved node
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: DtogenCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum DtogenCommand {
    /// Synthesize the DTO graph of a form or page
    Generate {
        /// Fully qualified name of the root model type
        #[arg(long)]
        root: String,
        /// Model snapshot (.ron, or .json); defaults to dtogen.ron in the workspace
        #[arg(long)]
        model: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Ron)]
        format: OutputFormat,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the nodes visited under a root and what each one generates
    PrintTree {
        #[arg(long)]
        root: String,
        #[arg(long)]
        model: Option<PathBuf>,
    },
    /// Write a starter model with the framework runtime and a sample form
    Init {
        #[arg(long, default_value = dtogen_common::workspace::MODEL_FILE_NAME)]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Ron,
    Json,
}
