//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tasmovie")]
#[command(about = "Read metadata from TAS movie files", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Parse movie files, or every movie file inside the given directories
    Parse {
        /// Movie files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print one JSON object per file instead of formatted output
        #[arg(long)]
        json: bool,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Reject inputs larger than this many bytes (overrides settings)
        #[arg(long)]
        max_input_bytes: Option<u64>,
    },

    /// List supported movie formats
    List,

    /// Inspect the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a settings file with the default limits if none exists
    Init,

    /// Print the settings file path
    Path,

    /// Show the effective settings and where they came from
    Show,
}
