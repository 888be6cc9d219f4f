//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rom-harvest")]
#[command(about = "Extract ROMs embedded in retro game collections", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags overriding the saved partial-extraction setting.
#[derive(Args, Clone, Copy)]
pub(crate) struct PartialArgs {
    /// Also extract partial and unresolved ROM sets (prefixed with "partial_")
    #[arg(long, conflicts_with = "no_partials")]
    pub include_partials: bool,

    /// Skip partial and unresolved ROM sets even if enabled in settings
    #[arg(long)]
    pub no_partials: bool,
}

impl PartialArgs {
    /// The override to apply on top of the settings file, if any.
    pub fn as_override(&self) -> Option<bool> {
        match (self.include_partials, self.no_partials) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List supported collections and their ROM sets
    List {
        /// Print the catalogs as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract every ROM set of a collection
    Extract {
        /// Collection to extract from (see `rom-harvest list`)
        task: String,

        /// Install folder of the collection
        #[arg(short, long)]
        input: PathBuf,

        /// Folder to write ROM files into (created if missing)
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        partials: PartialArgs,

        /// Write a plain-text report of every entry to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Manage saved extraction defaults
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings and their sources
    Show,

    /// Print the settings file path
    Path,

    /// Save whether partial ROM sets are extracted by default
    SetPartials {
        /// true/false, yes/no or on/off
        #[arg(value_parser = clap::builder::BoolishValueParser::new(), action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// Remove the saved partial-extraction default
    ClearPartials,
}
