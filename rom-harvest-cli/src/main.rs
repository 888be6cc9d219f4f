//! rom-harvest CLI
//!
//! Command-line interface for extracting ROMs embedded in retro game
//! collections.

mod cli_types;
mod commands;
mod error;

use std::io::Write;

use clap::Parser;
use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::List { json } => commands::list::run_list(json),
        Commands::Extract {
            task,
            input,
            output,
            partials,
            report,
        } => commands::extract::run_extract(
            &task,
            &input,
            &output,
            partials.as_override(),
            report,
            cli.quiet,
        ),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::SetPartials { enabled } => {
                commands::config::run_config_set_partials(Some(enabled))
            }
            ConfigAction::ClearPartials => commands::config::run_config_set_partials(None),
        },
    };

    if let Err(e) = result {
        log::error!(
            "{} {}",
            "Error:".if_supports_color(Stdout, |t| t.red()),
            e
        );
        std::process::exit(1);
    }
}

/// Set up the global logger.
///
/// Normal output from this crate goes through `log::info!`; the library
/// crates stay at `warn` unless `--verbose` is given. `RUST_LOG` directives
/// are applied on top.
fn init_logging(quiet: bool, verbose: bool) {
    let (own, libs) = if verbose {
        (LevelFilter::Debug, LevelFilter::Debug)
    } else if quiet {
        (LevelFilter::Warn, LevelFilter::Warn)
    } else {
        (LevelFilter::Info, LevelFilter::Warn)
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .filter_module("rom_harvest_cli", own)
        .filter_module("rom_harvest_lib", libs)
        .filter_module("rom_harvest_core", libs)
        .target(env_logger::Target::Stdout);

    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }

    builder.parse_default_env();
    builder.init();
}

/// Print an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}
