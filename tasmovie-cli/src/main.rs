//! tasmovie CLI
//!
//! Command-line interface for reading metadata from TAS movie files.

mod cli_types;
mod commands;
mod error;
mod logging;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Failed to open log file: {}", e);
        std::process::exit(2);
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let registry = tasmovie_lib::init();

    match cli.command {
        Commands::Parse {
            paths,
            json,
            recursive,
            max_input_bytes,
        } => commands::parse::run_parse(
            registry,
            &paths,
            json,
            recursive,
            max_input_bytes,
            cli.quiet,
        ),
        Commands::List => {
            commands::list::run_list(registry);
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Init => commands::config::run_config_init(),
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
            ConfigAction::Show => commands::config::run_config_show(),
        },
    }
}
