mod app;
mod cli;
mod client;
mod config;
mod consts;
mod core;
mod error;
mod job;
mod logging;
mod output;
mod utils;

use std::process::ExitCode;

use clap::Parser;

use cli::{Cli, Commands};
use config::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command() {
        Commands::Extract(args) => app::handle_extract(args, &config),
        Commands::Aggregate(args) => app::handle_aggregate(&args),
        Commands::Jobs => {
            app::print_jobs();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
