//! Main entry point for the avatar CLI

mod cli;
mod commands;
mod config;
mod utils;

use anyhow::Result;
use clap::CommandFactory;
use clap::Parser;
use clap_complete::{Generator, generate};
use std::io;
use std::process::ExitCode;

use crate::cli::{Cli, Commands};

fn main() -> ExitCode {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logger; RUST_LOG still wins over -v/-q
    let default_filter = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // Execute command; failures go to the log sink exactly once
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Rig { command } => commands::rig::execute(command),

        Commands::Gesture { command } => commands::gesture::execute(command),

        Commands::Completions { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}
