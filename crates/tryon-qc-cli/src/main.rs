//! Try-on QC CLI - quality control for generated try-on images.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let exit_code = match cli.command {
        Some(Commands::Gate(args)) => {
            let args = commands::gate::GateArgs::with_config(args, &config);
            match commands::gate::run(&args) {
                Ok(result) => result.exit_code,
                Err(error) => {
                    eprintln!("error: {error:#}");
                    ExitCode::Error
                }
            }
        }
        Some(Commands::Finish(args)) => {
            let args = commands::finish::FinishArgs::with_config(args, &config);
            match commands::finish::run(&args) {
                Ok(()) => ExitCode::Success,
                Err(error) => {
                    eprintln!("error: {error:#}");
                    ExitCode::Error
                }
            }
        }
        Some(Commands::Models(ref args)) => match commands::models::run(args) {
            Ok(()) => ExitCode::Success,
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::Error
            }
        },
        None => {
            // Default behavior: run gate with flattened args
            if cli.gate.paths.is_empty() {
                eprintln!("error: No paths specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            let args = commands::gate::GateArgs::with_config(cli.gate, &config);
            match commands::gate::run(&args) {
                Ok(result) => result.exit_code,
                Err(error) => {
                    eprintln!("error: {error:#}");
                    ExitCode::Error
                }
            }
        }
    };

    exit_code.into()
}
