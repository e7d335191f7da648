//! CLI command definitions and handlers.

pub mod finish;
pub mod gate;
pub mod models;

use clap::{Parser, Subcommand};

/// Try-on QC - quality control for generated try-on images
#[derive(Parser)]
#[command(name = "tryon-qc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared gate arguments (paths, thresholds, flags).
    #[command(flatten)]
    pub gate: gate::GateArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Screen generated candidates for collage/inset artifacts
    Gate(gate::GateArgs),
    /// Post-process an accepted candidate (face graft + letterbox crop)
    Finish(finish::FinishArgs),
    /// Manage detector models
    Models(models::ModelsArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Everything processed, nothing rejected.
    Success,
    /// At least one candidate was rejectable.
    Rejected,
    /// A command failed.
    Error,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::from(0),
            ExitCode::Rejected => Self::from(1),
            ExitCode::Error => Self::from(2),
        }
    }
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
pub fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(timestamp) => timestamp,
        Err(error) => {
            tracing::debug!("Timestamp format failed: {error}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
