//! Models command - manage detector models.

use anyhow::Result;
use clap::{Args, Subcommand};
use tryon_qc_adapters::models::{ensure_models, list_models, models_dir, MODELS};

/// Arguments for the models command
#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Models subcommands
#[derive(Subcommand)]
pub enum ModelsCommand {
    /// Download required models
    Fetch,
    /// List installed models
    List,
    /// Print model directory path
    Path,
}

/// Run the models command.
pub fn run(args: &ModelsArgs) -> Result<()> {
    match args.command {
        ModelsCommand::Fetch => fetch(),
        ModelsCommand::List => list(),
        ModelsCommand::Path => print_path(),
    }
}

fn fetch() -> Result<()> {
    ensure_models()?;
    println!("All models installed in {}", models_dir().display());
    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn list() -> Result<()> {
    let models = list_models();
    let dir = models_dir();

    println!("Models directory: {}", dir.display());
    println!();

    for (name, installed) in &models {
        let status = if *installed { "✓" } else { "✗" };
        let info = MODELS.iter().find(|model| model.name == name);
        let filename = info.map_or("unknown", |model| model.filename);
        println!("  {status} {name} ({filename})");
    }

    println!();
    let installed_count = models.iter().filter(|(_, installed)| *installed).count();
    println!("{}/{} models installed", installed_count, models.len());

    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn print_path() -> Result<()> {
    println!("{}", models_dir().display());
    Ok(())
}
