//! Finish command - post-process an accepted candidate.
//!
//! Grafts the source face onto the generated image and removes letterbox
//! bars, then writes the result as PNG and prints a JSON report.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use tracing::{debug, info};
use tryon_qc_adapters::{load_rgb, save_png, set_models_dir, RustfaceDetector};
use tryon_qc_core::{
    BlendConfig, FaceBlender, FinishReport, ImageDimensions, LetterboxCropper,
};

use super::iso_timestamp;
use crate::config::AppConfig;

/// Blend bounds preset.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BoundsChoice {
    /// First-pass bounds (1%-25% of frame area).
    Strict,
    /// Retry bounds (0.8%-40% of frame area).
    Retry,
}

/// Arguments for the finish command.
#[derive(Args, Clone)]
pub struct FinishArgs {
    /// Source portrait image
    #[arg(long)]
    pub source: PathBuf,

    /// Generated candidate image to post-process
    #[arg(long)]
    pub generated: PathBuf,

    /// Output path (PNG)
    #[arg(long, short)]
    pub out: PathBuf,

    /// Blend bounds preset
    #[arg(long, value_enum)]
    pub bounds: Option<BoundsChoice>,

    /// Seamless-clone solver sweeps
    #[arg(long)]
    pub solver_iterations: Option<u32>,

    /// Skip the face graft
    #[arg(long)]
    pub no_blend: bool,

    /// Skip letterbox removal
    #[arg(long)]
    pub no_crop: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,

    /// Custom models directory (overrides default and config)
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,
}

impl FinishArgs {
    /// Apply configuration file values, respecting CLI precedence.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if args.bounds.is_none() {
            args.bounds = config.blend.bounds.as_deref().and_then(|name| match name {
                "strict" => Some(BoundsChoice::Strict),
                "retry" => Some(BoundsChoice::Retry),
                _ => None,
            });
        }
        args.solver_iterations = args.solver_iterations.or(config.blend.solver_iterations);
        if args.models_dir.is_none() {
            args.models_dir.clone_from(&config.models.dir);
        }
        args
    }

    fn blend_config(&self) -> BlendConfig {
        let mut config = match self.bounds {
            Some(BoundsChoice::Strict) => BlendConfig::strict(),
            Some(BoundsChoice::Retry) | None => BlendConfig::retry(),
        };
        if let Some(iterations) = self.solver_iterations {
            config.solver_iterations = iterations;
        }
        config
    }
}

/// Run the finish command.
pub fn run(args: &FinishArgs) -> Result<()> {
    if let Some(ref models_dir) = args.models_dir {
        debug!("Using custom models directory: {}", models_dir.display());
        set_models_dir(Some(models_dir.clone()));
    }

    let source = load_rgb(&args.source)?;
    let generated = load_rgb(&args.generated)?;
    info!(
        "Finishing {} ({}x{})",
        args.generated.display(),
        generated.width(),
        generated.height()
    );

    let (blended, blend_skipped, did_blend) = if args.no_blend {
        (generated, None, false)
    } else {
        let detector = RustfaceDetector::from_installed_model()?;
        let blender = FaceBlender::new(args.blend_config());
        let outcome = blender.blend(&detector, &source, &generated);
        let skip = outcome.skip_reason();
        (outcome.into_image(generated), skip, skip.is_none())
    };

    let (finished, did_crop) = if args.no_crop {
        (blended, false)
    } else {
        let outcome = LetterboxCropper::default().remove(&blended);
        let did_crop = outcome.did_crop();
        (outcome.into_image(blended), did_crop)
    };

    save_png(&finished, &args.out)?;

    let report = FinishReport {
        path: args.out.to_string_lossy().into_owned(),
        timestamp: iso_timestamp(),
        dimensions: ImageDimensions::new(finished.width(), finished.height()),
        blended: did_blend,
        blend_skipped,
        letterbox_cropped: did_crop,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}
