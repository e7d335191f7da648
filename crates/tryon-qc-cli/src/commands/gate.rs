//! Gate command - screen generated candidates for artifacts.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use tracing::{debug, info, warn};
use tryon_qc_adapters::{load_rgb, set_models_dir, RustfaceDetector};
use tryon_qc_core::{ArtifactScreen, GateReport, ImageDimensions, RejectPolicy, ReportSink};

use super::{iso_timestamp, ExitCode};
use crate::config::AppConfig;
use crate::output::JsonOutput;

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Screening policy preset.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyChoice {
    /// Stricter thresholds (0.6 center, 1%-35% area).
    Strict,
    /// Relaxed thresholds (0.7 center, 0.8%-40% area).
    Relaxed,
}

/// Parse and validate a fraction value (0.0-1.0).
fn parse_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0.0..=1.0"))
    }
}

/// Shared arguments for candidate screening.
#[derive(Args, Clone)]
pub struct GateArgs {
    /// Generated candidate images to screen
    pub paths: Vec<PathBuf>,

    /// Screening policy preset
    #[arg(long, value_enum)]
    pub policy: Option<PolicyChoice>,

    /// Vertical-center fraction above which a face is rejected (0.0-1.0)
    #[arg(long, value_parser = parse_fraction)]
    pub max_center: Option<f64>,

    /// Minimum plausible face area fraction (0.0-1.0)
    #[arg(long, value_parser = parse_fraction)]
    pub min_area: Option<f64>,

    /// Maximum plausible face area fraction (0.0-1.0)
    #[arg(long, value_parser = parse_fraction)]
    pub max_area: Option<f64>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Custom models directory (overrides default and config)
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,
}

impl GateArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (the relaxed policy)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if args.policy.is_none() {
            args.policy = config
                .screen
                .policy
                .as_deref()
                .and_then(|name| match name {
                    "strict" => Some(PolicyChoice::Strict),
                    "relaxed" => Some(PolicyChoice::Relaxed),
                    _ => None,
                });
        }

        args.max_center = args.max_center.or(config.screen.max_center_fraction);
        args.min_area = args.min_area.or(config.screen.min_area_fraction);
        args.max_area = args.max_area.or(config.screen.max_area_fraction);

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_deref()
                .and_then(|name| match name {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if args.models_dir.is_none() {
            args.models_dir.clone_from(&config.models.dir);
        }

        args
    }

    /// Builds the effective screening policy from preset and overrides.
    fn reject_policy(&self) -> RejectPolicy {
        let mut policy = match self.policy {
            Some(PolicyChoice::Strict) => RejectPolicy::strict(),
            Some(PolicyChoice::Relaxed) | None => RejectPolicy::relaxed(),
        };
        if let Some(value) = self.max_center {
            policy.max_center_fraction = value;
        }
        if let Some(value) = self.min_area {
            policy.min_area_fraction = value;
        }
        if let Some(value) = self.max_area {
            policy.max_area_fraction = value;
        }
        policy
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Jsonl)
    }
}

/// Result of running the gate command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct GateResult {
    /// Number of candidates screened.
    pub processed: usize,
    /// Number of candidates skipped (unreadable).
    pub skipped: usize,
    /// Number of rejectable candidates.
    pub rejected: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the gate command.
///
/// Expects `args` to have been processed through `with_config()` first.
pub fn run(args: &GateArgs) -> Result<GateResult> {
    info!("Screening {} candidate(s)", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    if let Some(ref models_dir) = args.models_dir {
        debug!("Using custom models directory: {}", models_dir.display());
        set_models_dir(Some(models_dir.clone()));
    }

    let detector = RustfaceDetector::from_installed_model()?;
    let screen = ArtifactScreen::new(args.reject_policy());
    let output = JsonOutput::stdout();

    let mut processed = 0usize;
    let mut skipped = 0usize;
    let mut rejected = 0usize;
    let mut all_reports = Vec::new();

    for path in &args.paths {
        let candidate = match load_rgb(path) {
            Ok(image) => image,
            Err(error) => {
                warn!("Skipping {}: {error:#}", path.display());
                skipped += 1;
                continue;
            }
        };

        let verdict = screen.evaluate(&detector, &candidate);
        if verdict.is_rejectable() {
            rejected += 1;
        }

        let report = GateReport::from_verdict(
            path.to_string_lossy(),
            iso_timestamp(),
            ImageDimensions::new(candidate.width(), candidate.height()),
            &verdict,
        );
        match args.format() {
            OutputFormat::Jsonl => output.write(&report)?,
            OutputFormat::Json => all_reports.push(report),
        }
        processed += 1;
    }

    if matches!(args.format(), OutputFormat::Json) {
        output.write_array(&all_reports, args.pretty)?;
    }
    output.flush()?;

    let exit_code = if rejected > 0 {
        ExitCode::Rejected
    } else {
        ExitCode::Success
    };
    Ok(GateResult {
        processed,
        skipped,
        rejected,
        exit_code,
    })
}
