//! Configuration file support for tryon-qc.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/tryon-qc/config.toml` (lowest priority)
//! - Project-local: `.tryon-qc.toml` (searched up the directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Artifact screening settings.
    pub screen: ScreenConfig,
    /// Face blending settings.
    pub blend: BlendSection,
    /// Letterbox removal settings.
    pub letterbox: LetterboxSection,
    /// Model settings.
    pub models: ModelsSection,
    /// Output formatting settings.
    pub output: OutputSection,
}

/// Artifact screening configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Policy preset: "strict" or "relaxed".
    pub policy: Option<String>,
    /// Vertical-center fraction above which a face is rejected (0.0-1.0).
    pub max_center_fraction: Option<f64>,
    /// Minimum plausible face area fraction (0.0-1.0).
    pub min_area_fraction: Option<f64>,
    /// Maximum plausible face area fraction (0.0-1.0).
    pub max_area_fraction: Option<f64>,
}

/// Face blending configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct BlendSection {
    /// Bounds preset: "strict" or "retry".
    pub bounds: Option<String>,
    /// Seamless-clone solver sweeps.
    pub solver_iterations: Option<u32>,
}

/// Letterbox removal configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct LetterboxSection {
    /// Maximum near-black intensity (0-255).
    pub dark_threshold: Option<u8>,
    /// Fraction of a row/column that must be near-black (0.0-1.0).
    pub dark_fraction: Option<f64>,
    /// Minimum bar depth in pixels.
    pub min_run: Option<u32>,
    /// Maximum bar depth as a fraction of the dimension (0.0-1.0).
    pub max_run_fraction: Option<f64>,
}

/// Model configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsSection {
    /// Custom models directory path.
    pub dir: Option<PathBuf>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/tryon-qc/config.toml`
    /// 2. Project-local: `.tryon-qc.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as
    /// warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(error) = config.validate() {
            eprintln!("warning: {error}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if let Some(ref policy) = self.screen.policy {
            if policy != "strict" && policy != "relaxed" {
                return Err(format!(
                    "screen.policy must be 'strict' or 'relaxed', got '{policy}'"
                ));
            }
        }
        for (name, value) in [
            ("screen.max_center_fraction", self.screen.max_center_fraction),
            ("screen.min_area_fraction", self.screen.min_area_fraction),
            ("screen.max_area_fraction", self.screen.max_area_fraction),
            ("letterbox.dark_fraction", self.letterbox.dark_fraction),
            ("letterbox.max_run_fraction", self.letterbox.max_run_fraction),
        ] {
            if let Some(value) = value {
                if !(0.0..=1.0).contains(&value) {
                    return Err(format!("{name} must be 0.0-1.0, got {value}"));
                }
            }
        }
        if let Some(ref bounds) = self.blend.bounds {
            if bounds != "strict" && bounds != "retry" {
                return Err(format!(
                    "blend.bounds must be 'strict' or 'retry', got '{bounds}'"
                ));
            }
        }
        if let Some(ref format) = self.output.format {
            if format != "json" && format != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{format}'"
                ));
            }
        }
        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.screen.policy = other.screen.policy.or_else(|| self.screen.policy.take());
        self.screen.max_center_fraction = other
            .screen
            .max_center_fraction
            .or(self.screen.max_center_fraction);
        self.screen.min_area_fraction = other
            .screen
            .min_area_fraction
            .or(self.screen.min_area_fraction);
        self.screen.max_area_fraction = other
            .screen
            .max_area_fraction
            .or(self.screen.max_area_fraction);

        self.blend.bounds = other.blend.bounds.or_else(|| self.blend.bounds.take());
        self.blend.solver_iterations = other
            .blend
            .solver_iterations
            .or(self.blend.solver_iterations);

        self.letterbox.dark_threshold = other
            .letterbox
            .dark_threshold
            .or(self.letterbox.dark_threshold);
        self.letterbox.dark_fraction = other
            .letterbox
            .dark_fraction
            .or(self.letterbox.dark_fraction);
        self.letterbox.min_run = other.letterbox.min_run.or(self.letterbox.min_run);
        self.letterbox.max_run_fraction = other
            .letterbox
            .max_run_fraction
            .or(self.letterbox.max_run_fraction);

        self.models.dir = other.models.dir.or_else(|| self.models.dir.take());

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tryon-qc").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.tryon-qc.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".tryon-qc.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), error);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(error) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), error);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.screen.policy.is_none());
        assert!(config.blend.bounds.is_none());
        assert!(config.letterbox.dark_threshold.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: AppConfig = toml::from_str("").expect("parse empty config");
        assert!(config.screen.policy.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r"
[screen]
policy = 'strict'
max_center_fraction = 0.6
min_area_fraction = 0.01
max_area_fraction = 0.35

[blend]
bounds = 'retry'
solver_iterations = 300

[letterbox]
dark_threshold = 20
dark_fraction = 0.97
min_run = 8
max_run_fraction = 0.25

[output]
format = 'json'
pretty = true
";
        let config: AppConfig = toml::from_str(toml).expect("parse full config");

        assert_eq!(config.screen.policy.as_deref(), Some("strict"));
        assert_eq!(config.screen.max_center_fraction, Some(0.6));
        assert_eq!(config.blend.bounds.as_deref(), Some("retry"));
        assert_eq!(config.blend.solver_iterations, Some(300));
        assert_eq!(config.letterbox.dark_threshold, Some(20));
        assert_eq!(config.letterbox.min_run, Some(8));
        assert_eq!(config.output.format, Some("json".to_string()));
        assert_eq!(config.output.pretty, Some(true));
    }

    #[test]
    fn test_merge_overrides_and_preserves() {
        let mut base: AppConfig = toml::from_str(
            r"
[screen]
policy = 'strict'
max_center_fraction = 0.6

[letterbox]
min_run = 8
",
        )
        .expect("parse base");

        let override_config: AppConfig = toml::from_str(
            r"
[screen]
policy = 'relaxed'

[blend]
solver_iterations = 500
",
        )
        .expect("parse override");

        base.merge(override_config);

        assert_eq!(base.screen.policy.as_deref(), Some("relaxed"));
        assert_eq!(base.screen.max_center_fraction, Some(0.6));
        assert_eq!(base.letterbox.min_run, Some(8));
        assert_eq!(base.blend.solver_iterations, Some(500));
    }

    #[test]
    fn test_merge_empty_override_preserves_base() {
        let mut base: AppConfig = toml::from_str(
            r"
[screen]
max_center_fraction = 0.65
",
        )
        .expect("parse base");

        base.merge(AppConfig::default());
        assert_eq!(base.screen.max_center_fraction, Some(0.65));
    }

    #[test]
    fn test_invalid_toml_syntax_handled() {
        let toml = r"
[screen
policy = 'strict'
";
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err(), "invalid TOML should return error");
    }

    #[test]
    fn test_invalid_field_type_handled() {
        let toml = r#"
[screen]
max_center_fraction = "not a number"
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err(), "type mismatch should return error");
    }

    #[test]
    fn test_validate_fraction_out_of_range() {
        let mut config = AppConfig::default();
        config.screen.max_center_fraction = Some(1.5);

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("screen.max_center_fraction"));
    }

    #[test]
    fn test_validate_policy_name() {
        let mut config = AppConfig::default();
        config.screen.policy = Some("lenient".to_string());

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("screen.policy"));
    }

    #[test]
    fn test_validate_output_format() {
        let mut config = AppConfig::default();
        config.output.format = Some("xml".to_string());

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("output.format"));
    }

    #[test]
    fn test_validate_empty_config_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_find_config_in_parents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).expect("mkdirs");
        std::fs::write(dir.path().join(".tryon-qc.toml"), "[screen]\n").expect("write");

        let found = find_config_in_parents(&nested).expect("config found");
        assert_eq!(found, dir.path().join(".tryon-qc.toml"));
    }
}
