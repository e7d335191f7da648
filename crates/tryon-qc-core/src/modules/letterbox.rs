//! Letterbox bar detection and removal.
//!
//! Generators sometimes pad their output with uniform near-black bars along
//! one or more edges. The cropper scans inward from each edge independently,
//! counts contiguous near-black rows/columns, and crops the union. Runs that
//! are too shallow to be bars, or deep enough to be legitimate dark content,
//! crop nothing from their edge.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use image::imageops;
use image::{GrayImage, RgbImage};
use tracing::debug;

use crate::domain::CropOutcome;

/// Configuration for letterbox removal.
#[derive(Debug, Clone)]
pub struct LetterboxConfig {
    /// Maximum intensity for a pixel to count as near-black.
    pub dark_threshold: u8,
    /// Fraction of a row/column that must be near-black for it to count.
    pub dark_fraction: f64,
    /// Minimum run depth (pixels) for an edge run to count as letterbox.
    pub min_run: u32,
    /// Maximum run depth as a fraction of the scanned dimension. Deeper runs
    /// are treated as legitimate dark content and left alone.
    pub max_run_fraction: f64,
    /// Minimum width/height that must remain after cropping.
    pub min_remaining: u32,
}

impl Default for LetterboxConfig {
    fn default() -> Self {
        Self {
            dark_threshold: 16,
            dark_fraction: 0.98,
            min_run: 6,
            max_run_fraction: 0.20,
            min_remaining: 10,
        }
    }
}

/// Letterbox removal component.
pub struct LetterboxCropper {
    config: LetterboxConfig,
}

/// Per-edge run lengths, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeRuns {
    top: u32,
    bottom: u32,
    left: u32,
    right: u32,
}

impl LetterboxCropper {
    /// Creates a new cropper with the given configuration.
    #[must_use]
    pub const fn new(config: LetterboxConfig) -> Self {
        Self { config }
    }

    /// Returns the cropper configuration.
    #[must_use]
    pub const fn config(&self) -> &LetterboxConfig {
        &self.config
    }

    /// Detects and removes uniform near-black bars from the image edges.
    ///
    /// Never fails: any disqualifying condition returns
    /// [`CropOutcome::Unchanged`].
    #[must_use]
    pub fn remove(&self, image: &RgbImage) -> CropOutcome {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return CropOutcome::Unchanged;
        }

        let gray = imageops::grayscale(image);
        let runs = self.edge_runs(&gray);
        if runs == (EdgeRuns { top: 0, bottom: 0, left: 0, right: 0 }) {
            return CropOutcome::Unchanged;
        }

        let new_width = i64::from(width) - i64::from(runs.left) - i64::from(runs.right);
        let new_height = i64::from(height) - i64::from(runs.top) - i64::from(runs.bottom);
        if new_width < i64::from(self.config.min_remaining)
            || new_height < i64::from(self.config.min_remaining)
        {
            debug!("letterbox crop skipped: {new_width}x{new_height} remainder too small");
            return CropOutcome::Unchanged;
        }

        debug!(
            "letterbox runs t={} b={} l={} r={}",
            runs.top, runs.bottom, runs.left, runs.right
        );
        let cropped = imageops::crop_imm(
            image,
            runs.left,
            runs.top,
            new_width as u32,
            new_height as u32,
        )
        .to_image();
        CropOutcome::Cropped(cropped)
    }

    fn edge_runs(&self, gray: &GrayImage) -> EdgeRuns {
        let (width, height) = gray.dimensions();
        let row_is_dark = |y: u32| self.span_is_dark((0..width).map(|x| gray.get_pixel(x, y)[0]));
        let col_is_dark = |x: u32| self.span_is_dark((0..height).map(|y| gray.get_pixel(x, y)[0]));

        let top = count_run(0..height, &row_is_dark);
        let bottom = count_run((0..height).rev(), &row_is_dark);
        let left = count_run(0..width, &col_is_dark);
        let right = count_run((0..width).rev(), &col_is_dark);

        EdgeRuns {
            top: self.qualify(top, height),
            bottom: self.qualify(bottom, height),
            left: self.qualify(left, width),
            right: self.qualify(right, width),
        }
    }

    /// Tests whether a full row/column span is near-black.
    fn span_is_dark(&self, span: impl Iterator<Item = u8>) -> bool {
        let mut total = 0u32;
        let mut dark = 0u32;
        for value in span {
            total += 1;
            if value <= self.config.dark_threshold {
                dark += 1;
            }
        }
        total > 0 && f64::from(dark) / f64::from(total) >= self.config.dark_fraction
    }

    /// Applies the minimum-depth and maximum-depth rules to a raw run.
    fn qualify(&self, run: u32, dimension: u32) -> u32 {
        let cap = (f64::from(dimension) * self.config.max_run_fraction).floor() as u32;
        if run < self.config.min_run || run > cap {
            0
        } else {
            run
        }
    }
}

impl Default for LetterboxCropper {
    fn default() -> Self {
        Self::new(LetterboxConfig::default())
    }
}

/// Counts the leading contiguous qualifying positions of a scan.
fn count_run(scan: impl Iterator<Item = u32>, is_dark: impl Fn(u32) -> bool) -> u32 {
    let mut run = 0u32;
    for position in scan {
        if is_dark(position) {
            run += 1;
        } else {
            break;
        }
    }
    run
}
