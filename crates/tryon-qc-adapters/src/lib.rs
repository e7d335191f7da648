//! Tryon QC adapters: external adapters for the try-on QC pipeline.
//!
//! This crate provides adapters for:
//! - Filesystem image loading/saving
//! - Detector model downloading and caching
//! - The SeetaFace (`rustface`) face detection backend

pub mod fs;
pub mod models;
pub mod rustface_backend;

pub use fs::{decode_rgb, load_rgb, save_png};
pub use models::{model_path, models_dir, set_models_dir};
pub use rustface_backend::RustfaceDetector;
