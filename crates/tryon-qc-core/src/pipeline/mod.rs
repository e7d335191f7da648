//! Generation pipeline: request preparation and the retry/variant loop.

mod orchestrator;
mod prepare;

pub use orchestrator::{
    AttemptPolicy, TryOnPipeline, MAX_ATTEMPTS_PER_VARIANT, MAX_VARIANTS,
};
pub use prepare::{
    clamp_max_dimension, downscale_max_dim, flatten_over_white, remove_background_or_original,
    DEFAULT_MAX_DIMENSION,
};
