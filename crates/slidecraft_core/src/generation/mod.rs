//! crates/slidecraft_core/src/generation/mod.rs
//!
//! AI-assisted content generation: prompt templates, response normalization,
//! fallbacks, and the pipeline that ties them to a `LanguageModelService`.

pub mod angles;
pub mod fallback;
pub mod normalize;
pub mod pipeline;
pub mod prompt;

pub use pipeline::{GenerationError, GenerationPipeline};
