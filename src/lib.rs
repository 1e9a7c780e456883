//! img-to-ascii library crate.
//!
//! Decoding, the analysis pipeline and terminal rendering. The binary adds
//! argument parsing and config merging on top.

pub mod ascii;
pub mod config;
pub mod decode;
pub mod pipeline;
pub mod renderer;

pub use pipeline::{Pipeline, PipelineConfig, PipelineError, Rendering, StageTimings};
