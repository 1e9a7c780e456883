//! CLI enum types for backend and character set options.

use clap::ValueEnum;

use img_to_ascii::ascii::{ColorBackend, EdgeBackend, Ramp};

/// Implementation used by an accelerated stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Backend {
    /// Portable scalar code
    #[default]
    Reference,
    /// SIMD lanes
    #[value(alias = "simd")]
    Accelerated,
}

impl From<Backend> for EdgeBackend {
    fn from(b: Backend) -> Self {
        match b {
            Backend::Reference => EdgeBackend::Reference,
            Backend::Accelerated => EdgeBackend::Accelerated,
        }
    }
}

impl From<Backend> for ColorBackend {
    fn from(b: Backend) -> Self {
        match b {
            Backend::Reference => ColorBackend::Reference,
            Backend::Accelerated => ColorBackend::Accelerated,
        }
    }
}

/// Brightness ramp for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Charset {
    /// 70 levels
    #[default]
    Detailed,
    /// 10 levels
    Simple,
}

impl From<Charset> for Ramp {
    fn from(c: Charset) -> Self {
        match c {
            Charset::Detailed => Ramp::Detailed,
            Charset::Simple => Ramp::Simple,
        }
    }
}
