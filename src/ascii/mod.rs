//! Image analysis pipeline for converting rasters to ASCII art.
//!
//! The stages, in data-flow order:
//!
//! 1. **Resampling** - bilinear rescale onto the character grid
//! 2. **Edge detection** - Sobel gradients over parallel row blocks
//! 3. **Color conversion** - batch RGB to HSV for hue mode
//! 4. **Glyph mapping** - density ramp, hue emphasis and edge glyphs
//!
//! Edge detection and color conversion each have a portable reference
//! engine and a SIMD engine behind a trait ([`GradientEngine`],
//! [`ColorEngine`]); both produce the same results within float tolerance.

pub mod charset;
pub mod color;
pub mod dimensions;
pub mod edges;
pub mod mapping;
pub mod raster;
pub mod resample;

pub use charset::{edge_glyph, EdgeDirection, Ramp, DETAILED_RAMP, SIMPLE_RAMP};
pub use color::{rgb_to_hsv, ColorBackend, ColorEngine, HsvSample, ReferenceColor, SimdColor};
pub use dimensions::{
    compensate_height, grid_dimensions, DEFAULT_HEIGHT, DEFAULT_WIDTH, VERTICAL_COMPENSATION,
};
pub use edges::{
    detect_edges, partition_rows, resolve_threads, EdgeBackend, EdgeDetector, EdgeField,
    EdgeInfo, GradientEngine, ReferenceGradient, SimdGradient, DEFAULT_BLOCK_ROWS, MAX_THREADS,
};
pub use mapping::{
    gamma_correct, quantize, GlyphCell, GlyphMapper, HuePolicy, EDGE_THRESHOLD, GAMMA,
};
pub use raster::{luminance_of, RasterError, RasterImage, Rgb, LUMA_WEIGHTS};
pub use resample::resample;
