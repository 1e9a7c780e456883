//! Brightness, hue and edge data to character cells.

use super::charset::{edge_glyph, Ramp};
use super::color::{ColorBackend, ColorEngine, HsvSample};
use super::edges::EdgeField;
use super::raster::{luminance_of, RasterImage, Rgb};

/// Exponent applied to luminance before quantization.
/// Values below 1 lift the midtones.
pub const GAMMA: f32 = 0.8;

/// Normalized edge magnitude above which a direction glyph is drawn.
pub const EDGE_THRESHOLD: f32 = 0.25;

/// One output character with the source pixel's color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphCell {
    pub ch: char,
    pub color: Rgb,
}

/// Hue-mode override: saturated pixels inside a hue band get a fixed glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HuePolicy {
    /// Saturation must be strictly above this
    pub saturation_threshold: f32,
    /// Inclusive lower hue bound in degrees
    pub band_start: f32,
    /// Exclusive upper hue bound in degrees
    pub band_end: f32,
    pub glyph: char,
}

impl Default for HuePolicy {
    /// Blue-ish hues, [180, 260), drawn as `#`.
    fn default() -> Self {
        Self {
            saturation_threshold: 0.15,
            band_start: 180.0,
            band_end: 260.0,
            glyph: '#',
        }
    }
}

impl HuePolicy {
    pub fn emphasizes(&self, hsv: HsvSample) -> bool {
        hsv.s > self.saturation_threshold && hsv.h >= self.band_start && hsv.h < self.band_end
    }
}

/// Apply the midtone gamma curve and clamp to [0, 1].
#[inline]
pub fn gamma_correct(luminance: f32) -> f32 {
    luminance.powf(GAMMA).clamp(0.0, 1.0)
}

/// Index into a ramp of `levels` characters for a brightness in [0, 1].
///
/// Truncates toward zero; out-of-range input is clamped to the ramp.
#[inline]
pub fn quantize(level: f32, levels: usize) -> usize {
    if levels == 0 {
        return 0;
    }
    ((level * (levels - 1) as f32) as usize).min(levels - 1)
}

/// Chooses one character per pixel.
///
/// Precedence, highest first: edge direction glyph, hue emphasis glyph,
/// HSV value (hue mode) or gamma-corrected luminance.
pub struct GlyphMapper {
    ramp: Ramp,
    hue_policy: HuePolicy,
    edge_threshold: f32,
    color: Box<dyn ColorEngine>,
}

impl GlyphMapper {
    pub fn new(color: ColorBackend) -> Self {
        Self {
            ramp: Ramp::default(),
            hue_policy: HuePolicy::default(),
            edge_threshold: EDGE_THRESHOLD,
            color: color.engine(),
        }
    }

    pub fn with_ramp(mut self, ramp: Ramp) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn with_hue_policy(mut self, policy: HuePolicy) -> Self {
        self.hue_policy = policy;
        self
    }

    pub fn with_edge_threshold(mut self, threshold: f32) -> Self {
        self.edge_threshold = threshold;
        self
    }

    pub fn ramp(&self) -> Ramp {
        self.ramp
    }

    pub fn color_engine(&self) -> &dyn ColorEngine {
        self.color.as_ref()
    }

    /// Map every pixel of `img` to a [`GlyphCell`], row-major.
    ///
    /// Edge overrides apply only when `use_edges` is set and a valid field
    /// is supplied. Returns an empty vector for an invalid image.
    pub fn map(
        &self,
        img: &RasterImage,
        edges: Option<&EdgeField>,
        use_edges: bool,
        use_hue: bool,
    ) -> Vec<GlyphCell> {
        let hsv = if use_hue && img.is_valid() {
            Some(self.hue_samples(img))
        } else {
            None
        };
        let edges = if use_edges { edges } else { None };
        self.map_with(img, hsv.as_deref(), edges)
    }

    /// Batch HSV conversion of the whole image.
    pub fn hue_samples(&self, img: &RasterImage) -> Vec<HsvSample> {
        self.color.convert_batch(&img.rgb_triples())
    }

    /// Map with precomputed HSV samples (one per pixel) and an optional edge field.
    pub fn map_with(
        &self,
        img: &RasterImage,
        hsv: Option<&[HsvSample]>,
        edges: Option<&EdgeField>,
    ) -> Vec<GlyphCell> {
        if !img.is_valid() {
            return Vec::new();
        }

        let chars = self.ramp.chars();
        let levels = chars.len();
        let edges = edges.filter(|e| e.is_valid());
        let width = img.width();

        (0..img.pixel_count())
            .map(|i| {
                let color = img.rgb_at(i);
                let mut ch = chars[quantize(gamma_correct(luminance_of(color.to_f32())), levels)];

                if let Some(sample) = hsv.and_then(|h| h.get(i)) {
                    ch = chars[quantize(sample.v.clamp(0.0, 1.0), levels)];
                    if self.hue_policy.emphasizes(*sample) {
                        ch = self.hue_policy.glyph;
                    }
                }

                if let Some(field) = edges {
                    let edge = field.edge_at(i % width, i / width);
                    if edge.magnitude > self.edge_threshold {
                        ch = edge_glyph(edge.angle);
                    }
                }

                GlyphCell { ch, color }
            })
            .collect()
    }
}
