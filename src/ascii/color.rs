//! RGB to HSV conversion with interchangeable scalar and SIMD engines.

use std::fmt;

/// Hue/saturation/value of one pixel.
///
/// `h` is in degrees [0, 360), `s` and `v` are in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HsvSample {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

/// A batch RGB -> HSV converter.
///
/// Implementations must agree on every output within floating-point
/// tolerance; they differ only in how the batch is executed.
pub trait ColorEngine: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Convert `rgb` (normalized triples) into `out`, replacing its contents.
    fn convert_into(&self, rgb: &[[f32; 3]], out: &mut Vec<HsvSample>);

    /// Convert a batch, preserving order and length.
    fn convert_batch(&self, rgb: &[[f32; 3]]) -> Vec<HsvSample> {
        let mut out = Vec::with_capacity(rgb.len());
        self.convert_into(rgb, &mut out);
        out
    }

    /// Convert a single triple as a batch of one.
    fn convert(&self, r: f32, g: f32, b: f32) -> HsvSample {
        let mut out = Vec::with_capacity(1);
        self.convert_into(&[[r, g, b]], &mut out);
        out[0]
    }
}

/// Which [`ColorEngine`] to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorBackend {
    #[default]
    Reference,
    Accelerated,
}

impl ColorBackend {
    /// Instantiate the selected engine.
    pub fn engine(self) -> Box<dyn ColorEngine> {
        match self {
            ColorBackend::Reference => Box::new(ReferenceColor),
            ColorBackend::Accelerated => Box::new(SimdColor),
        }
    }
}

impl fmt::Display for ColorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorBackend::Reference => write!(f, "reference"),
            ColorBackend::Accelerated => write!(f, "accelerated"),
        }
    }
}

/// Portable per-pixel conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceColor;

impl ColorEngine for ReferenceColor {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn convert_into(&self, rgb: &[[f32; 3]], out: &mut Vec<HsvSample>) {
        out.clear();
        out.extend(rgb.iter().map(|&[r, g, b]| rgb_to_hsv(r, g, b)));
    }
}

/// Convert one normalized RGB triple to HSV.
///
/// Hue uses the 60° sector of whichever channel holds the maximum; ties
/// resolve red first, then green, then blue. Achromatic input (all
/// channels equal) has hue 0.
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> HsvSample {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max != 0.0 { delta / max } else { 0.0 };

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta + 6.0) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    HsvSample { h, s, v: max }
}

/// Eight-lane SIMD conversion with a scalar tail.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimdColor;

impl ColorEngine for SimdColor {
    fn name(&self) -> &'static str {
        "accelerated"
    }

    fn convert_into(&self, rgb: &[[f32; 3]], out: &mut Vec<HsvSample>) {
        out.clear();
        out.reserve(rgb.len());

        let mut chunks = rgb.chunks_exact(simd::LANES);
        for chunk in &mut chunks {
            simd::convert_lanes(chunk, out);
        }
        out.extend(
            chunks
                .remainder()
                .iter()
                .map(|&[r, g, b]| rgb_to_hsv(r, g, b)),
        );
    }
}

mod simd {
    use super::HsvSample;
    use wide::*;

    pub const LANES: usize = 8;

    /// Convert exactly [`LANES`] triples, appending to `out`.
    pub fn convert_lanes(chunk: &[[f32; 3]], out: &mut Vec<HsvSample>) {
        let mut r = [0.0f32; LANES];
        let mut g = [0.0f32; LANES];
        let mut b = [0.0f32; LANES];
        for (i, px) in chunk.iter().enumerate() {
            r[i] = px[0];
            g[i] = px[1];
            b[i] = px[2];
        }
        let r = f32x8::new(r);
        let g = f32x8::new(g);
        let b = f32x8::new(b);

        let zero = f32x8::splat(0.0);
        let six = f32x8::splat(6.0);
        let sixty = f32x8::splat(60.0);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        // Lanes that would divide by zero are masked out by the blends.
        let s = max.cmp_eq(zero).blend(zero, delta / max);

        let sector_r = (g - b) / delta + six;
        let sector_r = sector_r - sector_r.cmp_ge(six).blend(six, zero);
        let hue_r = sixty * sector_r;
        let hue_g = sixty * ((b - r) / delta + f32x8::splat(2.0));
        let hue_b = sixty * ((r - g) / delta + f32x8::splat(4.0));

        let hue = max
            .cmp_eq(r)
            .blend(hue_r, max.cmp_eq(g).blend(hue_g, hue_b));
        let hue = delta.cmp_eq(zero).blend(zero, hue);

        let h = hue.to_array();
        let s = s.to_array();
        let v = max.to_array();
        out.extend((0..LANES).map(|i| HsvSample {
            h: h[i],
            s: s[i],
            v: v[i],
        }));
    }
}
