//! Owned raster buffer and bounds-checked pixel access.

use thiserror::Error;

/// Rec. 709 luminance weights for normalized R, G, B.
pub const LUMA_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Largest channel count a raster may carry (RGBA).
pub const MAX_CHANNELS: usize = 4;

/// Errors raised when wrapping a raw buffer as a [`RasterImage`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    #[error("image has zero width or height ({width}x{height})")]
    EmptyDimensions { width: usize, height: usize },

    #[error("unsupported channel count {0} (expected 1-4)")]
    UnsupportedChannels(usize),

    #[error("buffer holds {actual} bytes but {width}x{height}x{channels} needs {expected}")]
    LengthMismatch {
        width: usize,
        height: usize,
        channels: usize,
        expected: usize,
        actual: usize,
    },
}

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled into [0, 1].
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

/// Row-major raster of `width * height` pixels with 1-4 byte channels.
///
/// The default instance is the invalid (empty) image. Stages hand images
/// along by value; there is intentionally no `Clone`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RasterImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
    channels: usize,
}

impl RasterImage {
    /// Wrap a decoded buffer, checking `data.len() == width * height * channels`.
    pub fn from_raw(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyDimensions { width, height });
        }
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(RasterError::UnsupportedChannels(channels));
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(RasterError::LengthMismatch {
                width,
                height,
                channels,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Image where every pixel holds `pixel` (its length is the channel count).
    ///
    /// Returns the invalid image if the dimensions or channel count are unusable.
    pub fn solid(width: usize, height: usize, pixel: &[u8]) -> Self {
        let data = pixel.repeat(width * height);
        Self::from_raw(width, height, pixel.len(), data).unwrap_or_default()
    }

    /// Zero-filled image, used by stages that write their output in place.
    pub(crate) fn zeroed(width: usize, height: usize, channels: usize) -> Self {
        Self {
            data: vec![0; width * height * channels],
            width,
            height,
            channels,
        }
    }

    /// The invalid image. Equivalent to `RasterImage::default()`.
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        !self.data.is_empty() && self.width > 0 && self.height > 0
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Release the underlying buffer.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Number of pixels, or 0 for an invalid image.
    pub fn pixel_count(&self) -> usize {
        if self.is_valid() {
            self.width * self.height
        } else {
            0
        }
    }

    /// Total byte size, or 0 for an invalid image.
    pub fn byte_size(&self) -> usize {
        self.pixel_count() * self.channels
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// RGB of pixel `(x, y)`; black when out of bounds or invalid.
    ///
    /// Single-channel and gray+alpha images replicate the first channel
    /// into all three components.
    pub fn pixel_rgb(&self, x: usize, y: usize) -> Rgb {
        if !self.is_valid() || !self.in_bounds(x, y) {
            return Rgb::default();
        }
        self.rgb_at(y * self.width + x)
    }

    /// Normalized RGB of pixel `(x, y)`.
    pub fn pixel_rgb_f32(&self, x: usize, y: usize) -> [f32; 3] {
        self.pixel_rgb(x, y).to_f32()
    }

    /// Perceptual luminance in [0, 1] of pixel `(x, y)`, 0 when out of bounds.
    pub fn luminance(&self, x: usize, y: usize) -> f32 {
        luminance_of(self.pixel_rgb_f32(x, y))
    }

    /// RGB of the pixel at linear (row-major) index `pixel`. No bounds check
    /// beyond slice indexing.
    #[inline]
    pub(crate) fn rgb_at(&self, pixel: usize) -> Rgb {
        let base = pixel * self.channels;
        let r = self.data[base];
        if self.channels < 3 {
            Rgb::new(r, r, r)
        } else {
            Rgb::new(r, self.data[base + 1], self.data[base + 2])
        }
    }

    /// Luminance plane for the whole image, row-major.
    pub fn luminance_plane(&self) -> Vec<f32> {
        (0..self.pixel_count())
            .map(|i| luminance_of(self.rgb_at(i).to_f32()))
            .collect()
    }

    /// Normalized RGB triples for every pixel, row-major.
    pub fn rgb_triples(&self) -> Vec<[f32; 3]> {
        (0..self.pixel_count())
            .map(|i| self.rgb_at(i).to_f32())
            .collect()
    }
}

/// Weighted luminance of a normalized RGB triple.
#[inline]
pub fn luminance_of(rgb: [f32; 3]) -> f32 {
    LUMA_WEIGHTS[0] * rgb[0] + LUMA_WEIGHTS[1] * rgb[1] + LUMA_WEIGHTS[2] * rgb[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rejects_length_mismatch() {
        let err = RasterImage::from_raw(2, 2, 3, vec![0; 11]).unwrap_err();
        assert_eq!(
            err,
            RasterError::LengthMismatch {
                width: 2,
                height: 2,
                channels: 3,
                expected: 12,
                actual: 11,
            }
        );
    }

    #[test]
    fn test_from_raw_rejects_bad_channels() {
        assert_eq!(
            RasterImage::from_raw(1, 1, 5, vec![0; 5]).unwrap_err(),
            RasterError::UnsupportedChannels(5)
        );
        assert_eq!(
            RasterImage::from_raw(1, 1, 0, vec![]).unwrap_err(),
            RasterError::UnsupportedChannels(0)
        );
    }

    #[test]
    fn test_from_raw_rejects_zero_dimensions() {
        assert!(matches!(
            RasterImage::from_raw(0, 4, 3, vec![]),
            Err(RasterError::EmptyDimensions { .. })
        ));
    }

    #[test]
    fn test_default_is_invalid() {
        let img = RasterImage::default();
        assert!(!img.is_valid());
        assert_eq!(img.byte_size(), 0);
        assert_eq!(img.pixel_rgb(0, 0), Rgb::default());
        assert_eq!(img.luminance(0, 0), 0.0);
    }

    #[test]
    fn test_pixel_rgb_out_of_bounds_is_black() {
        let img = RasterImage::solid(2, 2, &[10, 20, 30]);
        assert_eq!(img.pixel_rgb(1, 1), Rgb::new(10, 20, 30));
        assert_eq!(img.pixel_rgb(2, 0), Rgb::default());
        assert_eq!(img.pixel_rgb(0, 2), Rgb::default());
    }

    #[test]
    fn test_gray_channel_is_replicated() {
        let img = RasterImage::from_raw(1, 1, 1, vec![200]).unwrap();
        assert_eq!(img.pixel_rgb(0, 0), Rgb::new(200, 200, 200));

        let gray_alpha = RasterImage::from_raw(1, 1, 2, vec![90, 255]).unwrap();
        assert_eq!(gray_alpha.pixel_rgb(0, 0), Rgb::new(90, 90, 90));
    }

    #[test]
    fn test_rgba_ignores_alpha() {
        let img = RasterImage::from_raw(1, 1, 4, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(img.pixel_rgb(0, 0), Rgb::new(1, 2, 3));
    }

    #[test]
    fn test_luminance_white_and_green() {
        let white = RasterImage::solid(1, 1, &[255, 255, 255]);
        assert!((white.luminance(0, 0) - 1.0).abs() < 1e-6);

        let green = RasterImage::solid(1, 1, &[0, 255, 0]);
        assert!((green.luminance(0, 0) - 0.7152).abs() < 1e-6);
    }

    #[test]
    fn test_luminance_plane_matches_point_queries() {
        let img = RasterImage::from_raw(2, 1, 3, vec![255, 0, 0, 0, 0, 255]).unwrap();
        let plane = img.luminance_plane();
        assert_eq!(plane, vec![img.luminance(0, 0), img.luminance(1, 0)]);
    }
}
