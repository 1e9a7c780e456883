//! Image file decoding into [`RasterImage`].
//!
//! Decoding is delegated to the `image` crate; the analysis pipeline only
//! sees the normalized 8-bit buffer.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use thiserror::Error;

use crate::ascii::{RasterError, RasterImage};

/// Errors that can occur when loading an image.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("image file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to decode '{}': {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("decoded image is unusable: {0}")]
    Raster(#[from] RasterError),
}

/// Load and decode `path` as RGB8, or RGBA8 when `keep_alpha` is set.
pub fn load_image(path: &Path, keep_alpha: bool) -> Result<RasterImage, DecodeError> {
    if !path.exists() {
        return Err(DecodeError::NotFound(path.to_path_buf()));
    }

    let decoded = image::open(path).map_err(|source| DecodeError::Image {
        path: path.to_path_buf(),
        source,
    })?;

    let raster = from_dynamic(decoded, keep_alpha)?;
    log::info!(
        "loaded {}: {}x{}, {} channel(s)",
        path.display(),
        raster.width(),
        raster.height(),
        raster.channels()
    );
    Ok(raster)
}

/// Convert an already decoded image.
pub fn from_dynamic(img: DynamicImage, keep_alpha: bool) -> Result<RasterImage, RasterError> {
    if keep_alpha {
        let rgba = img.into_rgba8();
        let (w, h) = rgba.dimensions();
        RasterImage::from_raw(w as usize, h as usize, 4, rgba.into_raw())
    } else {
        let rgb = img.into_rgb8();
        let (w, h) = rgb.dimensions();
        RasterImage::from_raw(w as usize, h as usize, 3, rgb.into_raw())
    }
}
