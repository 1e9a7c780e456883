//! Bilinear resampling of a raster onto the character grid.

use super::raster::RasterImage;

/// Rescale `src` to `target_width x target_height` with bilinear interpolation.
///
/// Each destination cell `(x, y)` samples the source at
/// `(x * src.width / target_width, y * src.height / target_height)`.
/// Cells whose sample point lies within one pixel of the right or bottom
/// source edge have no complete interpolation quad and are left black.
///
/// Channel values are normalized to `[0, 1]`, weighted as
/// `v00 * (1 - fx) + v10 * fx` along each row, then blended between rows
/// the same way and truncated back to bytes. Flat regions with fractional
/// weights may lose one level to rounding. The output keeps the source's
/// channel count.
///
/// # Returns
/// The resampled image, or the invalid image when `src` is invalid or
/// either target dimension is zero.
///
/// # Example
/// ```ignore
/// let grid = resample(&photo, 120, 45);
/// assert_eq!(grid.byte_size(), 120 * 45 * photo.channels());
/// ```
pub fn resample(src: &RasterImage, target_width: usize, target_height: usize) -> RasterImage {
    if !src.is_valid() || target_width == 0 || target_height == 0 {
        return RasterImage::invalid();
    }

    let channels = src.channels();
    let src_w = src.width();
    let src_h = src.height();
    let data = src.data();

    let scale_x = src_w as f32 / target_width as f32;
    let scale_y = src_h as f32 / target_height as f32;
    let last_x = (src_w - 1) as f32;
    let last_y = (src_h - 1) as f32;

    let mut dst = RasterImage::zeroed(target_width, target_height, channels);
    let row_bytes = target_width * channels;

    for (y, row) in dst.data_mut().chunks_exact_mut(row_bytes).enumerate() {
        let src_y = y as f32 * scale_y;
        if src_y >= last_y {
            continue;
        }
        let y0 = (src_y as usize).min(src_h - 2);
        let y1 = y0 + 1;
        let fy = (src_y - y0 as f32).clamp(0.0, 1.0);

        for (x, out) in row.chunks_exact_mut(channels).enumerate() {
            let src_x = x as f32 * scale_x;
            if src_x >= last_x {
                continue;
            }
            let x0 = (src_x as usize).min(src_w - 2);
            let x1 = x0 + 1;
            let fx = (src_x - x0 as f32).clamp(0.0, 1.0);

            let i00 = (y0 * src_w + x0) * channels;
            let i10 = (y0 * src_w + x1) * channels;
            let i01 = (y1 * src_w + x0) * channels;
            let i11 = (y1 * src_w + x1) * channels;

            for (c, byte) in out.iter_mut().enumerate() {
                let v00 = data[i00 + c] as f32 / 255.0;
                let v10 = data[i10 + c] as f32 / 255.0;
                let v01 = data[i01 + c] as f32 / 255.0;
                let v11 = data[i11 + c] as f32 / 255.0;

                let top = v00 * (1.0 - fx) + v10 * fx;
                let bottom = v01 * (1.0 - fx) + v11 * fx;
                let v = top * (1.0 - fy) + bottom * fy;

                *byte = (v * 255.0) as u8;
            }
        }
    }

    dst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::Rgb;

    #[test]
    fn test_rejects_invalid_source() {
        assert!(!resample(&RasterImage::invalid(), 10, 10).is_valid());
    }

    #[test]
    fn test_rejects_zero_target() {
        let img = RasterImage::solid(4, 4, &[1, 2, 3]);
        assert!(!resample(&img, 0, 3).is_valid());
        assert!(!resample(&img, 3, 0).is_valid());
    }

    #[test]
    fn test_output_size_and_channels() {
        let img = RasterImage::solid(7, 5, &[9, 9, 9, 9]);
        let out = resample(&img, 13, 3);
        assert_eq!(out.width(), 13);
        assert_eq!(out.height(), 3);
        assert_eq!(out.channels(), 4);
        assert_eq!(out.data().len(), 13 * 3 * 4);
    }

    #[test]
    fn test_far_edge_cells_are_black() {
        // 2x2 source: only sample points strictly below 1.0 interpolate.
        let img = RasterImage::solid(2, 2, &[200, 100, 50]);
        let out = resample(&img, 4, 4);
        assert_eq!(out.pixel_rgb(0, 0).r, 200);
        assert_eq!(out.pixel_rgb(1, 1).g, 100);
        assert_eq!(out.pixel_rgb(2, 0).r, 0);
        assert_eq!(out.pixel_rgb(0, 3).b, 0);
    }

    #[test]
    fn test_midpoint_blend_truncates() {
        // Horizontal ramp 0 -> 255; target x=1 samples srcX = 0.5 between them.
        let img = RasterImage::from_raw(
            3,
            2,
            1,
            vec![0, 255, 255, 0, 255, 255],
        )
        .unwrap();
        let out = resample(&img, 6, 2);
        // (0 + 255) / 2 = 127.5 truncates to 127.
        assert_eq!(out.data()[1], 127);
    }

    #[test]
    fn test_fractional_weights_blend_per_row() {
        // Two identical rows, so only the horizontal weights matter.
        // Target x=1 samples srcX = 0.6 between the first two pixels.
        let row = [21, 35, 70, 11, 110, 220, 90, 5, 250];
        let img = RasterImage::from_raw(3, 2, 3, [row, row].concat()).unwrap();
        let out = resample(&img, 5, 2);
        assert_eq!(out.pixel_rgb(0, 0), Rgb::new(21, 35, 70));
        assert_eq!(out.pixel_rgb(1, 0), Rgb::new(14, 80, 160));
        assert_eq!(out.pixel_rgb(2, 0), Rgb::new(26, 88, 226));
        assert_eq!(out.pixel_rgb(3, 0), Rgb::new(74, 25, 244));
        assert_eq!(out.pixel_rgb(4, 0), Rgb::new(0, 0, 0));
        assert!(out.data()[15..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_flat_field_within_one_level() {
        let img = RasterImage::solid(2, 2, &[222, 200, 230]);
        let out = resample(&img, 16, 16);
        // Integer sample points copy the pixel exactly.
        assert_eq!(out.pixel_rgb(0, 0), Rgb::new(222, 200, 230));
        for y in 0..8 {
            for x in 0..8 {
                let px = out.pixel_rgb(x, y);
                for (got, want) in [(px.r, 222u8), (px.g, 200), (px.b, 230)] {
                    assert!(want.abs_diff(got) <= 1, "cell ({x},{y}): {got} vs {want}");
                }
            }
        }
    }

    #[test]
    fn test_downscale_picks_top_left_of_quad() {
        let data: Vec<u8> = (0..16).map(|v| v * 10).collect();
        let img = RasterImage::from_raw(4, 4, 1, data).unwrap();
        let out = resample(&img, 2, 2);
        // Sample points (0,0), (2,0), (0,2), (2,2) fall on exact pixels.
        assert_eq!(out.data(), &[0, 20, 80, 100]);
    }
}
