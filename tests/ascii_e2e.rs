//! End-to-end tests for image to ASCII conversion.
//!
//! These tests drive the full path a user sees:
//! - Decoded file -> pipeline -> rendered text
//! - Uniform images produce uniform output
//! - Edge and hue modes change the output where expected
//! - Color escapes and metrics lines

use image::{Rgb as ImgRgb, RgbImage};
use img_to_ascii::ascii::{
    resample, ColorBackend, EdgeBackend, GlyphMapper, RasterImage, Ramp, Rgb, DETAILED_RAMP,
    SIMPLE_RAMP,
};
use img_to_ascii::decode::load_image;
use img_to_ascii::renderer::{render_rendering, write_metrics};
use img_to_ascii::{Pipeline, PipelineConfig, PipelineError};
use std::collections::HashSet;

fn gray_config(width: usize, height: usize) -> PipelineConfig {
    PipelineConfig {
        width,
        height,
        edges: false,
        hue: false,
        ..PipelineConfig::default()
    }
}

/// Horizontal gradient: left dark, right bright.
fn gradient_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / (width - 1)) as u8;
        ImgRgb([v, v, v])
    })
}

// ==================== Uniform Gray Scenario ====================

#[test]
fn test_uniform_gray_4x4_to_2x2() {
    let src = RasterImage::solid(4, 4, &[128, 128, 128]);
    let grid = resample(&src, 2, 2);
    let cells = GlyphMapper::new(ColorBackend::Reference).map(&grid, None, false, false);

    // Gray 128 gamma-corrects to ~0.56, ramp index 39.
    assert_eq!(DETAILED_RAMP[39], 'z');
    assert_eq!(cells.len(), 4);
    for cell in &cells {
        assert_eq!(cell.ch, 'z');
        assert_eq!(cell.color, Rgb::new(128, 128, 128));
    }
}

#[test]
fn test_uniform_gray_through_pipeline() {
    // Height 3 compensates to 2 rows.
    let src = RasterImage::solid(4, 4, &[128, 128, 128]);
    let out = Pipeline::new(gray_config(2, 3)).run(&src).unwrap();

    assert_eq!((out.width, out.height), (2, 2));
    let chars: HashSet<char> = out.cells.iter().map(|c| c.ch).collect();
    assert_eq!(chars.len(), 1, "uniform input must give one glyph");
    assert!(out.cells.iter().all(|c| c.color == Rgb::new(128, 128, 128)));
}

#[test]
fn test_uniform_image_has_no_edge_glyphs() {
    let src = RasterImage::solid(64, 64, &[200, 50, 50]);
    // Height 43 compensates to 32 rows: a 2x downscale on both axes, so
    // every sample lands on a source pixel and the field stays flat.
    let mut cfg = gray_config(32, 43);
    cfg.edges = true;
    let out = Pipeline::new(cfg).run(&src).unwrap();
    assert_eq!((out.width, out.height), (32, 32));
    let chars: HashSet<char> = out.cells.iter().map(|c| c.ch).collect();
    assert_eq!(chars.len(), 1);
}

// ==================== File Round Trip ====================

#[test]
fn test_png_file_to_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gradient.png");
    gradient_image(64, 32).save(&path).unwrap();

    let src = load_image(&path, false).unwrap();
    let out = Pipeline::new(gray_config(40, 20)).run(&src).unwrap();

    let mut buf = Vec::new();
    render_rendering(&mut buf, &out, false).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 15);
    assert!(lines.iter().all(|l| l.chars().count() == 40));

    // Brightness rises left to right on an interior row.
    let row: Vec<char> = lines[5].chars().collect();
    let idx = |c: char| DETAILED_RAMP.iter().position(|&r| r == c).unwrap();
    assert!(idx(row[0]) < idx(row[30]));
    let distinct: HashSet<char> = row.iter().copied().collect();
    assert!(distinct.len() > 10, "gradient should use many ramp levels");
}

#[test]
fn test_missing_file_is_reported() {
    assert!(load_image(std::path::Path::new("/no/such/file.png"), false).is_err());
}

// ==================== Modes ====================

#[test]
fn test_simple_ramp_only_uses_simple_glyphs() {
    let src = RasterImage::from_raw(64, 32, 3, gradient_image(64, 32).into_raw()).unwrap();
    let mut cfg = gray_config(32, 16);
    cfg.ramp = Ramp::Simple;
    let out = Pipeline::new(cfg).run(&src).unwrap();
    assert!(out.cells.iter().all(|c| SIMPLE_RAMP.contains(&c.ch)));
}

#[test]
fn test_edges_draw_direction_glyphs_on_boundary() {
    // Black left half, white right half: a vertical boundary.
    let img = RgbImage::from_fn(80, 80, |x, _| {
        if x < 40 {
            ImgRgb([0, 0, 0])
        } else {
            ImgRgb([255, 255, 255])
        }
    });
    let src = RasterImage::from_raw(80, 80, 3, img.into_raw()).unwrap();

    for backend in [EdgeBackend::Reference, EdgeBackend::Accelerated] {
        let mut cfg = gray_config(20, 20);
        cfg.edges = true;
        cfg.edge_backend = backend;
        cfg.threads = 2;
        let out = Pipeline::new(cfg).run(&src).unwrap();
        let row = &out.lines()[5];
        assert!(row.contains('-'), "{backend}: {row:?}");
    }
}

#[test]
fn test_hue_mode_emphasizes_blue() {
    let src = RasterImage::solid(16, 16, &[20, 90, 230]);
    for backend in [ColorBackend::Reference, ColorBackend::Accelerated] {
        let mut cfg = gray_config(8, 8);
        cfg.hue = true;
        cfg.color_backend = backend;
        let out = Pipeline::new(cfg).run(&src).unwrap();
        assert_eq!(out.cells[0].ch, '#');
        assert_eq!(out.cells[out.width + 1].ch, '#');
    }
}

#[test]
fn test_backends_render_identically_on_gradient() {
    let src = RasterImage::from_raw(64, 48, 3, gradient_image(64, 48).into_raw()).unwrap();
    let run = |edge, color| {
        let cfg = PipelineConfig {
            width: 30,
            height: 20,
            edges: true,
            hue: true,
            edge_backend: edge,
            color_backend: color,
            ..PipelineConfig::default()
        };
        Pipeline::new(cfg).run(&src).unwrap().lines()
    };
    assert_eq!(
        run(EdgeBackend::Reference, ColorBackend::Reference),
        run(EdgeBackend::Accelerated, ColorBackend::Accelerated)
    );
}

// ==================== Output ====================

#[test]
fn test_color_render_wraps_rows_in_escapes() {
    let src = RasterImage::solid(8, 8, &[10, 20, 30]);
    let out = Pipeline::new(gray_config(4, 4)).run(&src).unwrap();

    let mut buf = Vec::new();
    render_rendering(&mut buf, &out, true).unwrap();
    let text = String::from_utf8(buf).unwrap();

    assert!(text.starts_with("\x1b[38;2;10;20;30m"));
    assert!(text.ends_with("\x1b[0m\n\x1b[0m"));
    assert_eq!(text.matches("\x1b[0m\n").count(), out.height);
}

#[test]
fn test_metrics_lines() {
    let src = RasterImage::solid(8, 8, &[10, 20, 30]);
    let mut cfg = gray_config(4, 4);
    cfg.edges = true;
    let out = Pipeline::new(cfg).run(&src).unwrap();

    let mut buf = Vec::new();
    write_metrics(&mut buf, &out.timings).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("METRIC:EdgeDetection_ms:"));
    assert!(!lines[0].ends_with("nan"));
    assert_eq!(lines[1], "METRIC:HSV_ms:nan");
    assert!(lines[2].starts_with("METRIC:TOTAL_ms:"));
}

#[test]
fn test_invalid_source_is_an_error() {
    let result = Pipeline::new(PipelineConfig::default()).run(&RasterImage::invalid());
    assert_eq!(result.unwrap_err(), PipelineError::InvalidSource);
}
