//! End-to-end conversion of a decoded raster into glyph cells.
//!
//! All knobs live in [`PipelineConfig`], which is built once and read by
//! every stage; nothing is shared between concurrent runs.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::ascii::{
    grid_dimensions, resample, ColorBackend, EdgeBackend, EdgeDetector, GlyphCell, GlyphMapper,
    HuePolicy, Ramp, RasterImage, DEFAULT_BLOCK_ROWS, DEFAULT_HEIGHT, DEFAULT_WIDTH,
    EDGE_THRESHOLD,
};

/// Errors that stop a pipeline run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("source image is invalid (empty buffer or zero dimensions)")]
    InvalidSource,

    #[error("target grid {width}x{height} has no cells")]
    InvalidTarget { width: usize, height: usize },

    #[error("resampling produced no image")]
    ResampleFailed,
}

/// Configuration for one conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Requested width in characters
    pub width: usize,
    /// Requested height in characters, before vertical compensation
    pub height: usize,
    /// Draw direction glyphs on strong edges
    pub edges: bool,
    /// Use HSV value and hue emphasis instead of plain luminance
    pub hue: bool,
    pub edge_backend: EdgeBackend,
    pub color_backend: ColorBackend,
    /// Edge detection workers; 0 = all cores, clamped to [1, 64]
    pub threads: usize,
    /// Cap on rows per edge-detection block (0 = no cap)
    pub block_rows: usize,
    pub ramp: Ramp,
    pub hue_policy: HuePolicy,
    pub edge_threshold: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            edges: true,
            hue: false,
            edge_backend: EdgeBackend::default(),
            color_backend: ColorBackend::default(),
            threads: 0,
            block_rows: DEFAULT_BLOCK_ROWS,
            ramp: Ramp::default(),
            hue_policy: HuePolicy::default(),
            edge_threshold: EDGE_THRESHOLD,
        }
    }
}

/// Wall-clock time spent in each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageTimings {
    pub resample: Duration,
    /// `None` when edge detection was disabled
    pub edges: Option<Duration>,
    /// `None` when hue mode was disabled
    pub hsv: Option<Duration>,
    pub glyphs: Duration,
    pub total: Duration,
}

/// Pipeline output: a row-major glyph grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendering {
    pub cells: Vec<GlyphCell>,
    pub width: usize,
    pub height: usize,
    /// Row blocks edge detection was split into; 0 when edges were off
    pub edge_blocks: usize,
    pub timings: StageTimings,
}

impl Rendering {
    /// Characters of each row, without color.
    pub fn lines(&self) -> Vec<String> {
        if self.width == 0 {
            return Vec::new();
        }
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|c| c.ch).collect())
            .collect()
    }
}

/// A configured converter. Engines are chosen once, at construction.
pub struct Pipeline {
    config: PipelineConfig,
    detector: EdgeDetector,
    mapper: GlyphMapper,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let detector = EdgeDetector::new(config.edge_backend, config.threads);
        let mapper = GlyphMapper::new(config.color_backend)
            .with_ramp(config.ramp)
            .with_hue_policy(config.hue_policy)
            .with_edge_threshold(config.edge_threshold);
        Self {
            config,
            detector,
            mapper,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Resample, analyze and map `source`.
    pub fn run(&self, source: &RasterImage) -> Result<Rendering, PipelineError> {
        let started = Instant::now();
        let mut timings = StageTimings::default();

        if !source.is_valid() {
            return Err(PipelineError::InvalidSource);
        }

        let (width, height) = grid_dimensions(self.config.width, self.config.height);
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidTarget { width, height });
        }

        let stage = Instant::now();
        let grid = resample(source, width, height);
        timings.resample = stage.elapsed();
        if !grid.is_valid() {
            return Err(PipelineError::ResampleFailed);
        }
        log::debug!(
            "resampled {}x{} -> {}x{} in {:?}",
            source.width(),
            source.height(),
            width,
            height,
            timings.resample
        );

        let mut edge_blocks = 0;
        let edges = if self.config.edges {
            let stage = Instant::now();
            edge_blocks = self.detector.plan(height, self.config.block_rows).len();
            let field = self.detector.detect(&grid, self.config.block_rows);
            timings.edges = Some(stage.elapsed());
            log::debug!(
                "edges[{}] in {} block(s) on {} thread(s) in {:?}",
                self.detector.engine_name(),
                edge_blocks,
                self.detector.threads(),
                stage.elapsed()
            );
            Some(field)
        } else {
            None
        };

        let hsv = if self.config.hue {
            let stage = Instant::now();
            let samples = self.mapper.hue_samples(&grid);
            timings.hsv = Some(stage.elapsed());
            log::debug!(
                "hsv[{}] {} samples in {:?}",
                self.mapper.color_engine().name(),
                samples.len(),
                stage.elapsed()
            );
            Some(samples)
        } else {
            None
        };

        let stage = Instant::now();
        let cells = self.mapper.map_with(&grid, hsv.as_deref(), edges.as_ref());
        timings.glyphs = stage.elapsed();
        timings.total = started.elapsed();

        log::info!(
            "converted to {}x{} glyphs in {:?}",
            width,
            height,
            timings.total
        );

        Ok(Rendering {
            cells,
            width: grid.width(),
            height: grid.height(),
            edge_blocks,
            timings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: usize, height: usize) -> PipelineConfig {
        PipelineConfig {
            width,
            height,
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_invalid_source_stops_early() {
        let pipeline = Pipeline::new(PipelineConfig::default());
        assert_eq!(
            pipeline.run(&RasterImage::invalid()),
            Err(PipelineError::InvalidSource)
        );
    }

    #[test]
    fn test_zero_target_is_rejected() {
        let img = RasterImage::solid(8, 8, &[1, 2, 3]);
        // A height of 1 compensates down to 0 rows.
        let err = Pipeline::new(config(10, 1)).run(&img).unwrap_err();
        assert_eq!(err, PipelineError::InvalidTarget { width: 10, height: 0 });
    }

    #[test]
    fn test_grid_uses_compensated_height() {
        let img = RasterImage::solid(64, 64, &[40, 40, 40]);
        let out = Pipeline::new(config(20, 8)).run(&img).unwrap();
        assert_eq!((out.width, out.height), (20, 6));
        assert_eq!(out.cells.len(), 120);
        assert_eq!(out.lines().len(), 6);
        assert!(out.lines().iter().all(|l| l.chars().count() == 20));
    }

    #[test]
    fn test_threads_split_default_grid_into_blocks() {
        let img = RasterImage::solid(240, 180, &[90, 90, 90]);
        let mut cfg = PipelineConfig {
            threads: 4,
            ..PipelineConfig::default()
        };
        let out = Pipeline::new(cfg.clone()).run(&img).unwrap();
        assert_eq!((out.width, out.height), (120, 45));
        assert_eq!(out.edge_blocks, 4);

        cfg.threads = 1;
        let single = Pipeline::new(cfg.clone()).run(&img).unwrap();
        assert_eq!(single.edge_blocks, 1);
        assert_eq!(single.cells, out.cells);

        cfg.edges = false;
        assert_eq!(Pipeline::new(cfg).run(&img).unwrap().edge_blocks, 0);
    }

    #[test]
    fn test_timings_reflect_enabled_stages() {
        let img = RasterImage::solid(16, 16, &[0, 0, 255]);
        let mut cfg = config(8, 8);
        cfg.edges = false;
        cfg.hue = true;
        let out = Pipeline::new(cfg).run(&img).unwrap();
        assert!(out.timings.edges.is_none());
        assert!(out.timings.hsv.is_some());
    }
}
