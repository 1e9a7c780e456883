//! Sobel edge detection over row blocks, with scalar and SIMD engines.
//!
//! The Sobel kernels used are:
//! ```text
//! Gx:          Gy:
//! [-1  0  1]   [-1 -2 -1]
//! [-2  0  2]   [ 0  0  0]
//! [-1  0  1]   [ 1  2  1]
//! ```
//!
//! Interior rows are split into contiguous blocks, one per worker. Each
//! worker writes only its own slice of the magnitude and angle arrays, and
//! normalization by the image-wide maximum runs after every block has
//! joined. The result is therefore independent of the worker count.

use std::fmt;
use std::ops::Range;

use rayon::prelude::*;

use super::raster::{luminance_of, RasterImage};

/// Upper bound on detection workers.
pub const MAX_THREADS: usize = 64;

/// Default cap on the rows handed to one block.
pub const DEFAULT_BLOCK_ROWS: usize = 64;

const SOBEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Edge strength and orientation at one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInfo {
    /// Normalized magnitude in [0, 1]
    pub magnitude: f32,
    /// Gradient orientation in degrees
    pub angle: f32,
}

/// Per-pixel gradient magnitude and angle for a `width x height` raster.
///
/// Magnitudes are normalized by the largest interior magnitude (left at 0
/// for a gradient-free image). Angles are `atan2(gy, gx)` in degrees with
/// negative values raised by 180, which collapses direction into an
/// orientation in [0, 180].
#[derive(Debug, Default, PartialEq)]
pub struct EdgeField {
    magnitude: Vec<f32>,
    angle: Vec<f32>,
    width: usize,
    height: usize,
}

impl EdgeField {
    fn zeroed(width: usize, height: usize) -> Self {
        Self {
            magnitude: vec![0.0; width * height],
            angle: vec![0.0; width * height],
            width,
            height,
        }
    }

    /// The invalid (empty) field.
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.magnitude.len() == self.width * self.height
            && self.angle.len() == self.width * self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitude
    }

    pub fn angles(&self) -> &[f32] {
        &self.angle
    }

    /// Edge at `(x, y)`; zero outside the field.
    pub fn edge_at(&self, x: usize, y: usize) -> EdgeInfo {
        if !self.is_valid() || x >= self.width || y >= self.height {
            return EdgeInfo::default();
        }
        let idx = y * self.width + x;
        EdgeInfo {
            magnitude: self.magnitude[idx],
            angle: self.angle[idx],
        }
    }
}

/// Computes raw Sobel gradients for a block of interior rows.
///
/// `gx` and `gy` cover exactly `rows` at full image width. Implementations
/// only write interior columns; columns 0 and `width - 1` stay zero.
pub trait GradientEngine: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn gradient_rows(&self, img: &RasterImage, rows: Range<usize>, gx: &mut [f32], gy: &mut [f32]);
}

/// Which [`GradientEngine`] to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeBackend {
    #[default]
    Reference,
    Accelerated,
}

impl EdgeBackend {
    pub fn engine(self) -> Box<dyn GradientEngine> {
        match self {
            EdgeBackend::Reference => Box::new(ReferenceGradient),
            EdgeBackend::Accelerated => Box::new(SimdGradient),
        }
    }
}

impl fmt::Display for EdgeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeBackend::Reference => write!(f, "reference"),
            EdgeBackend::Accelerated => write!(f, "accelerated"),
        }
    }
}

/// Direct 3x3 convolution over per-pixel luminance queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceGradient;

impl GradientEngine for ReferenceGradient {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn gradient_rows(&self, img: &RasterImage, rows: Range<usize>, gx: &mut [f32], gy: &mut [f32]) {
        let w = img.width();
        for (row, y) in rows.enumerate() {
            for x in 1..w - 1 {
                let mut window = [[0.0f32; 3]; 3];
                for (ky, line) in window.iter_mut().enumerate() {
                    for (kx, l) in line.iter_mut().enumerate() {
                        *l = img.luminance(x + kx - 1, y + ky - 1);
                    }
                }
                gx[row * w + x] = convolve3(&window, &SOBEL_X);
                gy[row * w + x] = convolve3(&window, &SOBEL_Y);
            }
        }
    }
}

/// Kernel response summed row by row, so a flat window cancels to exactly 0.
#[inline]
fn convolve3(window: &[[f32; 3]; 3], kernel: &[[f32; 3]; 3]) -> f32 {
    let row = |i: usize| {
        window[i][0] * kernel[i][0] + window[i][1] * kernel[i][1] + window[i][2] * kernel[i][2]
    };
    row(0) + row(1) + row(2)
}

/// Luminance-plane convolution evaluated eight columns at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimdGradient;

impl GradientEngine for SimdGradient {
    fn name(&self) -> &'static str {
        "accelerated"
    }

    fn gradient_rows(&self, img: &RasterImage, rows: Range<usize>, gx: &mut [f32], gy: &mut [f32]) {
        let w = img.width();
        // Luminance for the block plus one halo row above and below.
        let window = rows.start - 1..rows.end + 1;
        let plane: Vec<f32> = (window.start * w..window.end * w)
            .map(|i| luminance_of(img.rgb_at(i).to_f32()))
            .collect();

        for row in 0..rows.len() {
            let top = &plane[row * w..(row + 1) * w];
            let mid = &plane[(row + 1) * w..(row + 2) * w];
            let bot = &plane[(row + 2) * w..(row + 3) * w];
            let out_x = &mut gx[row * w..(row + 1) * w];
            let out_y = &mut gy[row * w..(row + 1) * w];
            simd::sobel_row(top, mid, bot, out_x, out_y);
        }
    }
}

mod simd {
    use wide::*;

    const LANES: usize = 8;

    #[inline]
    fn load(s: &[f32]) -> f32x8 {
        let mut lanes = [0.0f32; LANES];
        lanes.copy_from_slice(&s[..LANES]);
        f32x8::new(lanes)
    }

    /// Gradients for interior columns of one row given its three luminance rows.
    pub fn sobel_row(top: &[f32], mid: &[f32], bot: &[f32], gx: &mut [f32], gy: &mut [f32]) {
        let w = mid.len();
        let two = f32x8::splat(2.0);

        let mut x = 1;
        while x + LANES < w {
            let tl = load(&top[x - 1..]);
            let tm = load(&top[x..]);
            let tr = load(&top[x + 1..]);
            let ml = load(&mid[x - 1..]);
            let mr = load(&mid[x + 1..]);
            let bl = load(&bot[x - 1..]);
            let bm = load(&bot[x..]);
            let br = load(&bot[x + 1..]);

            let sx = (tr - tl) + two * (mr - ml) + (br - bl);
            let sy = (bl + two * bm + br) - (tl + two * tm + tr);

            gx[x..x + LANES].copy_from_slice(&sx.to_array());
            gy[x..x + LANES].copy_from_slice(&sy.to_array());
            x += LANES;
        }

        while x + 1 < w {
            gx[x] = (top[x + 1] - top[x - 1])
                + 2.0 * (mid[x + 1] - mid[x - 1])
                + (bot[x + 1] - bot[x - 1]);
            gy[x] = (bot[x - 1] + 2.0 * bot[x] + bot[x + 1])
                - (top[x - 1] + 2.0 * top[x] + top[x + 1]);
            x += 1;
        }
    }
}

/// Resolve a requested worker count: 0 means all available cores.
/// The result is clamped to `[1, MAX_THREADS]`.
pub fn resolve_threads(requested: usize) -> usize {
    let n = if requested == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    } else {
        requested
    };
    n.clamp(1, MAX_THREADS)
}

/// Split interior rows `[1, height - 1)` into contiguous blocks.
///
/// The interior is divided evenly across `workers` (`ceil(rows / workers)`
/// rows per block). A non-zero `max_rows` caps the block length, which
/// yields more blocks than workers on tall images. Blocks never overlap
/// and cover every interior row exactly once.
pub fn partition_rows(height: usize, workers: usize, max_rows: usize) -> Vec<Range<usize>> {
    if height < 3 {
        return Vec::new();
    }
    let interior = height - 2;
    let mut block = interior.div_ceil(workers.clamp(1, interior));
    if max_rows > 0 {
        block = block.min(max_rows);
    }

    (1..height - 1)
        .step_by(block)
        .map(|start| start..(start + block).min(height - 1))
        .collect()
}

/// Sobel edge detector with a fixed engine and worker count.
pub struct EdgeDetector {
    engine: Box<dyn GradientEngine>,
    threads: usize,
}

impl EdgeDetector {
    /// Create a detector; `threads == 0` selects all available cores.
    pub fn new(backend: EdgeBackend, threads: usize) -> Self {
        Self::with_engine(backend.engine(), threads)
    }

    pub fn with_engine(engine: Box<dyn GradientEngine>, threads: usize) -> Self {
        Self {
            engine,
            threads: resolve_threads(threads),
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Row blocks a `height`-row image is split into.
    pub fn plan(&self, height: usize, block_rows_hint: usize) -> Vec<Range<usize>> {
        partition_rows(height, self.threads, block_rows_hint)
    }

    /// Compute the edge field of `img`.
    ///
    /// `block_rows_hint` caps the rows per block (0 = no cap); it only
    /// affects scheduling. Border pixels keep magnitude 0.
    ///
    /// # Returns
    /// The invalid field when `img` is invalid; otherwise a field of the
    /// same dimensions (all zero for images narrower or shorter than 3).
    pub fn detect(&self, img: &RasterImage, block_rows_hint: usize) -> EdgeField {
        if !img.is_valid() {
            return EdgeField::invalid();
        }

        let w = img.width();
        let h = img.height();
        let mut field = EdgeField::zeroed(w, h);
        if w < 3 || h < 3 {
            return field;
        }

        let blocks = self.plan(h, block_rows_hint);
        log::debug!(
            "sobel[{}]: {}x{} in {} block(s) on {} thread(s)",
            self.engine.name(),
            w,
            h,
            blocks.len(),
            self.threads
        );

        // Disjoint slices of the interior rows, one per block.
        let interior = w..(h - 1) * w;
        let mut jobs = Vec::with_capacity(blocks.len());
        let mut mag_rest = &mut field.magnitude[interior.clone()];
        let mut ang_rest = &mut field.angle[interior];
        for rows in &blocks {
            let len = rows.len() * w;
            let (mag, mag_tail) = std::mem::take(&mut mag_rest).split_at_mut(len);
            let (ang, ang_tail) = std::mem::take(&mut ang_rest).split_at_mut(len);
            mag_rest = mag_tail;
            ang_rest = ang_tail;
            jobs.push((rows.clone(), mag, ang));
        }

        let engine = self.engine.as_ref();
        let pool = if jobs.len() > 1 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(jobs.len().min(self.threads))
                .build()
                .map_err(|e| log::warn!("sobel: thread pool unavailable ({}), running serially", e))
                .ok()
        } else {
            None
        };

        match pool {
            // `install` returns only after every block has finished.
            Some(pool) => pool.install(|| {
                jobs.into_par_iter().for_each(|(rows, mag, ang)| {
                    gradient_block(engine, img, rows, mag, ang);
                });
            }),
            None => {
                for (rows, mag, ang) in jobs {
                    gradient_block(engine, img, rows, mag, ang);
                }
            }
        }

        normalize_interior(&mut field);
        field
    }
}

/// Gradients, magnitude and folded angle for one row block.
fn gradient_block(
    engine: &dyn GradientEngine,
    img: &RasterImage,
    rows: Range<usize>,
    mag: &mut [f32],
    ang: &mut [f32],
) {
    let w = img.width();
    let mut gx = vec![0.0f32; mag.len()];
    let mut gy = vec![0.0f32; mag.len()];
    engine.gradient_rows(img, rows.clone(), &mut gx, &mut gy);

    for row in 0..rows.len() {
        for x in 1..w - 1 {
            let i = row * w + x;
            let (vx, vy) = (gx[i], gy[i]);
            mag[i] = (vx * vx + vy * vy).sqrt();
            let mut angle = vy.atan2(vx).to_degrees();
            if angle < 0.0 {
                angle += 180.0;
            }
            ang[i] = angle;
        }
    }
}

/// Divide interior magnitudes by their maximum; no-op when the maximum is 0.
fn normalize_interior(field: &mut EdgeField) {
    let w = field.width;
    let h = field.height;
    let interior = |y: usize| y * w + 1..y * w + w - 1;

    let max = (1..h - 1)
        .flat_map(interior)
        .map(|i| field.magnitude[i])
        .fold(0.0f32, f32::max);

    if max > 0.0 {
        for y in 1..h - 1 {
            for m in &mut field.magnitude[interior(y)] {
                *m /= max;
            }
        }
    }
}

/// One-shot detection with a fresh detector.
pub fn detect_edges(
    img: &RasterImage,
    backend: EdgeBackend,
    threads: usize,
    block_rows_hint: usize,
) -> EdgeField {
    EdgeDetector::new(backend, threads).detect(img, block_rows_hint)
}
