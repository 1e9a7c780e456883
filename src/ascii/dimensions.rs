//! Grid dimensions for aspect-corrected rendering.

/// Default output width in characters.
pub const DEFAULT_WIDTH: usize = 120;

/// Default output height in characters, before compensation.
pub const DEFAULT_HEIGHT: usize = 60;

/// Vertical compensation factor.
/// Terminal cells are taller than wide, so fewer rows are sampled than
/// requested to keep the picture from stretching vertically.
pub const VERTICAL_COMPENSATION: f32 = 0.75;

/// Rows actually sampled for a requested height (truncating).
///
/// # Example
/// ```ignore
/// assert_eq!(compensate_height(60), 45);
/// ```
pub fn compensate_height(requested: usize) -> usize {
    (requested as f32 * VERTICAL_COMPENSATION) as usize
}

/// Resampling grid `(width, height)` for a requested character grid.
///
/// A zero in either input yields a zero in the output, which the
/// resampler rejects.
pub fn grid_dimensions(width: usize, height: usize) -> (usize, usize) {
    (width, compensate_height(height))
}
