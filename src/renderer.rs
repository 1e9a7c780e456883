//! Terminal output for a finished glyph grid.
//!
//! Each frame is assembled into one string and written with a single
//! `write_all`, so partial lines never interleave with log output.

use std::io::Write;
use std::time::Duration;

use crate::ascii::GlyphCell;
use crate::pipeline::{Rendering, StageTimings};

/// Reset all SGR attributes.
pub const RESET: &str = "\x1b[0m";

/// Write the grid, one line per row.
///
/// With `colors`, every cell is prefixed with a 24-bit foreground escape
/// and each row ends with a reset.
pub fn render<W: Write>(
    out: &mut W,
    cells: &[GlyphCell],
    width: usize,
    colors: bool,
) -> std::io::Result<()> {
    if width == 0 || cells.is_empty() {
        return Ok(());
    }

    // Escape sequences run about 19 bytes per cell.
    let per_cell = if colors { 20 } else { 1 };
    let mut output = String::with_capacity(cells.len() * per_cell + cells.len() / width * 6);

    for row in cells.chunks(width) {
        for cell in row {
            if colors {
                let c = cell.color;
                output.push_str(&format!("\x1b[38;2;{};{};{}m", c.r, c.g, c.b));
            }
            output.push(cell.ch);
        }
        if colors {
            output.push_str(RESET);
        }
        output.push('\n');
    }
    if colors {
        output.push_str(RESET);
    }

    out.write_all(output.as_bytes())?;
    out.flush()
}

/// Render a pipeline result.
pub fn render_rendering<W: Write>(
    out: &mut W,
    rendering: &Rendering,
    colors: bool,
) -> std::io::Result<()> {
    render(out, &rendering.cells, rendering.width, colors)
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn metric_value(d: Option<Duration>) -> String {
    match d {
        Some(d) => format!("{:.3}", millis(d)),
        None => "nan".to_string(),
    }
}

/// Machine-readable timing lines.
///
/// Disabled stages report `nan`.
///
/// # Example
/// ```ignore
/// METRIC:EdgeDetection_ms:1.204
/// METRIC:HSV_ms:nan
/// METRIC:TOTAL_ms:3.871
/// ```
pub fn write_metrics<W: Write>(out: &mut W, timings: &StageTimings) -> std::io::Result<()> {
    writeln!(out, "METRIC:EdgeDetection_ms:{}", metric_value(timings.edges))?;
    writeln!(out, "METRIC:HSV_ms:{}", metric_value(timings.hsv))?;
    writeln!(out, "METRIC:TOTAL_ms:{:.3}", millis(timings.total))?;
    out.flush()
}
