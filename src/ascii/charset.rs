//! Density ramps and edge-direction glyphs.

/// Detailed density ramp (70 levels), sparse to dense.
pub const DETAILED_RAMP: &[char] = &[
    ' ', '.', '\'', '`', '^', '"', ',', ':', ';', 'I', 'l', '!', 'i', '>', '<', '~', '+', '_',
    '-', '?', ']', '[', '}', '{', '1', ')', '(', '|', '\\', '/', 't', 'f', 'j', 'r', 'x', 'n',
    'u', 'v', 'c', 'z', 'X', 'Y', 'U', 'J', 'C', 'L', 'Q', '0', 'O', 'Z', 'm', 'w', 'q', 'p',
    'd', 'b', 'k', 'h', 'a', 'o', '*', '#', 'M', 'W', '&', '8', '%', 'B', '@', '$',
];

/// Simple density ramp (10 levels).
/// Easier to read on small grids.
pub const SIMPLE_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Glyph for near-horizontal edges.
pub const EDGE_HORIZONTAL: char = '-';
/// Glyph for rising diagonals.
pub const EDGE_DIAGONAL_UP: char = '/';
/// Glyph for near-vertical edges.
pub const EDGE_VERTICAL: char = '|';
/// Glyph for falling diagonals.
pub const EDGE_DIAGONAL_DOWN: char = '\\';

/// Density ramp selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ramp {
    /// 70-level ramp
    #[default]
    Detailed,
    /// 10-level ramp
    Simple,
}

impl Ramp {
    /// Characters of this ramp, ordered sparse to dense.
    pub fn chars(&self) -> &'static [char] {
        match self {
            Ramp::Detailed => DETAILED_RAMP,
            Ramp::Simple => SIMPLE_RAMP,
        }
    }

    pub fn levels(&self) -> usize {
        self.chars().len()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ramp::Detailed => "detailed",
            Ramp::Simple => "simple",
        }
    }
}

/// Orientation bucket of an edge angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    Horizontal,
    DiagonalUp,
    Vertical,
    DiagonalDown,
}

impl EdgeDirection {
    /// Bucket an angle in degrees.
    ///
    /// The angle is folded into [0, 180) first, so callers may pass either
    /// an already folded orientation or a full direction.
    pub fn from_angle(angle: f32) -> Self {
        let folded = angle.rem_euclid(180.0);
        if !(22.5..157.5).contains(&folded) {
            EdgeDirection::Horizontal
        } else if folded < 67.5 {
            EdgeDirection::DiagonalUp
        } else if folded < 112.5 {
            EdgeDirection::Vertical
        } else {
            EdgeDirection::DiagonalDown
        }
    }

    pub fn glyph(self) -> char {
        match self {
            EdgeDirection::Horizontal => EDGE_HORIZONTAL,
            EdgeDirection::DiagonalUp => EDGE_DIAGONAL_UP,
            EdgeDirection::Vertical => EDGE_VERTICAL,
            EdgeDirection::DiagonalDown => EDGE_DIAGONAL_DOWN,
        }
    }
}

/// Direction glyph for an edge angle in degrees.
pub fn edge_glyph(angle: f32) -> char {
    EdgeDirection::from_angle(angle).glyph()
}
