//! The boolean bitmap exposed to API clients.

use super::CANONICAL_WIDTH;
use serde::{Deserialize, Serialize};

/// Row-major light/dark pixels of a firework bitmap.
///
/// `true` means the pixel is light. A matrix produced by the pipeline
/// always holds exactly 2916 values; matrices unpacked from legacy
/// records may hold a different number and are passed through as-is.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BinaryMatrix {
    bits: Vec<bool>,
}

impl BinaryMatrix {
    /// Creates a matrix from row-major values.
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Returns the values in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Consumes the matrix, returning its values.
    #[inline]
    pub fn into_bits(self) -> Vec<bool> {
        self.bits
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the value at `(x, y)` on the canonical grid, if present.
    pub fn get(&self, x: u32, y: u32) -> Option<bool> {
        if x >= CANONICAL_WIDTH {
            return None;
        }
        let index = (y as usize) * (CANONICAL_WIDTH as usize) + (x as usize);
        self.bits.get(index).copied()
    }

    /// Counts the light pixels.
    pub fn count_lit(&self) -> usize {
        self.bits.iter().filter(|&&lit| lit).count()
    }

    /// Iterates over rows of the canonical width.
    ///
    /// The last row is shorter if the length is not a multiple of the
    /// width.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.bits.chunks(CANONICAL_WIDTH as usize)
    }

    /// Renders the bitmap as text, `#` for light and `.` for dark.
    pub fn render_ascii(&self) -> String {
        self.render_rows(|lit| if lit { "#" } else { "." }, "")
    }

    /// Renders the bitmap as CSV rows of `1` (light) and `0` (dark).
    pub fn render_csv(&self) -> String {
        self.render_rows(|lit| if lit { "1" } else { "0" }, ",")
    }

    fn render_rows(&self, cell: impl Fn(bool) -> &'static str, separator: &str) -> String {
        let mut out = String::with_capacity(self.bits.len() * (1 + separator.len()) + 64);
        for row in self.rows() {
            let cells: Vec<&str> = row.iter().map(|&lit| cell(lit)).collect();
            out.push_str(&cells.join(separator));
            out.push('\n');
        }
        out
    }
}

impl std::fmt::Debug for BinaryMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryMatrix")
            .field("len", &self.bits.len())
            .field("lit", &self.count_lit())
            .finish()
    }
}
