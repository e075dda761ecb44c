//! Luminance thresholding of canonical grids.
//!
//! Luminance is the plain mean of the red, green and blue channels
//! computed at 16-bit precision and truncated back to 8 bits. It is not
//! perceptual luminance, and must stay that way: stored bitmaps were
//! produced with this exact formula.

use super::grid::CanonicalGrid;
use super::matrix::BinaryMatrix;
use super::{CANONICAL_PIXELS, LUMINANCE_THRESHOLD};

/// Computes the 8-bit unweighted luminance of an RGB sample.
///
/// Each channel is widened to 16 bits (`c * 257`), averaged, and shifted
/// back down, so the result always lies in `0..=255`.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let widen = |c: u8| u32::from(c) * 257;
    (((widen(r) + widen(g) + widen(b)) / 3) >> 8) as u8
}

/// Converts a canonical grid into a boolean matrix.
#[derive(Debug, Clone)]
pub struct Binarizer {
    /// Luminance at or below which a pixel is dark.
    threshold: u8,
}

impl Binarizer {
    /// Creates a binarizer with the canonical threshold of 128.
    pub fn new() -> Self {
        Self {
            threshold: LUMINANCE_THRESHOLD,
        }
    }

    /// Returns true if a sample is light (strictly above the threshold).
    #[inline]
    pub fn is_lit(&self, r: u8, g: u8, b: u8) -> bool {
        luminance(r, g, b) > self.threshold
    }

    /// Thresholds every pixel, row by row, top to bottom.
    ///
    /// Alpha is ignored; the resampler has already flattened it.
    pub fn binarize(&self, grid: &CanonicalGrid) -> BinaryMatrix {
        let mut bits = Vec::with_capacity(CANONICAL_PIXELS);
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let [r, g, b, _] = grid.pixel(x, y).0;
                bits.push(self.is_lit(r, g, b));
            }
        }
        BinaryMatrix::from_bits(bits)
    }
}

impl Default for Binarizer {
    fn default() -> Self {
        Self::new()
    }
}
