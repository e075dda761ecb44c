//! Scaling of decoded images to the canonical resolution.
//!
//! The output is always exactly 54×54. Non-square sources are stretched
//! to fill the grid; the bitmap occupies a fixed footprint on the display
//! so the aspect ratio is discarded.

use super::grid::{CanonicalGrid, PixelGrid};
use super::{CANONICAL_HEIGHT, CANONICAL_WIDTH};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Resamples pixel grids to the canonical resolution.
#[derive(Debug, Clone)]
pub struct Resampler {
    filter: FilterType,
}

impl Resampler {
    /// Creates a resampler using a triangle (bilinear) filter.
    pub fn new() -> Self {
        Self {
            filter: FilterType::Triangle,
        }
    }

    /// Scales `grid` to exactly [`CANONICAL_WIDTH`] × [`CANONICAL_HEIGHT`].
    ///
    /// Never fails: a 1×1 source becomes a constant fill and extreme
    /// aspect ratios are stretched like any other. Consumes the grid so
    /// the full-resolution buffer is flattened in place.
    pub fn resample(&self, grid: PixelGrid) -> CanonicalGrid {
        let (from_width, from_height) = (grid.width(), grid.height());
        let flattened = flatten_over_black(grid.into_pixels());
        let resized = imageops::resize(&flattened, CANONICAL_WIDTH, CANONICAL_HEIGHT, self.filter);

        tracing::trace!(from_width, from_height, "Resampled to canonical grid");

        CanonicalGrid::new(resized)
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Composites every pixel over opaque black.
///
/// Transparent regions therefore read as dark, and colour from fully
/// transparent pixels cannot bleed into neighbours during filtering.
fn flatten_over_black(mut pixels: RgbaImage) -> RgbaImage {
    for Rgba([r, g, b, a]) in pixels.pixels_mut() {
        let alpha = u16::from(*a);
        for channel in [r, g, b] {
            *channel = ((u16::from(*channel) * alpha + 127) / 255) as u8;
        }
        *a = u8::MAX;
    }
    pixels
}
