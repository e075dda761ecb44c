//! Pixel grids produced by decoding and resampling.

use super::decode::SourceFormat;
use super::{CANONICAL_HEIGHT, CANONICAL_WIDTH};
use image::{Rgba, RgbaImage};

/// A decoded image as an RGBA8 grid.
///
/// Transient: owned by a single conversion call and dropped once the
/// bitmap has been packed.
#[derive(Clone)]
pub struct PixelGrid {
    pixels: RgbaImage,
    format: SourceFormat,
}

impl PixelGrid {
    /// Wraps decoded pixels together with the format they came from.
    pub fn new(pixels: RgbaImage, format: SourceFormat) -> Self {
        Self { pixels, format }
    }

    /// Consumes the grid, returning the underlying RGBA buffer.
    #[inline]
    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Returns the encoded format the grid was decoded from.
    #[inline]
    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width() as usize) * (self.height() as usize)
    }

    /// Validates that the sample buffer matches the dimensions.
    pub fn is_valid(&self) -> bool {
        self.pixels.as_raw().len() == self.pixel_count() * 4
    }
}

impl std::fmt::Debug for PixelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelGrid")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("format", &self.format)
            .finish()
    }
}

/// A grid that is exactly [`CANONICAL_WIDTH`] × [`CANONICAL_HEIGHT`].
///
/// Only the resampler constructs these, so the dimensions hold by
/// construction.
#[derive(Clone)]
pub struct CanonicalGrid {
    pixels: RgbaImage,
}

impl CanonicalGrid {
    pub(super) fn new(pixels: RgbaImage) -> Self {
        debug_assert_eq!(pixels.dimensions(), (CANONICAL_WIDTH, CANONICAL_HEIGHT));
        Self { pixels }
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the canonical grid.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

impl std::fmt::Debug for CanonicalGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanonicalGrid")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions() {
        let grid = PixelGrid::new(RgbaImage::new(640, 480), SourceFormat::Png);

        assert_eq!(grid.width(), 640);
        assert_eq!(grid.height(), 480);
        assert_eq!(grid.pixel_count(), 640 * 480);
        assert!(grid.is_valid());
    }

    #[test]
    fn test_debug_omits_pixels() {
        let grid = PixelGrid::new(RgbaImage::new(2, 3), SourceFormat::Jpeg);
        let debug = format!("{:?}", grid);

        assert!(debug.contains("width: 2"));
        assert!(debug.contains("Jpeg"));
    }
}
