//! Image-to-bitmap conversion.
//!
//! This module turns an uploaded JPEG or PNG into the fixed 54×54
//! monochrome bitmap stored for every firework, and converts that bitmap
//! to and from its persisted byte-per-pixel form.
//!
//! ```text
//! bytes → decode → resample → binarize → pack      (write path)
//! packed bytes → unpack → BinaryMatrix             (read path)
//! ```
//!
//! The canonical resolution and threshold are fixed policy: the length of
//! every stored record (2916 bytes) is derived from them.

mod binarize;
mod decode;
mod grid;
mod matrix;
mod pack;
mod resample;

pub use binarize::{luminance, Binarizer};
pub use decode::{DecodeError, ImageDecoder, SourceFormat};
pub use grid::{CanonicalGrid, PixelGrid};
pub use matrix::BinaryMatrix;
pub use pack::{pack, unpack, PackedBytes};
pub use resample::Resampler;

/// Width of every stored bitmap in pixels.
pub const CANONICAL_WIDTH: u32 = 54;

/// Height of every stored bitmap in pixels.
pub const CANONICAL_HEIGHT: u32 = 54;

/// Number of pixels in a canonical bitmap (and bytes in a valid record).
pub const CANONICAL_PIXELS: usize = (CANONICAL_WIDTH * CANONICAL_HEIGHT) as usize;

/// Luminance at or below which a pixel is dark.
pub const LUMINANCE_THRESHOLD: u8 = 128;

/// Runs the decode, resample and binarize stages in sequence.
///
/// Holds no state between calls; one converter may be shared by any
/// number of concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    decoder: ImageDecoder,
    resampler: Resampler,
    binarizer: Binarizer,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts encoded image bytes into a canonical binary matrix.
    ///
    /// Fails only at the decode stage; every decoded image resamples and
    /// binarizes successfully.
    pub fn convert(&self, bytes: &[u8]) -> Result<BinaryMatrix, DecodeError> {
        let grid = self.decoder.decode(bytes)?;
        let (format, width, height) = (grid.format(), grid.width(), grid.height());
        let canonical = self.resampler.resample(grid);
        let matrix = self.binarizer.binarize(&canonical);

        tracing::debug!(
            source_format = %format,
            source_width = width,
            source_height = height,
            lit = matrix.count_lit(),
            "Converted image to bitmap"
        );

        Ok(matrix)
    }

    /// Converts encoded image bytes straight to the persisted form.
    pub fn convert_packed(&self, bytes: &[u8]) -> Result<PackedBytes, DecodeError> {
        self.convert(bytes).map(|matrix| pack(&matrix))
    }
}


#[cfg(test)]
mod tests {
    use super::test_images::{encode_png, solid_jpeg, solid_png};
    use super::*;

    #[test]
    fn test_black_image_is_all_dark() {
        let matrix = Converter::new()
            .convert(&solid_png(10, 10, [0, 0, 0, 255]))
            .unwrap();

        assert_eq!(matrix.len(), CANONICAL_PIXELS);
        assert!(matrix.as_slice().iter().all(|&lit| !lit));
    }

    #[test]
    fn test_non_square_white_image_is_all_lit() {
        let matrix = Converter::new()
            .convert(&solid_png(200, 100, [255, 255, 255, 255]))
            .unwrap();

        assert_eq!(matrix.len(), CANONICAL_PIXELS);
        assert!(matrix.as_slice().iter().all(|&lit| lit));
    }

    #[test]
    fn test_jpeg_input_accepted() {
        let matrix = Converter::new()
            .convert(&solid_jpeg(32, 48, [250, 250, 250]))
            .unwrap();

        assert_eq!(matrix.count_lit(), CANONICAL_PIXELS);
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let img = image::RgbaImage::from_fn(77, 31, |x, y| {
            let v = ((x * 7 + y * 13) % 256) as u8;
            image::Rgba([v, v.wrapping_mul(3), 255 - v, 255])
        });
        let bytes = encode_png(&img);
        let converter = Converter::new();

        let first = converter.convert(&bytes).unwrap();
        let second = converter.convert(&bytes).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_left_half_white_keeps_geometry() {
        // White on the left, black on the right: the stored bitmap must
        // be lit on its left columns only.
        let img = image::RgbaImage::from_fn(108, 20, |x, _| {
            if x < 54 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 255])
            }
        });
        let matrix = Converter::new().convert(&encode_png(&img)).unwrap();

        assert_eq!(matrix.get(0, 0), Some(true));
        assert_eq!(matrix.get(CANONICAL_WIDTH - 1, 0), Some(false));
        assert_eq!(matrix.get(0, CANONICAL_HEIGHT - 1), Some(true));
    }

    #[test]
    fn test_text_bytes_rejected() {
        let result = Converter::new().convert(b"definitely not an image");
        assert!(matches!(result, Err(DecodeError::UnsupportedFormat)));
    }

    #[test]
    fn test_convert_packed_uses_byte_per_pixel() {
        let packed = Converter::new()
            .convert_packed(&solid_png(3, 3, [255, 255, 255, 255]))
            .unwrap();

        assert_eq!(packed.len(), CANONICAL_PIXELS);
        assert!(packed.as_bytes().iter().all(|&b| b == 1));
    }
}
