//! Decoding of uploaded images.
//!
//! Only JPEG and PNG are accepted. The format is sniffed from the
//! leading magic bytes rather than trusted from a file name or
//! content type, so a mislabelled upload is still decoded correctly and
//! any other format is rejected outright.

use super::grid::PixelGrid;
use image::ImageFormat;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while decoding an uploaded image.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("image data is empty")]
    Empty,
    #[error("unsupported image format (expected JPEG or PNG)")]
    UnsupportedFormat,
    #[error("image has zero dimensions ({width}x{height})")]
    ZeroDimensions { width: u32, height: u32 },
    #[error("failed to decode {format} image: {source}")]
    Malformed {
        format: SourceFormat,
        #[source]
        source: image::ImageError,
    },
}

/// Encoded formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
}

impl SourceFormat {
    /// Identifies the format from the leading bytes of an encoded image.
    ///
    /// Returns `None` for anything other than JPEG or PNG.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes) {
            Ok(ImageFormat::Jpeg) => Some(Self::Jpeg),
            Ok(ImageFormat::Png) => Some(Self::Png),
            _ => None,
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => f.write_str("JPEG"),
            Self::Png => f.write_str("PNG"),
        }
    }
}

/// Decodes raw JPEG/PNG bytes into an RGBA pixel grid.
#[derive(Debug, Clone, Default)]
pub struct ImageDecoder;

impl ImageDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decodes an in-memory image.
    ///
    /// Decoding is all-or-nothing: truncated or corrupt data fails with
    /// [`DecodeError::Malformed`] and never yields a partial grid.
    pub fn decode(&self, bytes: &[u8]) -> Result<PixelGrid, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }

        let format = SourceFormat::sniff(bytes).ok_or(DecodeError::UnsupportedFormat)?;
        let image = image::load_from_memory_with_format(bytes, format.image_format())
            .map_err(|source| DecodeError::Malformed { format, source })?;

        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(DecodeError::ZeroDimensions { width, height });
        }

        tracing::trace!(%format, width, height, bytes = bytes.len(), "Decoded image");

        Ok(PixelGrid::new(image.to_rgba8(), format))
    }
}
