//! Raster encoder.
//!
//! Turns a colored bitmap into PNG, JPEG or GIF bytes.
//!
//! # Design Decisions
//!
//! - **PNG is lossless**: foreground and background pixels survive exactly.
//!
//! - **JPEG quality is fixed per process**: the quality comes from
//!   configuration, not from the request.
//!
//! - **GIF is a single frame**: no animation, no explicit palette. The
//!   encoder quantizes the two colors itself.

use bytes::Bytes;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, Frame, ImageEncoder, RgbImage};

use super::params::OutputFormat;
use crate::error::GenerationError;

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

// =============================================================================
// Raster Encoder
// =============================================================================

/// Encodes RGB bitmaps into the supported output formats.
#[derive(Debug, Clone)]
pub struct RasterEncoder {
    jpeg_quality: u8,
}

impl Default for RasterEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterEncoder {
    /// Create an encoder using [`DEFAULT_JPEG_QUALITY`].
    pub fn new() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Create an encoder with the given JPEG quality, clamped to 1-100.
    pub fn with_jpeg_quality(quality: u8) -> Self {
        Self {
            jpeg_quality: clamp_quality(quality),
        }
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Encode `image` in the requested format.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::ImageProcessing`] if the underlying codec
    /// fails.
    pub fn encode(&self, image: &RgbImage, format: OutputFormat) -> Result<Bytes, GenerationError> {
        let mut output = Vec::new();

        match format {
            OutputFormat::Png => {
                PngEncoder::new(&mut output)
                    .write_image(
                        image.as_raw(),
                        image.width(),
                        image.height(),
                        ExtendedColorType::Rgb8,
                    )
                    .map_err(processing_error)?;
            }
            OutputFormat::Jpeg => {
                JpegEncoder::new_with_quality(&mut output, self.jpeg_quality)
                    .encode_image(image)
                    .map_err(processing_error)?;
            }
            OutputFormat::Gif => {
                let rgba = DynamicImage::ImageRgb8(image.clone()).to_rgba8();
                // Trailer is written when the encoder drops
                let mut encoder = GifEncoder::new(&mut output);
                encoder
                    .encode_frame(Frame::new(rgba))
                    .map_err(processing_error)?;
            }
        }

        Ok(Bytes::from(output))
    }
}

fn processing_error(err: image::ImageError) -> GenerationError {
    GenerationError::ImageProcessing {
        message: err.to_string(),
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Returns `true` if quality is in the valid range (1-100).
#[inline]
pub fn is_valid_quality(quality: u8) -> bool {
    (MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&quality)
}

/// Clamp quality to valid range.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

// =============================================================================
// Tests
// =============================================================================
