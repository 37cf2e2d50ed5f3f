use bytes::Bytes;
use image::RgbImage;
use tracing::debug;

use super::encoder::RasterEncoder;
use super::matrix;
use super::params::{GenerationRequest, OutputFormat};
use crate::error::GenerationError;

/// Encoded symbol image with its media type.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Encoded image bytes
    pub data: Bytes,

    /// Format the bytes are encoded in
    pub format: OutputFormat,

    /// Width and height in pixels
    pub dimension: u32,
}

impl GeneratedImage {
    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }
}

/// Validates generation requests and renders them to image bytes.
///
/// Stateless apart from the encoder settings; every call encodes from
/// scratch.
#[derive(Debug, Clone, Default)]
pub struct SymbolImageGenerator {
    encoder: RasterEncoder,
}

impl SymbolImageGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator whose JPEG output uses `quality`.
    pub fn with_jpeg_quality(quality: u8) -> Self {
        Self {
            encoder: RasterEncoder::with_jpeg_quality(quality),
        }
    }

    /// Generate an image for `request`.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::Validation`] with the first parameter violation,
    ///   before any encoding work
    /// - [`GenerationError::ImageProcessing`] if the content does not fit the
    ///   symbol or the raster codec fails
    pub fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage, GenerationError> {
        let params = request.validate()?;

        let bits = matrix::encode(&params.content, params.correction, params.size, params.margin)
            .map_err(|e| GenerationError::ImageProcessing {
                message: e.to_string(),
            })?;

        let foreground = params.foreground_rgb();
        let background = params.background_rgb();
        let dimension = bits.dimension();

        let bitmap = RgbImage::from_fn(dimension, dimension, |x, y| {
            if bits.get(x, y) {
                foreground
            } else {
                background
            }
        });

        let data = self.encoder.encode(&bitmap, params.format)?;

        debug!(
            format = params.format.name(),
            dimension,
            bytes = data.len(),
            "Generated symbol image"
        );

        Ok(GeneratedImage {
            data,
            format: params.format,
            dimension,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
