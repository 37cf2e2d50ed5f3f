//! Symbol image generation.
//!
//! This module turns request parameters into encoded barcode images.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │ GenerationRequest
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          SymbolImageGenerator           │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  validate    │  │  RasterEncoder  │  │
//! │  │  (fail fast) │  │  (png/jpeg/gif) │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │       matrix::encode (qrcode crate)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use qrcode_service::symbol::{GenerationRequest, SymbolImageGenerator};
//!
//! let generator = SymbolImageGenerator::new();
//! let request = GenerationRequest::new("https://example.com")
//!     .with_size(300)
//!     .with_correction("M")
//!     .with_foreground("navy");
//!
//! // "navy" is not in the palette
//! assert!(generator.generate(&request).is_err());
//!
//! let image = generator
//!     .generate(&request.with_foreground("#000080"))
//!     .unwrap();
//! assert_eq!(image.media_type(), "image/png");
//! ```

mod encoder;
mod generator;
mod matrix;
mod params;

pub use encoder::{
    clamp_quality, is_valid_quality, RasterEncoder, DEFAULT_JPEG_QUALITY, MAX_JPEG_QUALITY,
    MIN_JPEG_QUALITY,
};
pub use generator::{GeneratedImage, SymbolImageGenerator};
pub use matrix::{encode as encode_matrix, BitMatrix};
pub use params::{
    Color, CorrectionLevel, GenerationParameters, GenerationRequest, NamedColor, OutputFormat,
    DEFAULT_BACKGROUND, DEFAULT_CORRECTION, DEFAULT_FOREGROUND, DEFAULT_FORMAT, DEFAULT_MARGIN,
    DEFAULT_SIZE, MAX_IMAGE_SIZE, MAX_MARGIN, MIN_IMAGE_SIZE, MIN_MARGIN,
};
