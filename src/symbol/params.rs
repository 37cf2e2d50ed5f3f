//! Generation parameters and their validation.
//!
//! Raw request values arrive as a [`GenerationRequest`]. Validation checks
//! them in a fixed order and stops at the first violation:
//!
//! 1. content
//! 2. size
//! 3. correction level
//! 4. output format
//! 5. foreground color, then background color
//! 6. margin
//!
//! A successful validation yields typed [`GenerationParameters`].

use std::fmt;
use std::str::FromStr;

use image::Rgb;

use crate::error::ValidationError;

/// Smallest accepted image size in pixels.
pub const MIN_IMAGE_SIZE: i32 = 150;

/// Largest accepted image size in pixels.
pub const MAX_IMAGE_SIZE: i32 = 350;

/// Smallest accepted margin.
pub const MIN_MARGIN: i32 = 0;

/// Largest accepted margin.
pub const MAX_MARGIN: i32 = 50;

pub const DEFAULT_SIZE: i32 = 250;
pub const DEFAULT_CORRECTION: &str = "L";
pub const DEFAULT_FORMAT: &str = "png";
pub const DEFAULT_FOREGROUND: &str = "#000000";
pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";
pub const DEFAULT_MARGIN: i32 = 4;

// =============================================================================
// Correction Level
// =============================================================================

/// Error correction strength of the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionLevel {
    L,
    M,
    Q,
    H,
}

impl CorrectionLevel {
    pub const ALL: [CorrectionLevel; 4] = [Self::L, Self::M, Self::Q, Self::H];

    pub fn name(&self) -> &'static str {
        match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        }
    }
}

impl FromStr for CorrectionLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s))
            .ok_or(ValidationError::InvalidCorrectionLevel)
    }
}

// =============================================================================
// Output Format
// =============================================================================

/// Raster format of the generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Gif,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Png, Self::Jpeg, Self::Gif];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
        }
    }

    /// Canonical MIME type for the format.
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or(ValidationError::InvalidFormat)
    }
}

// =============================================================================
// Colors
// =============================================================================

/// Fixed palette of color names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    White,
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Gray,
}

impl NamedColor {
    pub const ALL: [NamedColor; 8] = [
        Self::Black,
        Self::White,
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Yellow,
        Self::Purple,
        Self::Gray,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Black => "BLACK",
            Self::White => "WHITE",
            Self::Red => "RED",
            Self::Green => "GREEN",
            Self::Blue => "BLUE",
            Self::Yellow => "YELLOW",
            Self::Purple => "PURPLE",
            Self::Gray => "GRAY",
        }
    }

    pub fn hex_code(&self) -> &'static str {
        match self {
            Self::Black => "#000000",
            Self::White => "#FFFFFF",
            Self::Red => "#FF0000",
            Self::Green => "#00FF00",
            Self::Blue => "#0000FF",
            Self::Yellow => "#FFFF00",
            Self::Purple => "#800080",
            Self::Gray => "#808080",
        }
    }

    pub fn rgb(&self) -> Rgb<u8> {
        match self {
            Self::Black => Rgb([0x00, 0x00, 0x00]),
            Self::White => Rgb([0xFF, 0xFF, 0xFF]),
            Self::Red => Rgb([0xFF, 0x00, 0x00]),
            Self::Green => Rgb([0x00, 0xFF, 0x00]),
            Self::Blue => Rgb([0x00, 0x00, 0xFF]),
            Self::Yellow => Rgb([0xFF, 0xFF, 0x00]),
            Self::Purple => Rgb([0x80, 0x00, 0x80]),
            Self::Gray => Rgb([0x80, 0x80, 0x80]),
        }
    }
}

/// A validated color: a `#RRGGBB` literal or a palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Hex(Rgb<u8>),
    Named(NamedColor),
}

impl Color {
    /// Concrete pixel value.
    pub fn rgb(&self) -> Rgb<u8> {
        match self {
            Self::Hex(rgb) => *rgb,
            Self::Named(named) => named.rgb(),
        }
    }
}

impl FromStr for Color {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rgb) = parse_hex(s) {
            return Ok(Self::Hex(rgb));
        }

        NamedColor::ALL
            .into_iter()
            .find(|named| named.name().eq_ignore_ascii_case(s))
            .map(Self::Named)
            .ok_or(ValidationError::InvalidColor)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex(Rgb([r, g, b])) => write!(f, "#{:02X}{:02X}{:02X}", r, g, b),
            Self::Named(named) => f.write_str(named.name()),
        }
    }
}

/// Parse exactly `#` followed by six hex digits.
fn parse_hex(s: &str) -> Option<Rgb<u8>> {
    let digits = s.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

// =============================================================================
// Request / Parameters
// =============================================================================

/// Unvalidated generation parameters as received from a client.
///
/// `None` stands for an absent value. Absent colors fall back to black and
/// white; every other absent value is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub content: Option<String>,
    pub size: i32,
    pub correction: Option<String>,
    pub format: Option<String>,
    pub foreground: Option<String>,
    pub background: Option<String>,
    pub margin: i32,
}

impl GenerationRequest {
    /// Create a request for `content` with every other parameter at its default.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            size: DEFAULT_SIZE,
            correction: Some(DEFAULT_CORRECTION.to_string()),
            format: Some(DEFAULT_FORMAT.to_string()),
            foreground: Some(DEFAULT_FOREGROUND.to_string()),
            background: Some(DEFAULT_BACKGROUND.to_string()),
            margin: DEFAULT_MARGIN,
        }
    }

    pub fn with_size(mut self, size: i32) -> Self {
        self.size = size;
        self
    }

    pub fn with_correction(mut self, correction: impl Into<String>) -> Self {
        self.correction = Some(correction.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_foreground(mut self, color: impl Into<String>) -> Self {
        self.foreground = Some(color.into());
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    /// Validate every parameter, returning the first violation.
    pub fn validate(&self) -> Result<GenerationParameters, ValidationError> {
        let content = match self.content.as_deref() {
            Some(content) if !is_blank(content) => content.to_string(),
            _ => return Err(ValidationError::InvalidContent),
        };

        if !(MIN_IMAGE_SIZE..=MAX_IMAGE_SIZE).contains(&self.size) {
            return Err(ValidationError::InvalidSize);
        }

        let correction = self
            .correction
            .as_deref()
            .ok_or(ValidationError::InvalidCorrectionLevel)?
            .parse::<CorrectionLevel>()?;

        let format = self
            .format
            .as_deref()
            .ok_or(ValidationError::InvalidFormat)?
            .parse::<OutputFormat>()?;

        let foreground = parse_optional_color(self.foreground.as_deref())?;
        let background = parse_optional_color(self.background.as_deref())?;

        if !(MIN_MARGIN..=MAX_MARGIN).contains(&self.margin) {
            return Err(ValidationError::InvalidMargin);
        }

        Ok(GenerationParameters {
            content,
            size: self.size as u32,
            correction,
            format,
            foreground,
            background,
            margin: self.margin as u32,
        })
    }
}

/// Blank means empty or made only of breaking whitespace and the ASCII
/// separator controls. No-break spaces and NEL count as content.
fn is_blank(content: &str) -> bool {
    content.chars().all(|c| {
        matches!(c, '\u{1C}'..='\u{1F}')
            || (c.is_whitespace()
                && !matches!(c, '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{0085}'))
    })
}

/// An absent color is valid and defers to the default.
fn parse_optional_color(color: Option<&str>) -> Result<Option<Color>, ValidationError> {
    color.map(str::parse).transpose()
}

/// Fully validated generation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParameters {
    pub content: String,
    pub size: u32,
    pub correction: CorrectionLevel,
    pub format: OutputFormat,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub margin: u32,
}

impl GenerationParameters {
    /// Foreground pixel, black when unspecified.
    pub fn foreground_rgb(&self) -> Rgb<u8> {
        self.foreground
            .map(|c| c.rgb())
            .unwrap_or_else(|| NamedColor::Black.rgb())
    }

    /// Background pixel, white when unspecified.
    pub fn background_rgb(&self) -> Rgb<u8> {
        self.background
            .map(|c| c.rgb())
            .unwrap_or_else(|| NamedColor::White.rgb())
    }
}

// =============================================================================
// Tests
// =============================================================================
