//! Module matrix encoding and pixel-grid layout.
//!
//! The symbol's module grid is produced by the `qrcode` crate. Layout onto
//! the output grid follows the usual writer convention:
//!
//! ```text
//! input    = modules + 2 * margin
//! output   = max(size, input)
//! multiple = output / input
//! padding  = (output - modules * multiple) / 2
//! ```
//!
//! Each dark module becomes a `multiple × multiple` block at
//! `padding + index * multiple`. Leftover pixels on every side are light.

use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};

use super::params::CorrectionLevel;

impl From<CorrectionLevel> for EcLevel {
    fn from(level: CorrectionLevel) -> Self {
        match level {
            CorrectionLevel::L => EcLevel::L,
            CorrectionLevel::M => EcLevel::M,
            CorrectionLevel::Q => EcLevel::Q,
            CorrectionLevel::H => EcLevel::H,
        }
    }
}

/// Square grid of dark/light pixels, ready to be colored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    dimension: u32,
    bits: Vec<bool>,
}

impl BitMatrix {
    /// All-light matrix of `dimension × dimension`.
    pub fn new(dimension: u32) -> Self {
        Self {
            dimension,
            bits: vec![false; (dimension as usize) * (dimension as usize)],
        }
    }

    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Whether the pixel at `(x, y)` is dark. Out-of-range reads are light.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.dimension || y >= self.dimension {
            return false;
        }
        self.bits[self.index(x, y)]
    }

    /// Mark a `width × height` rectangle dark, clipped to the matrix.
    pub fn set_region(&mut self, left: u32, top: u32, width: u32, height: u32) {
        let right = left.saturating_add(width).min(self.dimension);
        let bottom = top.saturating_add(height).min(self.dimension);

        for y in top..bottom {
            for x in left..right {
                let i = self.index(x, y);
                self.bits[i] = true;
            }
        }
    }

    #[cfg(test)]
    fn count_dark(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.dimension as usize) + (x as usize)
    }
}

/// Encode `content` and lay it out on a pixel grid of at least `size` pixels.
///
/// # Errors
///
/// Returns the encoder's error when the content does not fit any symbol
/// version at the requested correction level.
pub fn encode(
    content: &str,
    correction: CorrectionLevel,
    size: u32,
    margin: u32,
) -> Result<BitMatrix, QrError> {
    let code = QrCode::with_error_correction_level(content.as_bytes(), correction.into())?;
    let modules = code.width() as u32;
    let dark: Vec<bool> = code
        .to_colors()
        .into_iter()
        .map(|color| color == qrcode::Color::Dark)
        .collect();

    Ok(render(&dark, modules, size, margin))
}

/// Scale a `modules × modules` grid onto the output pixel grid.
fn render(dark: &[bool], modules: u32, size: u32, margin: u32) -> BitMatrix {
    let input = modules + margin * 2;
    let output = size.max(input);
    let multiple = output / input;
    let padding = (output - modules * multiple) / 2;

    let mut matrix = BitMatrix::new(output);

    for y in 0..modules {
        for x in 0..modules {
            if dark[(y * modules + x) as usize] {
                matrix.set_region(
                    padding + x * multiple,
                    padding + y * multiple,
                    multiple,
                    multiple,
                );
            }
        }
    }

    matrix
}

// =============================================================================
// Tests
// =============================================================================
