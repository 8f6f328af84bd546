//! Builtin font metrics.
//!
//! Widths are expressed in 1/1000 em, taken from the standard Type 1 AFM
//! files. Characters outside printable ASCII fall back to an average width.

use crate::errors::DocumentError;

use super::FontMetrics;

/// Helvetica widths for the printable ASCII range 0x20..=0x7E
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' .. '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // '0' .. '9'
    278, 278, 584, 584, 584, 556, 1015,                                             // ':' .. '@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // 'A' .. 'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // 'N' .. 'Z'
    278, 278, 278, 469, 556, 333,                                                   // '[' .. '`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // 'a' .. 'm'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // 'n' .. 'z'
    334, 260, 334, 584,                                                             // '{' .. '~'
];

const HELVETICA_FALLBACK: u16 = 556;
const COURIER_WIDTH: u16 = 600;

/// Fonts every backend can measure without loading font files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFont {
    Helvetica,
    Courier,
}

impl BuiltinFont {
    /// Resolve a font identifier (`helv`, `cour`, or the full family name)
    pub fn from_name(name: &str) -> Result<Self, DocumentError> {
        match name.trim().to_lowercase().as_str() {
            "helv" | "helvetica" => Ok(Self::Helvetica),
            "cour" | "courier" => Ok(Self::Courier),
            _ => Err(DocumentError::UnknownFont(name.to_string())),
        }
    }

    /// Short identifier used in configuration and saved documents
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "helv",
            Self::Courier => "cour",
        }
    }

    /// Advance width of a single character in 1/1000 em
    fn glyph_width(&self, ch: char) -> u16 {
        match self {
            Self::Courier => COURIER_WIDTH,
            Self::Helvetica => {
                let code = ch as u32;
                if (0x20..=0x7E).contains(&code) {
                    HELVETICA_WIDTHS[(code - 0x20) as usize]
                } else {
                    HELVETICA_FALLBACK
                }
            }
        }
    }
}

impl FontMetrics for BuiltinFont {
    fn measure(&self, text: &str, size: f64) -> f64 {
        let units: u32 = text.chars().map(|ch| u32::from(self.glyph_width(ch))).sum();
        f64::from(units) * size / 1000.0
    }
}
