//! Packed 24-bit color codec.

use crate::document::{ColorValue, Rgb};

/// Decode a packed `0xRRGGBB` integer into normalized components
pub fn decode_packed(code: i64) -> Rgb {
    Rgb {
        r: ((code >> 16) & 255) as f64 / 255.0,
        g: ((code >> 8) & 255) as f64 / 255.0,
        b: (code & 255) as f64 / 255.0,
    }
}

/// Decode a raw span color; absent or non-integer values are black
pub fn decode(code: Option<&ColorValue>) -> Rgb {
    match code {
        Some(ColorValue::Packed(code)) => decode_packed(*code),
        _ => Rgb::BLACK,
    }
}

/// Pack normalized components back into a `0xRRGGBB` integer
pub fn encode(color: Rgb) -> i64 {
    let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as i64;
    (channel(color.r) << 16) | (channel(color.g) << 8) | channel(color.b)
}
