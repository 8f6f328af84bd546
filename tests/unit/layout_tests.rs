/*!
 * Tests for the shrink-to-fit wrapper and the color codec
 */

use rand::Rng;
use serde_json::json;

use relingo::document::{BuiltinFont, ColorValue, FontMetrics, Rect, Rgb};
use relingo::layout::{color, fit_text, wrap_words, WrapOptions};

/// Test that text that already fits keeps its size and stays on one line
#[test]
fn test_fitText_shortText_shouldKeepStartSize() {
    let rect = Rect::new(0.0, 0.0, 100.0, 20.0);
    let result = fit_text("Bonjour le monde", &BuiltinFont::Helvetica, 12.0, &rect, &WrapOptions::default());

    assert_eq!(result.lines, vec!["Bonjour le monde"]);
    assert_eq!(result.font_size, 12.0);
    assert!(!result.overflow);
}

/// Test that text too big for its box shrinks to the floor and overflows
#[test]
fn test_fitText_oversizedText_shouldStopAboveFloorAndOverflow() {
    let rect = Rect::new(0.0, 0.0, 30.0, 10.0);
    let result = fit_text(
        "Bonjour le monde entier",
        &BuiltinFont::Helvetica,
        12.0,
        &rect,
        &WrapOptions::default(),
    );

    assert_eq!(result.lines, vec!["Bonjour le", "monde entier"]);
    assert_eq!(result.font_size, 4.5);
    assert!(result.overflow);
}

/// Test that shrinking stops at the first size that fits
#[test]
fn test_fitText_tallBox_shouldWrapAndShrink() {
    let rect = Rect::new(0.0, 0.0, 60.0, 30.0);
    let result = fit_text(
        "Bonjour le monde entier",
        &BuiltinFont::Helvetica,
        12.0,
        &rect,
        &WrapOptions::default(),
    );

    assert_eq!(result.lines.len(), 2);
    assert_eq!(result.font_size, 10.0);
    assert!(!result.overflow);
    assert!(result.block_height(1.2) <= rect.height());
}

/// Test that a start size at or below the floor is laid out once
#[test]
fn test_fitText_startBelowFloor_shouldNotShrink() {
    let rect = Rect::new(0.0, 0.0, 5.0, 1.0);
    let result = fit_text("tiny text", &BuiltinFont::Courier, 3.0, &rect, &WrapOptions::default());

    assert_eq!(result.font_size, 3.0);
    assert!(result.overflow);
}

/// Test that a single word wider than the box still gets its own line
#[test]
fn test_wrapWords_longWord_shouldNotSplit() {
    let lines = wrap_words("a supercalifragilistic b", &BuiltinFont::Courier, 10.0, 30.0);
    assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
}

/// Test wrapping invariants on random texts and boxes
#[test]
fn test_fitText_randomInputs_shouldHonorInvariants() {
    let words = ["le", "monde", "entier", "Bonjour", "a", "translation", "x", "WWWW"];
    let options = WrapOptions::default();
    let font = BuiltinFont::Helvetica;
    let mut rng = rand::rng();

    for _ in 0..300 {
        let count = rng.random_range(1..15);
        let text = (0..count)
            .map(|_| words[rng.random_range(0..words.len())])
            .collect::<Vec<_>>()
            .join(" ");
        let width = rng.random_range(10.0..300.0);
        let height = rng.random_range(5.0..100.0);
        let start = rng.random_range(4.5..24.0);
        let rect = Rect::new(0.0, 0.0, width, height);

        let result = fit_text(&text, &font, start, &rect, &options);

        assert_eq!(result.lines.join(" "), text);
        assert!(result.font_size <= start);
        assert!(result.font_size > options.min_font_size);
        if !result.overflow {
            assert!(result.block_height(options.line_spacing) <= rect.height());
        }
        for line in &result.lines {
            assert!(
                font.measure(line, result.font_size) <= width || !line.contains(' '),
                "line '{}' is too wide",
                line
            );
        }
    }
}

/// Every character is half the font size wide
fn half_em(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * 0.5
}

/// Test that plain functions can stand in for font metrics
#[test]
fn test_fitText_functionMetrics_shouldBeAccepted() {
    let rect = Rect::new(0.0, 0.0, 40.0, 100.0);

    let result = fit_text("aaaa bbbb", &half_em, 10.0, &rect, &WrapOptions::default());

    assert_eq!(result.lines, vec!["aaaa", "bbbb"]);
    assert_eq!(result.font_size, 10.0);
}

/// Test decoding of packed and malformed color values
#[test]
fn test_colorDecode_shouldHandleEveryShape() {
    assert_eq!(color::decode(Some(&ColorValue::Packed(0xFFFFFF))), Rgb::WHITE);
    assert_eq!(color::decode(Some(&ColorValue::Packed(0x336699))), Rgb::new(0.2, 0.4, 0.6));
    assert_eq!(color::decode(Some(&ColorValue::Other(json!("red")))), Rgb::BLACK);
    assert_eq!(color::decode(Some(&ColorValue::Other(json!(0.5)))), Rgb::BLACK);
    assert_eq!(color::decode(None), Rgb::BLACK);
    assert_eq!(color::encode(Rgb::new(0.2, 0.4, 0.6)), 0x336699);
}
