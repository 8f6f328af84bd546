/*!
 * Per-page translation pipeline.
 *
 * A page goes through four steps:
 * 1. `segmenter` flattens the block hierarchy into text spans
 * 2. every span is translated (fail-open) and its color decoded
 * 3. every span rectangle is covered by a white redaction, applied as one batch
 * 4. translated text is wrapped back into each rectangle, shrinking the font
 *    until it fits
 */

use crate::document::{ColorValue, Rect, Rgb};

pub mod page;
pub mod segmenter;

pub use self::page::{PageProcessor, PipelineSettings};
pub use self::segmenter::{segment, segment_blocks};

/// A piece of text with the geometry it occupies on the page
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    /// Trimmed, never empty
    pub text: String,
    pub rect: Rect,
    pub font_size: f64,
    pub color: ColorValue,
}

/// A span after translation, ready to be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResult {
    pub rect: Rect,
    /// Translated text, or the original when translation was skipped
    pub text: String,
    pub color: Rgb,
    /// Original font size, before any shrinking
    pub font_size: f64,
}

/// What happened to one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageReport {
    /// Zero-based page index
    pub index: usize,
    /// Spans found by the segmenter
    pub spans: usize,
    /// Spans whose text changed through translation
    pub translated: usize,
    /// Redactions applied in the page batch
    pub redactions: usize,
    /// Lines drawn back onto the page
    pub lines_drawn: usize,
    /// Spans whose text still overflows its rectangle at the smallest size
    pub overflowed: usize,
}
