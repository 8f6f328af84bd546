/*!
 * Shrink-to-fit line wrapping.
 *
 * Text is packed greedily into lines at a given font size. If the wrapped
 * block is taller than the target rectangle the font size is reduced by a
 * fixed step and the text is wrapped again. The loop stops when the block
 * fits or when the next size would reach the configured floor; in the latter
 * case the last layout is kept and allowed to overflow.
 */

use crate::document::{FontMetrics, Rect};

/// Tuning knobs for `fit_text`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapOptions {
    /// Floor the font size never drops to
    pub min_font_size: f64,
    /// Amount removed from the font size on each retry
    pub shrink_step: f64,
    /// Line height as a multiple of the font size
    pub line_spacing: f64,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            min_font_size: 4.0,
            shrink_step: 0.5,
            line_spacing: 1.2,
        }
    }
}

/// Lines and font size chosen for one rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct WrapResult {
    pub lines: Vec<String>,
    pub font_size: f64,
    /// True when the block is still taller than the rectangle
    pub overflow: bool,
}

impl WrapResult {
    /// Vertical advance between consecutive baselines
    pub fn line_height(&self, line_spacing: f64) -> f64 {
        self.font_size * line_spacing
    }

    /// Total height of the wrapped block
    pub fn block_height(&self, line_spacing: f64) -> f64 {
        self.lines.len() as f64 * self.line_height(line_spacing)
    }
}

/// Greedily pack space-separated words into lines no wider than `max_width`.
///
/// A word that alone exceeds `max_width` still gets its own line. Words are
/// never split.
pub fn wrap_words<M>(text: &str, metrics: &M, font_size: f64, max_width: f64) -> Vec<String>
where
    M: FontMetrics + ?Sized,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if metrics.measure(&candidate, font_size) <= max_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap `text` into `rect`, shrinking the font from `start_size` until it fits.
pub fn fit_text<M>(
    text: &str,
    metrics: &M,
    start_size: f64,
    rect: &Rect,
    options: &WrapOptions,
) -> WrapResult
where
    M: FontMetrics + ?Sized,
{
    let mut size = start_size;

    loop {
        let lines = wrap_words(text, metrics, size, rect.width());
        let height = lines.len() as f64 * size * options.line_spacing;

        if height <= rect.height() {
            return WrapResult {
                lines,
                font_size: size,
                overflow: false,
            };
        }

        let next = size - options.shrink_step;
        if options.shrink_step <= 0.0 || next <= options.min_font_size {
            return WrapResult {
                lines,
                font_size: size,
                overflow: true,
            };
        }
        size = next;
    }
}
