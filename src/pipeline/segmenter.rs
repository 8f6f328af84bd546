//! Flattening of page content into translatable spans.

use crate::document::{ContentBlock, Page};
use crate::errors::DocumentError;

use super::Span;

/// Collect the text spans of a page in block / line / span order
pub fn segment(page: &dyn Page) -> Result<Vec<Span>, DocumentError> {
    let blocks = page.blocks()?;
    Ok(segment_blocks(&blocks))
}

/// Flatten blocks into spans.
///
/// Blocks without lines are skipped. Span texts are trimmed and spans left
/// empty are dropped, so they are never redacted.
pub fn segment_blocks(blocks: &[ContentBlock]) -> Vec<Span> {
    blocks
        .iter()
        .filter_map(ContentBlock::lines)
        .flat_map(|lines| lines.iter())
        .flat_map(|line| line.spans.iter())
        .filter_map(|raw| {
            let text = raw.text.trim();
            if text.is_empty() {
                return None;
            }
            Some(Span {
                text: text.to_string(),
                rect: raw.bbox,
                font_size: raw.size,
                color: raw.color.clone().unwrap_or_default(),
            })
        })
        .collect()
}
