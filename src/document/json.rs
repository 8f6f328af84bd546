/*!
 * JSON layout-document backend.
 *
 * A layout document is the extracted page model of a paged document:
 * pages hold blocks, text blocks hold lines, lines hold spans with their
 * bounding boxes, sizes and packed colors. Image blocks carry only a box.
 * Applied redactions are recorded as fill rectangles and drawn text becomes
 * ordinary text blocks, so a translated document can be re-opened and
 * processed again like any other.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::DocumentError;
use crate::layout::color;

use super::{
    BuiltinFont, ColorValue, ContentBlock, Document, DocumentBackend, FontMetrics, ImagePolicy,
    Page, Point, RawSpan, Rect, Rgb, TextLine,
};

/// A filled rectangle left behind by an applied redaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub rect: Rect,
    pub color: Rgb,
}

/// One page of a layout document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutPage {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Fill>,
    #[serde(skip)]
    index: usize,
    #[serde(skip)]
    pending: Vec<Fill>,
}

impl LayoutPage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Append a block (builder style)
    pub fn with_block(mut self, block: ContentBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// Append a text block made of a single one-span line
    pub fn with_span(self, text: &str, bbox: Rect, size: f64, color: i64) -> Self {
        self.with_block(ContentBlock::Text {
            bbox,
            lines: vec![TextLine {
                spans: vec![RawSpan {
                    text: text.to_string(),
                    bbox,
                    size,
                    color: Some(ColorValue::Packed(color)),
                    font: None,
                }],
            }],
        })
    }

    /// Redactions queued but not yet applied
    pub fn pending_redactions(&self) -> &[Fill] {
        &self.pending
    }

    /// All span texts on the page, in block / line / span order
    pub fn texts(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| block.lines())
            .flat_map(|lines| lines.iter())
            .flat_map(|line| line.spans.iter())
            .map(|span| span.text.as_str())
            .collect()
    }

    /// Remove text spans touched by a redaction; drop lines and text blocks left empty
    fn erase_text(&mut self, redactions: &[Fill]) {
        for block in &mut self.blocks {
            if let ContentBlock::Text { lines, .. } = block {
                for line in lines.iter_mut() {
                    line.spans
                        .retain(|span| !redactions.iter().any(|r| r.rect.intersects(&span.bbox)));
                }
                lines.retain(|line| !line.spans.is_empty());
            }
        }
        self.blocks.retain(|block| match block {
            ContentBlock::Text { lines, .. } => !lines.is_empty(),
            ContentBlock::Image { .. } | ContentBlock::Other(_) => true,
        });
    }
}

impl Page for LayoutPage {
    fn index(&self) -> usize {
        self.index
    }

    fn blocks(&self) -> Result<Vec<ContentBlock>, DocumentError> {
        Ok(self.blocks.clone())
    }

    fn add_redaction(&mut self, rect: Rect, fill: Rgb) -> Result<(), DocumentError> {
        self.pending.push(Fill { rect, color: fill });
        Ok(())
    }

    fn apply_redactions(&mut self, images: ImagePolicy) -> Result<usize, DocumentError> {
        let redactions = std::mem::take(&mut self.pending);
        if redactions.is_empty() {
            return Ok(0);
        }

        self.erase_text(&redactions);
        if images == ImagePolicy::Remove {
            self.blocks.retain(|block| match block {
                ContentBlock::Image { bbox } => !redactions.iter().any(|r| r.rect.intersects(bbox)),
                ContentBlock::Text { .. } | ContentBlock::Other(_) => true,
            });
        }

        let applied = redactions.len();
        self.fills.extend(redactions);
        debug!("Page {}: applied {} redactions", self.index + 1, applied);
        Ok(applied)
    }

    fn insert_text(
        &mut self,
        origin: Point,
        text: &str,
        font: &str,
        size: f64,
        color: Rgb,
    ) -> Result<(), DocumentError> {
        let font = BuiltinFont::from_name(font)?;
        let width = font.measure(text, size);
        let bbox = Rect::new(origin.x, origin.y - size, origin.x + width, origin.y);

        self.blocks.push(ContentBlock::Text {
            bbox,
            lines: vec![TextLine {
                spans: vec![RawSpan {
                    text: text.to_string(),
                    bbox,
                    size,
                    color: Some(ColorValue::Packed(color::encode(color))),
                    font: Some(font.short_name().to_string()),
                }],
            }],
        });
        Ok(())
    }
}

/// A whole layout document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub pages: Vec<LayoutPage>,
}

impl LayoutDocument {
    pub fn new(pages: Vec<LayoutPage>) -> Self {
        let mut document = Self { title: None, pages };
        document.reindex();
        document
    }

    /// Parse a document from its JSON representation
    pub fn from_json(content: &str) -> Result<Self, DocumentError> {
        let mut document: LayoutDocument =
            serde_json::from_str(content).map_err(|e| DocumentError::Parse(e.to_string()))?;
        document.reindex();
        Ok(document)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::Parse(e.to_string()))
    }

    /// Read and parse a document file
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path).map_err(|e| DocumentError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| DocumentError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn reindex(&mut self) {
        for (index, page) in self.pages.iter_mut().enumerate() {
            page.index = index;
        }
    }
}

impl Document for LayoutDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_mut(&mut self, index: usize) -> Result<&mut dyn Page, DocumentError> {
        let count = self.pages.len();
        self.pages
            .get_mut(index)
            .map(|page| page as &mut dyn Page)
            .ok_or_else(|| DocumentError::Page {
                index,
                reason: format!("page out of range (document has {} pages)", count),
            })
    }

    fn save(&mut self, path: &Path) -> Result<(), DocumentError> {
        let save_error = |reason: String| DocumentError::Save {
            path: path.to_path_buf(),
            reason,
        };

        let content = self.to_json().map_err(|e| save_error(e.to_string()))?;

        // Write next to the target first so a failed write never leaves a truncated file
        let staging: PathBuf = path.with_extension("partial");
        fs::write(&staging, content).map_err(|e| save_error(e.to_string()))?;
        fs::rename(&staging, path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            save_error(e.to_string())
        })?;

        debug!("Saved layout document to {:?}", path);
        Ok(())
    }

    fn close(self: Box<Self>) {
        debug!("Closed layout document ({} pages)", self.pages.len());
    }
}

/// Backend that opens `*.layout.json` documents
#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutBackend;

impl LayoutBackend {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentBackend for LayoutBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn Document>, DocumentError> {
        let document = LayoutDocument::load(path)?;
        debug!("Opened {:?} ({} pages)", path, document.pages.len());
        Ok(Box::new(document))
    }
}
