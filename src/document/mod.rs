/*!
 * Page-content capability.
 *
 * The translation pipeline never touches a concrete file format directly.
 * It talks to documents and pages through the traits defined here:
 * - `DocumentBackend`: opens documents from disk
 * - `Document`: page access, font lookup, save and close
 * - `Page`: block hierarchy, redaction and text insertion
 * - `FontMetrics`: glyph-width measurement used by the line wrapper
 *
 * `json` contains the JSON layout-document backend and `fonts` the
 * builtin font metrics it measures with.
 */

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

use crate::errors::DocumentError;

pub mod fonts;
pub mod json;

pub use self::fonts::BuiltinFont;
pub use self::json::{Fill, LayoutBackend, LayoutDocument, LayoutPage};

/// Axis-aligned rectangle in page coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    /// Build a rectangle, normalizing the corners so that x0 <= x1 and y0 <= y1
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Top-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    /// True when both rectangles share a region of positive area,
    /// or when they are the same (possibly degenerate) rectangle.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self == other {
            return true;
        }
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }
}

impl From<[f64; 4]> for Rect {
    fn from(bbox: [f64; 4]) -> Self {
        Rect::new(bbox[0], bbox[1], bbox[2], bbox[3])
    }
}

/// A point in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Normalized color, each component in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

/// Raw color value as reported by the collaborator.
///
/// Colors are normally packed 24-bit integers, but extraction may report
/// anything; the color codec maps every non-integer value to black.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// Packed 0xRRGGBB integer
    Packed(i64),
    /// Anything that is not an integer
    Other(serde_json::Value),
}

impl Default for ColorValue {
    fn default() -> Self {
        ColorValue::Packed(0)
    }
}

/// A run of text sharing one font, size and color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    pub text: String,
    pub bbox: Rect,
    pub size: f64,
    #[serde(default)]
    pub color: Option<ColorValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

/// A line of spans inside a text block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextLine {
    #[serde(default)]
    pub spans: Vec<RawSpan>,
}

/// One node of the page content hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    /// Block with text lines
    Text {
        bbox: Rect,
        #[serde(default)]
        lines: Vec<TextLine>,
    },
    /// Raster image; never altered by the pipeline
    Image { bbox: Rect },
    /// Any other block type (drawings, annotations, ...), kept as read
    #[serde(untagged)]
    Other(serde_json::Value),
}

impl ContentBlock {
    /// Lines of a text block, `None` for blocks without a line structure
    pub fn lines(&self) -> Option<&[TextLine]> {
        match self {
            ContentBlock::Text { lines, .. } => Some(lines),
            ContentBlock::Image { .. } | ContentBlock::Other(_) => None,
        }
    }
}

/// What `apply_redactions` does with images overlapping a redaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImagePolicy {
    /// Leave images untouched
    #[default]
    Keep,
    /// Remove images that overlap a redaction
    Remove,
}

/// Glyph-width measurement
pub trait FontMetrics {
    /// Width of `text` rendered at `size` points
    fn measure(&self, text: &str, size: f64) -> f64;
}

impl<F> FontMetrics for F
where
    F: Fn(&str, f64) -> f64,
{
    fn measure(&self, text: &str, size: f64) -> f64 {
        self(text, size)
    }
}

/// A single page of an open document
pub trait Page: Send {
    /// Zero-based index of the page in its document
    fn index(&self) -> usize;

    /// Snapshot of the block / line / span hierarchy
    fn blocks(&self) -> Result<Vec<ContentBlock>, DocumentError>;

    /// Queue a redaction; nothing changes until `apply_redactions`
    fn add_redaction(&mut self, rect: Rect, fill: Rgb) -> Result<(), DocumentError>;

    /// Apply every queued redaction as one batch, returning how many were applied
    fn apply_redactions(&mut self, images: ImagePolicy) -> Result<usize, DocumentError>;

    /// Draw `text` with its baseline starting at `origin`
    fn insert_text(
        &mut self,
        origin: Point,
        text: &str,
        font: &str,
        size: f64,
        color: Rgb,
    ) -> Result<(), DocumentError>;
}

/// An open document
pub trait Document: Send {
    fn page_count(&self) -> usize;

    fn page_mut(&mut self, index: usize) -> Result<&mut dyn Page, DocumentError>;

    /// Metrics for a font identifier such as `helv`
    fn font(&self, name: &str) -> Result<Arc<dyn FontMetrics + Send + Sync>, DocumentError> {
        let font = BuiltinFont::from_name(name)?;
        Ok(Arc::new(font))
    }

    fn save(&mut self, path: &Path) -> Result<(), DocumentError>;

    /// Release the document; called on both success and failure paths
    fn close(self: Box<Self>);
}

/// Opens documents of a given format
pub trait DocumentBackend: Send + Sync + Debug {
    fn open(&self, path: &Path) -> Result<Box<dyn Document>, DocumentError>;
}
