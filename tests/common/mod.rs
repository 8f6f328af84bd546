/*!
 * Common test utilities for the relingo test suite
 */

use anyhow::Result;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use relingo::app_config::{Config, TranslationProvider};
use relingo::document::{
    ContentBlock, Document, DocumentBackend, ImagePolicy, LayoutDocument, LayoutPage, Page, Point,
    Rect, Rgb,
};
use relingo::errors::DocumentError;

/// Route library logs through env_logger once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Config using the mock provider, with no detection round trip
pub fn mock_config(target_language: &str) -> Config {
    let mut config = Config::default();
    config.target_language = target_language.to_string();
    config.auto_detect = false;
    config.translation.provider = TranslationProvider::Mock;
    config
}

/// A two-page document: a greeting on page one, a heading and an image on page two
pub fn sample_document() -> LayoutDocument {
    let first = LayoutPage::new(595.0, 842.0).with_span(
        "Hello world",
        Rect::new(0.0, 0.0, 100.0, 20.0),
        12.0,
        0,
    );
    let second = LayoutPage::new(595.0, 842.0)
        .with_span("Chapter two", Rect::new(50.0, 50.0, 300.0, 80.0), 18.0, 0x336699)
        .with_block(ContentBlock::Image {
            bbox: Rect::new(50.0, 100.0, 300.0, 300.0),
        });
    LayoutDocument::new(vec![first, second])
}

/// Writes a layout document to `dir/filename`
pub fn write_document(dir: &Path, filename: &str, document: &LayoutDocument) -> Result<PathBuf> {
    create_test_file(dir, filename, &document.to_json()?)
}

/// Reads a layout document back from disk
pub fn read_document(path: &Path) -> Result<LayoutDocument> {
    Ok(LayoutDocument::load(path)?)
}

/// What the recording backend saw
#[derive(Debug, Default)]
pub struct BackendLog {
    pub opened: usize,
    pub saved: Vec<PathBuf>,
    pub closed: usize,
}

/// Document backend wrapping layout documents, recording lifecycle calls
/// and failing `blocks()` on selected pages
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    pub log: Arc<Mutex<BackendLog>>,
    failing_pages: Vec<usize>,
}

impl RecordingBackend {
    pub fn new(failing_pages: Vec<usize>) -> Self {
        Self {
            log: Arc::new(Mutex::new(BackendLog::default())),
            failing_pages,
        }
    }
}

impl DocumentBackend for RecordingBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn Document>, DocumentError> {
        let inner = LayoutDocument::load(path)?;
        self.log.lock().opened += 1;
        let pages = inner
            .pages
            .into_iter()
            .enumerate()
            .map(|(index, page)| FlakyPage {
                index,
                inner: page,
                failing: self.failing_pages.contains(&index),
            })
            .collect();
        Ok(Box::new(RecordingDocument {
            pages,
            log: Arc::clone(&self.log),
        }))
    }
}

struct FlakyPage {
    index: usize,
    inner: LayoutPage,
    failing: bool,
}

impl Page for FlakyPage {
    fn index(&self) -> usize {
        self.index
    }

    fn blocks(&self) -> Result<Vec<ContentBlock>, DocumentError> {
        if self.failing {
            return Err(DocumentError::Parse("corrupted content stream".to_string()));
        }
        self.inner.blocks()
    }

    fn add_redaction(&mut self, rect: Rect, fill: Rgb) -> Result<(), DocumentError> {
        self.inner.add_redaction(rect, fill)
    }

    fn apply_redactions(&mut self, images: ImagePolicy) -> Result<usize, DocumentError> {
        self.inner.apply_redactions(images)
    }

    fn insert_text(
        &mut self,
        origin: Point,
        text: &str,
        font: &str,
        size: f64,
        color: Rgb,
    ) -> Result<(), DocumentError> {
        self.inner.insert_text(origin, text, font, size, color)
    }
}

struct RecordingDocument {
    pages: Vec<FlakyPage>,
    log: Arc<Mutex<BackendLog>>,
}

impl Document for RecordingDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_mut(&mut self, index: usize) -> Result<&mut dyn Page, DocumentError> {
        self.pages
            .get_mut(index)
            .map(|page| page as &mut dyn Page)
            .ok_or_else(|| DocumentError::Page {
                index,
                reason: "out of range".to_string(),
            })
    }

    fn save(&mut self, path: &Path) -> Result<(), DocumentError> {
        let mut document = LayoutDocument::new(self.pages.iter().map(|p| p.inner.clone()).collect());
        document.save(path)?;
        self.log.lock().saved.push(path.to_path_buf());
        Ok(())
    }

    fn close(self: Box<Self>) {
        self.log.lock().closed += 1;
    }
}
