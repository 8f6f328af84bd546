/*!
 * # relingo - layout-preserving document translation
 *
 * A Rust library that replaces the text of a paged document with its
 * translation while keeping the page layout: every piece of text is erased
 * in place and the translated text is drawn back into the same rectangle,
 * with the font shrunk until it fits.
 *
 * ## Features
 *
 * - Span extraction from the page block hierarchy
 * - Translation through Google Cloud Translation v2 or an offline mock:
 *   - Optional source language detection
 *   - Chunking of long texts
 *   - Fail-open policy: untranslatable text is kept as is
 *   - Per-document translation cache
 * - Atomic per-page redaction
 * - Shrink-to-fit line wrapping with builtin font metrics
 * - Folder mode and shell completions in the CLI
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `app_controller`: Document driver (open, pages in order, save, close)
 * - `pipeline`: Per-page segment / translate / redact / draw orchestration
 * - `translation`: Translator adapter, chunking and caching
 * - `providers`: Translation backends (Google, mock)
 * - `layout`: Color codec and shrink-to-fit wrapper
 * - `document`: Page-content capability and the JSON layout-document backend
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod layout;
pub mod pipeline;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, DocumentSummary, FolderSummary};
pub use document::{ContentBlock, Document, DocumentBackend, Page, Rect, Rgb};
pub use errors::{AppError, DocumentError, ProviderError, TranslationError};
pub use language_utils::{get_language_name, normalize_language_tag};
pub use layout::{fit_text, WrapOptions, WrapResult};
pub use pipeline::{PageProcessor, PageReport, PipelineSettings, Span, TranslationResult};
pub use translation::TranslationService;
