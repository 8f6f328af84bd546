/*!
 * Text translation for page spans.
 *
 * - `core`: the translator adapter (`TranslationService`) with its fail-open policy
 * - `chunking`: fixed-size slicing of long texts
 * - `cache`: per-document cache of span translations
 */

pub use self::cache::TranslationCache;
pub use self::core::{TranslationOptions, TranslationService, TranslationStats};

pub mod cache;
pub mod chunking;
pub mod core;
