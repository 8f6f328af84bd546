/*!
 * Core translation service implementation.
 *
 * `TranslationService` is the translator adapter the page pipeline talks
 * to. It trims the input, optionally detects its language, slices it into
 * chunks, translates each chunk through the configured backend under a
 * timeout and joins the pieces back. `try_translate` reports every failure
 * as a `TranslationError`; `translate` is the fail-open entry point that
 * logs the failure and hands back the original text.
 */

use anyhow::Result;
use log::{debug, warn};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::TranslationConfig;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::{create_backend, TranslationBackend};

use super::cache::{truncate_text, TranslationCache};
use super::chunking::{chunk_text, join_chunks, DEFAULT_MAX_CHUNK_LEN};

/// Translation options for customizing the translation process
#[derive(Debug, Clone)]
pub struct TranslationOptions {
    /// Maximum chunk length in characters
    pub max_chunk_len: usize,

    /// Timeout around every backend call
    pub timeout: Duration,

    /// Reuse translations of identical texts
    pub enable_cache: bool,

    /// Number of spans translated at the same time
    pub concurrent_requests: usize,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            max_chunk_len: DEFAULT_MAX_CHUNK_LEN,
            timeout: Duration::from_secs(30),
            enable_cache: true,
            concurrent_requests: 1,
        }
    }
}

impl TranslationOptions {
    /// Options for the active provider of a translation config
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self {
            max_chunk_len: config.get_max_chars_per_request(),
            timeout: Duration::from_secs(config.get_timeout_secs()),
            enable_cache: config.common.enable_cache,
            concurrent_requests: config.common.concurrent_requests.max(1),
        }
    }
}

/// Outcome counters for one document
#[derive(Debug, Default)]
pub struct TranslationStats {
    translated: AtomicUsize,
    empty: AtomicUsize,
    ambiguous: AtomicUsize,
    failed: AtomicUsize,
    cache_hits: AtomicUsize,
}

impl TranslationStats {
    /// Spans that came back translated
    pub fn translated(&self) -> usize {
        self.translated.load(Ordering::Relaxed)
    }

    /// Spans skipped because they were empty after trimming
    pub fn empty(&self) -> usize {
        self.empty.load(Ordering::Relaxed)
    }

    /// Spans kept because their language could not be detected
    pub fn ambiguous(&self) -> usize {
        self.ambiguous.load(Ordering::Relaxed)
    }

    /// Spans kept because translation failed or timed out
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    /// Translations served from the cache
    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// One-line summary for the end-of-document log
    pub fn summary(&self) -> String {
        format!(
            "{} translated, {} cached, {} kept (ambiguous language), {} kept (failed), {} empty",
            self.translated(),
            self.cache_hits(),
            self.ambiguous(),
            self.failed(),
            self.empty()
        )
    }
}

/// Translator adapter over a translation backend
#[derive(Debug)]
pub struct TranslationService {
    /// Backend doing the actual work
    backend: Arc<dyn TranslationBackend>,

    /// Translation options
    pub options: TranslationOptions,

    /// Translation cache for storing and retrieving translations
    pub cache: TranslationCache,

    stats: TranslationStats,
}

impl TranslationService {
    /// Create a new translation service on top of a backend
    pub fn new(backend: Arc<dyn TranslationBackend>, options: TranslationOptions) -> Self {
        let cache = TranslationCache::new(options.enable_cache);
        Self {
            backend,
            options,
            cache,
            stats: TranslationStats::default(),
        }
    }

    /// Create a service with the backend and options of a translation config
    pub fn from_config(config: &TranslationConfig) -> Result<Self> {
        let backend = create_backend(config)?;
        Ok(Self::new(backend, TranslationOptions::from_config(config)))
    }

    /// Backend in use
    pub fn backend(&self) -> &Arc<dyn TranslationBackend> {
        &self.backend
    }

    /// Counters accumulated so far
    pub fn stats(&self) -> &TranslationStats {
        &self.stats
    }

    /// Translate `text` into `target_language`, falling back to the input.
    ///
    /// Never fails: empty input, an undetectable language, a backend error
    /// or a timeout all return `text` unchanged.
    pub async fn translate(&self, text: &str, target_language: &str, auto_detect: bool) -> String {
        match self.try_translate(text, target_language, auto_detect).await {
            Ok(translated) => translated,
            Err(TranslationError::DetectionAmbiguous) => {
                self.stats.ambiguous.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "Keeping '{}': language could not be detected",
                    truncate_text(text.trim(), 40)
                );
                text.to_string()
            }
            Err(e) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                warn!(
                    "Translation failed for '{}', keeping original text: {}",
                    truncate_text(text.trim(), 40),
                    e
                );
                text.to_string()
            }
        }
    }

    /// Translate `text` into `target_language`, reporting why it could not be.
    pub async fn try_translate(
        &self,
        text: &str,
        target_language: &str,
        auto_detect: bool,
    ) -> Result<String, TranslationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.stats.empty.fetch_add(1, Ordering::Relaxed);
            return Ok(text.to_string());
        }

        if let Some(cached) = self.cache.get(trimmed, target_language) {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(cached);
        }

        let source_language = if auto_detect {
            Some(self.detect(trimmed).await?)
        } else {
            None
        };

        let chunks = chunk_text(trimmed, self.options.max_chunk_len);
        let mut translated = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let piece = self
                .with_timeout(self.backend.translate_chunk(
                    chunk,
                    source_language.as_deref(),
                    target_language,
                ))
                .await?;
            translated.push(piece);
        }

        let joined = join_chunks(&translated);
        self.cache.store(trimmed, target_language, &joined);
        self.stats.translated.fetch_add(1, Ordering::Relaxed);
        Ok(joined)
    }

    /// Detect the language of `text`; any failure counts as ambiguous
    async fn detect(&self, text: &str) -> Result<String, TranslationError> {
        match self.with_timeout(self.backend.detect_language(text)).await {
            Ok(Some(language)) => Ok(language),
            Ok(None) => Err(TranslationError::DetectionAmbiguous),
            Err(e) => {
                debug!("Language detection failed: {}", e);
                Err(TranslationError::DetectionAmbiguous)
            }
        }
    }

    /// Run a backend call under the configured timeout
    async fn with_timeout<T, F>(&self, call: F) -> Result<T, TranslationError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match tokio::time::timeout(self.options.timeout, call).await {
            Ok(result) => result.map_err(TranslationError::from),
            Err(_) => Err(TranslationError::Timeout {
                secs: self.options.timeout.as_secs(),
            }),
        }
    }
}
