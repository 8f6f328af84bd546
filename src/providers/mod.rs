/*!
 * Translation backends.
 *
 * A backend answers two questions for the translator adapter: which
 * language a text is written in, and what a chunk of text reads like in
 * the target language. Implementations:
 * - Google: Google Cloud Translation v2 REST API
 * - Mock: offline backend for tests and dry runs
 */

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::{AppError, ProviderError};

/// Common trait for all translation backends
///
/// Backends are shared between concurrently translated spans, so they must
/// be usable through a shared reference.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Short backend name used in logs
    fn name(&self) -> &str;

    /// Detect the language of `text`
    ///
    /// # Returns
    /// * `Ok(Some(tag))` - the detected language
    /// * `Ok(None)` - the backend could not classify the text
    async fn detect_language(&self, text: &str) -> Result<Option<String>, ProviderError>;

    /// Translate one chunk of text into `target`
    ///
    /// # Arguments
    /// * `text` - Chunk to translate, never longer than the configured chunk size
    /// * `source` - Source language, `None` lets the backend guess
    /// * `target` - Target language tag
    async fn translate_chunk(
        &self,
        text: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<String, ProviderError>;
}

pub mod google;
pub mod mock;

pub use self::google::GoogleTranslate;
pub use self::mock::{MockBackend, MockBehavior, MockDetection};

/// Build the backend selected in the translation config
pub fn create_backend(config: &TranslationConfig) -> Result<Arc<dyn TranslationBackend>> {
    match config.provider {
        TranslationProvider::Google => {
            let api_key = config.get_api_key();
            if api_key.is_empty() {
                return Err(AppError::Config(
                    "Google Translate requires an API key (config or GOOGLE_TRANSLATE_API_KEY)".to_string(),
                )
                .into());
            }
            let backend = GoogleTranslate::new_with_config(
                api_key,
                config.get_endpoint(),
                config.common.retry_count,
                config.common.retry_backoff_ms,
                config.get_rate_limit(),
                config.common.detection_confidence,
            )
            .map_err(AppError::Provider)?;
            Ok(Arc::new(backend))
        }
        TranslationProvider::Mock => Ok(Arc::new(MockBackend::working())),
    }
}
