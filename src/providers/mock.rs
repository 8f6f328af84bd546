/*!
 * Mock translation backend for testing.
 *
 * This module provides a backend that simulates different behaviors:
 * - `MockBackend::working()` - Always succeeds with tagged text
 * - `MockBackend::intermittent(n)` - Fails every n-th request
 * - `MockBackend::failing()` - Always fails with an error
 * - `MockBackend::slow(ms)` - Answers after a delay (for timeout testing)
 *
 * Detection is simulated separately through `MockDetection`.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::TranslationBackend;

/// Behavior mode for chunk translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Behavior mode for language detection
#[derive(Debug, Clone, PartialEq)]
pub enum MockDetection {
    /// Always reports this language
    Fixed(String),
    /// Never classifies the text
    Ambiguous,
    /// Detection requests fail
    Failing,
}

/// One chunk request seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    pub text: String,
    pub source: Option<String>,
    pub target: String,
}

/// Mock backend for testing translation behavior
#[derive(Debug)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Detection mode
    detection: MockDetection,
    /// Exact-text translations, used before the default tagging
    dictionary: HashMap<String, String>,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Detection call counter
    detect_count: Arc<AtomicUsize>,
    /// Every chunk request, in arrival order
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            detection: MockDetection::Fixed("en".to_string()),
            dictionary: HashMap::new(),
            request_count: Arc::new(AtomicUsize::new(0)),
            detect_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock backend that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock backend
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock backend that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock backend that answers after `delay_ms`
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set the detection behavior
    pub fn with_detection(mut self, detection: MockDetection) -> Self {
        self.detection = detection;
        self
    }

    /// Add a fixed translation for an exact input text
    pub fn with_translation(mut self, source: &str, translated: &str) -> Self {
        self.dictionary
            .insert(source.to_string(), translated.to_string());
        self
    }

    /// Number of chunk translation requests received
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Number of detection requests received
    pub fn detect_count(&self) -> usize {
        self.detect_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the chunk requests received so far
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    fn render(&self, text: &str, target: &str) -> String {
        self.dictionary
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", target, text))
    }
}

impl Clone for MockBackend {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            detection: self.detection.clone(),
            dictionary: self.dictionary.clone(),
            request_count: Arc::clone(&self.request_count),
            detect_count: Arc::clone(&self.detect_count),
            requests: Arc::clone(&self.requests),
        }
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn detect_language(&self, _text: &str) -> Result<Option<String>, ProviderError> {
        self.detect_count.fetch_add(1, Ordering::SeqCst);
        match &self.detection {
            MockDetection::Fixed(language) => Ok(Some(language.clone())),
            MockDetection::Ambiguous => Ok(None),
            MockDetection::Failing => Err(ProviderError::ApiError {
                message: "Simulated detection failure".to_string(),
                status_code: 500,
            }),
        }
    }

    async fn translate_chunk(
        &self,
        text: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(MockRequest {
            text: text.to_string(),
            source: source.map(str::to_string),
            target: target.to_string(),
        });

        match self.behavior {
            MockBehavior::Working => Ok(self.render(text, target)),

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.render(text, target))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.render(text, target))
            }
        }
    }
}
