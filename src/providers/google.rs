use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::TranslationBackend;

/// Google Cloud Translation v2 client
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// API key, sent as the `key` query parameter
    api_key: String,
    /// Base URL of the v2 API
    endpoint: String,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Optional rate limit in requests per minute
    rate_limit: Option<u32>,
    /// Detections below this confidence are reported as unknown
    min_confidence: f64,
    /// Send time of the previous request, held across the rate limit wait
    last_request: Mutex<Option<Instant>>,
}

/// Upper bound for a single backoff sleep
pub const MAX_BACKOFF_MS: u64 = 60_000;

/// Backoff before retry number `attempt` (1-based), doubling from `base_ms` and capped
pub fn backoff_delay(base_ms: u64, attempt: u32) -> u64 {
    let factor = 1u64
        .checked_shl(attempt.saturating_sub(1))
        .unwrap_or(u64::MAX);
    base_ms.saturating_mul(factor).min(MAX_BACKOFF_MS)
}

/// Translate request body
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
}

/// Detect request body
#[derive(Debug, Serialize)]
struct DetectRequest<'a> {
    q: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct TranslationsData {
    translations: Vec<TranslatedText>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslatedText {
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct DetectionsData {
    detections: Vec<Vec<Detection>>,
}

/// One language guess
#[derive(Debug, Deserialize)]
pub struct Detection {
    pub language: String,
    #[serde(default)]
    pub confidence: f64,
}

impl GoogleTranslate {
    /// Default v2 endpoint
    pub const DEFAULT_ENDPOINT: &'static str =
        "https://translation.googleapis.com/language/translate/v2";

    /// Create a client with default retry settings
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::new_with_config(api_key, Self::DEFAULT_ENDPOINT, 3, 1000, None, 0.0)
    }

    /// Create a client with explicit retry, rate limit and detection settings
    pub fn new_with_config(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        max_retries: u32,
        backoff_base_ms: u64,
        rate_limit: Option<u32>,
        min_confidence: f64,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::AuthenticationError(
                "API key cannot be empty".to_string(),
            ));
        }

        let mut endpoint = endpoint.into();
        if endpoint.is_empty() {
            endpoint = Self::DEFAULT_ENDPOINT.to_string();
        }
        Url::parse(&endpoint)
            .map_err(|e| ProviderError::ConnectionError(format!("Invalid endpoint {}: {}", endpoint, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            max_retries,
            backoff_base_ms,
            rate_limit,
            min_confidence,
            last_request: Mutex::new(None),
        })
    }

    /// Build `{endpoint}{suffix}?key=...`
    fn request_url(&self, suffix: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&format!("{}{}", self.endpoint, suffix))
            .map_err(|e| ProviderError::ConnectionError(format!("Invalid endpoint: {}", e)))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Wait until the configured requests-per-minute spacing has passed since the last send
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(rate_limit) = self.rate_limit.filter(|r| *r > 0) {
            let interval = Duration::from_millis(60_000 / rate_limit as u64);
            if let Some(previous) = *last {
                let elapsed = previous.elapsed();
                if elapsed < interval {
                    tokio::time::sleep(interval - elapsed).await;
                }
            }
        }
        *last = Some(Instant::now());
    }

    /// POST a JSON body with retry and exponential backoff
    ///
    /// Network and server errors are retried; client errors are returned at once.
    async fn post_with_retry<B, R>(&self, url: Url, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            self.throttle().await;

            match self.client.post(url.clone()).json(body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .json::<R>()
                            .await
                            .map_err(|e| ProviderError::ParseError(e.to_string()));
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());

                    match status {
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            error!("Google Translate rejected the API key ({})", status);
                            return Err(ProviderError::AuthenticationError(error_text));
                        }
                        StatusCode::TOO_MANY_REQUESTS => {
                            warn!(
                                "Google Translate rate limit hit - attempt {}/{}",
                                attempt + 1,
                                self.max_retries + 1
                            );
                            last_error = Some(ProviderError::RateLimitExceeded(error_text));
                        }
                        _ if status.is_server_error() => {
                            error!(
                                "Google Translate API error ({}): {} - attempt {}/{}",
                                status,
                                error_text,
                                attempt + 1,
                                self.max_retries + 1
                            );
                            last_error = Some(ProviderError::ApiError {
                                status_code: status.as_u16(),
                                message: error_text,
                            });
                        }
                        _ => {
                            error!("Google Translate API error ({}): {}", status, error_text);
                            return Err(ProviderError::ApiError {
                                status_code: status.as_u16(),
                                message: error_text,
                            });
                        }
                    }
                }
                Err(e) => {
                    error!(
                        "Google Translate network error: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(ProviderError::RequestFailed(e.to_string()));
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                let backoff_ms = backoff_delay(self.backoff_base_ms, attempt);
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed("All retry attempts failed".to_string())
        }))
    }
}

/// Pick the detection to trust from a `detections` payload.
///
/// `und` and detections under `min_confidence` count as unknown.
pub fn select_detection(detections: &[Vec<Detection>], min_confidence: f64) -> Option<String> {
    let best = detections.first()?.first()?;
    if best.language.is_empty() || best.language == "und" || best.confidence < min_confidence {
        return None;
    }
    Some(best.language.clone())
}

impl std::fmt::Debug for GoogleTranslate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslate")
            .field("api_key", &"***")
            .field("endpoint", &self.endpoint)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslate {
    fn name(&self) -> &str {
        "google"
    }

    async fn detect_language(&self, text: &str) -> Result<Option<String>, ProviderError> {
        let url = self.request_url("/detect")?;
        let response: ApiResponse<DetectionsData> =
            self.post_with_retry(url, &DetectRequest { q: text }).await?;

        let detected = select_detection(&response.data.detections, self.min_confidence);
        debug!("Detected language: {:?}", detected);
        Ok(detected)
    }

    async fn translate_chunk(
        &self,
        text: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<String, ProviderError> {
        let url = self.request_url("")?;
        let request = TranslateRequest {
            q: text,
            target,
            format: "text",
            source,
        };
        let response: ApiResponse<TranslationsData> = self.post_with_retry(url, &request).await?;

        response
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| {
                ProviderError::ParseError("Invalid API response: missing 'translatedText'".to_string())
            })
    }
}
