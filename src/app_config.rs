use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::document::{BuiltinFont, ImagePolicy};
use crate::layout::WrapOptions;
use crate::providers::google::MAX_BACKOFF_MS;
use crate::translation::chunking::DEFAULT_MAX_CHUNK_LEN;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code (ISO 639-1/639-2, optionally with a region, e.g. `zh-CN`)
    pub target_language: String,

    /// Detect the source language of every span before translating it
    #[serde(default = "default_true")]
    pub auto_detect: bool,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Layout and redraw config
    #[serde(default)]
    pub layout: LayoutConfig,

    /// What to do when a page fails
    #[serde(default)]
    pub on_page_error: PageErrorPolicy,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Cloud Translation v2
    #[default]
    Google,
    // @provider: Offline mock, tags text instead of translating it
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google Translate",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Max chars per request, spans longer than this are chunked
    #[serde(default = "default_max_chars_per_request")]
    pub max_chars_per_request: usize,

    // @field: Timeout seconds for one external call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Rate limit (requests per minute)
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Google => Self {
                provider_type: "google".to_string(),
                api_key: String::new(),
                endpoint: default_google_endpoint(),
                max_chars_per_request: default_max_chars_per_request(),
                timeout_secs: default_timeout_secs(),
                rate_limit: default_google_rate_limit(),
            },
            TranslationProvider::Mock => Self {
                provider_type: "mock".to_string(),
                api_key: String::new(),
                endpoint: String::new(),
                max_chars_per_request: default_max_chars_per_request(),
                timeout_secs: default_timeout_secs(),
                rate_limit: None,
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Number of spans of one page translated at the same time
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Reuse translations of identical span texts within a document
    #[serde(default = "default_true")]
    pub enable_cache: bool,

    /// Detections below this confidence count as ambiguous (0.0 accepts any)
    #[serde(default)]
    pub detection_confidence: f64,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            concurrent_requests: default_concurrent_requests(),
            enable_cache: true,
            detection_confidence: 0.0,
        }
    }
}

/// How translated text is laid back onto the page
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Font identifier used for all redrawn text
    #[serde(default = "default_font")]
    pub default_font: String,

    /// Floor for the shrink-to-fit loop
    #[serde(default = "default_min_font_size")]
    pub min_font_size: f64,

    /// Font size decrement per shrink iteration
    #[serde(default = "default_font_shrink_step")]
    pub font_shrink_step: f64,

    /// Line height as a multiple of the font size
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f64,

    /// Whether images overlapping a redaction are kept
    #[serde(default)]
    pub image_policy: ImagePolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_font: default_font(),
            min_font_size: default_min_font_size(),
            font_shrink_step: default_font_shrink_step(),
            line_spacing: default_line_spacing(),
            image_policy: ImagePolicy::default(),
        }
    }
}

impl LayoutConfig {
    /// Wrapper settings derived from this config
    pub fn wrap_options(&self) -> WrapOptions {
        WrapOptions {
            min_font_size: self.min_font_size,
            shrink_step: self.font_shrink_step,
            line_spacing: self.line_spacing,
        }
    }
}

/// Behavior when segmenting, redacting or drawing a page fails
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageErrorPolicy {
    /// Abort the whole document; nothing is saved
    #[default]
    Abort,
    /// Log the failure and continue with the next page
    Skip,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_concurrent_requests() -> usize {
    1
}

fn default_max_chars_per_request() -> usize {
    DEFAULT_MAX_CHUNK_LEN
}

fn default_timeout_secs() -> u64 {
    30
}

/// Largest accepted `retry_count`
pub const MAX_RETRY_COUNT: u32 = 10;

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // doubled on each retry
}

fn default_true() -> bool {
    true
}

fn default_google_endpoint() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}

fn default_google_rate_limit() -> Option<u32> {
    None
}

fn default_font() -> String {
    "helv".to_string()
}

fn default_min_font_size() -> f64 {
    4.0
}

fn default_font_shrink_step() -> f64 {
    0.5
}

fn default_line_spacing() -> f64 {
    1.2
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_tag(&self.target_language)?;

        BuiltinFont::from_name(&self.layout.default_font)?;
        if !(self.layout.min_font_size > 0.0) {
            return Err(anyhow!("min_font_size must be positive"));
        }
        if !(self.layout.font_shrink_step > 0.0) {
            return Err(anyhow!("font_shrink_step must be positive"));
        }
        if !(self.layout.line_spacing > 0.0) {
            return Err(anyhow!("line_spacing must be positive"));
        }

        if self.translation.get_max_chars_per_request() == 0 {
            return Err(anyhow!("max_chars_per_request must be greater than zero"));
        }
        if self.translation.common.concurrent_requests == 0 {
            return Err(anyhow!("concurrent_requests must be at least 1"));
        }
        if self.translation.common.retry_count > MAX_RETRY_COUNT {
            return Err(anyhow!(
                "retry_count must be at most {}, got {}",
                MAX_RETRY_COUNT,
                self.translation.common.retry_count
            ));
        }
        if self.translation.common.retry_backoff_ms > MAX_BACKOFF_MS {
            return Err(anyhow!(
                "retry_backoff_ms must be at most {}, got {}",
                MAX_BACKOFF_MS,
                self.translation.common.retry_backoff_ms
            ));
        }

        if self.translation.provider == TranslationProvider::Google
            && self.translation.get_api_key().is_empty()
        {
            return Err(anyhow!("Translation API key is required for Google provider"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: "fr".to_string(),
            auto_detect: true,
            translation: TranslationConfig::default(),
            layout: LayoutConfig::default(),
            on_page_error: PageErrorPolicy::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        // The key may also come from the environment
        std::env::var("GOOGLE_TRANSLATE_API_KEY").unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::Google => default_google_endpoint(),
            TranslationProvider::Mock => String::new(),
        }
    }

    /// Get the max chars per request (chunk length) for the active provider
    pub fn get_max_chars_per_request(&self) -> usize {
        self.get_active_provider_config()
            .map(|p| p.max_chars_per_request)
            .unwrap_or_else(default_max_chars_per_request)
    }

    /// Get the per-call timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .unwrap_or_else(default_timeout_secs)
    }

    /// Get the rate limit for the active provider
    pub fn get_rate_limit(&self) -> Option<u32> {
        match self.get_active_provider_config() {
            Some(provider_config) => provider_config.rate_limit,
            None => match self.provider {
                TranslationProvider::Google => default_google_rate_limit(),
                TranslationProvider::Mock => None,
            },
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Google),
                ProviderConfig::new(TranslationProvider::Mock),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
