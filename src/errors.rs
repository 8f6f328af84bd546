/*!
 * Error types for the relingo application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to a translation service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting or quota
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Reasons a span could not be translated.
///
/// None of these escape the translator adapter; they are mapped to
/// "keep the original text" and logged.
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Language detection could not classify the text
    #[error("Language detection was ambiguous")]
    DetectionAmbiguous,

    /// The external call did not answer in time
    #[error("Translation timed out after {secs}s")]
    Timeout {
        /// Configured timeout in seconds
        secs: u64,
    },

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Errors raised by the page-content collaborator
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The source document could not be opened
    #[error("Cannot open document {path:?}: {reason}")]
    Open {
        /// Path of the document
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// The output document could not be written
    #[error("Cannot save document {path:?}: {reason}")]
    Save {
        /// Output path
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// Something went wrong while segmenting, redacting or drawing a page
    #[error("Page {index} failed: {reason}")]
    Page {
        /// Zero-based page index
        index: usize,
        /// Underlying reason
        reason: String,
    },

    /// Unknown font identifier
    #[error("Unknown font: {0}")]
    UnknownFont(String),

    /// The document content is malformed
    #[error("Malformed document: {0}")]
    Parse(String),
}

/// Top-level error returned by the controller
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing input or unusable path
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The translation backend could not be built
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The document could not be opened or saved
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}
