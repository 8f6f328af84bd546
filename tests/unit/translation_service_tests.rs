/*!
 * Tests for the translator adapter and its fail-open policy
 */

use std::sync::Arc;
use std::time::Duration;

use relingo::errors::TranslationError;
use relingo::providers::{MockBackend, MockDetection, TranslationBackend};
use relingo::translation::{TranslationOptions, TranslationService};

use crate::common;

fn service_with(backend: &MockBackend, options: TranslationOptions) -> TranslationService {
    TranslationService::new(Arc::new(backend.clone()), options)
}

/// Test that a known phrase is translated through the backend
#[tokio::test]
async fn test_translate_knownPhrase_shouldReturnTranslation() {
    common::init_logging();
    let backend = MockBackend::working().with_translation("Hello world", "Bonjour le monde");
    let service = service_with(&backend, TranslationOptions::default());

    assert_eq!(service.translate("Hello world", "fr", true).await, "Bonjour le monde");
    assert_eq!(backend.detect_count(), 1);
    assert_eq!(backend.requests()[0].source.as_deref(), Some("en"));
    assert_eq!(backend.requests()[0].target, "fr");
}

/// Test that an unclassifiable language keeps the original text
#[tokio::test]
async fn test_translate_ambiguousDetection_shouldKeepOriginal() {
    common::init_logging();
    let backend = MockBackend::working().with_detection(MockDetection::Ambiguous);
    let service = service_with(&backend, TranslationOptions::default());

    let result = service.try_translate("ok", "fr", true).await;
    assert!(matches!(result, Err(TranslationError::DetectionAmbiguous)));

    assert_eq!(service.translate("ok", "fr", true).await, "ok");
    assert_eq!(backend.request_count(), 0);
    assert_eq!(service.stats().ambiguous(), 1);
}

/// Test that disabling detection skips the detect call entirely
#[tokio::test]
async fn test_translate_withoutAutoDetect_shouldSendNoSource() {
    let backend = MockBackend::working().with_detection(MockDetection::Failing);
    let service = service_with(&backend, TranslationOptions::default());

    assert_eq!(service.translate("Hello", "de", false).await, "[de] Hello");
    assert_eq!(backend.detect_count(), 0);
    assert_eq!(backend.requests()[0].source, None);
}

/// Test that the text sent to the backend is trimmed
#[tokio::test]
async fn test_translate_paddedText_shouldTrimBeforeSending() {
    let backend = MockBackend::working();
    let service = service_with(&backend, TranslationOptions::default());

    assert_eq!(service.translate("  Hello  ", "fr", false).await, "[fr] Hello");
    assert_eq!(backend.requests()[0].text, "Hello");
}

/// Test that a failed chunk fails the whole span, which is then kept
#[tokio::test]
async fn test_translate_intermittentFailureMidSpan_shouldKeepWholeSpan() {
    common::init_logging();
    let backend = MockBackend::intermittent(2);
    let options = TranslationOptions {
        max_chunk_len: 3,
        ..Default::default()
    };
    let service = service_with(&backend, options);

    assert_eq!(service.translate("abcdef", "fr", false).await, "abcdef");
    assert_eq!(backend.request_count(), 2);
    assert_eq!(service.stats().failed(), 1);
    assert_eq!(service.stats().translated(), 0);
}

/// Test that a disabled cache sends every repeated text
#[tokio::test]
async fn test_translate_cacheDisabled_shouldCallBackendEachTime() {
    let backend = MockBackend::working();
    let options = TranslationOptions {
        enable_cache: false,
        ..Default::default()
    };
    let service = service_with(&backend, options);

    service.translate("same", "fr", false).await;
    service.translate("same", "fr", false).await;

    assert_eq!(backend.request_count(), 2);
    assert_eq!(service.stats().cache_hits(), 0);
}

/// Test that cached translations are kept apart per target language
#[tokio::test]
async fn test_translate_sameTextOtherTarget_shouldMissCache() {
    let backend = MockBackend::working();
    let service = service_with(&backend, TranslationOptions::default());

    assert_eq!(service.translate("Title", "fr", false).await, "[fr] Title");
    assert_eq!(service.translate("Title", "de", false).await, "[de] Title");
    assert_eq!(backend.request_count(), 2);
}

/// Test that a slow backend is bounded by the timeout
#[tokio::test]
async fn test_translate_timeout_shouldFallBackQuickly() {
    let options = TranslationOptions {
        timeout: Duration::from_millis(20),
        ..Default::default()
    };
    let service = TranslationService::new(Arc::new(MockBackend::slow(1_000)), options);

    let started = std::time::Instant::now();
    assert_eq!(service.translate("Hello", "fr", false).await, "Hello");
    assert!(started.elapsed() < Duration::from_millis(900));
    assert_eq!(service.stats().failed(), 1);
}

/// Test that the service can be built from a configuration
#[tokio::test]
async fn test_fromConfig_mockProvider_shouldTranslate() {
    let config = common::mock_config("es");
    let service = TranslationService::from_config(&config.translation).unwrap();

    assert_eq!(service.backend().name(), "mock");
    assert_eq!(service.options.max_chunk_len, 5000);
    assert_eq!(service.translate("Hola", "es", false).await, "[es] Hola");
}
