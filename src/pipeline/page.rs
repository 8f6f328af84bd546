/*!
 * Page pipeline orchestrator.
 *
 * Translation happens before anything on the page is touched. Redactions
 * are queued for every span and applied as a single batch, then the
 * translated texts are drawn. A failure in the redact or draw steps leaves
 * the rest of the page unprocessed and is reported to the caller.
 */

use futures::stream::{self, StreamExt};
use log::debug;
use std::sync::Arc;

use crate::app_config::Config;
use crate::document::{FontMetrics, ImagePolicy, Page, Point, Rgb};
use crate::errors::DocumentError;
use crate::layout::{color, fit_text, WrapOptions};
use crate::translation::TranslationService;

use super::{segment, PageReport, Span, TranslationResult};

/// Per-document settings shared by every page
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub target_language: String,
    pub auto_detect: bool,
    /// Font identifier passed to `insert_text`
    pub font: String,
    pub wrap: WrapOptions,
    pub image_policy: ImagePolicy,
    /// Spans of one page translated at the same time
    pub concurrent_requests: usize,
}

impl PipelineSettings {
    pub fn new(target_language: impl Into<String>, auto_detect: bool) -> Self {
        Self {
            target_language: target_language.into(),
            auto_detect,
            font: "helv".to_string(),
            wrap: WrapOptions::default(),
            image_policy: ImagePolicy::default(),
            concurrent_requests: 1,
        }
    }

    /// Settings taken from the application config
    pub fn from_config(config: &Config) -> Self {
        Self {
            target_language: config.target_language.clone(),
            auto_detect: config.auto_detect,
            font: config.layout.default_font.clone(),
            wrap: config.layout.wrap_options(),
            image_policy: config.layout.image_policy,
            concurrent_requests: config.translation.common.concurrent_requests.max(1),
        }
    }
}

/// Runs the segment / translate / redact / draw steps on single pages
pub struct PageProcessor<'a> {
    translator: &'a TranslationService,
    metrics: Arc<dyn FontMetrics + Send + Sync>,
    settings: PipelineSettings,
}

impl<'a> PageProcessor<'a> {
    pub fn new(
        translator: &'a TranslationService,
        metrics: Arc<dyn FontMetrics + Send + Sync>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            translator,
            metrics,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Translate one page in place
    pub async fn process_page(&self, page: &mut dyn Page) -> Result<PageReport, DocumentError> {
        let index = page.index();
        let spans = segment(page).map_err(|e| page_error(index, e))?;
        let mut report = PageReport {
            index,
            spans: spans.len(),
            ..Default::default()
        };

        if spans.is_empty() {
            debug!("Page {}: no text spans", index + 1);
            return Ok(report);
        }

        let results = self.translate_spans(&spans).await;
        report.translated = spans
            .iter()
            .zip(&results)
            .filter(|(span, result)| span.text != result.text)
            .count();

        for result in &results {
            page.add_redaction(result.rect, Rgb::WHITE)
                .map_err(|e| page_error(index, e))?;
        }
        report.redactions = page
            .apply_redactions(self.settings.image_policy)
            .map_err(|e| page_error(index, e))?;

        for result in &results {
            let (lines, overflow) = self.draw(page, result).map_err(|e| page_error(index, e))?;
            report.lines_drawn += lines;
            if overflow {
                report.overflowed += 1;
            }
        }

        debug!(
            "Page {}: {} spans, {} translated, {} lines drawn, {} overflowing",
            index + 1,
            report.spans,
            report.translated,
            report.lines_drawn,
            report.overflowed
        );
        Ok(report)
    }

    /// Translate spans, keeping their order whatever the concurrency
    async fn translate_spans(&self, spans: &[Span]) -> Vec<TranslationResult> {
        let target = self.settings.target_language.as_str();
        let auto_detect = self.settings.auto_detect;

        stream::iter(spans)
            .map(|span| async move {
                let text = self.translator.translate(&span.text, target, auto_detect).await;
                TranslationResult {
                    rect: span.rect,
                    text,
                    color: color::decode(Some(&span.color)),
                    font_size: span.font_size,
                }
            })
            .buffered(self.settings.concurrent_requests.max(1))
            .collect()
            .await
    }

    /// Wrap one result into its rectangle and draw the lines top to bottom
    fn draw(&self, page: &mut dyn Page, result: &TranslationResult) -> Result<(usize, bool), DocumentError> {
        let wrapped = fit_text(
            &result.text,
            self.metrics.as_ref(),
            result.font_size,
            &result.rect,
            &self.settings.wrap,
        );
        let line_height = wrapped.line_height(self.settings.wrap.line_spacing);

        for (i, line) in wrapped.lines.iter().enumerate() {
            let origin = Point::new(result.rect.x0, result.rect.y0 + i as f64 * line_height);
            page.insert_text(origin, line, &self.settings.font, wrapped.font_size, result.color)?;
        }

        Ok((wrapped.lines.len(), wrapped.overflow))
    }
}

fn page_error(index: usize, error: DocumentError) -> DocumentError {
    match error {
        DocumentError::Page { .. } => error,
        other => DocumentError::Page {
            index,
            reason: other.to_string(),
        },
    }
}
