use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, PageErrorPolicy};
use crate::document::{Document, DocumentBackend, LayoutBackend};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::pipeline::{PageProcessor, PageReport, PipelineSettings};
use crate::providers::{create_backend, TranslationBackend};
use crate::translation::{TranslationOptions, TranslationService};

// @module: Application controller for document translation

/// Outcome of one translated document
#[derive(Debug, Clone, Default)]
pub struct DocumentSummary {
    /// Where the translated document was written
    pub output_path: PathBuf,
    /// Reports of the pages that went through the pipeline
    pub pages: Vec<PageReport>,
    /// Indices of pages skipped after a failure
    pub failed_pages: Vec<usize>,
    /// Wall-clock duration of the whole document
    pub duration: Duration,
}

impl DocumentSummary {
    /// Total number of spans found
    pub fn span_count(&self) -> usize {
        self.pages.iter().map(|p| p.spans).sum()
    }

    /// Total number of spans whose text changed
    pub fn translated_count(&self) -> usize {
        self.pages.iter().map(|p| p.translated).sum()
    }
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Opens source documents
    documents: Arc<dyn DocumentBackend>,
    // @field: Detects and translates text
    translator: Arc<dyn TranslationBackend>,
    // @field: Draw progress bars on stderr
    show_progress: bool,
}

impl Controller {
    // @method: Create a controller with the backends selected in the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let translator = create_backend(&config.translation)?;
        Ok(Self::with_components(config, Arc::new(LayoutBackend::new()), translator))
    }

    // @method: Create a controller from explicit collaborators
    pub fn with_components(
        config: Config,
        documents: Arc<dyn DocumentBackend>,
        translator: Arc<dyn TranslationBackend>,
    ) -> Self {
        Self {
            config,
            documents,
            translator,
            show_progress: true,
        }
    }

    /// Enable or disable the progress bars (tests turn them off)
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate one document and write the result to `output_path`.
    ///
    /// Pages are processed in order. The output is saved only once every
    /// page has been handled; the document is closed on every path.
    pub async fn translate_document(&self, input_path: &Path, output_path: &Path) -> Result<DocumentSummary> {
        let start_time = Instant::now();
        let target_language = language_utils::normalize_language_tag(&self.config.target_language)
            .map_err(|e| AppError::Config(format!("Invalid target language: {}", e)))?;

        let mut document = self
            .documents
            .open(input_path)
            .map_err(AppError::Document)?;

        let service = TranslationService::new(
            Arc::clone(&self.translator),
            TranslationOptions::from_config(&self.config.translation),
        );
        let mut settings = PipelineSettings::from_config(&self.config);
        settings.target_language = target_language;

        let result = self
            .process_document(document.as_mut(), &service, settings, output_path)
            .await;
        document.close();

        let mut summary = result?;
        summary.duration = start_time.elapsed();

        info!(
            "Translated {} pages of {:?} in {}",
            summary.pages.len(),
            input_path,
            Self::format_duration(summary.duration)
        );
        info!("Spans: {}", service.stats().summary());
        let (hits, misses, hit_rate) = service.cache.stats();
        debug!("Cache: {} hits, {} misses ({:.0}% hit rate)", hits, misses, hit_rate * 100.0);

        Ok(summary)
    }

    /// Run every page through the pipeline, then save
    async fn process_document(
        &self,
        document: &mut dyn Document,
        service: &TranslationService,
        settings: PipelineSettings,
        output_path: &Path,
    ) -> Result<DocumentSummary> {
        let metrics = document.font(&settings.font)?;
        let processor = PageProcessor::new(service, metrics, settings);
        let page_count = document.page_count();

        let progress_bar = self.page_progress_bar(page_count);
        let mut summary = DocumentSummary {
            output_path: output_path.to_path_buf(),
            ..Default::default()
        };

        for index in 0..page_count {
            progress_bar.set_message(format!("page {}", index + 1));

            let outcome = match document.page_mut(index) {
                Ok(page) => processor.process_page(page).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(report) => summary.pages.push(report),
                Err(e) => match self.config.on_page_error {
                    PageErrorPolicy::Abort => {
                        progress_bar.abandon_with_message("aborted");
                        error!("Page {} of {} failed: {}", index + 1, page_count, e);
                        return Err(anyhow!(e).context("Document translation aborted, nothing was saved"));
                    }
                    PageErrorPolicy::Skip => {
                        warn!("Skipping page {} of {}: {}", index + 1, page_count, e);
                        summary.failed_pages.push(index);
                    }
                },
            }

            progress_bar.inc(1);
            debug!("Processed page {}/{}", index + 1, page_count);
        }
        progress_bar.finish_with_message("done");

        if let Some(parent) = output_path.parent() {
            FileManager::ensure_dir(parent)?;
        }
        document
            .save(output_path)
            .map_err(AppError::Document)?;

        Ok(summary)
    }

    /// Run the workflow for a single input document
    ///
    /// Returns `None` when the output exists and `force_overwrite` is off.
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_path: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<Option<DocumentSummary>> {
        if !FileManager::file_exists(&input_file) {
            return Err(AppError::File(format!("Input file does not exist: {:?}", input_file)).into());
        }

        let output_path = match output_path {
            Some(path) if FileManager::dir_exists(&path) => self.output_path_for(&input_file, &path),
            Some(path) => path,
            None => {
                let dir = input_file.parent().map(Path::to_path_buf).unwrap_or_default();
                self.output_path_for(&input_file, &dir)
            }
        };

        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {:?}, translation already exists (use -f to force overwrite)",
                output_path
            );
            return Ok(None);
        }

        info!(
            "Translating {:?} into {} with {}",
            input_file,
            language_utils::get_language_name(&self.config.target_language)
                .unwrap_or_else(|_| self.config.target_language.clone()),
            self.config.translation.provider.display_name()
        );

        let summary = self.translate_document(&input_file, &output_path).await?;
        info!("Saved translated document to {:?}", summary.output_path);
        Ok(Some(summary))
    }

    /// Run the workflow in folder mode, one document at a time
    ///
    /// Documents that already have a translation are skipped unless
    /// `force_overwrite` is set. Errors are logged and counted, not returned.
    pub async fn run_folder(
        &self,
        input_dir: PathBuf,
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(AppError::File(format!("Input directory does not exist: {:?}", input_dir)).into());
        }

        let documents: Vec<PathBuf> = FileManager::find_layout_documents(&input_dir)?
            .into_iter()
            .filter(|path| !FileManager::is_translation_output(path, &self.config.target_language))
            .collect();

        if documents.is_empty() {
            return Err(AppError::File(format!("No layout documents found in directory: {:?}", input_dir)).into());
        }

        let folder_pb = self.progress_bar(documents.len(), "files");
        let mut summary = FolderSummary::default();

        for document in &documents {
            let file_name = document
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let target_dir = match &output_dir {
                Some(dir) => dir.clone(),
                None => document.parent().map(Path::to_path_buf).unwrap_or_else(|| input_dir.clone()),
            };
            let output_path = self.output_path_for(document, &target_dir);

            match self.run(document.clone(), Some(output_path), force_overwrite).await {
                Ok(Some(_)) => summary.processed += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.errors.push(format!("{}: {:#}", file_name, e));
                }
            }

            folder_pb.inc(1);
        }
        folder_pb.finish_with_message("Folder processing complete");

        let message = format!(
            "Folder processing completed: {} processed, {} skipped, {} errors in {}",
            summary.processed,
            summary.skipped,
            summary.errors.len(),
            Self::format_duration(start_time.elapsed())
        );
        info!("{}", message);

        if !summary.errors.is_empty() {
            let log_path = input_dir.join("relingo.issues.log");
            let context = format!("Folder processing: {}", input_dir.display());
            let mut lines = summary.errors.clone();
            lines.push(message);
            if let Err(e) = FileManager::append_to_log_file(&log_path, &context, &lines) {
                warn!("Failed to write folder log: {}", e);
            } else {
                info!("Issues written to {:?}", log_path);
            }
        }

        Ok(summary)
    }

    /// `<stem>.<lang>.layout.json` inside `output_dir`
    fn output_path_for(&self, input_file: &Path, output_dir: &Path) -> PathBuf {
        let language = language_utils::normalize_language_tag(&self.config.target_language)
            .unwrap_or_else(|_| self.config.target_language.clone());
        FileManager::generate_output_path(input_file, output_dir, &language)
    }

    fn page_progress_bar(&self, page_count: usize) -> ProgressBar {
        self.progress_bar(page_count, "pages")
    }

    fn progress_bar(&self, len: usize, unit: &str) -> ProgressBar {
        let progress_bar = ProgressBar::new(len as u64);
        if !self.show_progress {
            progress_bar.set_draw_target(ProgressDrawTarget::hidden());
            return progress_bar;
        }

        let template_result = ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}",
                unit
            ))
            .or_else(|_| {
                ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}")
            })
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }

    /// Format a duration as `1h 2m 3s`, `2m 3s` or `3.042s`
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

/// Counts for a folder run
#[derive(Debug, Clone, Default)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    /// One message per failed document
    pub errors: Vec<String>,
}
