use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Suffix of layout document files
pub const LAYOUT_SUFFIX: &str = ".layout.json";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @checks: File name ends with `.layout.json`
    pub fn is_layout_document<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase().ends_with(LAYOUT_SUFFIX))
            .unwrap_or(false)
    }

    // @returns: File name without `.layout.json` (or without its last extension)
    pub fn document_stem<P: AsRef<Path>>(path: P) -> String {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let layout_stem = name
            .len()
            .checked_sub(LAYOUT_SUFFIX.len())
            .filter(|_| name.to_lowercase().ends_with(LAYOUT_SUFFIX))
            .and_then(|end| name.get(..end));

        if let Some(stem) = layout_stem {
            stem.to_string()
        } else {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or(name)
        }
    }

    // @generates: Output path for a translated document
    // @params: input_file, output_dir, target_language
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        target_language: &str,
    ) -> PathBuf {
        let stem = Self::document_stem(input_file);
        output_dir
            .as_ref()
            .join(format!("{}.{}{}", stem, target_language, LAYOUT_SUFFIX))
    }

    // @checks: Path already is a translation into `target_language`
    pub fn is_translation_output<P: AsRef<Path>>(path: P, target_language: &str) -> bool {
        let suffix = format!(".{}", target_language.to_lowercase());
        Self::is_layout_document(&path)
            && Self::document_stem(&path).to_lowercase().ends_with(&suffix)
    }

    /// Find layout documents in a directory, recursively, in a stable order
    pub fn find_layout_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::is_layout_document(path) {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    /// Append timestamped lines under a context header
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, context: &str, lines: &[String]) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "=== {} ({}) ===", context, timestamp)?;
        for line in lines {
            writeln!(file, "{}", line)?;
        }
        writeln!(file)?;
        Ok(())
    }
}
