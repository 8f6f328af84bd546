/*!
 * Tests for file and folder helpers
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use relingo::file_utils::FileManager;

use crate::common;

/// Test that output names carry the target language before the suffix
#[test]
fn test_generateOutputPath_withRegionTag_shouldKeepTag() {
    let output = FileManager::generate_output_path("in/brochure.layout.json", "out", "zh-CN");
    assert_eq!(output, PathBuf::from("out/brochure.zh-CN.layout.json"));
}

/// Test that only `.layout.json` files count as documents
#[test]
fn test_isLayoutDocument_shouldMatchSuffixCaseInsensitively() {
    assert!(FileManager::is_layout_document("a.layout.json"));
    assert!(FileManager::is_layout_document("dir/A.Layout.JSON"));
    assert!(!FileManager::is_layout_document("a.json"));
    assert!(!FileManager::is_layout_document("layout.json.bak"));
}

/// Test that the document search is recursive and sorted
#[test]
fn test_findLayoutDocuments_shouldWalkRecursivelyInOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("nested"))?;
    common::create_test_file(root, "b.layout.json", "{}")?;
    common::create_test_file(root, "a.layout.json", "{}")?;
    common::create_test_file(root, "notes.txt", "ignored")?;
    common::create_test_file(&root.join("nested"), "c.layout.json", "{}")?;

    let found = FileManager::find_layout_documents(root)?;
    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["a.layout.json", "b.layout.json", "c.layout.json"]);
    Ok(())
}

/// Test that writing creates missing parent directories
#[test]
fn test_writeToFile_missingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deep").join("er").join("file.txt");

    FileManager::write_to_file(&path, "content")?;

    assert_eq!(FileManager::read_to_string(&path)?, "content");
    Ok(())
}

/// Test that log entries are appended under a header, never overwritten
#[test]
fn test_appendToLogFile_twice_shouldKeepBothEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("issues.log");

    FileManager::append_to_log_file(&path, "first run", &["one".to_string()])?;
    FileManager::append_to_log_file(&path, "second run", &["two".to_string()])?;

    let content = fs::read_to_string(&path)?;
    assert!(content.contains("=== first run ("));
    assert!(content.contains("=== second run ("));
    assert!(content.find("one").unwrap() < content.find("two").unwrap());
    Ok(())
}
