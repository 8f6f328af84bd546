/*!
 * Folder mode tests
 */

use anyhow::Result;
use std::fs;
use std::sync::Arc;

use relingo::document::LayoutBackend;
use relingo::providers::MockBackend;
use relingo::Controller;

use crate::common;

fn controller(target_language: &str) -> Controller {
    Controller::with_components(
        common::mock_config(target_language),
        Arc::new(LayoutBackend::new()),
        Arc::new(MockBackend::working()),
    )
    .with_progress(false)
}

/// Test that every document of a folder tree is translated next to its source
#[tokio::test]
async fn test_runFolder_shouldTranslateEveryDocument() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("sub"))?;
    common::write_document(root, "a.layout.json", &common::sample_document())?;
    common::write_document(&root.join("sub"), "b.layout.json", &common::sample_document())?;
    common::create_test_file(root, "readme.txt", "not a document")?;

    let summary = controller("fr").run_folder(root.to_path_buf(), None, false).await?;

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 0);
    assert!(summary.errors.is_empty());
    assert!(root.join("a.fr.layout.json").exists());
    assert!(root.join("sub").join("b.fr.layout.json").exists());
    Ok(())
}

/// Test that a second run skips documents already translated and ignores its own outputs
#[tokio::test]
async fn test_runFolder_secondRun_shouldSkipExistingOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::write_document(root, "a.layout.json", &common::sample_document())?;

    let controller = controller("fr");
    let first = controller.run_folder(root.to_path_buf(), None, false).await?;
    let second = controller.run_folder(root.to_path_buf(), None, false).await?;

    assert_eq!(first.processed, 1);
    assert_eq!(second.processed, 0);
    assert_eq!(second.skipped, 1);
    assert!(!root.join("a.fr.fr.layout.json").exists());
    Ok(())
}

/// Test that outputs go to the requested directory
#[tokio::test]
async fn test_runFolder_outputDirectory_shouldCollectOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("in");
    let output_dir = temp_dir.path().join("out");
    fs::create_dir_all(&input_dir)?;
    common::write_document(&input_dir, "a.layout.json", &common::sample_document())?;

    let summary = controller("ja").run_folder(input_dir.clone(), Some(output_dir.clone()), false).await?;

    assert_eq!(summary.processed, 1);
    let translated = common::read_document(&output_dir.join("a.ja.layout.json"))?;
    assert_eq!(translated.pages[0].texts(), vec!["[ja] Hello world"]);
    assert!(!input_dir.join("a.ja.layout.json").exists());
    Ok(())
}

/// Test that a broken document is counted and logged without stopping the run
#[tokio::test]
async fn test_runFolder_brokenDocument_shouldLogAndContinue() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "a_broken.layout.json", "{ definitely not json")?;
    common::write_document(root, "b_good.layout.json", &common::sample_document())?;

    let summary = controller("fr").run_folder(root.to_path_buf(), None, false).await?;

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].starts_with("a_broken.layout.json"));
    let issues = fs::read_to_string(root.join("relingo.issues.log"))?;
    assert!(issues.contains("a_broken.layout.json"));
    assert!(root.join("b_good.fr.layout.json").exists());
    Ok(())
}

/// Test that a folder without documents is an error
#[test]
fn test_runFolder_noDocuments_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "notes.txt", "nothing here")?;

    let result = tokio_test::block_on(async {
        controller("fr").run_folder(temp_dir.path().to_path_buf(), None, false).await
    });

    assert!(result.is_err());
    Ok(())
}
