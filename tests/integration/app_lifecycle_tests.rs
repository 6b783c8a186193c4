/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use chunktrans::app_controller::Controller;
use chunktrans::providers::mock::{MockProvider, MockReply};
use chunktrans::translation::{CancellationFlag, ContextStrategyKind};
use crate::common;

/// Test the controller initialization with the default OpenAI provider
#[test]
fn test_controller_withConfig_shouldBuildWithoutNetwork() -> Result<()> {
    let controller = Controller::with_config(common::test_config())?;
    assert_eq!(controller.config().translation.target_language, "French");
    Ok(())
}

/// Test that an invalid prompt template is rejected at construction
#[test]
fn test_controller_unknownPlaceholder_shouldFailToBuild() {
    let mut config = common::test_config();
    config.translation.prompt_template = "{source} {glossary}".to_string();
    assert!(Controller::with_provider(config, MockProvider::working()).is_err());
}

/// Test the full workflow writes the joined translation next to the input
#[tokio::test]
async fn test_controller_run_shouldWriteTranslatedFile() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), "doc.md")?;

    let mut config = common::test_config();
    config.chunking.max_chars = 90;
    config.chunking.overflow_chars = 10;
    config.chunking.min_chunk_chars = 20;
    config.translation.strategy = ContextStrategyKind::None;
    config.translation.prompt_template = "{source}".to_string();

    let provider = MockProvider::working();
    let controller = Controller::with_provider(config, provider.clone())?;
    let chunk_count = controller.chunk_plan(&input)?.len();
    assert!(chunk_count > 1);

    let output = controller
        .run(input.clone(), temp_dir.path().to_path_buf(), false, &CancellationFlag::new())
        .await?
        .expect("output should be written");

    assert_eq!(output, temp_dir.path().join("doc-french.md"));
    let written = std::fs::read_to_string(&output)?;
    assert_eq!(written.split("\n\n").count(), chunk_count);
    assert!(written.starts_with("[TRANSLATED] The first paragraph"));
    assert_eq!(provider.request_count(), chunk_count);

    Ok(())
}

/// Test that an existing output is left alone without force
#[tokio::test]
async fn test_controller_existingOutput_shouldSkipWithoutForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), "doc.txt")?;
    let existing = common::create_test_file(temp_dir.path(), "doc-french.txt", "keep me")?;

    let provider = MockProvider::working();
    let controller = Controller::with_provider(common::test_config(), provider.clone())?;

    let result = controller
        .run(input.clone(), temp_dir.path().to_path_buf(), false, &CancellationFlag::new())
        .await?;
    assert!(result.is_none());
    assert_eq!(std::fs::read_to_string(&existing)?, "keep me");
    assert_eq!(provider.request_count(), 0);

    let forced = controller
        .run(input, temp_dir.path().to_path_buf(), true, &CancellationFlag::new())
        .await?;
    assert_eq!(forced, Some(existing.clone()));
    assert_ne!(std::fs::read_to_string(&existing)?, "keep me");

    Ok(())
}

/// Test that a failing run writes nothing
#[tokio::test]
async fn test_controller_failingProvider_shouldNotWriteOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), "doc.txt")?;

    let mut config = common::test_config();
    config.translation.max_retries = 1;
    let provider = MockProvider::scripted(vec![MockReply::Status(401), MockReply::Status(401)]);
    let controller = Controller::with_provider(config, provider.clone())?;

    let result = controller
        .run(input, temp_dir.path().to_path_buf(), false, &CancellationFlag::new())
        .await;

    assert!(result.is_err());
    assert!(!temp_dir.path().join("doc-french.txt").exists());
    assert_eq!(provider.request_count(), 2);

    Ok(())
}

/// Test that a cancelled run writes nothing and sends nothing
#[tokio::test]
async fn test_controller_cancelledRun_shouldNotWriteOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), "doc.txt")?;
    let provider = MockProvider::working();
    let controller = Controller::with_provider(common::test_config(), provider.clone())?;
    let cancel = CancellationFlag::new();
    cancel.cancel();

    let result = controller
        .run(input, temp_dir.path().to_path_buf(), false, &cancel)
        .await;

    assert!(result.is_err());
    assert!(!temp_dir.path().join("doc-french.txt").exists());
    assert_eq!(provider.request_count(), 0);

    Ok(())
}

/// Test that a missing input is reported before any request
#[tokio::test]
async fn test_controller_missingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let provider = MockProvider::working();
    let controller = Controller::with_provider(common::test_config(), provider.clone())?;

    let result = controller
        .run(
            temp_dir.path().join("absent.txt"),
            temp_dir.path().to_path_buf(),
            false,
            &CancellationFlag::new(),
        )
        .await;

    assert!(result.is_err());
    assert_eq!(provider.request_count(), 0);
    Ok(())
}
