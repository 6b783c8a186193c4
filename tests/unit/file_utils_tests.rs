/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use chunktrans::file_utils::FileManager;
use crate::common;

#[test]
fn test_readTextWithFallback_utf8_shouldReadVerbatim() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "doc.txt", "Grüße, 世界.\nLine two.")?;

    let text = FileManager::read_text_with_fallback(&path)?;
    assert_eq!(text, "Grüße, 世界.\nLine two.");

    Ok(())
}

#[test]
fn test_readTextWithFallback_latin1_shouldFallBackToWindows1252() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("legacy.txt");
    // "café" in Latin-1; 0xE9 alone is not valid UTF-8 nor a complete GB18030 sequence
    std::fs::write(&path, b"caf\xE9")?;

    let text = FileManager::read_text_with_fallback(&path)?;
    assert_eq!(text, "café");

    Ok(())
}

#[test]
fn test_generateOutputPath_multiWordLanguage_shouldSlugify() {
    let path = FileManager::generate_output_path("/tmp/book.txt", "/tmp", "Traditional Chinese");
    assert_eq!(path.file_name().unwrap(), "book-traditional-chinese.txt");
}

#[test]
fn test_writeToFile_existingFile_shouldOverwrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "out.txt", "old")?;

    FileManager::write_to_file(&path, "new")?;
    assert_eq!(std::fs::read_to_string(&path)?, "new");

    Ok(())
}

#[test]
fn test_fileExists_directory_shouldBeFalse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}
