use anyhow::{Context, Result};
use encoding_rs::{Encoding, GB18030, UTF_8, WINDOWS_1252};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
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

    /// Read a text file, falling back to legacy encodings.
    ///
    /// UTF-8 (with any BOM removed) is tried first, then GB18030, then
    /// Windows-1252. If every decoder reports malformed input the bytes are
    /// decoded as UTF-8 with replacement characters.
    pub fn read_text_with_fallback<P: AsRef<Path>>(path: P) -> Result<String> {
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))?;
        Ok(Self::decode_text(&bytes))
    }

    /// Decode raw bytes with the same fallback chain as [`Self::read_text_with_fallback`].
    pub fn decode_text(bytes: &[u8]) -> String {
        let (text, malformed) = UTF_8.decode_with_bom_removal(bytes);
        if !malformed {
            return text.into_owned();
        }

        // GB18030 is a superset of GBK; Windows-1252 stands in for Latin-1
        let fallbacks: [&'static Encoding; 2] = [GB18030, WINDOWS_1252];
        for encoding in fallbacks {
            if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
                debug!("Decoded input as {}", encoding.name());
                return text.into_owned();
            }
        }

        debug!("No encoding matched, decoding lossily as UTF-8");
        String::from_utf8_lossy(bytes).into_owned()
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Filename-friendly form of a target language: spaces become `-`, lowercased.
    pub fn target_language_slug(target_language: &str) -> String {
        target_language.replace(' ', "-").to_lowercase()
    }

    // @generates: Output path for a translated document
    // @params: input_file, output_dir, target_language
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        target_language: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();

        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        let extension = input_file
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_else(|| ".txt".to_string());

        let output_filename = format!(
            "{}-{}{}",
            stem,
            Self::target_language_slug(target_language),
            extension
        );

        output_dir.as_ref().join(output_filename)
    }
}
