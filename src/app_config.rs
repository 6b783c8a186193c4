use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::translation::chunker::ChunkerConfig;
use crate::translation::context::{ContextStrategy, ContextStrategyKind};
use crate::translation::prompts::{DEFAULT_TEMPLATE, PromptTemplate};
use crate::translation::retry::RetryPolicy;

/// Application configuration module
/// This module handles loading, validating and saving the JSON
/// configuration file.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Chat-completion endpoint settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Chunk sizing
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Translation settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// OpenAI-compatible endpoint configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL; `/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Completion token limit; omitted from requests when unset
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            max_tokens: None,
        }
    }
}

/// Chunk sizing configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Nominal maximum characters per chunk
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Extra characters tolerated to end a chunk on a line boundary
    #[serde(default = "default_overflow_chars")]
    pub overflow_chars: usize,

    /// Minimum size of a buffer flushed on its own
    #[serde(default = "default_min_chunk_chars")]
    pub min_chunk_chars: usize,

    /// Sentences carried over between chunks
    #[serde(default = "default_overlap_sentences")]
    pub overlap_sentences: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            overflow_chars: default_overflow_chars(),
            min_chunk_chars: default_min_chunk_chars(),
            overlap_sentences: default_overlap_sentences(),
        }
    }
}

/// Translation configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Target language, free text (e.g. "Chinese", "中文")
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// User prompt template
    /// Placeholders: {source}, {prev_summary}, {prev_context}, {target_lang}
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,

    /// Context strategy
    #[serde(default)]
    pub strategy: ContextStrategyKind,

    /// Retries after the first failed attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            target_language: default_target_language(),
            prompt_template: default_prompt_template(),
            strategy: ContextStrategyKind::default(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: 0.0,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_chars() -> usize {
    3000
}

fn default_overflow_chars() -> usize {
    200
}

fn default_min_chunk_chars() -> usize {
    300
}

fn default_overlap_sentences() -> usize {
    2
}

fn default_target_language() -> String {
    "Chinese".to_string()
}

fn default_prompt_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

impl Config {
    /// Load the configuration at `path`, creating a default file when it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api.base_url)
            .map_err(|e| anyhow!("Invalid base URL '{}': {}", self.api.base_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!("Base URL must use http or https: {}", self.api.base_url));
        }

        if self.api.api_key.trim().is_empty() {
            return Err(anyhow!(
                "API key is required (set api.api_key, --api-key or CHUNKTRANS_API_KEY)"
            ));
        }

        if self.api.model.trim().is_empty() {
            return Err(anyhow!("Model name is required"));
        }

        if self.translation.target_language.trim().is_empty() {
            return Err(anyhow!("Target language is required"));
        }

        self.chunker_config()
            .validate()
            .map_err(|e| anyhow!("{}", e))?;

        self.prompt_template()
            .context("Invalid prompt template")?;

        Ok(())
    }

    /// Chunker parameters
    pub fn chunker_config(&self) -> ChunkerConfig {
        ChunkerConfig {
            max_chars: self.chunking.max_chars,
            overflow_chars: self.chunking.overflow_chars,
            min_chunk_chars: self.chunking.min_chunk_chars,
            overlap_sentences: self.chunking.overlap_sentences,
        }
    }

    /// Retry policy of the translation client
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.translation.max_retries,
            Duration::from_millis(self.translation.retry_backoff_ms),
        )
    }

    /// Context strategy, resolved with the configured overlap size
    pub fn strategy(&self) -> ContextStrategy {
        self.translation
            .strategy
            .with_overlap(self.chunking.overlap_sentences)
    }

    /// Parsed prompt template
    pub fn prompt_template(&self) -> Result<PromptTemplate> {
        Ok(PromptTemplate::parse(&self.translation.prompt_template)?)
    }
}
