use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::providers::Provider;
use crate::providers::openai::{OpenAI, OpenAIRequest, OpenAIResponse};
use crate::translation::{
    CancellationFlag, Chunk, ChunkTranslator, Chunker, TranslationClient, TranslationEvent,
};

// @module: Application controller for document translation

/// Main application controller: read, chunk, translate and write one file
pub struct Controller<P = OpenAI> {
    // @field: App configuration
    config: Config,
    // @field: Chunker built from the configuration
    chunker: Chunker,
    // @field: Sequential chunk translator
    translator: ChunkTranslator<P>,
}

impl Controller<OpenAI> {
    // @method: Create a new controller talking to the configured endpoint
    pub fn with_config(config: Config) -> Result<Self> {
        let provider = OpenAI::new(
            config.api.base_url.clone(),
            config.api.api_key.clone(),
            config.api.timeout_secs,
        );
        Self::with_provider(config, provider)
    }
}

impl<P> Controller<P>
where
    P: Provider<Request = OpenAIRequest, Response = OpenAIResponse>,
{
    /// Create a controller on top of an arbitrary provider
    pub fn with_provider(config: Config, provider: P) -> Result<Self> {
        let chunker = Chunker::new(config.chunker_config())
            .map_err(|e| anyhow!("{}", e))?;

        let client = TranslationClient::new(provider, config.api.model.clone())
            .with_retry_policy(config.retry_policy())
            .with_max_tokens(config.api.max_tokens);

        let translator = ChunkTranslator::new(client, config.translation.target_language.clone())
            .with_template(config.prompt_template()?)
            .with_strategy(config.strategy())
            .with_temperature(config.translation.temperature);

        Ok(Self {
            config,
            chunker,
            translator,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Output path the translation of `input_file` is written to
    pub fn output_path(&self, input_file: &Path, output_dir: &Path) -> PathBuf {
        FileManager::generate_output_path(
            input_file,
            output_dir,
            &self.config.translation.target_language,
        )
    }

    /// Read and chunk a file without translating it
    pub fn chunk_plan(&self, input_file: &Path) -> Result<Vec<Chunk>> {
        let text = self.read_source(input_file)?;
        info!("Chunking text...");
        let chunks = self.chunker.chunk(&text);
        info!("Produced {} chunks", chunks.len());
        Ok(chunks)
    }

    /// Translate `input_file` into `output_dir`.
    ///
    /// Returns the written path, or `None` when the output already exists
    /// and `force_overwrite` is off. Nothing is written unless every chunk
    /// was translated.
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
        cancel: &CancellationFlag,
    ) -> Result<Option<PathBuf>> {
        let start_time = std::time::Instant::now();

        let output_path = self.output_path(&input_file, &output_dir);
        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping file, translation already exists at {} (use -f to force overwrite)",
                output_path.display()
            );
            return Ok(None);
        }

        let chunks = self.chunk_plan(&input_file)?;

        info!(
            "Translating into {} with {} ({} strategy)",
            self.config.translation.target_language,
            self.config.api.model,
            self.config.translation.strategy
        );

        let progress_bar = ProgressBar::new(chunks.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        let pb = progress_bar.clone();
        let result = self
            .translator
            .translate_chunks(&chunks, cancel, move |event| match event {
                TranslationEvent::Progress { current, .. } => pb.set_position(current as u64),
                TranslationEvent::Log(line) => pb.set_message(line),
                TranslationEvent::Done { chunks, chars } => {
                    debug!("Translated {} chunks into {} chars", chunks, chars)
                }
                TranslationEvent::Error(message) => debug!("Run aborted: {}", message),
            })
            .await;

        let translated = match result {
            Ok(translated) => {
                progress_bar.finish_and_clear();
                translated
            }
            Err(e) => {
                progress_bar.abandon();
                return Err(e).context(format!("Failed to translate {}", input_file.display()));
            }
        };

        FileManager::write_to_file(&output_path, &translated)?;
        info!(
            "Success: {} ({})",
            output_path.display(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(Some(output_path))
    }

    fn read_source(&self, input_file: &Path) -> Result<String> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        info!("Reading source file...");
        let text = FileManager::read_text_with_fallback(input_file)?;
        info!("Source length: {} chars", text.chars().count());
        Ok(text)
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
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
