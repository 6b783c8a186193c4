/*!
 * Sequential chunk translation.
 *
 * Chunks are translated strictly one after another: the context of chunk
 * `i` is derived from the translated output of chunk `i - 1`, so no two
 * requests of a run are ever in flight at the same time.
 *
 * Progress and log lines are reported through a caller-supplied callback,
 * in program order, from the task driving the run.
 */

use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::TranslationError;
use crate::providers::Provider;
use crate::providers::openai::{OpenAIRequest, OpenAIResponse};

use super::chunker::Chunk;
use super::client::TranslationClient;
use super::context::{ContextStrategy, TranslationContext, summarize};
use super::prompts::{PromptFields, PromptTemplate, build_messages};

/// Separator placed between translated chunks in the final document.
pub const CHUNK_SEPARATOR: &str = "\n\n";

/// Event emitted while a run progresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationEvent {
    /// `current` of `total` chunks are translated
    Progress { current: usize, total: usize },
    /// Human-readable log line
    Log(String),
    /// The run completed; the joined document has `chars` characters
    Done { chunks: usize, chars: usize },
    /// The run aborted with this error
    Error(String),
}

/// Cooperative cancellation signal, checked between chunks.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives a chunk sequence through context selection and the translation client.
pub struct ChunkTranslator<P> {
    client: TranslationClient<P>,
    template: PromptTemplate,
    target_language: String,
    strategy: ContextStrategy,
    temperature: f32,
}

impl<P> ChunkTranslator<P>
where
    P: Provider<Request = OpenAIRequest, Response = OpenAIResponse>,
{
    /// Create a translator with the default template, two-sentence overlap
    /// and temperature 0.
    pub fn new(client: TranslationClient<P>, target_language: impl Into<String>) -> Self {
        Self {
            client,
            template: PromptTemplate::default(),
            target_language: target_language.into(),
            strategy: ContextStrategy::Overlap(2),
            temperature: 0.0,
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_strategy(mut self, strategy: ContextStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Translate every chunk in order and join the outputs with a blank line.
    ///
    /// The first failing chunk aborts the run; nothing partial is returned.
    /// A cancelled run returns [`TranslationError::Cancelled`].
    pub async fn translate_chunks<F>(
        &self,
        chunks: &[Chunk],
        cancel: &CancellationFlag,
        mut on_event: F,
    ) -> Result<String, TranslationError>
    where
        F: FnMut(TranslationEvent) + Send,
    {
        let result = self.run(chunks, cancel, &mut on_event).await;
        match &result {
            Ok(document) => on_event(TranslationEvent::Done {
                chunks: chunks.len(),
                chars: document.chars().count(),
            }),
            Err(e) => on_event(TranslationEvent::Error(e.to_string())),
        }
        result
    }

    async fn run<F>(
        &self,
        chunks: &[Chunk],
        cancel: &CancellationFlag,
        on_event: &mut F,
    ) -> Result<String, TranslationError>
    where
        F: FnMut(TranslationEvent) + Send,
    {
        let total = chunks.len();
        let mut translated: Vec<String> = Vec::with_capacity(total);
        let mut context = TranslationContext::default();

        for (idx, chunk) in chunks.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(TranslationError::Cancelled);
            }
            let current = idx + 1;

            context.prev_context = self.strategy.select_context(&translated, &context.prev_summary);
            let messages = build_messages(
                &self.template,
                &PromptFields {
                    source: &chunk.text,
                    prev_summary: &context.prev_summary,
                    prev_context: &context.prev_context,
                    target_lang: &self.target_language,
                },
            );

            emit_log(
                on_event,
                format!("[{}/{}] sending chunk ({} chars)...", current, total, chunk.char_len()),
            );
            let output = self
                .client
                .translate(&messages, self.temperature)
                .await
                .map_err(|e| TranslationError::ChunkFailed {
                    index: current,
                    total,
                    source: Box::new(e),
                })?;
            let output = output.trim().to_string();
            emit_log(
                on_event,
                format!("[{}/{}] received {} chars", current, total, output.chars().count()),
            );

            if self.strategy.uses_summary() {
                context.prev_summary = summarize(&output);
                emit_log(
                    on_event,
                    format!("Generated summary for chunk {}: {}", current, context.prev_summary),
                );
            }

            translated.push(output);
            on_event(TranslationEvent::Progress { current, total });
        }

        Ok(translated.join(CHUNK_SEPARATOR))
    }
}

fn emit_log<F>(on_event: &mut F, message: String)
where
    F: FnMut(TranslationEvent),
{
    debug!("{}", message);
    on_event(TranslationEvent::Log(message));
}
