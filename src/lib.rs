/*!
 * # chunktrans
 *
 * A Rust library for translating large text documents with an LLM,
 * chunk by chunk, while carrying context from one chunk to the next.
 *
 * ## Features
 *
 * - Size-bounded chunking on line and sentence boundaries, with a
 *   configurable overflow tolerance
 * - Sentence segmentation for CJK and Latin punctuation
 * - Context strategies: trailing-sentence overlap, iterative summary, none
 * - Prompt templates with named placeholders, validated up front
 * - OpenAI-compatible chat-completion client with bounded exponential-backoff retries
 * - Strictly sequential orchestration with progress events and cancellation
 * - Encoding fallback when reading source files (UTF-8, GB18030, Windows-1252)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: The chunking and translation pipeline:
 *   - `translation::sentence`: Sentence segmentation
 *   - `translation::chunker`: Size-bounded chunking
 *   - `translation::context`: Context strategies
 *   - `translation::prompts`: Prompt templates
 *   - `translation::retry`: Retry policy and sleepers
 *   - `translation::client`: Translation client
 *   - `translation::orchestrator`: Sequential chunk translation
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `providers`: Chat-completion provider implementations:
 *   - `providers::openai`: OpenAI-compatible API client
 *   - `providers::mock`: Scripted provider for tests
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, ChunkingError, ProviderError, TemplateError, TranslationError};
pub use translation::{
    CancellationFlag, Chunk, ChunkTranslator, Chunker, ChunkerConfig, ContextStrategy,
    TranslationClient, TranslationEvent,
};
