/*!
 * Chunked, context-preserving translation of large documents.
 *
 * The pipeline is split into several submodules:
 *
 * - `sentence`: Sentence segmentation on CJK and Latin punctuation
 * - `chunker`: Size-bounded chunking on line and sentence boundaries
 * - `context`: Context strategies carried from chunk to chunk
 * - `prompts`: Prompt template parsing and message building
 * - `retry`: Bounded retry with exponential backoff
 * - `client`: One chat request with retries
 * - `orchestrator`: Sequential translation of a chunk sequence
 */

// Re-export main types for easier usage
pub use self::chunker::{Chunk, Chunker, ChunkerConfig, chunk_text};
pub use self::client::TranslationClient;
pub use self::context::{ContextStrategy, ContextStrategyKind, TranslationContext, summarize};
pub use self::orchestrator::{CancellationFlag, ChunkTranslator, TranslationEvent};
pub use self::prompts::{PromptFields, PromptTemplate, build_messages};
pub use self::retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use self::sentence::split_sentences;

// Submodules
pub mod chunker;
pub mod client;
pub mod context;
pub mod orchestrator;
pub mod prompts;
pub mod retry;
pub mod sentence;
