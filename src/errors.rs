/*!
 * Error types for the chunktrans application.
 *
 * This module contains custom error types for the different stages of the
 * pipeline (chunking, prompt rendering, remote calls, orchestration),
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a chat-completion endpoint
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The endpoint answered with a failure status (>= 400)
    #[error("API error {status_code}: {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Response body returned by the API
        message: String,
    },

    /// Transport-level failure (connection refused, timeout, TLS, ...)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The endpoint answered with a success status but the body was not JSON
    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

/// Errors raised while parsing or rendering a prompt template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{name}` placeholder that the template engine does not know
    #[error("Unknown placeholder '{{{0}}}' in prompt template")]
    UnknownPlaceholder(String),

    /// A `{` that is never closed
    #[error("Unclosed placeholder starting at byte {0}")]
    UnclosedPlaceholder(usize),

    /// A lone `}` that is neither escaped nor closing a placeholder
    #[error("Unmatched '}}' at byte {0}")]
    UnmatchedBrace(usize),
}

/// Errors raised by chunker construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkingError {
    #[error("Invalid chunking configuration: {0}")]
    InvalidConfig(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Every attempt of a single request failed; wraps the last cause
    #[error("Translation failed after {attempts} attempt(s): {source}")]
    Failed {
        /// Number of attempts made (first call plus retries)
        attempts: u32,
        /// Last underlying error
        #[source]
        source: ProviderError,
    },

    /// A chunk could not be translated; the run was aborted
    #[error("Chunk {index}/{total} failed: {source}")]
    ChunkFailed {
        /// 1-based index of the failing chunk
        index: usize,
        /// Number of chunks in the run
        total: usize,
        /// Error produced for that chunk
        #[source]
        source: Box<TranslationError>,
    },

    /// The run was cancelled between two chunks
    #[error("Translation cancelled")]
    Cancelled,
}

impl TranslationError {
    /// Returns the innermost provider error, if the failure came from the endpoint
    pub fn provider_cause(&self) -> Option<&ProviderError> {
        match self {
            Self::Failed { source, .. } => Some(source),
            Self::ChunkFailed { source, .. } => source.provider_cause(),
            _ => None,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from chunker setup
    #[error("Chunking error: {0}")]
    Chunking(#[from] ChunkingError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
