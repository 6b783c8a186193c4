/*!
 * Context carried from one translated chunk into the next request.
 *
 * The strategy is fixed for a run. Only the history (already translated
 * chunks) and the running summary change, once per completed chunk.
 */

use serde::{Deserialize, Serialize};

use super::sentence::trailing_sentences;

/// Number of characters kept by the running summary.
pub const SUMMARY_CHARS: usize = 80;

/// Context strategy selected in the configuration file / CLI.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContextStrategyKind {
    /// Trailing sentences of the previous translation
    #[default]
    Overlap,
    /// Running summary of the previous translation
    IterativeSummary,
    /// No context at all
    None,
}

impl ContextStrategyKind {
    /// Resolve into a concrete strategy using the configured overlap size.
    pub fn with_overlap(self, overlap_sentences: usize) -> ContextStrategy {
        match self {
            Self::Overlap => ContextStrategy::Overlap(overlap_sentences),
            Self::IterativeSummary => ContextStrategy::IterativeSummary,
            Self::None => ContextStrategy::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overlap => "overlap",
            Self::IterativeSummary => "iterative_summary",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for ContextStrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContextStrategyKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "overlap" => Ok(Self::Overlap),
            "iterative_summary" | "summary" => Ok(Self::IterativeSummary),
            "none" => Ok(Self::None),
            _ => Err(anyhow::anyhow!("Invalid context strategy: {}", s)),
        }
    }
}

/// Policy for carrying information between chunk requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextStrategy {
    /// Always empty context
    None,
    /// Last `n` sentences of the most recent translated chunk
    Overlap(usize),
    /// Running summary of the most recent translated chunk
    IterativeSummary,
}

impl ContextStrategy {
    /// Select the context fragment for the next request.
    ///
    /// `history` holds the translated outputs so far, in order.
    pub fn select_context(&self, history: &[String], prev_summary: &str) -> String {
        match self {
            Self::None => String::new(),
            Self::Overlap(count) => history
                .last()
                .map(|previous| trailing_sentences(previous, *count))
                .unwrap_or_default(),
            Self::IterativeSummary => prev_summary.to_string(),
        }
    }

    /// Whether the running summary must be refreshed after each chunk.
    pub fn uses_summary(&self) -> bool {
        matches!(self, Self::IterativeSummary)
    }
}

/// Running summary of a translated chunk: its first [`SUMMARY_CHARS`] characters.
///
/// Truncation counts Unicode scalar values, so a multi-byte sequence is
/// never cut in half. Words may still be cut.
pub fn summarize(translated: &str) -> String {
    translated.trim().chars().take(SUMMARY_CHARS).collect()
}

/// Per-run context state, mutated once per chunk by the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationContext {
    /// Running summary (iterative summary strategy only)
    pub prev_summary: String,
    /// Context fragment passed into the next request
    pub prev_context: String,
}
