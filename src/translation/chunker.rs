/*!
 * Size-bounded chunking of large documents.
 *
 * Text is accumulated line by line into chunks of at most `max_chars`
 * characters. A line that would push a chunk slightly past the bound is
 * still accepted as long as the total stays within `max_chars +
 * overflow_chars`, so chunks end on natural line boundaries whenever
 * possible. Lines that are too long on their own are sub-split by sentence,
 * and sentences that are still too long are cut hard at `max_chars`.
 *
 * All sizes are counted in Unicode scalar values, never bytes.
 */

use std::ops::Range;

use crate::errors::ChunkingError;
use super::sentence::{sentence_spans, split_sentences};

/// One unit of source text submitted as a single translation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Trimmed chunk text, never empty
    pub text: String,
    /// Sentence segmentation of `text`
    pub sentences: Vec<String>,
}

impl Chunk {
    /// Build a chunk from raw text; `None` when nothing but whitespace remains.
    pub fn from_text(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            text: trimmed.to_string(),
            sentences: split_sentences(trimmed),
        })
    }

    /// Length of the chunk text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Chunking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// Nominal maximum chunk size in characters (>= 1)
    pub max_chars: usize,
    /// Extra characters tolerated to finish a chunk on a line boundary
    pub overflow_chars: usize,
    /// Buffers shorter than this are flushed as-is instead of searching for a cut
    pub min_chunk_chars: usize,
    /// Sentences repeated at the start of the next sub-chunk of an oversized line
    pub overlap_sentences: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_chars: 3000,
            overflow_chars: 200,
            min_chunk_chars: 300,
            overlap_sentences: 2,
        }
    }
}

impl ChunkerConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), ChunkingError> {
        if self.max_chars == 0 {
            return Err(ChunkingError::InvalidConfig(
                "max_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Splits documents into [`Chunk`]s according to a validated [`ChunkerConfig`].
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Create a chunker, rejecting unusable parameters.
    pub fn new(config: ChunkerConfig) -> Result<Self, ChunkingError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The parameters this chunker was built with.
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Split `text` into an ordered chunk sequence.
    ///
    /// Empty or whitespace-only input yields no chunks. The function is pure:
    /// the same text always produces the same chunks.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        text.split_inclusive('\n')
            .fold(Accumulator::new(self.config), Accumulator::push_line)
            .finish()
    }
}

/// Convenience wrapper: validate `config` and chunk `text` in one call.
pub fn chunk_text(text: &str, config: ChunkerConfig) -> Result<Vec<Chunk>, ChunkingError> {
    Ok(Chunker::new(config)?.chunk(text))
}

/// Fold state for [`Chunker::chunk`]; never escapes the function.
struct Accumulator {
    config: ChunkerConfig,
    chunks: Vec<Chunk>,
    buffer: String,
    buffer_chars: usize,
}

impl Accumulator {
    fn new(config: ChunkerConfig) -> Self {
        Self {
            config,
            chunks: Vec::new(),
            buffer: String::new(),
            buffer_chars: 0,
        }
    }

    fn push_line(mut self, line: &str) -> Self {
        let line_chars = line.chars().count();
        let max = self.config.max_chars;
        let tolerance = max + self.config.overflow_chars;

        // Every pass either consumes the line or strictly shrinks the buffer.
        loop {
            let combined = self.buffer_chars + line_chars;

            if combined <= max {
                self.append(line, line_chars);
                return self;
            }

            if combined <= tolerance {
                self.append(line, line_chars);
                self.flush();
                return self;
            }

            if self.buffer.is_empty() {
                self.split_oversized_line(line);
                return self;
            }

            if self.buffer_chars < self.config.min_chunk_chars {
                // Undersized buffers go out as-is, never merged with the line
                self.flush();
            } else if let Some(cut) = self.find_line_cut() {
                self.cut_buffer_at(cut);
            } else if self.buffer_chars >= max {
                self.cut_buffer_at(max);
            } else {
                self.flush();
            }
        }
    }

    fn finish(mut self) -> Vec<Chunk> {
        self.flush();
        self.chunks
    }

    fn append(&mut self, line: &str, line_chars: usize) {
        self.buffer.push_str(line);
        self.buffer_chars += line_chars;
    }

    fn flush(&mut self) {
        let buffer = std::mem::take(&mut self.buffer);
        self.buffer_chars = 0;
        self.emit(&buffer);
    }

    fn emit(&mut self, text: &str) {
        if let Some(chunk) = Chunk::from_text(text) {
            self.chunks.push(chunk);
        }
    }

    /// Nearest line boundary at or before `max_chars`, no further back than
    /// `max_chars - overflow_chars`. Returned as a character offset.
    fn find_line_cut(&self) -> Option<usize> {
        let lower = self.config.max_chars.saturating_sub(self.config.overflow_chars);
        if self.buffer_chars < lower {
            return None;
        }

        let chars: Vec<char> = self.buffer.chars().collect();
        let upper = chars.len().min(self.config.max_chars);
        (lower.max(1)..=upper)
            .rev()
            .find(|&pos| chars[pos - 1] == '\n')
    }

    /// Flush the first `cut` characters and keep the rest buffered.
    fn cut_buffer_at(&mut self, cut: usize) {
        let byte = char_to_byte(&self.buffer, cut);
        let tail = self.buffer.split_off(byte);
        self.flush();
        self.buffer_chars = tail.chars().count();
        self.buffer = tail;
    }

    /// Sub-split a single line that exceeds the tolerance on its own.
    ///
    /// Sentences are packed while the slice they span stays within
    /// `max_chars`. A new sub-chunk is seeded with up to `overlap_sentences`
    /// trailing sentences of the previous one, as long as they fit.
    fn split_oversized_line(&mut self, line: &str) {
        let max = self.config.max_chars;
        let overlap = self.config.overlap_sentences;
        let mut current: Vec<Range<usize>> = Vec::new();
        let width = |from: usize, to: usize| line[from..to].chars().count();

        for span in sentence_spans(line) {
            if width(span.start, span.end) > max {
                // No boundary inside this sentence: forced flushes of exactly `max_chars`
                self.emit_spans(line, &current);
                current.clear();
                for piece in hard_split(&line[span], max) {
                    self.emit(piece);
                }
                continue;
            }

            let fits = current
                .first()
                .is_none_or(|first| width(first.start, span.end) <= max);
            if fits {
                current.push(span);
                continue;
            }

            self.emit_spans(line, &current);
            // Never carry the whole previous sub-chunk over
            let keep = overlap.min(current.len().saturating_sub(1));
            current.drain(..current.len() - keep);
            while current
                .first()
                .is_some_and(|first| width(first.start, span.end) > max)
            {
                current.remove(0);
            }
            current.push(span);
        }

        self.emit_spans(line, &current);
    }

    fn emit_spans(&mut self, line: &str, spans: &[Range<usize>]) {
        if let (Some(first), Some(last)) = (spans.first(), spans.last()) {
            self.emit(&line[first.start..last.end]);
        }
    }
}

/// Byte offset of the `index`-th character, or the string length past the end.
fn char_to_byte(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Cut `text` into consecutive pieces of at most `max_chars` characters.
fn hard_split(text: &str, max_chars: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let byte = char_to_byte(rest, max_chars);
        let (head, tail) = rest.split_at(byte);
        pieces.push(head);
        rest = tail;
    }
    pieces
}
