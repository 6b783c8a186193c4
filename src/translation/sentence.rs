/*!
 * Sentence segmentation.
 *
 * Splits a block of text into sentences on CJK and Latin terminal
 * punctuation, falling back to one sentence per non-empty line when the
 * text contains no terminator at all.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// CJK terminators close a sentence on their own; Latin ones (including
/// one-to-three-dot ellipses) need trailing whitespace or a line end so that
/// decimals and abbreviations like "3.14" stay intact.
///
/// Requiring whitespace after CJK terminators as well would leave unspaced
/// CJK prose as one sentence per line, so overlap context taken from CJK
/// output would carry whole paragraphs instead of the last sentences.
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)[。！？]\s*|(?:[!?]|\.{1,3})(?:\s+|$)")
        .expect("sentence terminator pattern is valid")
});

/// Split `text` into trimmed, non-empty sentences in document order.
///
/// Each terminator match closes a sentence spanning from the end of the
/// previous match to the end of this one. A trailing remainder becomes the
/// final sentence. If no terminator is found the text is split on line
/// breaks instead.
pub fn split_sentences(text: &str) -> Vec<String> {
    sentence_spans(text)
        .into_iter()
        .map(|span| text[span].to_string())
        .collect()
}

/// Byte ranges of the sentences of `text`, already trimmed.
///
/// Same segmentation as [`split_sentences`], but callers can slice the
/// original text and keep the whitespace between sentences intact.
pub fn sentence_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut last = 0;

    for m in SENTENCE_END.find_iter(text) {
        push_trimmed(&mut spans, text, last..m.end());
        last = m.end();
    }

    if last == 0 {
        // No terminator matched
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            push_trimmed(&mut spans, text, offset..offset + line.len());
            offset += line.len();
        }
        return spans;
    }

    if last < text.len() {
        push_trimmed(&mut spans, text, last..text.len());
    }

    spans
}

/// Return the last `count` sentences of `text`, concatenated without separator.
pub fn trailing_sentences(text: &str, count: usize) -> String {
    if count == 0 {
        return String::new();
    }
    let sentences = split_sentences(text);
    let start = sentences.len().saturating_sub(count);
    sentences[start..].concat()
}

fn push_trimmed(spans: &mut Vec<Range<usize>>, text: &str, span: Range<usize>) {
    let slice = &text[span.clone()];
    let start = span.start + (slice.len() - slice.trim_start().len());
    let end = span.end - (slice.len() - slice.trim_end().len());
    if start < end {
        spans.push(start..end);
    }
}
