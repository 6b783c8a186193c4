/*!
 * Tests for sentence splitting and chunking through the public API
 */

use chunktrans::translation::sentence::trailing_sentences;
use chunktrans::translation::{Chunker, ChunkerConfig, split_sentences};

fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[test]
fn test_splitSentences_mixedPunctuation_shouldSplitOnEachTerminator() {
    let sentences = split_sentences("Hello there! How are you? Fine... Thanks.");
    assert_eq!(sentences, vec!["Hello there!", "How are you?", "Fine...", "Thanks."]);
}

#[test]
fn test_splitSentences_chinese_shouldSplitWithoutWhitespace() {
    let sentences = split_sentences("今天天气很好。我们去公园吧！你去吗？");
    assert_eq!(sentences, vec!["今天天气很好。", "我们去公园吧！", "你去吗？"]);
}

#[test]
fn test_splitSentences_noTerminators_shouldFallBackToLines() {
    let sentences = split_sentences("first line\n\nsecond line\n");
    assert_eq!(sentences, vec!["first line", "second line"]);
}

#[test]
fn test_splitSentences_decimalNumber_shouldStayIntact() {
    let sentences = split_sentences("Pi is 3.14 roughly. Done.");
    assert_eq!(sentences, vec!["Pi is 3.14 roughly.", "Done."]);
}

#[test]
fn test_trailingSentences_moreRequestedThanAvailable_shouldReturnAll() {
    assert_eq!(trailing_sentences("Only one.", 3), "Only one.");
    assert_eq!(trailing_sentences("A. B.", 0), "");
}

#[test]
fn test_chunker_defaultConfig_largeDocument_shouldStayWithinTolerance() {
    let paragraph = "This paragraph is part of a long technical manual. \
It explains one feature in a handful of sentences. \
Each sentence ends with a period.\n\n";
    let text = paragraph.repeat(200);
    let chunker = Chunker::new(ChunkerConfig::default()).unwrap();

    let chunks = chunker.chunk(&text);

    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|c| c.char_len() <= 3200));
    assert!(chunks.iter().all(|c| !c.text.trim().is_empty()));
    let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(squash(&joined), squash(&text));
}

#[test]
fn test_chunker_chineseNovel_shouldCountCharactersNotBytes() {
    let line = "他走进房间，看见桌上放着一封信。".repeat(10);
    let text = format!("{line}\n").repeat(20);
    let config = ChunkerConfig {
        max_chars: 500,
        overflow_chars: 50,
        min_chunk_chars: 100,
        overlap_sentences: 0,
    };
    let chunker = Chunker::new(config).unwrap();

    let chunks = chunker.chunk(&text);

    assert!(chunks.iter().all(|c| c.char_len() <= 550));
    assert!(chunks.iter().all(|c| c.sentences.iter().all(|s| s.ends_with('。'))));
}

#[test]
fn test_chunker_config_shouldBeExposed() {
    let config = ChunkerConfig {
        max_chars: 10,
        ..ChunkerConfig::default()
    };
    let chunker = Chunker::new(config).unwrap();
    assert_eq!(chunker.config().max_chars, 10);
}
