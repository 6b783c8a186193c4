/*!
 * Integration tests for the chunking and translation pipeline
 *
 * These tests drive real chunker output through the sequential translator
 * with a scripted provider, so no network access is needed.
 */

use std::sync::Arc;
use std::time::Duration;

use chunktrans::errors::{ProviderError, TranslationError};
use chunktrans::providers::mock::{MockProvider, MockReply};
use chunktrans::translation::retry::RecordingSleeper;
use chunktrans::translation::{
    CancellationFlag, ChunkTranslator, Chunker, ChunkerConfig, ContextStrategy, PromptTemplate,
    RetryPolicy, TranslationClient, TranslationEvent,
};
use crate::common;

fn translator(provider: MockProvider, sleeper: Arc<RecordingSleeper>) -> ChunkTranslator<MockProvider> {
    let client = TranslationClient::new(provider, "test-model")
        .with_retry_policy(RetryPolicy::new(2, Duration::from_millis(1000)))
        .with_sleeper(sleeper);
    ChunkTranslator::new(client, "French")
}

fn small_chunker() -> Chunker {
    Chunker::new(ChunkerConfig {
        max_chars: 40,
        overflow_chars: 5,
        min_chunk_chars: 10,
        overlap_sentences: 2,
    })
    .unwrap()
}

#[tokio::test]
async fn test_pipeline_documentToTranslation_shouldPreserveChunkOrder() {
    common::init_logger();
    let text = "Alpha line of text here.\nBravo line of text here.\nCharlie line of text here.\n";
    let chunks = small_chunker().chunk(text);
    assert_eq!(chunks.len(), 3);

    let provider = MockProvider::working();
    let translator = translator(provider.clone(), Arc::new(RecordingSleeper::new()))
        .with_template(PromptTemplate::parse("{source}").unwrap())
        .with_strategy(ContextStrategy::None);

    let output = translator
        .translate_chunks(&chunks, &CancellationFlag::new(), |_| {})
        .await
        .unwrap();

    assert_eq!(
        output,
        "[TRANSLATED] Alpha line of text here.\n\n\
[TRANSLATED] Bravo line of text here.\n\n\
[TRANSLATED] Charlie line of text here."
    );
    assert_eq!(provider.request_count(), 3);
}

#[tokio::test]
async fn test_pipeline_requests_shouldCarrySystemPromptAndTargetLanguage() {
    let chunks = small_chunker().chunk("Only one short line.");
    let provider = MockProvider::replying(["Une seule ligne."]);
    let translator = translator(provider.clone(), Arc::new(RecordingSleeper::new()))
        .with_temperature(0.3);

    translator
        .translate_chunks(&chunks, &CancellationFlag::new(), |_| {})
        .await
        .unwrap();

    let request = &provider.requests()[0];
    assert_eq!(request.model, "test-model");
    assert_eq!(request.temperature, 0.3);
    assert_eq!(request.messages[0].role, "system");
    assert_eq!(request.messages[1].role, "user");
    assert!(request.messages[1].content.contains("French"));
    assert!(request.messages[1].content.contains("Only one short line."));
}

#[tokio::test]
async fn test_pipeline_defaultTemplate_shouldPassOverlapIntoNextRequest() {
    let chunks = small_chunker().chunk("First chunk text is here.\nSecond chunk text is here.\n");
    assert_eq!(chunks.len(), 2);
    let provider = MockProvider::replying(["Un. Deux. Trois.", "Quatre."]);
    let translator = translator(provider.clone(), Arc::new(RecordingSleeper::new()));

    translator
        .translate_chunks(&chunks, &CancellationFlag::new(), |_| {})
        .await
        .unwrap();

    let second_prompt = &provider.requests()[1].messages[1].content;
    assert!(second_prompt.contains("Deux.Trois."));
    assert!(!second_prompt.contains("Un."));
}

#[tokio::test]
async fn test_pipeline_transientFailure_shouldRetryWithBackoffAndSucceed() {
    let chunks = small_chunker().chunk("Single chunk.");
    let provider = MockProvider::scripted(vec![
        MockReply::Status(503),
        MockReply::Network,
        MockReply::Text("Traduit.".to_string()),
    ]);
    let sleeper = Arc::new(RecordingSleeper::new());
    let translator = translator(provider.clone(), sleeper.clone());

    let output = translator
        .translate_chunks(&chunks, &CancellationFlag::new(), |_| {})
        .await
        .unwrap();

    assert_eq!(output, "Traduit.");
    assert_eq!(provider.request_count(), 3);
    assert_eq!(
        sleeper.recorded(),
        vec![Duration::from_millis(1000), Duration::from_millis(2000)]
    );
}

#[tokio::test]
async fn test_pipeline_persistentFailure_shouldAbortAndReportChunk() {
    let text = "Alpha line of text here.\nBravo line of text here.\n";
    let chunks = small_chunker().chunk(text);
    let provider = MockProvider::scripted(vec![
        MockReply::Text("A".to_string()),
        MockReply::Network,
        MockReply::Network,
        MockReply::Network,
        MockReply::Text("never used".to_string()),
    ]);
    let translator = translator(provider.clone(), Arc::new(RecordingSleeper::new()));
    let mut events = Vec::new();

    let error = translator
        .translate_chunks(&chunks, &CancellationFlag::new(), |e| events.push(e))
        .await
        .unwrap_err();

    assert!(matches!(error, TranslationError::ChunkFailed { index: 2, total: 2, .. }));
    assert!(matches!(error.provider_cause(), Some(ProviderError::NetworkError(_))));
    assert_eq!(provider.request_count(), 4);
    assert!(events.contains(&TranslationEvent::Progress { current: 1, total: 2 }));
    assert!(!events.contains(&TranslationEvent::Progress { current: 2, total: 2 }));
    assert!(matches!(events.last(), Some(TranslationEvent::Error(_))));
}

#[tokio::test]
async fn test_pipeline_intermittentProvider_shouldCompleteWithinRetryBudget() {
    let text: String = (0..6).map(|i| format!("Line number {i} is here.\n")).collect();
    let chunks = small_chunker().chunk(&text);
    let provider = MockProvider::intermittent(3);
    let translator = translator(provider.clone(), Arc::new(RecordingSleeper::new()))
        .with_template(PromptTemplate::parse("{prev_summary} | {source}").unwrap())
        .with_strategy(ContextStrategy::IterativeSummary);

    let output = translator
        .translate_chunks(&chunks, &CancellationFlag::new(), |_| {})
        .await
        .unwrap();

    assert_eq!(output.split("\n\n").count(), chunks.len());
    assert!(provider.request_count() > chunks.len());
}
