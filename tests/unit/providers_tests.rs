/*!
 * Tests for provider implementations
 */

use chunktrans::errors::ProviderError;
use chunktrans::providers::Provider;
use chunktrans::providers::mock::{MockProvider, MockReply};
use chunktrans::providers::openai::{ChatMessage, OpenAI, OpenAIRequest, OpenAIResponse};

fn request(text: &str) -> OpenAIRequest {
    OpenAIRequest::new("test-model", vec![ChatMessage::system("sys"), ChatMessage::user(text)])
}

#[tokio::test]
async fn test_mockProvider_working_shouldEchoUserMessage() {
    let provider = MockProvider::working();

    let response = provider.complete(request("Hello")).await.unwrap();

    assert_eq!(MockProvider::extract_text(&response), "[TRANSLATED] Hello");
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_mockProvider_scripted_shouldReplayInOrderThenFail() {
    let provider = MockProvider::scripted(vec![
        MockReply::Text("one".to_string()),
        MockReply::Status(429),
    ]);

    let first = provider.complete(request("a")).await.unwrap();
    assert_eq!(MockProvider::extract_text(&first), "one");

    let second = provider.complete(request("b")).await.unwrap_err();
    assert!(matches!(second, ProviderError::ApiError { status_code: 429, .. }));

    let third = provider.complete(request("c")).await.unwrap_err();
    assert!(matches!(third, ProviderError::ApiError { status_code: 500, .. }));
}

#[tokio::test]
async fn test_mockProvider_intermittent_shouldFailEveryNthRequest() {
    let provider = MockProvider::intermittent(2);

    assert!(provider.complete(request("1")).await.is_ok());
    assert!(provider.complete(request("2")).await.is_err());
    assert!(provider.complete(request("3")).await.is_ok());
}

#[tokio::test]
async fn test_mockProvider_clones_shouldShareRequestLog() {
    let provider = MockProvider::working();
    let observer = provider.clone();

    provider.complete(request("shared")).await.unwrap();

    let requests = observer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].messages[1].content, "shared");
}

#[tokio::test]
async fn test_openAI_unreachableEndpoint_shouldReturnNetworkError() {
    // Port 9 (discard) on localhost is expected to refuse connections
    let provider = OpenAI::new("http://127.0.0.1:9/v1", "sk-test", 2);

    let error = provider.complete(request("x")).await.unwrap_err();

    assert!(matches!(error, ProviderError::NetworkError(_)));
}

#[test]
fn test_openAIResponse_fromContent_shouldExtractSameText() {
    let response = OpenAIResponse::from_content("Bonjour");
    assert_eq!(OpenAI::extract_text(&response), "Bonjour");
}
