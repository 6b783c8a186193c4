/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock chat-completion provider that simulates
 * different behaviors without any network traffic:
 * - `MockProvider::working()` - Always succeeds, echoing the user message
 * - `MockProvider::scripted(..)` - Replays a fixed list of replies in order
 * - `MockProvider::intermittent(n)` - Fails every n-th request
 * - `MockProvider::failing()` - Always fails with an API error
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::providers::openai::{OpenAIRequest, OpenAIResponse};

/// One scripted reply
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Successful completion with this message content
    Text(String),
    /// Successful response with an arbitrary body
    Raw(OpenAIResponse),
    /// Endpoint failure with this status code
    Status(u16),
    /// Transport failure
    Network,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always succeeds, prefixing the last user message with `[TRANSLATED]`
    Working,
    /// Replays replies in order; requests past the end fail with 500
    Scripted(Vec<MockReply>),
    /// Fails every Nth request (1-based), echoes otherwise
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Every request received, shared between clones
    requests: Arc<Mutex<Vec<OpenAIRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock replaying the given replies in order
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        Self::new(MockBehavior::Scripted(replies))
    }

    /// Create a mock replying with the given texts in order
    pub fn replying<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::scripted(texts.into_iter().map(|t| MockReply::Text(t.into())).collect())
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every request received so far
    pub fn requests(&self) -> Vec<OpenAIRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn echo(request: &OpenAIRequest) -> OpenAIResponse {
        let source = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        OpenAIResponse::from_content(format!("[TRANSLATED] {}", source))
    }

    fn play(reply: &MockReply) -> Result<OpenAIResponse, ProviderError> {
        match reply {
            MockReply::Text(text) => Ok(OpenAIResponse::from_content(text.clone())),
            MockReply::Raw(response) => Ok(response.clone()),
            MockReply::Status(status_code) => Err(ProviderError::ApiError {
                status_code: *status_code,
                message: "Mock API error".to_string(),
            }),
            MockReply::Network => Err(ProviderError::NetworkError(
                "Mock connection refused".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = OpenAIRequest;
    type Response = OpenAIResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match &self.behavior {
            MockBehavior::Working => Ok(Self::echo(&request)),

            MockBehavior::Scripted(replies) => match replies.get(count) {
                Some(reply) => Self::play(reply),
                None => Err(ProviderError::ApiError {
                    status_code: 500,
                    message: "Mock script exhausted".to_string(),
                }),
            },

            MockBehavior::Intermittent { fail_every } => {
                if *fail_every > 0 && (count + 1) % fail_every == 0 {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: "Mock intermittent failure".to_string(),
                    })
                } else {
                    Ok(Self::echo(&request))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Mock provider always fails".to_string(),
            }),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        crate::providers::openai::OpenAI::extract_text(response)
    }
}
