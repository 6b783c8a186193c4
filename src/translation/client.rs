/*!
 * Translation client: one chat request with bounded retries.
 */

use std::sync::Arc;

use crate::errors::TranslationError;
use crate::providers::Provider;
use crate::providers::openai::{ChatMessage, OpenAIRequest, OpenAIResponse};

use super::retry::{RetryError, RetryPolicy, Sleeper, TokioSleeper};

/// Sends chat requests through a provider and extracts the reply text.
pub struct TranslationClient<P> {
    provider: P,
    model: String,
    max_tokens: Option<u32>,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl<P> TranslationClient<P>
where
    P: Provider<Request = OpenAIRequest, Response = OpenAIResponse>,
{
    /// Create a client with the default retry policy and a real timer.
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: None,
            retry: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Send `messages` and return the first choice's content verbatim.
    ///
    /// Fails with [`TranslationError::Failed`] once every attempt allowed by
    /// the retry policy has failed; the error wraps the last cause.
    pub async fn translate(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, TranslationError> {
        let provider = &self.provider;
        let response = self
            .retry
            .run(self.sleeper.as_ref(), |_| {
                let request = OpenAIRequest::new(self.model.clone(), messages.to_vec())
                    .temperature(temperature)
                    .max_tokens(self.max_tokens);
                provider.complete(request)
            })
            .await
            .map_err(|RetryError { attempts, last_error }| TranslationError::Failed {
                attempts,
                source: last_error,
            })?;

        Ok(P::extract_text(&response))
    }
}
