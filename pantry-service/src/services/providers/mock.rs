//! Scripted provider for tests and offline runs.

use super::{GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Returned when no reply has been scripted.
pub const DEFAULT_RECIPE_JSON: &str = r#"{
  "ingredients": ["Egg", "Milk"],
  "title": "Mock Scrambled Eggs",
  "instructions": "Whisk the eggs with the milk.\nCook gently, stirring, until just set."
}"#;

/// One scripted outcome of a `generate` call.
pub enum MockReply {
    Text(String),
    /// The model answered with no text at all.
    Empty,
    Error(ProviderError),
}

/// Mock text provider. Replies are consumed in order; once exhausted every
/// call returns [`DEFAULT_RECIPE_JSON`].
pub struct MockTextProvider {
    replies: Mutex<VecDeque<MockReply>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<(String, GenerationParams)>>,
}

impl Default for MockTextProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTextProvider {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        let provider = Self::new();
        provider
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(replies);
        provider
    }

    /// Number of `generate` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompt and parameters of the most recent `generate` call.
    pub fn last_request(&self) -> Option<(String, GenerationParams)> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) =
            Some((prompt.to_string(), params.clone()));

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        let text = match reply {
            Some(MockReply::Text(text)) => Some(text),
            Some(MockReply::Empty) => None,
            Some(MockReply::Error(e)) => return Err(e),
            None => Some(DEFAULT_RECIPE_JSON.to_string()),
        };

        Ok(ProviderResponse {
            text,
            input_tokens: prompt.len() as i32 / 4,
            output_tokens: 10,
        })
    }
}
