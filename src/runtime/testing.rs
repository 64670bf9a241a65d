//! Mock implementations for testing
//!
//! These mocks enable session testing without real I/O.

use super::traits::LlmClient;
use crate::llm::LlmError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Mock LLM Client
// ============================================================================

/// Mock LLM client that returns queued replies
pub struct MockLlmClient {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    model_id: String,
    /// Record of all prompts received
    pub prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
    }

    /// Queue an error
    pub fn queue_error(&self, error: LlmError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded prompts
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new("mock-model")
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock reply queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
