//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::llm::{LlmConfig, LlmError, LlmRequest, LlmService};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// The language model collaborator as the chat node sees it
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete a single prompt
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<T: LlmClient + ?Sized> LlmClient for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).complete(prompt).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter to use an `LlmService` as `LlmClient`
pub struct ServiceLlmClient {
    service: Arc<dyn LlmService>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    timeout: Duration,
}

impl ServiceLlmClient {
    pub fn new(service: Arc<dyn LlmService>, config: &LlmConfig) -> Self {
        Self {
            service,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl LlmClient for ServiceLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let mut request = LlmRequest::from_prompt(prompt);
        request.max_tokens = self.max_tokens;
        request.temperature = self.temperature;

        match tokio::time::timeout(self.timeout, self.service.complete(&request)).await {
            Ok(result) => result.map(|response| response.text),
            Err(_) => Err(LlmError::network(format!(
                "LLM request timed out after {:?}",
                self.timeout
            ))),
        }
    }

    fn model_id(&self) -> &str {
        self.service.model_id()
    }
}
