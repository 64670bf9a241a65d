//! Events that can occur in a session

use crate::llm::LlmError;

/// Events that trigger router transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserMessage { text: String },
    /// Re-dispatch the unanswered user message after a failed turn
    Retry,

    // Collaborator events
    CompletionReceived { reply: String },
    CompletionFailed { error: LlmError },
}

impl Event {
    pub fn user_message(text: impl Into<String>) -> Self {
        Event::UserMessage { text: text.into() }
    }
}
