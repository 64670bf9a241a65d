//! Effects produced by router transitions

use super::state::Node;
use crate::llm::LlmError;

/// Effects to be executed after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the language model collaborator for a completion
    RequestCompletion { prompt: String },

    /// Surface an assistant message to the caller
    Reply { node: Node, content: String },

    /// The goodbye node ran; tear the session down
    EndSession,

    /// The chat turn produced no reply; report the collaborator error
    TurnFailed { error: LlmError },
}

impl Effect {
    pub fn reply(node: Node, content: impl Into<String>) -> Self {
        Effect::Reply {
            node,
            content: content.into(),
        }
    }
}
