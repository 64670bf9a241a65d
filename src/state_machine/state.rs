//! Session state types

use serde::{Deserialize, Serialize};

/// Placeholder used whenever no name is known
pub const DEFAULT_NAME: &str = "friend";

// ============================================================================
// Messages
// ============================================================================

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the message log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ============================================================================
// Session State
// ============================================================================

/// Everything the router knows about one conversation.
///
/// Values are never edited in place: every handler takes a reference and
/// returns the successor, so a failed turn leaves the previous value intact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub extracted_name: Option<String>,
    #[serde(default)]
    pub greeting_count: u32,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successor state with `message` appended
    #[must_use]
    pub fn with_message(&self, message: Message) -> Self {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.extend(self.messages.iter().cloned());
        messages.push(message);
        Self {
            messages,
            extracted_name: self.extracted_name.clone(),
            greeting_count: self.greeting_count,
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Content of the last message, empty when the log is empty
    pub fn last_content(&self) -> &str {
        self.last_message().map_or("", |m| m.content.as_str())
    }

    /// Name to address the user by
    pub fn display_name(&self) -> &str {
        self.extracted_name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Whether the last message is from the user and still unanswered
    pub fn has_pending_user_message(&self) -> bool {
        matches!(self.last_message(), Some(m) if m.role == Role::User)
    }

    #[cfg(test)]
    pub fn assistant_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role == Role::Assistant)
    }
}

// ============================================================================
// Graph Nodes
// ============================================================================

/// Nodes of the routing graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Dispatch pseudostate, never handles a message itself
    #[allow(dead_code)] // Classification never lands here
    Router,
    Greeting,
    Chat,
    /// Terminal node
    Goodbye,
}

impl Node {
    pub fn name(self) -> &'static str {
        match self {
            Node::Router => "router",
            Node::Greeting => "greeting",
            Node::Chat => "chat",
            Node::Goodbye => "goodbye",
        }
    }

    /// Where control goes once this node has handled a turn.
    /// `None` means END.
    pub fn successor(self) -> Option<Node> {
        match self {
            Node::Goodbye => None,
            Node::Router | Node::Greeting | Node::Chat => Some(Node::Router),
        }
    }

    pub fn is_terminal(self) -> bool {
        self.successor().is_none()
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Router phase
// ============================================================================

/// Where the router is between events
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouterPhase {
    /// Waiting for the next user message
    #[default]
    Idle,

    /// Chat node dispatched, collaborator call in flight
    AwaitingCompletion { prompt: String },

    /// Goodbye node ran; the session accepts nothing further
    Ended,
}

impl RouterPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RouterPhase::Ended)
    }
}
