//! Turn classification
//!
//! Maps the latest message onto the node that should handle it.

use super::state::{Node, SessionState};
use serde::{Deserialize, Serialize};

/// Substrings that mark a greeting (only when "name" also appears)
pub const GREETING_KEYWORDS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];

/// Substrings that end the conversation
pub const GOODBYE_KEYWORDS: &[&str] = &["bye", "goodbye", "see you", "farewell", "quit", "exit"];

/// Classification result for one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Chat,
    Goodbye,
}

impl Intent {
    /// Node the router dispatches this intent to
    pub fn node(self) -> Node {
        match self {
            Intent::Greeting => Node::Greeting,
            Intent::Chat => Node::Chat,
            Intent::Goodbye => Node::Goodbye,
        }
    }
}

/// Classify the last message of `state`.
///
/// The greeting test runs first, so text that matches both keyword sets is a
/// greeting.
pub fn classify(state: &SessionState) -> Intent {
    let Some(last) = state.last_message() else {
        return Intent::Greeting;
    };
    classify_text(&last.content)
}

/// Classify raw message text
pub fn classify_text(text: &str) -> Intent {
    let lowered = text.to_lowercase();

    if contains_any(&lowered, GREETING_KEYWORDS) && lowered.contains("name") {
        return Intent::Greeting;
    }

    if contains_any(&lowered, GOODBYE_KEYWORDS) {
        return Intent::Goodbye;
    }

    Intent::Chat
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
