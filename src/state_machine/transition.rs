//! Pure router transition function
//!
//! Given the same session, phase and event this always produces the same
//! result. The only I/O a turn needs (the chat completion) is requested as an
//! effect and fed back in as an event.

use super::intent::{classify, Intent};
use super::nodes::{chat_prompt, handle_chat_reply, handle_goodbye, handle_greeting};
use super::state::{Message, Node, RouterPhase, SessionState};
use super::{Effect, Event};
use thiserror::Error;

/// Result of a router transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub new_phase: RouterPhase,
    /// Node the router dispatched to
    pub node: Node,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState, phase: RouterPhase, node: Node) -> Self {
        Self {
            new_state: state,
            new_phase: phase,
            node,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Session has ended, start a new one")]
    SessionEnded,
    #[error("Still waiting for the language model to answer the previous message")]
    AwaitingCompletion,
    #[error("No unanswered user message to retry")]
    NothingToRetry,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
pub fn transition(
    state: &SessionState,
    phase: &RouterPhase,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (phase, event) {
        (RouterPhase::Ended, _) => Err(TransitionError::SessionEnded),

        // ============================================================
        // User input
        // ============================================================

        (RouterPhase::Idle, Event::UserMessage { text }) => {
            Ok(route(state.with_message(Message::user(text))))
        }

        (RouterPhase::Idle, Event::Retry) if state.has_pending_user_message() => {
            Ok(route(state.clone()))
        }

        (RouterPhase::Idle, Event::Retry) => Err(TransitionError::NothingToRetry),

        (RouterPhase::AwaitingCompletion { .. }, Event::UserMessage { .. } | Event::Retry) => {
            Err(TransitionError::AwaitingCompletion)
        }

        // ============================================================
        // Chat completion
        // ============================================================

        (RouterPhase::AwaitingCompletion { .. }, Event::CompletionReceived { reply }) => {
            let new_state = handle_chat_reply(state, reply.clone());
            Ok(TransitionResult::new(new_state, RouterPhase::Idle, Node::Chat)
                .with_effect(Effect::reply(Node::Chat, reply)))
        }

        // The user message stays as the last entry so the turn can be retried
        (RouterPhase::AwaitingCompletion { .. }, Event::CompletionFailed { error }) => Ok(
            TransitionResult::new(state.clone(), RouterPhase::Idle, Node::Chat)
                .with_effect(Effect::TurnFailed { error }),
        ),

        (
            RouterPhase::Idle,
            event @ (Event::CompletionReceived { .. } | Event::CompletionFailed { .. }),
        ) => Err(TransitionError::InvalidTransition(format!(
            "{event:?} without a pending completion"
        ))),
    }
}

/// Router pseudostate: classify the last message and run the matching node
fn route(state: SessionState) -> TransitionResult {
    let intent = classify(&state);
    let node = intent.node();

    let new_state = match intent {
        Intent::Chat => {
            let prompt = chat_prompt(&state);
            return TransitionResult::new(
                state,
                RouterPhase::AwaitingCompletion {
                    prompt: prompt.clone(),
                },
                node,
            )
            .with_effect(Effect::RequestCompletion { prompt });
        }
        Intent::Greeting => handle_greeting(&state),
        Intent::Goodbye => handle_goodbye(&state),
    };

    let reply = Effect::reply(node, new_state.last_content());
    if node.is_terminal() {
        TransitionResult::new(new_state, RouterPhase::Ended, node)
            .with_effect(reply)
            .with_effect(Effect::EndSession)
    } else {
        TransitionResult::new(new_state, RouterPhase::Idle, node).with_effect(reply)
    }
}
