//! Session executor
//!
//! Owns one conversation, runs the pure transition function and performs the
//! effects it asks for.

use super::traits::LlmClient;
use crate::llm::LlmError;
use crate::state_machine::{
    transition, Effect, Event, Node, RouterPhase, SessionState, TransitionError,
};
use thiserror::Error;

/// What one turn produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Node that handled the turn
    pub node: Node,
    /// Assistant message appended this turn
    pub reply: String,
    /// True once the goodbye node has run
    pub ended: bool,
}

/// Why a turn did not produce a reply
#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Language model request failed: {0}")]
    Llm(#[from] LlmError),
}

impl TurnError {
    /// Whether re-submitting the same turn might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            TurnError::Llm(e) => e.kind.is_retryable(),
            TurnError::Transition(_) => false,
        }
    }
}

/// One conversation from first message to goodbye
pub struct Conversation<L: LlmClient> {
    session_id: String,
    state: SessionState,
    phase: RouterPhase,
    llm: L,
}

impl<L: LlmClient> Conversation<L> {
    pub fn new(llm: L) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), llm)
    }

    pub fn with_id(session_id: impl Into<String>, llm: L) -> Self {
        Self {
            session_id: session_id.into(),
            state: SessionState::new(),
            phase: RouterPhase::Idle,
            llm,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_ended(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Append a user message and run one classify + dispatch cycle
    pub async fn submit(&mut self, text: impl Into<String>) -> Result<TurnOutcome, TurnError> {
        self.drive(Event::user_message(text)).await
    }

    /// Re-dispatch the last user message after a failed turn
    pub async fn retry(&mut self) -> Result<TurnOutcome, TurnError> {
        self.drive(Event::Retry).await
    }

    /// Run an event to completion.
    ///
    /// Works on local copies and commits once the turn has settled, so a
    /// rejected event leaves the session untouched and a failed completion
    /// leaves only the user message behind.
    async fn drive(&mut self, event: Event) -> Result<TurnOutcome, TurnError> {
        let mut state = self.state.clone();
        let mut phase = self.phase.clone();
        let mut pending = Some(event);
        let mut outcome: Option<TurnOutcome> = None;
        let mut failure: Option<LlmError> = None;

        while let Some(event) = pending.take() {
            let result = transition(&state, &phase, event)?;
            tracing::debug!(
                session_id = %self.session_id,
                node = %result.node,
                phase = ?result.new_phase,
                "Router transition"
            );
            state = result.new_state;
            phase = result.new_phase;

            for effect in result.effects {
                match effect {
                    Effect::RequestCompletion { prompt } => {
                        pending = Some(match self.llm.complete(&prompt).await {
                            Ok(reply) => Event::CompletionReceived { reply },
                            Err(error) => Event::CompletionFailed { error },
                        });
                    }
                    Effect::TurnFailed { error } => {
                        tracing::warn!(
                            session_id = %self.session_id,
                            error = %error,
                            kind = ?error.kind,
                            retryable = error.kind.is_retryable(),
                            "Chat turn failed"
                        );
                        failure = Some(error);
                    }
                    Effect::Reply { node, content } => {
                        outcome = Some(TurnOutcome {
                            node,
                            reply: content,
                            ended: false,
                        });
                    }
                    Effect::EndSession => {
                        if let Some(outcome) = outcome.as_mut() {
                            outcome.ended = true;
                        }
                        tracing::info!(
                            session_id = %self.session_id,
                            messages = state.messages.len(),
                            greeting_count = state.greeting_count,
                            "Session ended"
                        );
                    }
                }
            }
        }

        self.state = state;
        self.phase = phase;

        if let Some(e) = failure {
            return Err(e.into());
        }

        outcome.ok_or_else(|| {
            TransitionError::InvalidTransition("turn finished without a reply".to_string()).into()
        })
    }
}
