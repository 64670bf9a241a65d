//! Conversation router state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod intent;
pub mod nodes;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use intent::{classify, Intent};
pub use state::{Message, Node, Role, RouterPhase, SessionState};
pub use transition::{transition, TransitionError, TransitionResult};
