//! Runtime for executing conversations
//!
//! A session is driven turn by turn; the only suspension point is the chat
//! node's call into the language model.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{Conversation, TurnError, TurnOutcome};
pub use traits::*;

/// Type alias for the production conversation
pub type ProductionConversation = Conversation<ServiceLlmClient>;
