//! Property-based tests for the router
//!
//! These tests verify key invariants hold across all possible inputs.

use super::intent::{classify_text, GOODBYE_KEYWORDS, GREETING_KEYWORDS};
use super::nodes::handle_greeting;
use super::state::*;
use super::transition::*;
use super::*;
use crate::llm::{LlmError, LlmErrorKind};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_greeting_keyword() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(GREETING_KEYWORDS)
}

fn arb_goodbye_keyword() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(GOODBYE_KEYWORDS)
}

/// Filler that can never spell a keyword or "name"
fn arb_filler() -> impl Strategy<Value = String> {
    "[0-9 ]{0,10}"
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("hello, my name is Bob".to_string()),
        Just("hi there, I am alice".to_string()),
        Just("what's 2+2".to_string()),
        Just("bye".to_string()),
        (arb_greeting_keyword(), arb_filler())
            .prop_map(|(kw, filler)| format!("{kw} {filler} my name is kim")),
        "[a-zA-Z0-9 ,.!?']{0,40}",
    ]
}

fn arb_error_kind() -> impl Strategy<Value = LlmErrorKind> {
    prop_oneof![
        Just(LlmErrorKind::Network),
        Just(LlmErrorKind::RateLimit),
        Just(LlmErrorKind::ServerError),
        Just(LlmErrorKind::Auth),
        Just(LlmErrorKind::InvalidRequest),
        Just(LlmErrorKind::MalformedResponse),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => arb_text().prop_map(|text| Event::UserMessage { text }),
        1 => Just(Event::Retry),
        2 => "[a-zA-Z ]{1,30}".prop_map(|reply| Event::CompletionReceived { reply }),
        1 => ("[a-zA-Z ]{1,30}", arb_error_kind()).prop_map(|(message, kind)| {
            Event::CompletionFailed {
                error: LlmError::new(kind, message),
            }
        }),
    ]
}

fn arb_session_state() -> impl Strategy<Value = SessionState> {
    (
        proptest::collection::vec(arb_text(), 0..5),
        proptest::option::of("[A-Z][a-z]{1,8}"),
        0u32..10,
    )
        .prop_map(|(texts, extracted_name, greeting_count)| SessionState {
            messages: texts.into_iter().map(Message::user).collect(),
            extracted_name,
            greeting_count,
        })
}

// ============================================================================
// Validity Checkers
// ============================================================================

fn effects_are_valid(effects: &[Effect], new_phase: &RouterPhase) -> bool {
    let requests = effects
        .iter()
        .any(|e| matches!(e, Effect::RequestCompletion { .. }));
    let ends = effects.iter().any(|e| matches!(e, Effect::EndSession));

    if requests && !matches!(new_phase, RouterPhase::AwaitingCompletion { .. }) {
        return false;
    }
    if ends != new_phase.is_terminal() {
        return false;
    }
    true
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // The message log only ever grows, and the greeting counter tracks
    // greeting-node dispatches exactly
    #[test]
    fn prop_log_monotonic_and_count_exact(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = SessionState::new();
        let mut phase = RouterPhase::Idle;
        let mut greetings = 0u32;

        for event in events {
            let before = state.messages.len();
            if let Ok(result) = transition(&state, &phase, event) {
                prop_assert!(
                    effects_are_valid(&result.effects, &result.new_phase),
                    "Invalid effects for phase {:?}: {:?}",
                    result.new_phase,
                    result.effects
                );
                if result.node == Node::Greeting {
                    greetings += 1;
                }
                state = result.new_state;
                phase = result.new_phase;
            }
            prop_assert!(state.messages.len() >= before);
            prop_assert_eq!(state.greeting_count, greetings);
        }
    }

    // Nothing is accepted once the goodbye node has run
    #[test]
    fn prop_ended_is_absorbing(state in arb_session_state(), event in arb_event()) {
        let result = transition(&state, &RouterPhase::Ended, event);
        prop_assert_eq!(result.unwrap_err(), TransitionError::SessionEnded);
    }

    #[test]
    fn prop_goodbye_keyword_without_greeting_is_goodbye(
        kw in arb_goodbye_keyword(),
        before in arb_filler(),
        after in arb_filler(),
    ) {
        let text = format!("{before}{kw}{after}");
        prop_assert_eq!(classify_text(&text), Intent::Goodbye);
    }

    #[test]
    fn prop_greeting_wins_tie_break(
        greet in arb_greeting_keyword(),
        bye in arb_goodbye_keyword(),
        filler in arb_filler(),
        goodbye_first in any::<bool>(),
    ) {
        let text = if goodbye_first {
            format!("{bye} {filler} {greet}, my name is Sam")
        } else {
            format!("{greet}, my name is Sam {filler} {bye}")
        };
        prop_assert_eq!(classify_text(&text), Intent::Greeting);
    }

    #[test]
    fn prop_greeting_adds_one_message_and_one_count(state in arb_session_state()) {
        let next = handle_greeting(&state);
        prop_assert_eq!(next.messages.len(), state.messages.len() + 1);
        prop_assert_eq!(next.greeting_count, state.greeting_count + 1);
        prop_assert_eq!(&next.messages[..state.messages.len()], &state.messages[..]);
        prop_assert_eq!(next.last_message().map(|m| m.role), Some(Role::Assistant));
    }

    // A failed completion leaves the session exactly as it was
    #[test]
    fn prop_failed_completion_is_all_or_nothing(
        state in arb_session_state(),
        kind in arb_error_kind(),
    ) {
        let phase = RouterPhase::AwaitingCompletion { prompt: "p".to_string() };
        let error = LlmError::new(kind, "boom");
        let event = Event::CompletionFailed { error: error.clone() };
        let result = transition(&state, &phase, event).unwrap();
        prop_assert_eq!(result.new_state, state);
        prop_assert_eq!(result.new_phase, RouterPhase::Idle);
        prop_assert_eq!(result.effects, vec![Effect::TurnFailed { error }]);
    }
}
