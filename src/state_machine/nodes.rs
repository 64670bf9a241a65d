//! Node handlers
//!
//! Each handler reads a `SessionState` and returns its successor with exactly
//! one assistant message appended. The chat node is split in two: the prompt
//! is built here, the reply is folded in once the collaborator answers.

use super::state::{Message, SessionState, DEFAULT_NAME};

/// Build the greeting reply for `name`
pub fn greeting_message(name: &str) -> String {
    format!("Hello {name}! Nice to meet you. How can I help you today?")
}

/// Build the terminal goodbye message
pub fn goodbye_message(name: &str, greeting_count: u32) -> String {
    format!(
        "Goodbye {name}! It was nice chatting with you. We exchanged {greeting_count} greetings!"
    )
}

/// Pull a name out of a self-introduction.
///
/// Only "my name is X" and "i am X" are recognised, X being the single
/// whitespace-separated token after the first standalone "is" / "am". Any
/// miss yields the placeholder.
pub fn extract_name(text: &str) -> String {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    let marker = if lowered.contains("my name is") {
        "is"
    } else if lowered.contains("i am") {
        "am"
    } else {
        return DEFAULT_NAME.to_string();
    };

    words
        .iter()
        .position(|w| *w == marker)
        .and_then(|idx| words.get(idx + 1))
        .map_or_else(|| DEFAULT_NAME.to_string(), |word| capitalize(word))
}

/// Title-case the first character, leave the rest as is
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = titlecase(first);
            out.extend(chars);
            out
        }
        None => String::new(),
    }
}

/// Title case of a single character.
///
/// Differs from `to_uppercase` for the Latin digraphs, which have a dedicated
/// title form, and for characters that uppercase to several letters, where
/// only the first stays upper case ("ß" becomes "Ss", not "SS").
fn titlecase(c: char) -> String {
    match c {
        '\u{01C4}'..='\u{01C6}' => '\u{01C5}'.to_string(),
        '\u{01C7}'..='\u{01C9}' => '\u{01C8}'.to_string(),
        '\u{01CA}'..='\u{01CC}' => '\u{01CB}'.to_string(),
        '\u{01F1}'..='\u{01F3}' => '\u{01F2}'.to_string(),
        _ => {
            let mut upper = c.to_uppercase();
            let mut out = String::new();
            out.extend(upper.next());
            out.extend(upper.flat_map(char::to_lowercase));
            out
        }
    }
}

/// Greeting node: remember the user's name and say hello
pub fn handle_greeting(state: &SessionState) -> SessionState {
    let name = extract_name(state.last_content());
    let mut next = state.with_message(Message::assistant(greeting_message(&name)));
    next.extracted_name = Some(name);
    next.greeting_count += 1;
    next
}

/// Goodbye node: report the greeting tally and close
pub fn handle_goodbye(state: &SessionState) -> SessionState {
    let text = goodbye_message(state.display_name(), state.greeting_count);
    state.with_message(Message::assistant(text))
}

/// Prompt sent to the language model for a chat turn
pub fn chat_prompt(state: &SessionState) -> String {
    let context = format!(
        "You are chatting with {}. Be friendly and helpful.",
        state.display_name()
    );
    format!(
        "Context: {context}\n\nUser message: {}",
        state.last_content()
    )
}

/// Chat node, second half: append the model's reply
pub fn handle_chat_reply(state: &SessionState, reply: impl Into<String>) -> SessionState {
    state.with_message(Message::assistant(reply))
}
