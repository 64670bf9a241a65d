//! Common types for LLM interactions

/// LLM request: one user prompt, no history
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl LlmRequest {
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: None,
            temperature: None,
        }
    }
}

/// LLM response
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    pub text: String,
    pub end_turn: bool,
    pub usage: Usage,
}

#[cfg(test)]
impl LlmResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            end_turn: true,
            usage: Usage::default(),
        }
    }
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
