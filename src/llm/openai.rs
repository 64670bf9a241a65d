//! `OpenAI`-compatible chat completions provider

use super::config::LlmConfig;
use super::types::{LlmRequest, LlmResponse, Usage};
use super::{LlmError, LlmService};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Chat completions client for `OpenAI` and compatible gateways
pub struct OpenAIService {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAIService {
    pub fn new(api_key: impl Into<String>, config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: format!(
                "{}/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            model: config.model.clone(),
        })
    }

    /// Build from config; fails when no API key is configured
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .as_ref()
            .ok_or_else(|| LlmError::auth("OPENAI_API_KEY is not set"))?;
        Self::new(api_key.clone(), config)
    }

    fn translate_request(&self, request: &LlmRequest) -> OpenAIRequest {
        OpenAIRequest {
            model: self.model.clone(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: Some(request.prompt.clone()),
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        }
    }
}

/// Map a non-success HTTP response onto an error kind
fn classify_http_error(status: StatusCode, body: &str) -> LlmError {
    let Ok(error_resp) = serde_json::from_str::<OpenAIErrorResponse>(body) else {
        return match status.as_u16() {
            500..=599 => LlmError::server_error(format!("HTTP {status} error: {body}")),
            _ => LlmError::malformed(format!("HTTP {status} error: {body}")),
        };
    };

    let message = error_resp.error.message;
    match status.as_u16() {
        401 | 403 => LlmError::auth(format!("Authentication failed: {message}")),
        429 => LlmError::rate_limit(format!("Rate limit exceeded: {message}")),
        400 | 404 | 422 => LlmError::invalid_request(format!("Invalid request: {message}")),
        500..=599 => LlmError::server_error(format!("Server error: {message}")),
        _ => LlmError::malformed(format!("HTTP {status}: {message}")),
    }
}

fn normalize_response(body: &str) -> Result<LlmResponse, LlmError> {
    let resp: OpenAIResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::malformed(format!("Failed to parse response: {e} - body: {body}")))?;

    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::malformed("No choices in response"))?;

    let text = choice
        .message
        .content
        .filter(|text| !text.is_empty())
        .ok_or_else(|| LlmError::malformed("Response contained no text"))?;

    let usage = resp.usage.map_or_else(Usage::default, |u| Usage {
        input_tokens: u64::from(u.prompt_tokens),
        output_tokens: u64::from(u.completion_tokens),
    });

    Ok(LlmResponse {
        text,
        end_turn: choice.finish_reason.as_deref() == Some("stop"),
        usage,
    })
}

#[async_trait]
impl LlmService for OpenAIService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let openai_request = self.translate_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    LlmError::network(format!("Connection failed: {e}"))
                } else {
                    LlmError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(classify_http_error(status, &body));
        }

        normalize_response(&body)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(clippy::struct_field_names)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    message: String,
}
