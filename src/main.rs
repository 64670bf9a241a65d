//! Conversation router
//!
//! A greeting/chat/goodbye state machine over conversational turns, with a
//! hosted language model answering the chat turns.

mod llm;
mod repl;
mod runtime;
mod state_machine;

use llm::{LlmConfig, LlmService, LoggingService, OpenAIService};
use runtime::{LlmClient, ProductionConversation, ServiceLlmClient};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional .env file, real environment wins
    dotenv::dotenv().ok();

    // Initialize logging (stderr, so replies on stdout stay readable)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "convo_router=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = LlmConfig::from_env();
    if !config.has_api_key() {
        tracing::warn!("No LLM API key configured");
        println!("Please set your OPENAI_API_KEY environment variable.");
        return Ok(());
    }

    let service: Arc<dyn LlmService> = Arc::new(LoggingService::new(Arc::new(
        OpenAIService::from_config(&config)?,
    )));
    let llm = ServiceLlmClient::new(service, &config);
    tracing::info!(
        model = %llm.model_id(),
        base_url = %config.base_url,
        timeout_secs = config.timeout.as_secs(),
        "LLM client initialized"
    );

    let mut conversation = ProductionConversation::new(llm);
    tracing::info!(session_id = %conversation.session_id(), "Session started");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    repl::run(&mut conversation, stdin, tokio::io::stdout()).await?;

    tracing::info!(
        session_id = %conversation.session_id(),
        messages = conversation.state().messages.len(),
        ended = conversation.is_ended(),
        "Session closed"
    );

    Ok(())
}
