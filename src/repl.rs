//! Interactive text front end
//!
//! Reads one line per turn and prints the assistant's reply. Blank lines are
//! skipped, except right after a retryable failure where an empty line
//! re-sends the unanswered message. The loop ends when the session reaches
//! goodbye or input closes.

use crate::runtime::{Conversation, LlmClient};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const BANNER: &str = "Conversation router is ready! Say hello and tell me your name!\n\
Type 'bye' to exit.\n\
--------------------------------------------------\n";

/// Run the read-eval-print loop until the session ends or input closes
pub async fn run<L, R, W>(
    conversation: &mut Conversation<L>,
    mut input: R,
    mut output: W,
) -> std::io::Result<()>
where
    L: LlmClient,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(BANNER.as_bytes()).await?;
    let mut buf = Vec::new();
    let mut can_retry = false;

    loop {
        output.write_all(b"\nYou: ").await?;
        output.flush().await?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            tracing::debug!(session_id = %conversation.session_id(), "Input closed");
            break;
        }

        // Undecodable bytes become U+FFFD rather than ending the session
        let line = String::from_utf8_lossy(&buf);
        let text = line.trim();

        let result = if text.is_empty() {
            if !can_retry {
                continue;
            }
            conversation.retry().await
        } else {
            conversation.submit(text).await
        };
        can_retry = false;

        match result {
            Ok(outcome) => {
                tracing::debug!(
                    session_id = %conversation.session_id(),
                    node = %outcome.node,
                    "Turn handled"
                );
                output
                    .write_all(format!("\nAI Agent: {}\n", outcome.reply).as_bytes())
                    .await?;
                if outcome.ended {
                    break;
                }
            }
            Err(e) if e.is_retryable() => {
                can_retry = true;
                output
                    .write_all(format!("Error: {e} (press Enter to try again)\n").as_bytes())
                    .await?;
            }
            Err(e) => {
                output.write_all(format!("Error: {e}\n").as_bytes()).await?;
            }
        }
    }

    output.flush().await
}
