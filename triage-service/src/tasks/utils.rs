use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::StageError;
use crate::gateway::{GenerationOptions, LlmGateway};
use crate::models::Message;
use crate::parser::parse_stage_output;

/// Runs one LLM stage: `[system: prompt] + conversation`, then extracts the
/// stage's JSON object from the reply.
pub async fn run_stage<T: DeserializeOwned>(
    gateway: &dyn LlmGateway,
    stage: &'static str,
    system_prompt: &str,
    conversation: &[Message],
) -> Result<T, StageError> {
    let mut messages = Vec::with_capacity(conversation.len() + 1);
    messages.push(Message::system(system_prompt));
    messages.extend_from_slice(conversation);

    info!(stage, messages = messages.len(), "Calling LLM");
    let raw = gateway
        .generate(&messages, &GenerationOptions::default())
        .await?;
    debug!(stage, response_len = raw.len(), "LLM responded");

    Ok(parse_stage_output(&raw)?)
}
