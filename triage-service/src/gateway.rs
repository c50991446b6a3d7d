//! Text-generation backend used by every stage.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::{Chat, Message as RigMessage};
use rig::providers::deepseek;
use std::time::Duration;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::error::GenerationError;
use crate::models::{Message, MessageRole};

#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    pub temperature: Option<f64>,
}

/// Sends role-tagged messages to a model and returns its raw text.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn generate(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<String, GenerationError>;
}

/// Gateway backed by a rig agent on the DeepSeek chat API.
pub struct RigGateway {
    client: deepseek::Client,
    model: String,
    timeout: Duration,
}

impl RigGateway {
    pub fn new(api_key: &str, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: deepseek::Client::new(api_key),
            model: model.into(),
            timeout,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(&config.api_key, config.model.clone(), config.llm_timeout())
    }
}

#[async_trait]
impl LlmGateway for RigGateway {
    async fn generate(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let (preamble, history, prompt) = split_conversation(messages);
        debug!(
            model = %self.model,
            history_len = history.len(),
            "Sending chat request"
        );

        let mut builder = self.client.agent(&self.model).preamble(&preamble);
        if let Some(temperature) = options.temperature {
            builder = builder.temperature(temperature);
        }
        let agent = builder.build();

        match tokio::time::timeout(self.timeout, agent.chat(prompt, history)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(GenerationError::Upstream(e.to_string())),
            Err(_) => Err(GenerationError::Timeout(self.timeout.as_secs())),
        }
    }
}

/// Splits our message list into what a rig agent expects: system messages
/// joined into the preamble, then chat history, then the final prompt.
fn split_conversation(messages: &[Message]) -> (String, Vec<RigMessage>, RigMessage) {
    let mut system = Vec::new();
    let mut chat = Vec::new();
    for message in messages {
        match message.role {
            MessageRole::System => system.push(message.content.as_str()),
            MessageRole::User => chat.push(RigMessage::user(message.content.clone())),
            MessageRole::Assistant => chat.push(RigMessage::assistant(message.content.clone())),
        }
    }
    let prompt = chat.pop().unwrap_or_else(|| RigMessage::user(""));
    (system.join("\n\n"), chat, prompt)
}
