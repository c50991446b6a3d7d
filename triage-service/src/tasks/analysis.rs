use tracing::{error, info};

use super::utils::run_stage;
use crate::error::StageError;
use crate::gateway::LlmGateway;
use crate::models::{AnalysisOutput, Message};

/// Stage 1: scores confidence in the likely cause and picks the next question.
pub struct AnalysisTask;

impl AnalysisTask {
    pub async fn run(
        &self,
        gateway: &dyn LlmGateway,
        prompt: &str,
        history: &[Message],
    ) -> Result<AnalysisOutput, StageError> {
        info!(history_len = history.len(), "Starting symptom analysis");

        let output: AnalysisOutput = run_stage(gateway, "analysis", prompt, history)
            .await
            .inspect_err(|e| error!("Analysis stage failed: {}", e))?;

        info!(
            confidence_level = output.confidence_level,
            "Symptom analysis completed"
        );
        Ok(output)
    }

    /// Stand-in output used once the conversation is long enough that
    /// analysis is skipped.
    pub fn skipped(confidence_level: u8) -> AnalysisOutput {
        AnalysisOutput {
            analysis_text: String::new(),
            confidence_level,
            next_question: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::gateway::testing::ScriptedGateway;
    use crate::models::MessageRole;

    #[tokio::test]
    async fn prepends_system_prompt() {
        let gateway = ScriptedGateway::new().reply(
            r#"{"analysis_text":"a","confidence_level":30,"next_question":"Any nausea?"}"#,
        );
        let history = vec![Message::user("stomach ache")];

        let output = AnalysisTask
            .run(&gateway, "ANALYSE", &history)
            .await
            .unwrap();
        assert_eq!(output.next_question, "Any nausea?");

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0].role, MessageRole::System);
        assert_eq!(calls[0][0].content, "ANALYSE");
        assert_eq!(&calls[0][1..], history.as_slice());
    }

    #[tokio::test]
    async fn gateway_failure_is_an_error() {
        let gateway = ScriptedGateway::new().fail(GenerationError::Upstream("quota".into()));
        let err = AnalysisTask
            .run(&gateway, "ANALYSE", &[Message::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::Generation(_)));
    }

    #[tokio::test]
    async fn prose_reply_is_malformed() {
        let gateway = ScriptedGateway::new().reply("Could you tell me more?");
        let err = AnalysisTask
            .run(&gateway, "ANALYSE", &[Message::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::Malformed(_)));
    }

    #[tokio::test]
    async fn null_and_mistyped_fields_read_as_defaults() {
        let gateway = ScriptedGateway::new().reply(
            r#"{"analysis_text":{"notes":"x"},"confidence_level":"high","next_question":null}"#,
        );
        let output = AnalysisTask
            .run(&gateway, "ANALYSE", &[Message::user("hi")])
            .await
            .unwrap();
        assert!(output.analysis_text.is_empty());
        assert_eq!(output.confidence_level, 0);
        assert!(output.next_question.is_empty());
    }
}
