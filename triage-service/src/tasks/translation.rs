use tracing::{error, info};

use super::utils::run_stage;
use crate::error::StageError;
use crate::gateway::LlmGateway;
use crate::models::{Message, TranslationOutput};

/// Translates both report summaries in a single call.
pub struct TranslationTask;

impl TranslationTask {
    pub async fn run(
        &self,
        gateway: &dyn LlmGateway,
        prompt: &str,
        medical_summary: &str,
        plain_summary: &str,
    ) -> Result<TranslationOutput, StageError> {
        info!("Translating report");

        let source = format!(
            "medical_summary:\n{medical_summary}\n\nplain_summary:\n{plain_summary}"
        );
        run_stage(gateway, "translation", prompt, &[Message::user(source)])
            .await
            .inspect_err(|e| error!("Report translation failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::testing::ScriptedGateway;

    #[tokio::test]
    async fn sends_both_summaries_as_one_user_message() {
        let gateway = ScriptedGateway::new().reply(
            r#"{"medical_summary_translated":"M","plain_summary_translated":"P"}"#,
        );
        let output = TranslationTask
            .run(&gateway, "T", "医学", "简易")
            .await
            .unwrap();
        assert_eq!(output.medical_summary_translated, "M");
        assert_eq!(output.plain_summary_translated, "P");

        let calls = gateway.calls();
        assert_eq!(calls[0].len(), 2);
        assert_eq!(
            calls[0][1],
            Message::user("medical_summary:\n医学\n\nplain_summary:\n简易")
        );
    }
}
