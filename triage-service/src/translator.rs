use std::sync::Arc;
use tracing::info;

use crate::config::TriageConfig;
use crate::error::TriageError;
use crate::gateway::LlmGateway;
use crate::models::{TranslateRequest, TranslateResponse};
use crate::prompts::PromptBuilder;
use crate::tasks::TranslationTask;

/// Translates a finished report. The specialty list is echoed unchanged.
#[derive(Clone)]
pub struct ReportTranslator {
    gateway: Arc<dyn LlmGateway>,
    prompts: PromptBuilder,
    config: Arc<TriageConfig>,
}

impl ReportTranslator {
    pub fn new(gateway: Arc<dyn LlmGateway>, config: TriageConfig) -> Self {
        Self {
            gateway,
            prompts: PromptBuilder::new(config.departments.clone()),
            config: Arc::new(config),
        }
    }

    pub async fn translate(
        &self,
        request: &TranslateRequest,
    ) -> Result<TranslateResponse, TriageError> {
        let label = self.config.languages.translation_label(&request.target_lang);
        info!(target_lang = %request.target_lang, "Translating report to {}", label);

        let output = TranslationTask
            .run(
                self.gateway.as_ref(),
                &self.prompts.translation(label),
                &request.medical_summary,
                &request.plain_summary,
            )
            .await
            .map_err(TriageError::Translation)?;

        Ok(TranslateResponse {
            medical_summary: output.medical_summary_translated,
            plain_summary: output.plain_summary_translated,
            recommended_specialties: request.recommended_specialties.clone(),
        })
    }
}
