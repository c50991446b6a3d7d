//! Per-turn decision flow.
//!
//! A turn runs stage 1 (analysis) and, once confidence reaches the threshold,
//! one stage-2 branch chosen by the user's approval answer:
//!
//! ```text
//! history ─► analysis ─► confidence < threshold ─► ask next_question
//!                     └► confidence ≥ threshold ─┬► approval unset    ─► plain summary, ask approval
//!                                                ├► approval given    ─► professional report, done
//!                                                └► approval refused  ─► re-ask, or give up after max_refusals
//! ```
//!
//! Nothing is kept between turns; the caller sends the whole history and the
//! refusal count every time.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::TriageConfig;
use crate::error::TriageError;
use crate::gateway::LlmGateway;
use crate::models::{Approval, TurnRequest, TurnResult};
use crate::prompts::{PromptBuilder, StagePrompts};
use crate::tasks::{AnalysisTask, PlainSummaryTask, ProfessionalSummaryTask};

#[derive(Clone)]
pub struct DecisionEngine {
    gateway: Arc<dyn LlmGateway>,
    prompts: PromptBuilder,
    config: Arc<TriageConfig>,
}

impl DecisionEngine {
    pub fn new(gateway: Arc<dyn LlmGateway>, config: TriageConfig) -> Self {
        Self {
            gateway,
            prompts: PromptBuilder::new(config.departments.clone()),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Runs one turn. Only a failed analysis call is an error; stage-2
    /// failures fall back to fixed texts so the turn still completes.
    pub async fn decide(&self, request: &TurnRequest) -> Result<TurnResult, TriageError> {
        let label = self.config.languages.label(&request.lang);
        let prompts = self.prompts.build(label);

        let mut result = self.analyse(request, &prompts).await?;

        if result.confidence_level < self.config.confidence_threshold {
            info!(
                confidence_level = result.confidence_level,
                "Below threshold, asking follow-up question"
            );
            return Ok(result);
        }

        match request.approval {
            Approval::Unset => self.request_approval(request, &prompts, &mut result).await,
            Approval::Approved => self.finalize_report(request, &prompts, &mut result).await,
            Approval::Rejected => self.record_refusal(&mut result),
        }

        Ok(result)
    }

    async fn analyse(
        &self,
        request: &TurnRequest,
        prompts: &StagePrompts,
    ) -> Result<TurnResult, TriageError> {
        let history = &request.history;
        let analysis = if history.len() <= self.config.max_analysis_history {
            AnalysisTask
                .run(self.gateway.as_ref(), &prompts.analysis, history)
                .await
                .map_err(TriageError::Analysis)?
        } else {
            info!(
                history_len = history.len(),
                "Conversation is long enough, skipping analysis"
            );
            AnalysisTask::skipped(self.config.confidence_threshold)
        };

        Ok(TurnResult {
            hidden_analysis: analysis.analysis_text,
            confidence_level: analysis.confidence_level.min(100),
            next_question: analysis.next_question,
            refusal_times: request.refusal_times,
            ..TurnResult::default()
        })
    }

    async fn request_approval(
        &self,
        request: &TurnRequest,
        prompts: &StagePrompts,
        result: &mut TurnResult,
    ) {
        result.plain_summary = PlainSummaryTask
            .run(
                self.gateway.as_ref(),
                &prompts.plain,
                &request.history,
                &self.config.fallbacks.plain_summary,
            )
            .await;
        result.needs_approval = true;
    }

    async fn finalize_report(
        &self,
        request: &TurnRequest,
        prompts: &StagePrompts,
        result: &mut TurnResult,
    ) {
        let report = ProfessionalSummaryTask
            .run(
                self.gateway.as_ref(),
                &prompts.professional,
                &request.history,
                &self.config.fallbacks.report,
            )
            .await;

        result.medical_summary = report.medical_summary;
        result.plain_summary = report.plain_summary;
        result.recommended_specialties = report.recommended_specialties;
        result.done = true;
        result.needs_approval = false;
        result.next_question.clear();
    }

    fn record_refusal(&self, result: &mut TurnResult) {
        result.refusal_times = result.refusal_times.saturating_add(1);

        if result.refusal_times <= self.config.max_refusals {
            info!(
                refusal_times = result.refusal_times,
                "Report refused, asking for confirmation again"
            );
            result.needs_approval = true;
            result.next_question = self.config.fallbacks.reconfirm_question.clone();
        } else {
            // TODO: no terminal state is defined once refusals run out; the
            // turn drops back to questioning with whatever next_question
            // analysis produced, which is empty when analysis was skipped.
            warn!(
                refusal_times = result.refusal_times,
                max_refusals = self.config.max_refusals,
                "Refusal limit exceeded, resetting confidence"
            );
            result.confidence_level = 0;
            result.needs_approval = false;
        }
    }
}
