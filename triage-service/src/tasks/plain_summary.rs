use tracing::{info, warn};

use super::utils::run_stage;
use crate::gateway::LlmGateway;
use crate::models::{Message, PlainSummaryOutput};

/// Patient-friendly summary shown when asking for report approval.
pub struct PlainSummaryTask;

impl PlainSummaryTask {
    /// Never fails: any gateway or parse error yields `fallback` instead.
    pub async fn run(
        &self,
        gateway: &dyn LlmGateway,
        prompt: &str,
        history: &[Message],
        fallback: &str,
    ) -> String {
        info!("Generating plain summary");

        match run_stage::<PlainSummaryOutput>(gateway, "plain_summary", prompt, history).await {
            Ok(output) if !output.plain_summary.trim().is_empty() => output.plain_summary,
            Ok(_) => {
                warn!("Plain summary missing from model output, using fallback");
                fallback.to_string()
            }
            Err(e) => {
                warn!("Plain summary generation failed, using fallback: {}", e);
                fallback.to_string()
            }
        }
    }
}
