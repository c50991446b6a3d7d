use tracing::{info, warn};

use super::utils::run_stage;
use crate::gateway::LlmGateway;
use crate::models::{Message, ProfessionalSummaryOutput};

/// Final report: clinician summary, patient summary and recommended
/// specialties.
pub struct ProfessionalSummaryTask;

impl ProfessionalSummaryTask {
    /// Never fails. On error both summaries become `fallback` and no
    /// specialties are recommended.
    pub async fn run(
        &self,
        gateway: &dyn LlmGateway,
        prompt: &str,
        history: &[Message],
        fallback: &str,
    ) -> ProfessionalSummaryOutput {
        info!("Generating professional report");

        match run_stage::<ProfessionalSummaryOutput>(gateway, "professional_summary", prompt, history)
            .await
        {
            Ok(output) => {
                info!(
                    specialties = output.recommended_specialties.len(),
                    "Professional report generated"
                );
                output
            }
            Err(e) => {
                warn!("Professional report generation failed, using fallback: {}", e);
                ProfessionalSummaryOutput {
                    medical_summary: fallback.to_string(),
                    plain_summary: fallback.to_string(),
                    recommended_specialties: Vec::new(),
                }
            }
        }
    }
}
