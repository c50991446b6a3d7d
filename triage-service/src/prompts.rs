/// System prompts for one turn, all targeting the same response language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePrompts {
    pub analysis: String,
    pub plain: String,
    pub professional: String,
}

/// Builds stage prompts around a fixed department vocabulary.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    departments: String,
}

impl PromptBuilder {
    pub fn new(departments: impl Into<String>) -> Self {
        Self {
            departments: departments.into(),
        }
    }

    pub fn build(&self, lang_label: &str) -> StagePrompts {
        StagePrompts {
            analysis: analysis_prompt(lang_label),
            plain: plain_prompt(lang_label),
            professional: professional_prompt(lang_label, &self.departments),
        }
    }

    pub fn translation(&self, lang_label: &str) -> String {
        format!(
            r#"You are a medical translator. Translate the text to {lang_label} in the same medical style.

Output JSON:
{{
  "medical_summary_translated": "...",
  "plain_summary_translated": "..."
}}"#
        )
    }
}

fn analysis_prompt(lang_label: &str) -> String {
    format!(
        r#"You are a professional medical analysis AI.
Your task:
1. Evaluate the confidence level (0-100) of the user's symptom. A higher confidence level means a stronger belief about what is causing the symptom the user is experiencing.
2. Generate **one** concise follow-up question that only asks one thing (yes/no if possible).
Respond **in {lang_label}**. You must respond in that language!

Output JSON:
{{
  "analysis_text": "...",
  "confidence_level": number,
  "next_question": "..."
}}"#
    )
}

fn plain_prompt(lang_label: &str) -> String {
    format!(
        r#"You are a medical summarization AI. Given the conversation history, produce a **patient-friendly summary**.
Respond **in {lang_label}**. You must respond in that language!

Output JSON:
{{
  "plain_summary": "..."
}}"#
    )
}

fn professional_prompt(lang_label: &str, departments: &str) -> String {
    format!(
        r#"You are a professional doctor. Generate medical summaries of the user based on the chat log:
1. medical_summary (professional)
2. plain_summary (patient-friendly)
3. recommended_specialties (1-3 from the department list, total confidence = 100)

Department list:
{departments}

Respond **in {lang_label}**.

Output JSON:
{{
  "medical_summary": "...",
  "plain_summary": "...",
  "recommended_specialties": [{{"department": "...", "confidence": number}}]
}}"#
    )
}
