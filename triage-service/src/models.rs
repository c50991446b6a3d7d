use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::language::LanguageTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// One chat message. History order is chronological.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// User's answer to "may we generate the full report?". On the wire this is
/// `null`, `true` or `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Approval {
    #[default]
    Unset,
    Approved,
    Rejected,
}

impl From<Option<bool>> for Approval {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Approval::Unset,
            Some(true) => Approval::Approved,
            Some(false) => Approval::Rejected,
        }
    }
}

impl From<Approval> for Option<bool> {
    fn from(value: Approval) -> Self {
        match value {
            Approval::Unset => None,
            Approval::Approved => Some(true),
            Approval::Rejected => Some(false),
        }
    }
}

/// Everything needed to run one turn. The caller owns this state and echoes
/// `refusal_times` back from the previous [`TurnResult`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnRequest {
    #[serde(default)]
    pub history: Vec<Message>,
    #[serde(default)]
    pub lang: LanguageTag,
    #[serde(default)]
    pub approval: Approval,
    #[serde(default, alias = "refusalCount")]
    pub refusal_times: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedSpecialty {
    #[serde(alias = "department", alias = "科目", default, deserialize_with = "lenient_text")]
    pub specialty: String,
    #[serde(alias = "置信度", default, deserialize_with = "lenient_score")]
    pub confidence: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    pub hidden_analysis: String,
    pub confidence_level: u8,
    pub next_question: String,
    pub done: bool,
    pub plain_summary: String,
    pub medical_summary: String,
    pub recommended_specialties: Vec<RecommendedSpecialty>,
    #[serde(rename = "needsApproval")]
    pub needs_approval: bool,
    pub refusal_times: u32,
}

/// Stage 1 output contract.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisOutput {
    #[serde(deserialize_with = "lenient_text")]
    pub analysis_text: String,
    #[serde(deserialize_with = "lenient_score")]
    pub confidence_level: u8,
    #[serde(deserialize_with = "lenient_text")]
    pub next_question: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlainSummaryOutput {
    #[serde(deserialize_with = "lenient_text")]
    pub plain_summary: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfessionalSummaryOutput {
    #[serde(deserialize_with = "lenient_text")]
    pub medical_summary: String,
    #[serde(deserialize_with = "lenient_text")]
    pub plain_summary: String,
    #[serde(deserialize_with = "lenient_specialties")]
    pub recommended_specialties: Vec<RecommendedSpecialty>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TranslationOutput {
    #[serde(deserialize_with = "lenient_text")]
    pub medical_summary_translated: String,
    #[serde(deserialize_with = "lenient_text")]
    pub plain_summary_translated: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub medical_summary: String,
    #[serde(default)]
    pub plain_summary: String,
    #[serde(rename = "targetLang", default = "default_target_lang")]
    pub target_lang: LanguageTag,
    /// Passed through untouched, whatever shape the client sent.
    #[serde(default = "empty_list")]
    pub recommended_specialties: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub medical_summary: String,
    pub plain_summary: String,
    pub recommended_specialties: Value,
}

fn default_target_lang() -> LanguageTag {
    LanguageTag::En
}

fn empty_list() -> Value {
    Value::Array(Vec::new())
}

/// Reads a 0-100 score the way models actually emit it: integers, floats,
/// numeric strings, or junk. Fractions are truncated so a score never crosses
/// a threshold it did not reach. Out-of-range values are clamped and anything
/// unreadable becomes 0.
fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| n.is_finite())
        .map(|n| n.floor().clamp(0.0, 100.0) as u8)
        .unwrap_or(0))
}

/// Text field of a model reply. `null` and non-string values read as empty.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

/// Specialty list of a model reply. Entries that are not objects or carry no
/// department name are dropped; a non-list value reads as empty.
fn lenient_specialties<'de, D>(deserializer: D) -> Result<Vec<RecommendedSpecialty>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<RecommendedSpecialty>(item).ok())
        .filter(|s| !s.specialty.trim().is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn approval_uses_nullable_bool() {
        let req: TurnRequest = serde_json::from_value(json!({
            "history": [], "lang": "en", "approval": null
        }))
        .unwrap();
        assert_eq!(req.approval, Approval::Unset);

        let req: TurnRequest =
            serde_json::from_value(json!({ "history": [], "approval": false })).unwrap();
        assert_eq!(req.approval, Approval::Rejected);
        assert_eq!(req.lang, LanguageTag::ZhCn);
        assert_eq!(req.refusal_times, 0);
    }

    #[test]
    fn history_ignores_client_only_fields() {
        let req: TurnRequest = serde_json::from_value(json!({
            "history": [{ "id": "a1", "role": "user", "content": "headache" }],
            "lang": "zh_TW",
            "debug": true,
            "refusalCount": 3
        }))
        .unwrap();
        assert_eq!(req.history, vec![Message::user("headache")]);
        assert_eq!(req.lang, LanguageTag::ZhTw);
        assert_eq!(req.refusal_times, 3);
    }

    #[test]
    fn turn_result_keeps_wire_names() {
        let value = serde_json::to_value(TurnResult::default()).unwrap();
        assert!(value.get("needsApproval").is_some());
        assert!(value.get("refusal_times").is_some());
        assert!(value.get("hidden_analysis").is_some());
    }

    #[test]
    fn scores_are_clamped_and_truncated() {
        let out: AnalysisOutput =
            serde_json::from_value(json!({ "confidence_level": 180 })).unwrap();
        assert_eq!(out.confidence_level, 100);

        let out: AnalysisOutput =
            serde_json::from_value(json!({ "confidence_level": -5 })).unwrap();
        assert_eq!(out.confidence_level, 0);

        let out: AnalysisOutput =
            serde_json::from_value(json!({ "confidence_level": "74.6%" })).unwrap();
        assert_eq!(out.confidence_level, 74);

        let out: AnalysisOutput =
            serde_json::from_value(json!({ "confidence_level": 74.99 })).unwrap();
        assert_eq!(out.confidence_level, 74);

        let out: AnalysisOutput =
            serde_json::from_value(json!({ "confidence_level": 75.0 })).unwrap();
        assert_eq!(out.confidence_level, 75);

        let out: AnalysisOutput =
            serde_json::from_value(json!({ "confidence_level": null })).unwrap();
        assert_eq!(out.confidence_level, 0);
    }

    #[test]
    fn specialties_accept_model_key_variants() {
        let out: ProfessionalSummaryOutput = serde_json::from_value(json!({
            "recommended_specialties": [
                { "department": "心脏科", "confidence": 60 },
                { "科目": "内科", "置信度": 40 }
            ]
        }))
        .unwrap();
        assert_eq!(
            out.recommended_specialties,
            vec![
                RecommendedSpecialty { specialty: "心脏科".into(), confidence: 60 },
                RecommendedSpecialty { specialty: "内科".into(), confidence: 40 },
            ]
        );
        assert!(out.medical_summary.is_empty());
    }

    #[test]
    fn null_and_mistyped_text_fields_read_as_empty() {
        let out: AnalysisOutput = serde_json::from_value(json!({
            "analysis_text": ["not", "text"],
            "confidence_level": 80,
            "next_question": null
        }))
        .unwrap();
        assert_eq!(out.confidence_level, 80);
        assert!(out.analysis_text.is_empty());
        assert!(out.next_question.is_empty());

        let out: TranslationOutput = serde_json::from_value(json!({
            "medical_summary_translated": 42,
            "plain_summary_translated": "ok"
        }))
        .unwrap();
        assert!(out.medical_summary_translated.is_empty());
        assert_eq!(out.plain_summary_translated, "ok");
    }

    #[test]
    fn bad_specialty_entries_do_not_sink_the_report() {
        let out: ProfessionalSummaryOutput = serde_json::from_value(json!({
            "medical_summary": "Chest pain on exertion.",
            "plain_summary": "See a heart doctor.",
            "recommended_specialties": [
                { "department": "心脏科", "confidence": 100 },
                { "confidence": 0 },
                { "department": null },
                "内科"
            ]
        }))
        .unwrap();
        assert_eq!(out.medical_summary, "Chest pain on exertion.");
        assert_eq!(
            out.recommended_specialties,
            vec![RecommendedSpecialty { specialty: "心脏科".into(), confidence: 100 }]
        );

        let out: ProfessionalSummaryOutput =
            serde_json::from_value(json!({ "recommended_specialties": null })).unwrap();
        assert!(out.recommended_specialties.is_empty());
    }
}
