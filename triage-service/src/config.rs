use std::time::Duration;

use crate::error::ConfigError;
use crate::language::LanguageLabels;

/// Departments the professional summary may recommend. Sent to the model as a
/// closed list; not enforced locally.
pub const DEPARTMENT_LIST: &str = "外科、小儿外科、普通科、肠胃肝脏科、精神科、临床心理学、内科、耳鼻喉科、家庭医学、放射科、麻醉科、病理学、眼科、整形外科、骨科、泌尿外科、临床肿瘤科、血液及血液肿瘤科、妇产科、内分泌及糖尿科、风湿病科、神经外科、核子医学科、临床微生物及感染学、急症科、儿科、复康科、脑神经科、心脏科、肾病科、呼吸系统科、牙科、物理治疗、免疫及过敏病科、疼痛医学、皮肤及性病科、老人科、社会医学、中医、儿童免疫、过敏及传染病科、营养学、心胸肺外科、内科肿瘤科、妇科肿瘤科、解剖病理学、感染及传染病科、法医病理学、生殖医学科、职业医学、牙周治疗科、修复齿科专科、口腔颌面外科";

/// Fixed text used when a stage-2 call fails or the user must re-confirm.
#[derive(Debug, Clone)]
pub struct FallbackTexts {
    pub plain_summary: String,
    pub report: String,
    pub reconfirm_question: String,
}

impl Default for FallbackTexts {
    fn default() -> Self {
        Self {
            plain_summary: "生成简易总结失败".to_string(),
            report: "生成失败".to_string(),
            reconfirm_question: "请再次确认您是否同意生成完整报告？".to_string(),
        }
    }
}

/// Immutable decision parameters handed to the engine and prompt builder.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Confidence at or above which questioning stops.
    pub confidence_threshold: u8,
    /// Longest history that still gets a stage-1 analysis call.
    pub max_analysis_history: usize,
    /// Refusals tolerated before the approval prompt is dropped.
    pub max_refusals: u32,
    pub departments: String,
    pub languages: LanguageLabels,
    pub fallbacks: FallbackTexts,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 75,
            max_analysis_history: 7,
            max_refusals: 10,
            departments: DEPARTMENT_LIST.to_string(),
            languages: LanguageLabels::default(),
            fallbacks: FallbackTexts::default(),
        }
    }
}

/// Process-level settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub api_key: String,
    pub model: String,
    pub llm_timeout_secs: u64,
    pub port: u16,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("DEEPSEEK_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingVar("DEEPSEEK_API_KEY"))?;

        let model = std::env::var("TRIAGE_MODEL").unwrap_or_else(|_| default_model());
        let llm_timeout_secs = parse_var("LLM_TIMEOUT_SECS", default_timeout())?;
        let port = parse_var("PORT", default_port())?;

        Ok(Self {
            api_key,
            model,
            llm_timeout_secs,
            port,
        })
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidVar { name, value }),
        Err(_) => Ok(default),
    }
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_port() -> u16 {
    5000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triage_defaults() {
        let config = TriageConfig::default();
        assert_eq!(config.confidence_threshold, 75);
        assert_eq!(config.max_analysis_history, 7);
        assert_eq!(config.max_refusals, 10);
        assert_eq!(config.departments.split('、').count(), 53);
    }

    #[test]
    fn timeout_duration() {
        let config = ServiceConfig {
            api_key: "k".to_string(),
            model: default_model(),
            llm_timeout_secs: 45,
            port: default_port(),
        };
        assert_eq!(config.llm_timeout(), Duration::from_secs(45));
    }
}
