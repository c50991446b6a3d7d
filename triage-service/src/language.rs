use serde::{Deserialize, Serialize};
use std::fmt;

/// Response language requested by the client.
///
/// Clients spell the Chinese tags several ways (`zhCN`, `zh_CN`, `zh-CN`), all
/// of which map to the same variant. Anything else is kept verbatim so it can
/// be echoed back, and resolves to the default label when building prompts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LanguageTag {
    #[default]
    ZhCn,
    ZhTw,
    En,
    Id,
    Other(String),
}

impl LanguageTag {
    pub fn as_str(&self) -> &str {
        match self {
            LanguageTag::ZhCn => "zh-CN",
            LanguageTag::ZhTw => "zh-TW",
            LanguageTag::En => "en",
            LanguageTag::Id => "id",
            LanguageTag::Other(tag) => tag.as_str(),
        }
    }
}

impl From<String> for LanguageTag {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "zh-CN" | "zhCN" | "zh_CN" => LanguageTag::ZhCn,
            "zh-TW" | "zhTW" | "zh_TW" => LanguageTag::ZhTw,
            "en" => LanguageTag::En,
            "id" => LanguageTag::Id,
            _ => LanguageTag::Other(tag),
        }
    }
}

impl From<&str> for LanguageTag {
    fn from(tag: &str) -> Self {
        LanguageTag::from(tag.to_string())
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        match tag {
            LanguageTag::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display labels embedded in prompt text, one per supported tag.
#[derive(Debug, Clone)]
pub struct LanguageLabels {
    pub zh_cn: String,
    pub zh_tw: String,
    pub en: String,
    pub id: String,
}

impl LanguageLabels {
    /// Label for the response language of the triage stages. Unknown tags
    /// fall back to the simplified Chinese label.
    pub fn label(&self, tag: &LanguageTag) -> &str {
        self.known(tag).unwrap_or(self.zh_cn.as_str())
    }

    /// Label for report translation, which falls back to English instead.
    pub fn translation_label(&self, tag: &LanguageTag) -> &str {
        self.known(tag).unwrap_or(self.en.as_str())
    }

    fn known(&self, tag: &LanguageTag) -> Option<&str> {
        match tag {
            LanguageTag::ZhCn => Some(self.zh_cn.as_str()),
            LanguageTag::ZhTw => Some(self.zh_tw.as_str()),
            LanguageTag::En => Some(self.en.as_str()),
            LanguageTag::Id => Some(self.id.as_str()),
            LanguageTag::Other(_) => None,
        }
    }
}

impl Default for LanguageLabels {
    fn default() -> Self {
        Self {
            zh_cn: "简体中文".to_string(),
            zh_tw: "繁體中文".to_string(),
            en: "English".to_string(),
            id: "Bahasa indonesia".to_string(),
        }
    }
}
