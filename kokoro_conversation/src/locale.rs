//! Fixed localized strings surfaced inside conversations.

use serde::{Deserialize, Serialize};

const GREETING_EN: &str = "Hello! I'm your AI Psychology Assistant. Feel free to share your \
thoughts and feelings with me. I'm here to listen and help you understand yourself better. You \
can also upload voice recordings or relevant files for a more comprehensive consultation.";

const GREETING_ZH: &str = "您好！我是您的AI心理咨询助手。请随时与我分享您的想法和感受。\
我在这里倾听并帮助您更好地了解自己。您也可以上传语音记录或相关文件，以便进行更全面的咨询。";

/// Language for the fixed strings (greeting, error notice, default title).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    /// Parse from a config value, defaulting to English.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "zh" => Self::Zh,
            _ => Self::En,
        }
    }

    /// The assistant greeting every new conversation is seeded with.
    #[must_use]
    pub const fn greeting(self) -> &'static str {
        match self {
            Self::En => GREETING_EN,
            Self::Zh => GREETING_ZH,
        }
    }

    /// The single terminal error message shown for a failed turn.
    #[must_use]
    pub const fn turn_error(self) -> &'static str {
        match self {
            Self::En => "An error occurred. Please try again.",
            Self::Zh => "发生错误，请重试",
        }
    }

    /// Title of a conversation before the first user message names it.
    #[must_use]
    pub const fn default_title(self) -> &'static str {
        match self {
            Self::En => "New Consultation",
            Self::Zh => "新咨询",
        }
    }

    /// Heading shown when a turn triggers specialist recommendations.
    #[must_use]
    pub const fn specialists_title(self) -> &'static str {
        match self {
            Self::En => "Recommended Therapists",
            Self::Zh => "推荐心理医生",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_tag_defaults_to_english() {
        assert_eq!(Locale::from_tag("zh"), Locale::Zh);
        assert_eq!(Locale::from_tag("en"), Locale::En);
        assert_eq!(Locale::from_tag("fr"), Locale::En);
    }
}
