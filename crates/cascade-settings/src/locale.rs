//! Guild locale

use serde::{Deserialize, Serialize};

/// Language the bot answers in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    /// British English
    #[default]
    #[serde(rename = "en_GB")]
    EnglishUk,
    /// American English
    #[serde(rename = "en_US")]
    EnglishUs,
    /// Dutch
    #[serde(rename = "nl_NL")]
    Dutch,
    /// German
    #[serde(rename = "de_DE")]
    German,
    /// French
    #[serde(rename = "fr_FR")]
    French,
}

impl Locale {
    /// Serialized codes, one per variant.
    pub const CODES: &'static [&'static str] = &["en_GB", "en_US", "nl_NL", "de_DE", "fr_FR"];

    /// The serialized code.
    pub fn code(self) -> &'static str {
        match self {
            Locale::EnglishUk => "en_GB",
            Locale::EnglishUs => "en_US",
            Locale::Dutch => "nl_NL",
            Locale::German => "de_DE",
            Locale::French => "fr_FR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_serde() {
        for code in Locale::CODES {
            let locale: Locale = serde_json::from_value(serde_json::json!(code)).unwrap();
            assert_eq!(locale.code(), *code);
        }
    }
}
