use unicode_normalization::UnicodeNormalization;
use yuedu_core::language::LanguageProcessor;

/// Chinese text handling
#[derive(Debug, Default, Clone)]
pub struct ChineseProcessor;

impl ChineseProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageProcessor for ChineseProcessor {
    fn language_code(&self) -> &str {
        "zh"
    }

    /// NFC, with whitespace dropped: Chinese doesn't separate words with
    /// spaces, and extracted pages are full of stray ones.
    fn normalize(&self, text: &str) -> String {
        text.nfc().filter(|c| !c.is_whitespace()).collect()
    }
}
