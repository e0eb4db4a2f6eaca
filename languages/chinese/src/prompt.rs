use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}").expect("valid regex"));

/// Prompt text with `${name}` placeholders.
///
/// Placeholders are looked up by name only. Unknown names are left in
/// place; nothing inside `${...}` is ever evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        PLACEHOLDER
            .replace_all(&self.text, |caps: &Captures| {
                let name = caps[1].trim();
                vars.iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| value.to_string())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}
