use std::sync::LazyLock;

use regex::Regex;
use yuedu_types::TermInfo;

pub const DEFINITION_FALLBACK: &str = "Could not parse definition.";
pub const EXAMPLE_FALLBACK: &str = "Could not parse example.";

static PINYIN_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^1\.\s*Pinyin:\s*").expect("valid regex"));
static DEFINITION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^2\.\s*Definition:\s*").expect("valid regex"));
static EXAMPLE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^3\.\s*Example sentence:\s*").expect("valid regex"));

fn strip_label(label: &Regex, line: &str) -> Option<String> {
    label
        .find(line)
        .map(|m| line[m.end()..].trim().to_string())
}

/// Parse a term lookup reply of the form
///
/// ```text
/// 1. Pinyin: shū
/// 2. Definition: book
/// 3. Example sentence: 我在看书。
/// ```
///
/// Only the label prefixes matter, not the order of lines. Missing fields
/// fall back to fixed placeholder text (pinyin stays empty).
pub fn parse_term_response(raw: &str) -> TermInfo {
    let mut pinyin = None;
    let mut definition = DEFINITION_FALLBACK.to_string();
    let mut example = EXAMPLE_FALLBACK.to_string();

    for line in raw.lines().map(str::trim) {
        if let Some(value) = strip_label(&PINYIN_LABEL, line) {
            pinyin = Some(value);
        } else if let Some(value) = strip_label(&DEFINITION_LABEL, line) {
            definition = value;
        } else if let Some(value) = strip_label(&EXAMPLE_LABEL, line) {
            example = value;
        }
    }

    TermInfo {
        pinyin,
        definition: Some(definition),
        example: Some(example),
    }
}
