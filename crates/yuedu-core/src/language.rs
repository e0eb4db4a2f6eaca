use crate::annotation::MarkerPair;

/// Language-specific text handling for annotated articles
pub trait LanguageProcessor: Send + Sync {
    /// Language identifier (ISO 639-1 code: "zh", "ja", ...)
    fn language_code(&self) -> &str;

    /// Normalize text before it goes into a prompt
    fn normalize(&self, text: &str) -> String;

    /// Surrounding sentence for a clicked term: markers removed, normalized
    fn context(&self, line: &str, markers: &MarkerPair) -> String {
        self.normalize(&crate::annotation::strip_markers(line, markers))
    }
}
