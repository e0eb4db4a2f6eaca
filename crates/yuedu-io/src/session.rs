use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Keys shared between the submission flow and the reading view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    /// Annotated article produced on this side
    ArticleContent,
    ArticleTitle,
    /// Raw article text as extracted by the backend
    EntireArticle,
    /// Annotated article produced by the backend task
    AnnotatedWorkText,
    AnnotationTaskId,
}

impl SessionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::ArticleContent => "articleContent",
            SessionKey::ArticleTitle => "articleTitle",
            SessionKey::EntireArticle => "entireArticle",
            SessionKey::AnnotatedWorkText => "annotatedWorkText",
            SessionKey::AnnotationTaskId => "annotationTaskId",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value store scoped to one reading session, optionally
/// mirrored to a JSON file so a later run can pick it up.
#[derive(Debug, Default)]
pub struct SessionStore {
    path: Option<PathBuf>,
    values: HashMap<String, String>,
}

impl SessionStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store, loading existing values if the file exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let values = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            HashMap::new()
        };

        tracing::debug!("Session store at {} ({} keys)", path.display(), values.len());
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: SessionKey) -> Option<&str> {
        self.values.get(key.as_str()).map(String::as_str)
    }

    pub fn set(&mut self, key: SessionKey, value: impl Into<String>) -> Result<(), SessionError> {
        self.values.insert(key.as_str().to_string(), value.into());
        self.persist()
    }

    pub fn remove(&mut self, key: SessionKey) -> Result<Option<String>, SessionError> {
        let removed = self.values.remove(key.as_str());
        self.persist()?;
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.values.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("yuedu-session-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn in_memory_store_round_trip() {
        let mut store = SessionStore::in_memory();

        store.set(SessionKey::ArticleTitle, "论语").unwrap();
        assert_eq!(store.get(SessionKey::ArticleTitle), Some("论语"));
        assert_eq!(store.get(SessionKey::ArticleContent), None);

        assert_eq!(
            store.remove(SessionKey::ArticleTitle).unwrap().as_deref(),
            Some("论语")
        );
        assert_eq!(store.get(SessionKey::ArticleTitle), None);
    }

    #[test]
    fn file_backed_store_survives_reopen() {
        let path = temp_path("reopen.json");
        let _ = fs::remove_file(&path);

        {
            let mut store = SessionStore::open(&path).unwrap();
            store.set(SessionKey::EntireArticle, "学而时习之").unwrap();
            store.set(SessionKey::AnnotationTaskId, "task-7").unwrap();
        }

        let reopened = SessionStore::open(&path).unwrap();
        assert_eq!(reopened.get(SessionKey::EntireArticle), Some("学而时习之"));
        assert_eq!(reopened.get(SessionKey::AnnotationTaskId), Some("task-7"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn keys_use_stable_names() {
        assert_eq!(SessionKey::ArticleContent.as_str(), "articleContent");
        assert_eq!(SessionKey::AnnotatedWorkText.as_str(), "annotatedWorkText");
    }
}
