use std::collections::HashMap;

use yuedu_types::TermInfo;

/// Lookup results keyed by occurrence key.
///
/// Keys are per rendered occurrence, not per term text: the same word in two
/// places is looked up (and cached) separately, since its context differs.
/// Entries live for the whole session.
#[derive(Debug, Default, Clone)]
pub struct TermCache {
    entries: HashMap<String, TermInfo>,
}

impl TermCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, occurrence_key: &str) -> Option<&TermInfo> {
        self.entries.get(occurrence_key)
    }

    pub fn contains(&self, occurrence_key: &str) -> bool {
        self.entries.contains_key(occurrence_key)
    }

    pub fn insert(&mut self, occurrence_key: impl Into<String>, info: TermInfo) {
        self.entries.insert(occurrence_key.into(), info);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
