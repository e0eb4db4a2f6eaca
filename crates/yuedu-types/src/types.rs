use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// User submitted an article URL
    SubmitUrl(String),
    /// Backend extraction finished. `submission` is the generation the
    /// request was started under; older generations are dropped.
    SubmitFinished {
        submission: u64,
        outcome: Result<Submission, String>,
    },
    /// Local AI annotation of the extracted article finished
    ArticleAnnotated {
        submission: u64,
        outcome: Result<String, String>,
    },
    /// Reload the article stored in the session
    ResumeSession,
    TermClicked(TermClick),
    /// A lookup task finished; applied only if `token` is still current
    LookupFinished {
        token: RequestToken,
        outcome: Result<TermInfo, String>,
    },
    ClosePopup,
    AnnotationProgress {
        submission: u64,
        status: AnnotationStatus,
    },
    AiReady,
    Quit,

    ShowArticle(String),
    ShowPopup(PopupView),
    HidePopup,
    InputError(String),
    StatusUpdate {
        status: String,
        busy: bool,
    },
}

/// Result of submitting an article URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Extracted article text, to be annotated on this side
    Extracted { title: Option<String>, text: String },
    /// The backend annotates on its own; poll this task
    Task { task_id: String },
}

/// One click on a rendered term occurrence
#[derive(Debug, Clone, PartialEq)]
pub struct TermClick {
    pub term: String,
    pub occurrence_key: String,
    /// Raw annotated line the term was rendered from
    pub line: String,
    pub anchor: Rect,
}

/// Identifies one issued lookup. Only the most recent token is live.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestToken {
    pub occurrence_key: String,
    pub generation: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermInfo {
    pub pinyin: Option<String>,
    pub definition: Option<String>,
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationStatus {
    Pending,
    Completed { annotated_text: String },
    Failed { error: String },
}

impl AnnotationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AnnotationStatus::Pending)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PopupPhase {
    #[default]
    Hidden,
    Loading,
    ShownWithData,
    ShownWithError,
}

/// Everything the popup needs to draw itself
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupView {
    pub term: String,
    pub pinyin: Option<String>,
    pub definition: Option<String>,
    pub example: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub anchor: Option<Rect>,
    pub occurrence_key: Option<String>,
}

impl PopupView {
    pub fn phase(&self) -> PopupPhase {
        if self.occurrence_key.is_none() || self.anchor.is_none() {
            PopupPhase::Hidden
        } else if self.loading {
            PopupPhase::Loading
        } else if self.error.is_some() {
            PopupPhase::ShownWithError
        } else {
            PopupPhase::ShownWithData
        }
    }

    pub fn is_visible(&self) -> bool {
        self.phase() != PopupPhase::Hidden
    }
}

/// Screen rectangle, in whatever unit the view measures in
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub top: f32,
    pub left: f32,
}
