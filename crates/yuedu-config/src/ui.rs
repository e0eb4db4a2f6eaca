use serde::{Deserialize, Serialize};

fn default_popup_gap() -> f32 {
    1.0
}

fn default_popup_max_width() -> u16 {
    40
}

fn default_viewport() -> (u16, u16) {
    (80, 24)
}

fn default_start_marker() -> String {
    "<".to_string()
}

fn default_end_marker() -> String {
    ">".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    /// Margin kept between popup, anchor and viewport edges (cells)
    #[serde(default = "default_popup_gap")]
    pub popup_gap: f32,
    #[serde(default = "default_popup_max_width")]
    pub popup_max_width: u16,
    /// Used when the terminal size can't be queried
    #[serde(default = "default_viewport")]
    pub fallback_viewport: (u16, u16),
    #[serde(default = "default_start_marker")]
    pub start_marker: String,
    #[serde(default = "default_end_marker")]
    pub end_marker: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            popup_gap: default_popup_gap(),
            popup_max_width: default_popup_max_width(),
            fallback_viewport: default_viewport(),
            start_marker: default_start_marker(),
            end_marker: default_end_marker(),
        }
    }
}

impl UiConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
