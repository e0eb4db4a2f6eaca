//! Popup content as terminal lines.

use textwrap::core::display_width;
use yuedu_types::{PopupPhase, PopupView, Size};

pub const LOADING: &str = "Loading...";
pub const NO_DEFINITION: &str = "Definition not available.";
pub const NO_EXAMPLE: &str = "Example not available.";

/// A popup laid out as framed lines, ready to draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupBox {
    pub lines: Vec<String>,
    pub width: u16,
}

impl PopupBox {
    /// `None` when the popup is hidden. The box never exceeds `max_width`
    /// columns; text that cannot wrap narrowly enough is cut.
    pub fn from_view(view: &PopupView, max_width: u16) -> Option<Self> {
        let inner = max_width.saturating_sub(4) as usize;
        let mut lines = Vec::new();

        let heading = match &view.pinyin {
            Some(pinyin) if view.phase() == PopupPhase::ShownWithData => {
                format!("{} ({pinyin})", view.term)
            }
            _ => view.term.clone(),
        };
        lines.extend(wrap(&heading, inner));

        match view.phase() {
            PopupPhase::Hidden => return None,
            PopupPhase::Loading => lines.push(LOADING.to_string()),
            PopupPhase::ShownWithError => {
                let error = view.error.as_deref().unwrap_or_default();
                lines.extend(wrap(&format!("Error: {error}"), inner));
            }
            PopupPhase::ShownWithData => {
                lines.push(String::new());
                lines.extend(wrap(
                    view.definition.as_deref().unwrap_or(NO_DEFINITION),
                    inner,
                ));
                lines.push(String::new());
                lines.extend(wrap(
                    &format!("例: {}", view.example.as_deref().unwrap_or(NO_EXAMPLE)),
                    inner,
                ));
            }
        }

        let content = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
        Some(Self {
            lines,
            width: ((content + 4) as u16).min(max_width),
        })
    }

    /// Outer size including the frame
    pub fn size(&self) -> Size {
        Size::new(self.width as f32, (self.lines.len() + 2) as f32)
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    textwrap::wrap(text, width.max(1))
        .into_iter()
        .map(|line| clip(&line, width))
        .collect()
}

/// Longest prefix of `line` at most `width` cells wide
fn clip(line: &str, width: usize) -> String {
    let mut used = 0;
    line.chars()
        .take_while(|ch| {
            used += display_width(ch.encode_utf8(&mut [0u8; 4]));
            used <= width
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use yuedu_types::Rect;

    fn shown(view: PopupView) -> PopupView {
        PopupView {
            term: "读书".into(),
            anchor: Some(Rect::new(5.0, 5.0, 4.0, 1.0)),
            occurrence_key: Some("line-0-term-2".into()),
            ..view
        }
    }

    #[test]
    fn hidden_popup_has_no_box() {
        assert!(PopupBox::from_view(&PopupView::default(), 40).is_none());
    }

    #[test]
    fn loading_popup_shows_term_and_indicator() {
        let view = shown(PopupView {
            loading: true,
            ..PopupView::default()
        });

        let popup = PopupBox::from_view(&view, 40).unwrap();

        assert_eq!(popup.lines, vec!["读书", LOADING]);
        assert_eq!(popup.size().height, 4.0);
    }

    #[test]
    fn missing_fields_use_fallback_text() {
        let view = shown(PopupView {
            pinyin: Some("dú shū".into()),
            ..PopupView::default()
        });

        let popup = PopupBox::from_view(&view, 40).unwrap();

        assert_eq!(popup.lines[0], "读书 (dú shū)");
        assert!(popup.lines.contains(&NO_DEFINITION.to_string()));
        assert!(popup.lines.iter().any(|l| l.contains(NO_EXAMPLE)));
    }

    #[test]
    fn error_popup_shows_message() {
        let view = shown(PopupView {
            error: Some("boom".into()),
            ..PopupView::default()
        });

        let popup = PopupBox::from_view(&view, 40).unwrap();

        assert_eq!(popup.lines, vec!["读书", "Error: boom"]);
    }

    #[test]
    fn long_definitions_wrap_within_max_width() {
        let view = shown(PopupView {
            definition: Some("to read books; to study; to attend school as a pupil".into()),
            ..PopupView::default()
        });

        let popup = PopupBox::from_view(&view, 20).unwrap();

        assert!(popup.width <= 20);
        assert!(popup.lines.len() > 4);
    }

    #[test]
    fn narrow_terminal_keeps_popup_inside() {
        let view = shown(PopupView {
            pinyin: Some("dú shū".into()),
            definition: Some("to read books".into()),
            example: Some("我喜欢读书。".into()),
            ..PopupView::default()
        });

        for cols in [1, 3, 6, 9, 11] {
            let popup = PopupBox::from_view(&view, cols).unwrap();
            assert!(popup.width <= cols, "{} > {cols}", popup.width);
            assert!(
                popup
                    .lines
                    .iter()
                    .all(|l| display_width(l) <= cols.saturating_sub(4) as usize)
            );
        }
    }
}
