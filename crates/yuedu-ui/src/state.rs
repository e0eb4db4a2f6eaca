use yuedu_config::UiConfig;
use yuedu_core::{Article, MarkerPair, PopupPlacement};
use yuedu_types::{PopupView, Position, Rect, Size, TermClick};

use crate::layout::ArticleLayout;
use crate::popup::PopupBox;

/// Rows above the article (status bar)
pub const HEADER_ROWS: u16 = 1;
/// Rows below the article (message and prompt)
pub const FOOTER_ROWS: u16 = 2;

/// UI-side state, owned by the UI loop
pub struct UiState {
    pub article: Option<Article>,
    pub layout: ArticleLayout,
    pub scroll: usize,
    pub popup: PopupView,
    pub popup_box: Option<PopupBox>,
    pub placement: PopupPlacement,
    pub status: String,
    pub busy: bool,
    pub ai_ready: bool,
    pub message: Option<String>,
    pub viewport: Size,
    markers: MarkerPair,
    gap: f32,
    popup_max_width: u16,
}

impl UiState {
    pub fn new(config: &UiConfig, viewport: (u16, u16)) -> Self {
        Self {
            article: None,
            layout: ArticleLayout::default(),
            scroll: 0,
            popup: PopupView::default(),
            popup_box: None,
            placement: PopupPlacement::new(),
            status: "Enter an article URL".to_string(),
            busy: false,
            ai_ready: false,
            message: None,
            viewport: Size::new(viewport.0 as f32, viewport.1 as f32),
            markers: MarkerPair::new(&config.start_marker, &config.end_marker),
            gap: config.popup_gap,
            popup_max_width: config.popup_max_width,
        }
    }

    pub fn cols(&self) -> u16 {
        self.viewport.width as u16
    }

    /// Rows available to the article
    pub fn body_rows(&self) -> usize {
        (self.viewport.height as u16).saturating_sub(HEADER_ROWS + FOOTER_ROWS) as usize
    }

    pub fn show_article(&mut self, content: &str) {
        self.article = Some(Article::parse(content));
        self.scroll = 0;
        self.message = None;
        self.hide_popup();
        self.relayout();
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.viewport = Size::new(cols as f32, rows as f32);
        self.relayout();
        self.reposition();
    }

    fn relayout(&mut self) {
        self.layout = match &self.article {
            Some(article) => ArticleLayout::build(article, &self.markers, self.cols(), 0),
            None => ArticleLayout::default(),
        };
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn max_scroll(&self) -> usize {
        self.layout.rows.len().saturating_sub(self.body_rows())
    }

    /// Scroll by whole pages; negative goes up
    pub fn page(&mut self, pages: isize) {
        let step = self.body_rows().max(1) as isize * pages;
        let next = (self.scroll as isize + step).clamp(0, self.max_scroll() as isize);
        self.scroll = next as usize;
        self.reposition();
    }

    /// Document-space rect to screen-space, if the row is on screen
    fn to_screen(&self, rect: Rect) -> Option<Rect> {
        let row = rect.top as usize;
        if row < self.scroll || row >= self.scroll + self.body_rows() {
            return None;
        }
        let top = (row - self.scroll) as f32 + HEADER_ROWS as f32;
        Some(Rect { top, ..rect })
    }

    /// Build the click for term `number`, scrolling it into view first
    pub fn click(&mut self, number: usize) -> Option<TermClick> {
        let row = self.layout.term(number)?.rect.top as usize;
        if self.to_screen(self.layout.term(number)?.rect).is_none() {
            self.scroll = row.saturating_sub(self.body_rows() / 2).min(self.max_scroll());
        }

        let mut click = self.layout.click(number)?;
        click.anchor = self.to_screen(click.anchor)?;
        Some(click)
    }

    pub fn show_popup(&mut self, view: PopupView) {
        self.popup = view;
        self.reposition();
    }

    pub fn hide_popup(&mut self) {
        self.popup = PopupView::default();
        self.popup_box = None;
        self.placement.reset();
    }

    /// Recompute the popup box and where it goes
    pub fn reposition(&mut self) {
        // keep a gap on both sides
        let room = (self.cols() as f32 - 2.0 * self.gap).max(0.0) as u16;
        self.popup_box = PopupBox::from_view(&self.popup, self.popup_max_width.min(room));

        let anchor = self
            .popup
            .occurrence_key
            .as_deref()
            .and_then(|key| self.layout.terms.iter().find(|t| t.occurrence_key == key))
            .and_then(|t| self.to_screen(t.rect))
            .or(self.popup.anchor);

        match (&self.popup_box, anchor) {
            (Some(popup_box), Some(anchor)) => {
                self.placement
                    .update(anchor, popup_box.size(), self.viewport, self.gap);
            }
            _ => self.placement.reset(),
        }
    }

    pub fn popup_position(&self) -> Option<Position> {
        self.placement.position()
    }
}
