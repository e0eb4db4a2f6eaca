//! Laying out an annotated article in terminal cells.

use textwrap::core::display_width;
use yuedu_core::{Article, MarkerPair, parse_line};
use yuedu_types::{Rect, TermClick};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    Plain,
    Term,
    /// The `[n]` number in front of a term
    Label,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub spans: Vec<Span>,
}

/// A clickable term occurrence and where it landed on screen
#[derive(Debug, Clone, PartialEq)]
pub struct TermAnchor {
    pub number: usize,
    pub term: String,
    pub occurrence_key: String,
    pub line: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, Default)]
pub struct ArticleLayout {
    pub rows: Vec<Row>,
    pub terms: Vec<TermAnchor>,
}

struct RowBuilder {
    width: usize,
    rows: Vec<Row>,
    col: usize,
}

impl RowBuilder {
    fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            rows: vec![Row::default()],
            col: 0,
        }
    }

    fn row_index(&self) -> usize {
        self.rows.len() - 1
    }

    fn new_row(&mut self) {
        self.rows.push(Row::default());
        self.col = 0;
    }

    fn push_span(&mut self, text: &str, style: SpanStyle) {
        if text.is_empty() {
            return;
        }
        self.col += display_width(text);
        let Some(row) = self.rows.last_mut() else {
            return;
        };
        match row.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => row.spans.push(Span {
                text: text.to_string(),
                style,
            }),
        }
    }

    /// Plain text, wrapped character by character
    fn push_plain(&mut self, text: &str) {
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let ch = ch.encode_utf8(&mut buf);
            let w = display_width(ch);
            if self.col > 0 && self.col + w > self.width {
                self.new_row();
            }
            self.push_span(ch, SpanStyle::Plain);
        }
    }

    /// Label and term kept together on one row. Returns (row, col) of the term.
    fn push_term(&mut self, label: &str, term: &str) -> (usize, usize) {
        let needed = display_width(label) + display_width(term);
        if self.col > 0 && self.col + needed > self.width {
            self.new_row();
        }
        self.push_span(label, SpanStyle::Label);
        let start = (self.row_index(), self.col);
        self.push_span(term, SpanStyle::Term);
        start
    }
}

impl ArticleLayout {
    /// Lay out `article` in a view `width` cells wide whose first row is at
    /// screen row `top`. Terms are numbered from 1 in reading order.
    pub fn build(article: &Article, markers: &MarkerPair, width: u16, top: u16) -> Self {
        let mut builder = RowBuilder::new(width as usize);
        let mut terms = Vec::new();

        for (base_key, line) in article.keyed_lines() {
            for segment in parse_line(line, markers) {
                if !segment.is_term() {
                    builder.push_plain(&segment.text);
                    continue;
                }

                let number = terms.len() + 1;
                let (row, col) = builder.push_term(&format!("[{number}]"), &segment.text);
                terms.push(TermAnchor {
                    number,
                    term: segment.text.clone(),
                    occurrence_key: segment.occurrence_key(&base_key),
                    line: line.to_string(),
                    rect: Rect::new(
                        (top as usize + row) as f32,
                        col as f32,
                        display_width(&segment.text) as f32,
                        1.0,
                    ),
                });
            }
            builder.new_row();

            if base_key == "author-line" {
                builder.new_row();
            }
        }

        Self {
            rows: builder.rows,
            terms,
        }
    }

    pub fn term(&self, number: usize) -> Option<&TermAnchor> {
        self.terms.iter().find(|t| t.number == number)
    }

    pub fn click(&self, number: usize) -> Option<TermClick> {
        self.term(number).map(|anchor| TermClick {
            term: anchor.term.clone(),
            occurrence_key: anchor.occurrence_key.clone(),
            line: anchor.line.clone(),
            anchor: anchor.rect,
        })
    }
}
