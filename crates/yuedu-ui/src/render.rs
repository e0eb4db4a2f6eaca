//! Drawing [`UiState`] with crossterm.

use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;
use textwrap::core::display_width;

use crate::layout::SpanStyle;
use crate::popup::PopupBox;
use crate::state::{HEADER_ROWS, UiState};

pub const PROMPT: &str = "> ";

pub fn draw(out: &mut impl Write, state: &UiState) -> std::io::Result<()> {
    queue!(out, Clear(ClearType::All))?;

    draw_status(out, state)?;
    draw_article(out, state)?;

    if let (Some(popup_box), Some(position)) = (&state.popup_box, state.popup_position()) {
        draw_popup(out, popup_box, position.top.max(0.0) as u16, position.left.max(0.0) as u16)?;
    }

    draw_footer(out, state)?;
    out.flush()
}

fn draw_status(out: &mut impl Write, state: &UiState) -> std::io::Result<()> {
    let ai = if state.ai_ready { "AI ready" } else { "AI initializing" };
    let busy = if state.busy { " ..." } else { "" };
    let line = truncate(&format!(" 阅读 | {}{busy} | {ai}", state.status), state.cols());

    queue!(
        out,
        MoveTo(0, 0),
        SetAttribute(Attribute::Reverse),
        Print(format!("{line:<width$}", width = state.cols() as usize)),
        SetAttribute(Attribute::Reset)
    )
}

fn draw_article(out: &mut impl Write, state: &UiState) -> std::io::Result<()> {
    let rows = state
        .layout
        .rows
        .iter()
        .skip(state.scroll)
        .take(state.body_rows());

    for (offset, row) in rows.enumerate() {
        queue!(out, MoveTo(0, HEADER_ROWS + offset as u16))?;
        for span in &row.spans {
            match span.style {
                SpanStyle::Plain => queue!(out, Print(&span.text))?,
                SpanStyle::Label => queue!(
                    out,
                    SetForegroundColor(Color::DarkGrey),
                    Print(&span.text),
                    ResetColor
                )?,
                SpanStyle::Term => queue!(
                    out,
                    SetForegroundColor(Color::Cyan),
                    SetAttribute(Attribute::Underlined),
                    Print(&span.text),
                    SetAttribute(Attribute::Reset),
                    ResetColor
                )?,
            }
        }
    }
    Ok(())
}

fn draw_popup(out: &mut impl Write, popup: &PopupBox, top: u16, left: u16) -> std::io::Result<()> {
    let inner = popup.width.saturating_sub(2) as usize;
    let border = "─".repeat(inner);

    queue!(out, MoveTo(left, top), Print(format!("┌{border}┐")))?;
    for (i, line) in popup.lines.iter().enumerate() {
        let pad = inner.saturating_sub(display_width(line) + 1);
        queue!(
            out,
            MoveTo(left, top + 1 + i as u16),
            Print(format!("│ {line}{}│", " ".repeat(pad)))
        )?;
    }
    queue!(
        out,
        MoveTo(left, top + 1 + popup.lines.len() as u16),
        Print(format!("└{border}┘"))
    )
}

fn draw_footer(out: &mut impl Write, state: &UiState) -> std::io::Result<()> {
    let rows = state.viewport.height as u16;
    let message_row = rows.saturating_sub(2);

    if let Some(message) = &state.message {
        queue!(
            out,
            MoveTo(0, message_row),
            SetForegroundColor(Color::Red),
            Print(truncate(message, state.cols())),
            ResetColor
        )?;
    }
    queue!(out, MoveTo(0, rows.saturating_sub(1)), Print(PROMPT))
}

/// Cut `text` to at most `width` display cells
fn truncate(text: &str, width: u16) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|ch| {
            used += display_width(ch.encode_utf8(&mut [0u8; 4]));
            used <= width as usize
        })
        .collect()
}
