//! Turns canvases into crossterm command streams.
//!
//! Encoding goes into a `Vec<u8>` first; [`Screen`] is the only type that
//! touches stdout.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};
use match3_core::Board;

use crate::board_view::BoardView;
use crate::fb::{Canvas, Rgb, Style};

/// Styled text for `board`, top row first, one line per row.
///
/// No cursor movement or screen clearing, so the result can be printed inline.
pub fn render_board(board: &Board, out: &mut Vec<u8>) -> Result<()> {
    let mut canvas = Canvas::default();
    BoardView::default().draw_board(board, &[], &mut canvas);
    encode_lines_into(&canvas, out)
}

/// Encode every line of `canvas` separated by newlines.
pub fn encode_lines_into(canvas: &Canvas, out: &mut Vec<u8>) -> Result<()> {
    let mut style = None;
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            let glyph = canvas.get(x, y).unwrap_or_default();
            if style != Some(glyph.style) {
                queue_style(out, glyph.style)?;
                style = Some(glyph.style);
            }
            out.queue(Print(glyph.ch))?;
        }
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
        style = None;
        out.queue(Print("\n"))?;
    }
    Ok(())
}

/// Encode only the glyphs that differ from `prev`, positioned with `MoveTo`.
///
/// A size change redraws everything.
pub fn encode_changes_into(prev: &Canvas, next: &Canvas, out: &mut Vec<u8>) -> Result<()> {
    let resized = prev.width() != next.width() || prev.height() != next.height();
    if resized {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
    }

    let mut style = None;
    for y in 0..next.height() {
        let mut cursor_at = None;
        for x in 0..next.width() {
            let glyph = next.get(x, y).unwrap_or_default();
            if !resized && prev.get(x, y) == Some(glyph) {
                continue;
            }
            if cursor_at != Some(x) {
                out.queue(cursor::MoveTo(x, y))?;
            }
            if style != Some(glyph.style) {
                queue_style(out, glyph.style)?;
                style = Some(glyph.style);
            }
            out.queue(Print(glyph.ch))?;
            cursor_at = Some(x + 1);
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn queue_style(out: &mut Vec<u8>, style: Style) -> Result<()> {
    out.queue(SetForegroundColor(color(style.fg)))?;
    out.queue(SetBackgroundColor(color(style.bg)))?;
    out.queue(SetAttribute(if style.bold {
        Attribute::Bold
    } else {
        Attribute::NormalIntensity
    }))?;
    Ok(())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Alternate-screen terminal that redraws by diffing against the last canvas.
pub struct Screen {
    stdout: io::Stdout,
    last: Canvas,
    buf: Vec<u8>,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: Canvas::default(),
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        self.flush()
    }

    pub fn leave(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush()
    }

    /// Draw `canvas`, keeping it as the base for the next diff.
    pub fn draw(&mut self, canvas: &Canvas) -> Result<()> {
        self.buf.clear();
        encode_changes_into(&self.last, canvas, &mut self.buf)?;
        self.flush()?;
        self.last.clone_from(canvas);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use match3_core::BoardConfig;
    use std::sync::Arc;

    fn visible_text(bytes: &[u8]) -> String {
        // Strip CSI sequences: ESC [ ... final byte in 0x40..=0x7E.
        let mut out = String::new();
        let mut chars = std::str::from_utf8(bytes).unwrap().chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                if chars.next_if_eq(&'[').is_some() {
                    for c in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&c) {
                            break;
                        }
                    }
                }
                continue;
            }
            out.push(c);
        }
        out
    }

    #[test]
    fn render_board_prints_rows_top_first() {
        let config = Arc::new(BoardConfig::full(2, 2, 4).unwrap());
        let board = Board::from_types(config, &[1, 2, 3, 4]).unwrap();
        let mut out = Vec::new();
        render_board(&board, &mut out).unwrap();

        let text = visible_text(&out);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["+----+", "|3 4 |", "|1 2 |", "+----+"]);
    }

    #[test]
    fn unchanged_canvas_encodes_no_glyphs() {
        let mut a = Canvas::new(4, 2);
        a.put_str(0, 0, "abcd", Style::default());
        let mut out = Vec::new();
        encode_changes_into(&a, &a.clone(), &mut out).unwrap();
        assert_eq!(visible_text(&out), "");

        let mut b = a.clone();
        b.put(2, 1, 'z', Style::default());
        out.clear();
        encode_changes_into(&a, &b, &mut out).unwrap();
        assert_eq!(visible_text(&out), "z");
    }
}
