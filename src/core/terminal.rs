//! Terminal driver traits and an in-memory driver.

use std::collections::VecDeque;
use std::io;

use unicode_segmentation::UnicodeSegmentation;

use crate::core::geometry::{Point, Size};
use crate::core::input::{InputToken, MouseEvent};
use crate::core::text::ansi::escape_at;
use crate::core::text::width::grapheme_width;

/// Output side of a terminal.
pub trait Terminal {
    /// Enter raw mode and whatever else the driver needs before drawing.
    fn start(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Undo `start`.
    fn stop(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn write(&mut self, data: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    /// `(columns, rows)`.
    fn size(&self) -> Size;

    /// Top-left cell.
    fn origin(&self) -> Point {
        (1, 1)
    }

    /// Current cursor position, if the terminal answers.
    fn query_cursor(&mut self) -> io::Result<Option<Point>>;
}

/// Input side of a terminal.
pub trait InputSource {
    /// Block until the next token; `None` once input is exhausted.
    fn next_token(&mut self) -> io::Result<Option<InputToken>>;
}

/// A terminal that keeps everything in memory.
///
/// Output is recorded verbatim and also replayed onto a character grid, so tests can
/// assert on either the byte stream or what a user would see. Input is a scripted
/// queue of tokens.
#[derive(Debug, Clone)]
pub struct VirtualTerminal {
    size: Size,
    output: String,
    tokens: VecDeque<InputToken>,
    grid: Vec<Vec<String>>,
    cursor: Point,
    flushes: usize,
    running: bool,
}

impl VirtualTerminal {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            size: (columns, rows),
            output: String::new(),
            tokens: VecDeque::new(),
            grid: blank_grid((columns, rows)),
            cursor: (1, 1),
            flushes: 0,
            running: false,
        }
    }

    /// Change the size and queue the matching resize token.
    pub fn resize(&mut self, columns: usize, rows: usize) {
        self.set_size(columns, rows);
        self.tokens.push_back(InputToken::Resize((columns, rows)));
    }

    /// Change the size without notifying anyone. Cells inside the new size keep their
    /// contents; only an explicit clear blanks them.
    pub fn set_size(&mut self, columns: usize, rows: usize) {
        self.size = (columns, rows);
        self.grid.resize_with(rows, Vec::new);
        for row in &mut self.grid {
            row.resize(columns, " ".to_string());
        }
    }

    pub fn push_token(&mut self, token: InputToken) {
        self.tokens.push_back(token);
    }

    pub fn push_keys<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        self.tokens
            .extend(keys.into_iter().map(|key| InputToken::Key(key.to_string())));
    }

    pub fn push_mouse(&mut self, event: MouseEvent) {
        self.tokens.push_back(InputToken::Mouse(event));
    }

    pub fn pending_tokens(&self) -> usize {
        self.tokens.len()
    }

    /// Everything written so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Visible rows, escape sequences stripped and trailing blanks trimmed.
    pub fn screen(&self) -> Vec<String> {
        self.grid
            .iter()
            .map(|row| row.concat().trim_end().to_string())
            .collect()
    }

    fn replay(&mut self, data: &str) {
        let mut idx = 0;
        while idx < data.len() {
            if let Some(seq) = escape_at(data, idx) {
                self.apply_escape(seq.code);
                idx += seq.len();
                continue;
            }
            let end = data[idx..]
                .char_indices()
                .skip(1)
                .find(|(offset, _)| escape_at(data, idx + offset).is_some())
                .map_or(data.len(), |(offset, _)| idx + offset);
            for grapheme in data[idx..end].graphemes(true) {
                self.put(grapheme);
            }
            idx = end;
        }
    }

    fn apply_escape(&mut self, code: &str) {
        if code == "\x1b[2J" {
            self.grid = blank_grid(self.size);
            return;
        }
        let Some(body) = code.strip_prefix("\x1b[").and_then(|rest| rest.strip_suffix('H')) else {
            return;
        };
        let mut parts = body.split(';').map(|part| part.parse::<i32>().unwrap_or(1));
        let y = parts.next().unwrap_or(1);
        let x = parts.next().unwrap_or(1);
        self.cursor = (x, y);
    }

    fn put(&mut self, grapheme: &str) {
        if grapheme == "\n" {
            self.cursor = (1, self.cursor.1 + 1);
            return;
        }
        let width = grapheme_width(grapheme);
        let (x, y) = self.cursor;
        if x >= 1 && y >= 1 {
            let (col, row) = ((x - 1) as usize, (y - 1) as usize);
            if let Some(cells) = self.grid.get_mut(row) {
                if col < cells.len() {
                    cells[col] = grapheme.to_string();
                    for filler in cells.iter_mut().skip(col + 1).take(width.saturating_sub(1)) {
                        filler.clear();
                    }
                }
            }
        }
        self.cursor.0 += width.max(1) as i32;
    }
}

fn blank_grid((columns, rows): Size) -> Vec<Vec<String>> {
    vec![vec![" ".to_string(); columns]; rows]
}

impl Terminal for VirtualTerminal {
    fn start(&mut self) -> io::Result<()> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        self.running = false;
        Ok(())
    }

    fn write(&mut self, data: &str) -> io::Result<()> {
        self.output.push_str(data);
        self.replay(data);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn size(&self) -> Size {
        self.size
    }

    fn query_cursor(&mut self) -> io::Result<Option<Point>> {
        Ok(Some(self.cursor))
    }
}

impl InputSource for VirtualTerminal {
    fn next_token(&mut self) -> io::Result<Option<InputToken>> {
        Ok(self.tokens.pop_front())
    }
}
