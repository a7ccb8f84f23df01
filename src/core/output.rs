//! Typed terminal output commands, escape encoders and the single output gate.
//!
//! Invariant: widgets and the session never call `Terminal::write` directly; all
//! terminal writes flow through `OutputGate::flush(..)`.

use std::io;

use crate::core::geometry::Point;
use crate::core::terminal::Terminal;

pub const CLEAR_SCREEN: &str = "\x1b[2J";
pub const RESET: &str = "\x1b[0m";

const MODES: [(&str, u8); 9] = [
    ("reset", 0),
    ("bold", 1),
    ("dim", 2),
    ("italic", 3),
    ("underline", 4),
    ("blink", 5),
    ("inverse", 7),
    ("invisible", 8),
    ("strikethrough", 9),
];

/// SGR sequence for a display mode given by name (`"bold"`) or number (`"1"`).
pub fn set_mode(mode: &str) -> Option<String> {
    let code = match mode.parse::<u8>() {
        Ok(code) => code,
        Err(_) => MODES.iter().find(|(name, _)| *name == mode)?.1,
    };
    Some(format!("\x1b[{code}m"))
}

pub fn foreground256(color: u8) -> String {
    format!("\x1b[38;5;{color}m")
}

pub fn background256(color: u8) -> String {
    format!("\x1b[48;5;{color}m")
}

pub fn foreground_rgb((red, green, blue): (u8, u8, u8)) -> String {
    format!("\x1b[38;2;{red};{green};{blue}m")
}

pub fn background_rgb((red, green, blue): (u8, u8, u8)) -> String {
    format!("\x1b[48;2;{red};{green};{blue}m")
}

/// Cursor position sequence; `pos` is `(x, y)`.
pub fn move_cursor((x, y): Point) -> String {
    format!("\x1b[{y};{x}H")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCmd {
    /// Raw bytes/control sequences (UTF-8 string) to be written to the terminal.
    Bytes(String),
    BytesStatic(&'static str),

    MoveTo(Point),
    ClearScreen,

    HideCursor,
    ShowCursor,

    AltBufferEnter,
    AltBufferLeave,

    /// Press/release reporting in SGR encoding.
    MouseReportingEnable,
    MouseReportingDisable,

    /// Ask for a cursor position report (`ESC [ y ; x R`).
    QueryCursor,
}

impl TerminalCmd {
    pub fn bytes(data: impl Into<String>) -> Self {
        Self::Bytes(data.into())
    }

    fn encode(self) -> std::borrow::Cow<'static, str> {
        match self {
            Self::Bytes(data) => data.into(),
            Self::BytesStatic(data) => data.into(),
            Self::MoveTo(pos) => move_cursor(pos).into(),
            Self::ClearScreen => CLEAR_SCREEN.into(),
            Self::HideCursor => "\x1b[?25l".into(),
            Self::ShowCursor => "\x1b[?25h".into(),
            Self::AltBufferEnter => "\x1b[?1049h".into(),
            Self::AltBufferLeave => "\x1b[?1049l".into(),
            Self::MouseReportingEnable => "\x1b[?1002h\x1b[?1006h".into(),
            Self::MouseReportingDisable => "\x1b[?1002l\x1b[?1006l".into(),
            Self::QueryCursor => "\x1b[6n".into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct OutputGate {
    cmds: Vec<TerminalCmd>,
}

impl OutputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: TerminalCmd) {
        self.cmds.push(cmd);
    }

    pub fn extend<I>(&mut self, cmds: I)
    where
        I: IntoIterator<Item = TerminalCmd>,
    {
        self.cmds.extend(cmds);
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    /// Write every buffered command, then flush the terminal once.
    pub fn flush<T: Terminal + ?Sized>(&mut self, term: &mut T) -> io::Result<()> {
        if self.cmds.is_empty() {
            return Ok(());
        }
        let mut buffer = String::new();
        for cmd in self.cmds.drain(..) {
            buffer.push_str(&cmd.encode());
        }
        term.write(&buffer)?;
        term.flush()
    }
}
