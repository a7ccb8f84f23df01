//! Input tokens and decoding of raw terminal input into them.

use crate::core::geometry::{Point, Size};
use crate::core::text::ansi::escape_at;

/// Normalized key names produced by [`decode`] and used in bindings.
pub mod keys {
    pub const UP: &str = "up";
    pub const DOWN: &str = "down";
    pub const LEFT: &str = "left";
    pub const RIGHT: &str = "right";
    pub const HOME: &str = "home";
    pub const END: &str = "end";
    pub const PAGE_UP: &str = "pageUp";
    pub const PAGE_DOWN: &str = "pageDown";
    pub const INSERT: &str = "insert";
    pub const DELETE: &str = "delete";
    pub const ENTER: &str = "enter";
    pub const ESCAPE: &str = "escape";
    pub const TAB: &str = "tab";
    pub const SHIFT_TAB: &str = "shift+tab";
    pub const BACKSPACE: &str = "backspace";
    pub const SPACE: &str = " ";
    pub const CTRL_C: &str = "ctrl+c";
    pub const CTRL_N: &str = "ctrl+n";
    pub const CTRL_P: &str = "ctrl+p";

    /// Wildcard binding key: runs for every keystroke, before exact-key bindings.
    pub const ANY_KEY: &str = "<any>";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    LeftClick,
    LeftDrag,
    RightClick,
    RightDrag,
    ScrollUp,
    ScrollDown,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub action: MouseAction,
    pub pos: Point,
}

impl MouseEvent {
    pub fn new(action: MouseAction, pos: Point) -> Self {
        Self { action, pos }
    }
}

/// One unit of input delivered to the widget tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputToken {
    Key(String),
    Mouse(MouseEvent),
    /// The terminal now has this size.
    Resize(Size),
}

impl InputToken {
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }
}

/// Split a chunk of raw terminal input into tokens.
///
/// Escape sequences become named keys (`"up"`, `"pageDown"`, ...), SGR mouse reports become
/// [`InputToken::Mouse`], control bytes become `ctrl+<letter>`, and everything else is passed
/// through one character at a time. Unrecognized escape sequences are dropped.
pub fn decode(raw: &str) -> Vec<InputToken> {
    let mut tokens = Vec::new();
    let mut idx = 0;

    while idx < raw.len() {
        let rest = &raw[idx..];

        if let Some(seq) = escape_at(raw, idx) {
            if let Some(event) = parse_sgr_mouse(seq.code) {
                tokens.push(InputToken::Mouse(event));
            } else if let Some(key) = escape_key(seq.code) {
                tokens.push(InputToken::key(key));
            }
            idx += seq.len();
            continue;
        }

        if let Some(alt) = rest.strip_prefix('\x1b') {
            match alt.chars().next() {
                Some(ch) if ch != '\x1b' => {
                    tokens.push(InputToken::Key(alt_key(ch)));
                    idx += 1 + ch.len_utf8();
                }
                _ => {
                    tokens.push(InputToken::key(keys::ESCAPE));
                    idx += 1;
                }
            }
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        tokens.push(InputToken::Key(char_key(ch)));
        idx += ch.len_utf8();
    }

    tokens
}

fn char_key(ch: char) -> String {
    match ch {
        '\r' | '\n' => keys::ENTER.to_string(),
        '\t' => keys::TAB.to_string(),
        '\x7f' | '\x08' => keys::BACKSPACE.to_string(),
        '\x00' => "ctrl+space".to_string(),
        '\x01'..='\x1a' => format!("ctrl+{}", (ch as u8 + 96) as char),
        _ => ch.to_string(),
    }
}

fn alt_key(ch: char) -> String {
    match ch {
        '\r' => "alt+enter".to_string(),
        '\x7f' | '\x08' => "alt+backspace".to_string(),
        '\x01'..='\x1a' => format!("ctrl+alt+{}", (ch as u8 + 96) as char),
        _ => format!("alt+{ch}"),
    }
}

fn escape_key(code: &str) -> Option<&'static str> {
    let key = match code {
        "\x1b[A" | "\x1bOA" => keys::UP,
        "\x1b[B" | "\x1bOB" => keys::DOWN,
        "\x1b[C" | "\x1bOC" => keys::RIGHT,
        "\x1b[D" | "\x1bOD" => keys::LEFT,
        "\x1b[H" | "\x1bOH" | "\x1b[1~" | "\x1b[7~" => keys::HOME,
        "\x1b[F" | "\x1bOF" | "\x1b[4~" | "\x1b[8~" => keys::END,
        "\x1b[2~" => keys::INSERT,
        "\x1b[3~" => keys::DELETE,
        "\x1b[5~" => keys::PAGE_UP,
        "\x1b[6~" => keys::PAGE_DOWN,
        "\x1b[Z" => keys::SHIFT_TAB,
        "\x1bOM" => keys::ENTER,
        "\x1b[1;5A" => "ctrl+up",
        "\x1b[1;5B" => "ctrl+down",
        "\x1b[1;5C" => "ctrl+right",
        "\x1b[1;5D" => "ctrl+left",
        "\x1bOP" | "\x1b[11~" => "f1",
        "\x1bOQ" | "\x1b[12~" => "f2",
        "\x1bOR" | "\x1b[13~" => "f3",
        "\x1bOS" | "\x1b[14~" => "f4",
        "\x1b[15~" => "f5",
        "\x1b[17~" => "f6",
        "\x1b[18~" => "f7",
        "\x1b[19~" => "f8",
        "\x1b[20~" => "f9",
        "\x1b[21~" => "f10",
        "\x1b[23~" => "f11",
        "\x1b[24~" => "f12",
        _ => return None,
    };
    Some(key)
}

/// `ESC [ < button ; x ; y (M|m)`
fn parse_sgr_mouse(code: &str) -> Option<MouseEvent> {
    let body = code.strip_prefix("\x1b[<")?;
    let (params, pressed) = match body.strip_suffix('M') {
        Some(params) => (params, true),
        None => (body.strip_suffix('m')?, false),
    };

    let mut parts = params.split(';').map(str::parse::<i32>);
    let button = parts.next()?.ok()?;
    let x = parts.next()?.ok()?;
    let y = parts.next()?.ok()?;

    // Shift/meta/ctrl bits do not change the action.
    let button = button & !0b1_1100;
    let action = if !pressed {
        MouseAction::Release
    } else {
        match button {
            0 => MouseAction::LeftClick,
            32 => MouseAction::LeftDrag,
            2 => MouseAction::RightClick,
            34 => MouseAction::RightDrag,
            64 => MouseAction::ScrollUp,
            65 => MouseAction::ScrollDown,
            _ => return None,
        }
    };

    Some(MouseEvent::new(action, (x, y)))
}

/// Parse a cursor position report, `ESC [ y ; x R`, into `(x, y)`.
pub fn parse_cursor_report(raw: &str) -> Option<Point> {
    let body = raw.strip_prefix("\x1b[")?.strip_suffix('R')?;
    let (y, x) = body.split_once(';')?;
    Some((x.parse().ok()?, y.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_of(raw: &str) -> Vec<String> {
        decode(raw)
            .into_iter()
            .filter_map(|token| match token {
                InputToken::Key(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn arrows_and_printables() {
        assert_eq!(keys_of("\x1b[Aj\x1bOB"), vec!["up", "j", "down"]);
        assert_eq!(keys_of("é\r"), vec!["é", "enter"]);
    }

    #[test]
    fn control_and_alt_keys() {
        assert_eq!(keys_of("\x0e\x10"), vec!["ctrl+n", "ctrl+p"]);
        assert_eq!(keys_of("\x1bx"), vec!["alt+x"]);
        assert_eq!(keys_of("\x1b"), vec!["escape"]);
    }

    #[test]
    fn sgr_mouse_reports() {
        assert_eq!(
            decode("\x1b[<0;12;5M\x1b[<0;12;5m"),
            vec![
                InputToken::Mouse(MouseEvent::new(MouseAction::LeftClick, (12, 5))),
                InputToken::Mouse(MouseEvent::new(MouseAction::Release, (12, 5))),
            ]
        );
        assert_eq!(
            decode("\x1b[<32;3;4M\x1b[<65;1;1M"),
            vec![
                InputToken::Mouse(MouseEvent::new(MouseAction::LeftDrag, (3, 4))),
                InputToken::Mouse(MouseEvent::new(MouseAction::ScrollDown, (1, 1))),
            ]
        );
    }

    #[test]
    fn cursor_reports_are_x_then_y() {
        assert_eq!(parse_cursor_report("\x1b[7;20R"), Some((20, 7)));
        assert_eq!(parse_cursor_report("\x1b[7R"), None);
    }
}
