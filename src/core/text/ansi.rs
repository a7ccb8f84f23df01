//! Escape-sequence scanning and SGR state tracking.

/// An escape sequence found at some byte offset of a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeSeq<'a> {
    pub code: &'a str,
    pub kind: EscapeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeKind {
    Csi,
    Osc,
    Ss3,
    /// APC/DCS strings; kept opaque.
    Other,
}

impl EscapeSeq<'_> {
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Whether this is a select-graphic-rendition sequence (`ESC [ ... m`).
    pub fn is_sgr(&self) -> bool {
        self.kind == EscapeKind::Csi && self.code.ends_with('m')
    }
}

/// Returns the escape sequence starting at byte `pos`, if any.
pub fn escape_at(input: &str, pos: usize) -> Option<EscapeSeq<'_>> {
    let bytes = input.as_bytes();
    if bytes.get(pos) != Some(&0x1b) {
        return None;
    }

    let (kind, end) = match bytes.get(pos + 1)? {
        b'[' => {
            let offset = bytes[pos + 2..]
                .iter()
                .position(|b| (0x40..=0x7e).contains(b))?;
            (EscapeKind::Csi, pos + 2 + offset + 1)
        }
        b']' => (EscapeKind::Osc, string_terminator(bytes, pos + 2)?),
        b'_' | b'P' => (EscapeKind::Other, string_terminator(bytes, pos + 2)?),
        b'O' if pos + 2 < bytes.len() => (EscapeKind::Ss3, pos + 3),
        _ => return None,
    };

    input.get(pos..end).map(|code| EscapeSeq { code, kind })
}

/// End offset (exclusive) of a BEL or ST terminated string.
fn string_terminator(bytes: &[u8], from: usize) -> Option<usize> {
    let mut idx = from;
    while idx < bytes.len() {
        match bytes[idx] {
            0x07 => return Some(idx + 1),
            0x1b if bytes.get(idx + 1) == Some(&b'\\') => return Some(idx + 2),
            _ => idx += 1,
        }
    }
    None
}

/// Byte offset of the next escape sequence at or after `idx`, or the end of input.
pub fn next_escape_or_end(input: &str, mut idx: usize) -> usize {
    while idx < input.len() {
        if escape_at(input, idx).is_some() {
            break;
        }
        idx += input[idx..].chars().next().map_or(1, char::len_utf8);
    }
    idx
}

/// Remove every recognized escape sequence from `input`.
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut idx = 0;
    while idx < input.len() {
        if let Some(seq) = escape_at(input, idx) {
            idx += seq.len();
            continue;
        }
        let end = next_escape_or_end(input, idx);
        out.push_str(&input[idx..end]);
        idx = end;
    }
    out
}

/// Tracks which SGR attributes are active so a wrapped line can re-open them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SgrState {
    attrs: [bool; 10],
    fg: Option<String>,
    bg: Option<String>,
}

impl SgrState {
    /// Feed one escape sequence; anything that is not SGR is ignored.
    pub fn process(&mut self, code: &str) {
        let Some(params) = code
            .strip_prefix("\x1b[")
            .and_then(|rest| rest.strip_suffix('m'))
        else {
            return;
        };

        if params.is_empty() {
            *self = Self::default();
            return;
        }

        let parts: Vec<&str> = params.split(';').collect();
        let mut idx = 0;
        while idx < parts.len() {
            let code = parts[idx].parse::<u16>().unwrap_or(0);
            if code == 38 || code == 48 {
                let span = match parts.get(idx + 1) {
                    Some(&"5") => 3,
                    Some(&"2") => 5,
                    _ => 1,
                };
                if span > 1 && idx + span <= parts.len() {
                    let color = parts[idx..idx + span].join(";");
                    if code == 38 {
                        self.fg = Some(color);
                    } else {
                        self.bg = Some(color);
                    }
                    idx += span;
                    continue;
                }
            }

            match code {
                0 => *self = Self::default(),
                1..=9 => self.attrs[code as usize] = true,
                21 => self.attrs[1] = false,
                22 => {
                    self.attrs[1] = false;
                    self.attrs[2] = false;
                }
                23..=29 => self.attrs[(code - 20) as usize] = false,
                30..=37 | 90..=97 => self.fg = Some(code.to_string()),
                39 => self.fg = None,
                40..=47 | 100..=107 => self.bg = Some(code.to_string()),
                49 => self.bg = None,
                _ => {}
            }
            idx += 1;
        }
    }

    /// A single SGR sequence re-establishing the current state, or empty.
    pub fn active_codes(&self) -> String {
        let mut codes: Vec<String> = self
            .attrs
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(code, _)| code.to_string())
            .collect();
        codes.extend(self.fg.iter().cloned());
        codes.extend(self.bg.iter().cloned());

        if codes.is_empty() {
            String::new()
        } else {
            format!("\x1b[{}m", codes.join(";"))
        }
    }

    /// Underline bleeds into the padding that follows a line, so it is closed at line end.
    pub fn line_end_reset(&self) -> &'static str {
        if self.attrs[4] {
            "\x1b[24m"
        } else {
            ""
        }
    }

    /// Feed every escape sequence contained in `text`.
    pub fn process_text(&mut self, text: &str) {
        let mut idx = 0;
        while idx < text.len() {
            if let Some(seq) = escape_at(text, idx) {
                self.process(seq.code);
                idx += seq.len();
            } else {
                idx = next_escape_or_end(text, idx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_at, strip_ansi, EscapeKind, SgrState};

    #[test]
    fn csi_and_osc_are_recognized() {
        let csi = escape_at("\x1b[38;5;141mx", 0).expect("csi");
        assert_eq!(csi.code, "\x1b[38;5;141m");
        assert!(csi.is_sgr());

        let osc = escape_at("\x1b]8;;https://example.com\x07", 0).expect("osc");
        assert_eq!(osc.kind, EscapeKind::Osc);
        assert!(!osc.is_sgr());

        assert!(escape_at("plain", 0).is_none());
        assert!(escape_at("\x1b[", 0).is_none());
    }

    #[test]
    fn strip_removes_styles_only() {
        assert_eq!(strip_ansi("\x1b[1mbold\x1b[0m text"), "bold text");
        assert_eq!(strip_ansi("| é |"), "| é |");
    }

    #[test]
    fn state_reopens_active_attributes() {
        let mut state = SgrState::default();
        state.process("\x1b[1;38;5;141m");
        assert_eq!(state.active_codes(), "\x1b[1;38;5;141m");
        state.process("\x1b[22m");
        assert_eq!(state.active_codes(), "\x1b[38;5;141m");
        state.process("\x1b[0m");
        assert_eq!(state.active_codes(), "");
    }

    #[test]
    fn underline_is_closed_at_line_end() {
        let mut state = SgrState::default();
        state.process_text("\x1b[4munder");
        assert_eq!(state.line_end_reset(), "\x1b[24m");
        state.process("\x1b[24m");
        assert_eq!(state.line_end_reset(), "");
    }
}
