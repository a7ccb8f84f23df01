//! Tag markup: `[bold 141 @22]text[/]` in, SGR escapes out, and back.

use crate::core::text::ansi::escape_at;

/// A text-styling language that compiles to escape sequences.
pub trait Markup {
    /// Compile markup into styled text.
    fn parse(&self, text: &str) -> String;

    /// Recover markup from styled text.
    fn get_markup(&self, styled: &str) -> String;
}

/// Square-bracket tag groups holding space-separated tags.
///
/// | tag                     | meaning                     |
/// |-------------------------|-----------------------------|
/// | `bold`, `dim`, ...      | text mode                   |
/// | `/bold`, `/dim`, ...    | unset one mode              |
/// | `141`                   | 256-color foreground        |
/// | `@141`                  | 256-color background        |
/// | `#ff8800` / `@#ff8800`  | RGB foreground / background |
/// | `red` / `@red`          | 16-color foreground / background |
/// | `/fg`, `/bg`            | reset one color layer       |
/// | `/`                     | reset everything            |
///
/// `\[` produces a literal bracket. Groups with an unknown tag are kept verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct TagMarkup;

const MODES: [(&str, u8, u8); 8] = [
    ("bold", 1, 22),
    ("dim", 2, 22),
    ("italic", 3, 23),
    ("underline", 4, 24),
    ("blink", 5, 25),
    ("inverse", 7, 27),
    ("invisible", 8, 28),
    ("strikethrough", 9, 29),
];

const NAMED_COLORS: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

impl TagMarkup {
    fn tag_codes(tag: &str) -> Option<String> {
        if tag == "/" {
            return Some("0".to_string());
        }
        if tag == "/fg" {
            return Some("39".to_string());
        }
        if tag == "/bg" {
            return Some("49".to_string());
        }
        if let Some(name) = tag.strip_prefix('/') {
            return MODES
                .iter()
                .find(|(mode, _, _)| *mode == name)
                .map(|(_, _, off)| off.to_string());
        }
        if let Some((_, on, _)) = MODES.iter().find(|(mode, _, _)| *mode == tag) {
            return Some(on.to_string());
        }

        let (layer, color) = match tag.strip_prefix('@') {
            Some(color) => (48u8, color),
            None => (38u8, tag),
        };
        color_codes(layer, color)
    }

    fn param_tags(params: &str) -> Vec<String> {
        if params.is_empty() {
            return vec!["/".to_string()];
        }

        let parts: Vec<&str> = params.split(';').collect();
        let mut tags = Vec::new();
        let mut idx = 0;
        while idx < parts.len() {
            let code: u8 = parts[idx].parse().unwrap_or(0);
            let layer_prefix = if code == 48 { "@" } else { "" };
            match (code, parts.get(idx + 1).copied()) {
                (38 | 48, Some("5")) if idx + 2 < parts.len() => {
                    tags.push(format!("{layer_prefix}{}", parts[idx + 2]));
                    idx += 3;
                    continue;
                }
                (38 | 48, Some("2")) if idx + 4 < parts.len() => {
                    let channel = |offset: usize| parts[idx + offset].parse::<u8>().unwrap_or(0);
                    tags.push(format!(
                        "{layer_prefix}#{:02x}{:02x}{:02x}",
                        channel(2),
                        channel(3),
                        channel(4)
                    ));
                    idx += 5;
                    continue;
                }
                _ => {}
            }

            let tag = match code {
                0 => Some("/".to_string()),
                39 => Some("/fg".to_string()),
                49 => Some("/bg".to_string()),
                30..=37 => Some(NAMED_COLORS[(code - 30) as usize].to_string()),
                40..=47 => Some(format!("@{}", NAMED_COLORS[(code - 40) as usize])),
                _ => MODES
                    .iter()
                    .find(|(_, on, _)| *on == code)
                    .map(|(mode, _, _)| (*mode).to_string())
                    .or_else(|| {
                        MODES
                            .iter()
                            .find(|(_, _, off)| *off == code)
                            .map(|(mode, _, _)| format!("/{mode}"))
                    }),
            };
            tags.extend(tag);
            idx += 1;
        }
        tags
    }
}

fn color_codes(layer: u8, color: &str) -> Option<String> {
    if let Ok(index) = color.parse::<u8>() {
        return Some(format!("{layer};5;{index}"));
    }
    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
        let (red, green, blue) = (channel(0..2)?, channel(2..4)?, channel(4..6)?);
        return Some(format!("{layer};2;{red};{green};{blue}"));
    }
    let base = if layer == 38 { 30 } else { 40 };
    NAMED_COLORS
        .iter()
        .position(|name| *name == color)
        .map(|offset| (base + offset).to_string())
}

impl Markup for TagMarkup {
    fn parse(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut styled = false;
        let mut rest = text;

        while let Some(pos) = rest.find(['[', '\\']) {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if let Some(escaped) = tail.strip_prefix("\\[") {
                out.push('[');
                rest = escaped;
                continue;
            }
            if tail.starts_with('\\') {
                out.push('\\');
                rest = &tail[1..];
                continue;
            }

            let Some(close) = tail.find(']') else {
                out.push_str(tail);
                rest = "";
                break;
            };
            let group = &tail[1..close];
            let codes: Option<Vec<String>> = group.split_whitespace().map(Self::tag_codes).collect();
            match codes {
                Some(codes) if !codes.is_empty() => {
                    out.push_str(&format!("\x1b[{}m", codes.join(";")));
                    styled = true;
                }
                _ => out.push_str(&tail[..=close]),
            }
            rest = &tail[close + 1..];
        }
        out.push_str(rest);

        if styled && !out.ends_with("\x1b[0m") {
            out.push_str("\x1b[0m");
        }
        out
    }

    fn get_markup(&self, styled: &str) -> String {
        let mut out = String::with_capacity(styled.len());
        let mut idx = 0;

        while idx < styled.len() {
            if let Some(seq) = escape_at(styled, idx) {
                if seq.is_sgr() {
                    let params = &seq.code[2..seq.code.len() - 1];
                    let tags = Self::param_tags(params);
                    if !tags.is_empty() {
                        out.push('[');
                        out.push_str(&tags.join(" "));
                        out.push(']');
                    }
                }
                idx += seq.len();
                continue;
            }

            let Some(ch) = styled[idx..].chars().next() else {
                break;
            };
            if ch == '[' {
                out.push('\\');
            }
            out.push(ch);
            idx += ch.len_utf8();
        }
        out
    }
}
