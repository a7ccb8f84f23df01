//! Width-bounded line breaking for styled text.

use unicode_segmentation::UnicodeSegmentation;

use super::ansi::{escape_at, next_escape_or_end, SgrState};
use super::width::{grapheme_width, visible_width};

/// Break `text` into lines no wider than `max_width` columns.
///
/// Explicit newlines always break. Words wrap at spaces; a word wider than the
/// limit is split by grapheme. Active SGR styles are re-opened at the start of
/// every continuation line. Leading whitespace of a source line is kept, so
/// padding survives. Empty input yields no lines.
pub fn break_line(text: &str, max_width: usize) -> impl Iterator<Item = String> {
    let lines = if text.is_empty() || max_width == 0 {
        Vec::new()
    } else {
        break_all(text, max_width)
    };
    lines.into_iter()
}

fn break_all(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();
    let mut state = SgrState::default();

    for source in text.split('\n') {
        let reopened = format!("{}{source}", state.active_codes());
        result.extend(
            break_single(&reopened, max_width)
                .into_iter()
                .map(|line| line.trim_end_matches(' ').to_string()),
        );
        state.process_text(source);
    }

    result
}

fn break_single(line: &str, max_width: usize) -> Vec<String> {
    if visible_width(line) <= max_width {
        return vec![line.to_string()];
    }

    let mut state = SgrState::default();
    let mut wrapped = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for token in tokenize(line) {
        let token_width = visible_width(&token);
        let is_space = token.trim().is_empty();

        if token_width > max_width && !is_space {
            if current_width > 0 {
                wrapped.push(close_line(&current, &state));
            }
            let mut pieces = split_word(&token, max_width, &mut state);
            current = pieces.pop().unwrap_or_default();
            current_width = visible_width(&current);
            wrapped.extend(pieces);
            continue;
        }

        if current_width > 0 && current_width + token_width > max_width {
            wrapped.push(close_line(&current, &state));
            current = state.active_codes();
            current_width = 0;
            if is_space {
                continue;
            }
        }

        current.push_str(&token);
        current_width += token_width;
        state.process_text(&token);
    }

    if current_width > 0 || wrapped.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

fn close_line(line: &str, state: &SgrState) -> String {
    let mut closed = line.trim_end_matches(' ').to_string();
    closed.push_str(state.line_end_reset());
    closed
}

/// Split into alternating runs of spaces and non-spaces, escapes attached to the
/// run that follows them.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut pending = String::new();
    let mut in_space = false;
    let mut idx = 0;

    while idx < text.len() {
        if let Some(seq) = escape_at(text, idx) {
            pending.push_str(seq.code);
            idx += seq.len();
            continue;
        }

        let Some(ch) = text[idx..].chars().next() else {
            break;
        };
        let is_space = ch == ' ';
        if is_space != in_space && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        current.push_str(&pending);
        pending.clear();
        current.push(ch);
        in_space = is_space;
        idx += ch.len_utf8();
    }

    current.push_str(&pending);
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn split_word(word: &str, max_width: usize, state: &mut SgrState) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = state.active_codes();
    let mut current_width = 0;
    let mut idx = 0;

    while idx < word.len() {
        if let Some(seq) = escape_at(word, idx) {
            current.push_str(seq.code);
            state.process(seq.code);
            idx += seq.len();
            continue;
        }

        let end = next_escape_or_end(word, idx);
        for grapheme in word[idx..end].graphemes(true) {
            let width = grapheme_width(grapheme);
            if current_width > 0 && current_width + width > max_width {
                current.push_str(state.line_end_reset());
                pieces.push(std::mem::replace(&mut current, state.active_codes()));
                current_width = 0;
            }
            current.push_str(grapheme);
            current_width += width;
        }
        idx = end;
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
