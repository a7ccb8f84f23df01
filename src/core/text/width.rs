//! Display width of styled strings.

use emojis::get as emoji_get;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use super::ansi::{escape_at, next_escape_or_end};

const TAB_WIDTH: usize = 4;

/// Column width of one grapheme cluster.
pub fn grapheme_width(grapheme: &str) -> usize {
    match grapheme {
        "" => 0,
        "\t" => TAB_WIDTH,
        _ if emoji_get(grapheme).is_some() => 2,
        _ => grapheme
            .chars()
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
            .sum(),
    }
}

/// Number of terminal columns `input` occupies, ignoring escape sequences.
pub fn visible_width(input: &str) -> usize {
    let mut width = 0;
    let mut idx = 0;
    while idx < input.len() {
        if let Some(seq) = escape_at(input, idx) {
            idx += seq.len();
            continue;
        }
        let end = next_escape_or_end(input, idx);
        width += input[idx..end].graphemes(true).map(grapheme_width).sum::<usize>();
        idx = end;
    }
    width
}
