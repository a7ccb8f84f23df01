//! Text helpers: escape scanning, display width and line breaking.
//!
//! Everything here is string in, string out so widgets can use it without a terminal.

pub mod ansi;
pub mod width;
pub mod wrap;

pub use ansi::strip_ansi;
pub use width::visible_width;
pub use wrap::break_line;
