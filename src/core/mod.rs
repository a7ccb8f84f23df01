//! Core services widgets are built on: geometry, styles, text, markup, input and output.

pub mod geometry;
pub mod input;
pub mod keybindings;
pub mod markup;
pub mod output;
pub mod style;
pub mod terminal;
pub mod text;
