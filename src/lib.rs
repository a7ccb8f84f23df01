//! Terminal widget toolkit.
//!
//! Widgets render to lines of exact display width. A [`Container`] lays its children out
//! inside a border, tracks their mouse targets and moves a keyboard selection through
//! them. A [`Session`] drives a root container against a [`Terminal`].
//!
//! Invariant: single output gate. Only `core::output::OutputGate::flush(..)` writes to the
//! terminal.
//!
//! # Public API Overview
//! - Build trees from [`Container`], [`Label`] and [`Button`], or implement [`Widget`].
//! - Route input with [`Session::dispatch`] or call `handle_key`/`handle_mouse` directly.
//! - Style through per-type templates ([`set_class_style`], [`set_class_char`]) or
//!   per-instance `WidgetBase::set_style`/`set_char`.
//! - Test against [`VirtualTerminal`], which records output and replays it onto a grid.

#![allow(
    clippy::derivable_impls,
    clippy::needless_range_loop,
    clippy::type_complexity
)]

pub mod config;
pub mod error;
pub mod logging;

pub mod core;
pub mod platform;
pub mod runtime;
pub mod widgets;

pub use crate::config::EnvConfig;
pub use crate::error::{Result, WidgetError};

/// Layout policies and coordinates.
pub use crate::core::geometry::{CenteringPolicy, Point, Size, SizePolicy, WidgetAlignment};

/// Input tokens and navigation keys.
pub use crate::core::input::{keys, InputToken, MouseAction, MouseEvent};
pub use crate::core::keybindings::{ContainerKeys, KeyBinding, NavAction};

/// Styling.
pub use crate::core::markup::{Markup, TagMarkup};
pub use crate::core::style::{
    reset_class_template, set_class_char, set_class_style, CharName, CharValue, StyleFn,
    StyleName, Styled, Template,
};

/// Terminal drivers.
pub use crate::core::output::{OutputGate, TerminalCmd};
pub use crate::core::terminal::{InputSource, Terminal, VirtualTerminal};
#[cfg(unix)]
pub use crate::platform::ProcessTerminal;

/// Text measurement and wrapping that skip escape sequences.
pub use crate::core::text::{break_line, strip_ansi, visible_width};

/// Built-in widgets.
pub use crate::widgets::{
    binding, BindingFn, BoxStyle, Button, Container, Label, MouseCallback, MouseTarget, Widget,
    WidgetBase, WidgetExt, WidgetHandle,
};

pub use crate::runtime::{IdRegistry, Session};
