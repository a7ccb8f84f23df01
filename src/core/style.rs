//! Style functions, glyph tables and the per-type templates they are cloned from.
//!
//! Each widget type declares a default [`Template`]. The first time a type is used on a
//! thread its template is stored in a thread-local table; class-level edits go to that
//! stored copy, and every instance clones it at construction, so editing the class never
//! reaches existing instances.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::core::markup::{Markup, TagMarkup};
use crate::core::output::{background256, foreground256, set_mode};
use crate::error::{Result, WidgetError};

/// Maps `(depth, text)` to styled text.
pub type StyleFn = Rc<dyn Fn(usize, &str) -> String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleName {
    Border,
    Corner,
    Fill,
    Value,
    Label,
    Highlight,
    Delimiter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CharName {
    Border,
    Corner,
    Delimiter,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown name {0:?}")]
pub struct UnknownName(pub String);

impl StyleName {
    pub const ALL: [StyleName; 7] = [
        Self::Border,
        Self::Corner,
        Self::Fill,
        Self::Value,
        Self::Label,
        Self::Highlight,
        Self::Delimiter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Border => "border",
            Self::Corner => "corner",
            Self::Fill => "fill",
            Self::Value => "value",
            Self::Label => "label",
            Self::Highlight => "highlight",
            Self::Delimiter => "delimiter",
        }
    }
}

impl CharName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Border => "border",
            Self::Corner => "corner",
            Self::Delimiter => "delimiter",
        }
    }

    /// The style that renders this glyph set.
    pub fn style(self) -> StyleName {
        match self {
            Self::Border => StyleName::Border,
            Self::Corner => StyleName::Corner,
            Self::Delimiter => StyleName::Delimiter,
        }
    }
}

impl FromStr for StyleName {
    type Err = UnknownName;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == value)
            .ok_or_else(|| UnknownName(value.to_string()))
    }
}

impl FromStr for CharName {
    type Err = UnknownName;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "border" => Ok(Self::Border),
            "corner" => Ok(Self::Corner),
            "delimiter" => Ok(Self::Delimiter),
            _ => Err(UnknownName(value.to_string())),
        }
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CharName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One glyph, or an ordered glyph set such as `[left, top, right, bottom]` borders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CharValue {
    Single(String),
    List(Vec<String>),
}

impl CharValue {
    pub fn list<const N: usize>(glyphs: [&str; N]) -> Self {
        Self::List(glyphs.iter().map(|glyph| glyph.to_string()).collect())
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(glyphs) => Some(glyphs),
            Self::Single(_) => None,
        }
    }

    fn shape(&self) -> Option<usize> {
        self.as_list().map(<[String]>::len)
    }
}

/// Style and glyph tables of one widget type.
#[derive(Clone, Default)]
pub struct Template {
    pub styles: BTreeMap<StyleName, StyleFn>,
    pub chars: BTreeMap<CharName, CharValue>,
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("styles", &self.styles.keys().collect::<Vec<_>>())
            .field("chars", &self.chars)
            .finish()
    }
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(mut self, name: StyleName, style: StyleFn) -> Self {
        self.styles.insert(name, style);
        self
    }

    pub fn char(mut self, name: CharName, value: CharValue) -> Self {
        self.chars.insert(name, value);
        self
    }

    /// Replace an existing style; names the type does not declare are rejected.
    pub fn set_style(&mut self, widget: &'static str, name: StyleName, style: StyleFn) -> Result<()> {
        match self.styles.get_mut(&name) {
            Some(slot) => {
                *slot = style;
                Ok(())
            }
            None => Err(WidgetError::UnknownStyle {
                name: name.as_str().to_string(),
                widget,
            }),
        }
    }

    /// Replace an existing glyph set, keeping its shape.
    pub fn set_char(&mut self, widget: &'static str, name: CharName, value: CharValue) -> Result<()> {
        let Some(slot) = self.chars.get_mut(&name) else {
            return Err(WidgetError::UnknownChar {
                name: name.as_str().to_string(),
                widget,
            });
        };
        if let Some(expected) = slot.shape() {
            if value.shape() != Some(expected) {
                return Err(WidgetError::InvalidChar {
                    name: name.as_str(),
                    widget,
                    expected,
                });
            }
        }
        *slot = value;
        Ok(())
    }
}

/// A widget type with a default style/glyph template.
pub trait Styled {
    const TYPE_NAME: &'static str;

    fn default_template() -> Template;
}

thread_local! {
    static TEMPLATES: RefCell<HashMap<&'static str, Template>> = RefCell::new(HashMap::new());
}

fn with_template<W: Styled, R>(f: impl FnOnce(&mut Template) -> R) -> R {
    TEMPLATES.with(|templates| {
        let mut templates = templates.borrow_mut();
        let template = templates
            .entry(W::TYPE_NAME)
            .or_insert_with(W::default_template);
        f(template)
    })
}

/// The current class-level template of `W`, cloned for a new instance.
pub fn class_template<W: Styled>() -> Template {
    with_template::<W, _>(|template| template.clone())
}

/// Change a style for every `W` constructed from now on.
pub fn set_class_style<W: Styled>(name: StyleName, style: StyleFn) -> Result<()> {
    with_template::<W, _>(|template| template.set_style(W::TYPE_NAME, name, style))
}

/// Change a glyph set for every `W` constructed from now on.
pub fn set_class_char<W: Styled>(name: CharName, value: CharValue) -> Result<()> {
    with_template::<W, _>(|template| template.set_char(W::TYPE_NAME, name, value))
}

/// Restore the declared defaults of `W`.
pub fn reset_class_template<W: Styled>() {
    with_template::<W, _>(|template| *template = W::default_template());
}

pub fn plain() -> StyleFn {
    Rc::new(|_, text| text.to_string())
}

/// Parse text through the default tag markup.
pub fn markup() -> StyleFn {
    Rc::new(|_, text| TagMarkup.parse(text))
}

pub fn foreground(color: u8) -> StyleFn {
    wrap_with(foreground256(color))
}

pub fn background(color: u8) -> StyleFn {
    wrap_with(background256(color))
}

pub fn bold() -> StyleFn {
    wrap_with(set_mode("bold").unwrap_or_default())
}

pub fn inverse() -> StyleFn {
    wrap_with(set_mode("inverse").unwrap_or_default())
}

fn wrap_with(prefix: String) -> StyleFn {
    Rc::new(move |_, text| {
        if text.is_empty() {
            String::new()
        } else {
            format!("{prefix}{text}\x1b[0m")
        }
    })
}
