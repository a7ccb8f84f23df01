//! Static text.

use serde_json::{json, Map, Value};

use crate::core::markup::Markup;
use crate::core::style::{self, StyleName, Styled, Template};
use crate::core::text::{break_line, visible_width};
use crate::error::Result;
use crate::widgets::base::{styled_markup, Widget, WidgetBase};

/// An unselectable block of text, wrapped to the width it is given.
#[derive(Clone)]
pub struct Label {
    base: WidgetBase,
    value: String,
    padding: usize,
}

impl Styled for Label {
    const TYPE_NAME: &'static str = "Label";

    fn default_template() -> Template {
        Template::new().style(StyleName::Value, style::markup())
    }
}

impl Label {
    /// `value` is markup; `padding` spaces are prepended to it.
    pub fn new(value: impl Into<String>, padding: usize) -> Self {
        let mut label = Self {
            base: WidgetBase::new::<Label>(),
            value: value.into(),
            padding,
        };
        let width = visible_width(&label.styled_value());
        label.base.set_width(width);
        label
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        let width = visible_width(&self.styled_value());
        self.base.set_width(width);
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    fn styled_value(&self) -> String {
        let padded = format!("{}{}", " ".repeat(self.padding), self.value);
        self.base.styled(StyleName::Value, &padded)
    }
}

impl Widget for Label {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn get_lines(&mut self) -> Result<Vec<String>> {
        let mut lines: Vec<String> = break_line(&self.styled_value(), self.base.width()).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        self.base.set_height(lines.len());
        Ok(lines)
    }

    fn serialized_fields(&self, markup: &dyn Markup) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(
            "value".into(),
            json!(styled_markup(&self.base, markup, StyleName::Value, &self.value)),
        );
        fields.insert("parent_align".into(), json!(self.base.parent_align()));
        fields.insert("padding".into(), json!(self.padding));
        fields
    }

    fn debug(&self) -> String {
        format!("Label(value={:?}, padding={})", self.value, self.padding)
    }
}
