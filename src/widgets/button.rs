//! A clickable, selectable label.

use std::rc::Rc;

use serde_json::{json, Map, Value};

use crate::core::geometry::SizePolicy;
use crate::core::markup::Markup;
use crate::core::style::{self, CharName, CharValue, StyleName, Styled, Template};
use crate::core::text::visible_width;
use crate::error::Result;
use crate::widgets::base::{attach_onclick, styled_markup, Widget, WidgetBase};
use crate::widgets::mouse_target::{MouseCallback, MouseTarget};

#[derive(Clone)]
pub struct Button {
    base: WidgetBase,
    label: String,
    onclick: Option<MouseCallback>,
}

impl Styled for Button {
    const TYPE_NAME: &'static str = "Button";

    fn default_template() -> Template {
        Template::new()
            .style(StyleName::Label, style::markup())
            .style(StyleName::Highlight, style::inverse())
            .style(StyleName::Delimiter, style::markup())
            .char(CharName::Delimiter, CharValue::list(["[ ", " ]"]))
    }
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        let mut button = Self {
            base: WidgetBase::new::<Button>(),
            label: label.into(),
            onclick: None,
        };
        button.base.set_selectables_length(1);
        button.base.set_size_policy(SizePolicy::Static);
        let width = visible_width(&button.render());
        button.base.set_width(width);
        button
    }

    pub fn with_onclick(mut self, callback: impl Fn(&MouseTarget, &mut dyn Widget) + 'static) -> Self {
        self.set_onclick(callback);
        self
    }

    /// Runs on a left click inside the button, or on confirm while it is selected.
    pub fn set_onclick(&mut self, callback: impl Fn(&MouseTarget, &mut dyn Widget) + 'static) {
        let callback: MouseCallback = Rc::new(callback);
        for target in self.base.mouse_targets() {
            target.set_onclick_rc(Some(Rc::clone(&callback)));
        }
        self.onclick = Some(callback);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        let width = visible_width(&self.render());
        self.base.set_width(width);
    }

    fn delimiters(&self) -> (String, String) {
        match self.base.get_char(CharName::Delimiter) {
            Some(CharValue::List(glyphs)) => (
                glyphs.first().cloned().unwrap_or_default(),
                glyphs.get(1).cloned().unwrap_or_default(),
            ),
            Some(CharValue::Single(glyph)) => (glyph.clone(), glyph.clone()),
            None => (String::new(), String::new()),
        }
    }

    fn render(&self) -> String {
        let (left, right) = self.delimiters();
        let style = if self.base.selected_index().is_some() {
            StyleName::Highlight
        } else {
            StyleName::Label
        };
        format!(
            "{}{}{}",
            self.base.styled(StyleName::Delimiter, &left),
            self.base.styled(style, &self.label),
            self.base.styled(StyleName::Delimiter, &right)
        )
    }
}

impl Widget for Button {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn get_lines(&mut self) -> Result<Vec<String>> {
        let line = self.render();
        self.base.set_width(visible_width(&line));
        self.base.set_height(1);

        self.base.clear_mouse_targets();
        let target = self.base.define_mouse_target(1, 0, 1, 0);
        attach_onclick(&target, &self.onclick);
        Ok(vec![line])
    }

    fn serialized_fields(&self, markup: &dyn Markup) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(
            "label".into(),
            json!(styled_markup(&self.base, markup, StyleName::Label, &self.label)),
        );
        fields
    }

    fn debug(&self) -> String {
        format!("Button(label={:?})", self.label)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::Button;
    use crate::core::input::{MouseAction, MouseEvent};
    use crate::core::terminal::VirtualTerminal;
    use crate::core::text::visible_width;
    use crate::widgets::base::Widget;

    #[test]
    fn renders_between_delimiters() {
        let mut button = Button::new("ok");
        assert_eq!(button.get_lines().expect("lines"), vec!["[ ok ]"]);
        assert_eq!(button.base().width(), 6);
        assert_eq!(button.selectables_length(), 1);
    }

    #[test]
    fn selection_switches_to_highlight() {
        let mut button = Button::new("ok");
        button.select(Some(0)).expect("select");
        let line = button.get_lines().expect("lines").remove(0);
        assert!(line.contains("\x1b[7mok"));
        assert_eq!(visible_width(&line), 6);
    }

    #[test]
    fn target_covers_the_rendered_cells() {
        let mut button = Button::new("ok");
        button.base_mut().set_pos((4, 2));
        button.get_lines().expect("lines");
        let target = button.mouse_targets()[0].clone();
        assert_eq!(target.start(), (4, 3));
        assert_eq!(target.end(), (9, 3));
    }

    #[test]
    fn prints_alone_even_when_wider_than_a_default_container() {
        let mut term = VirtualTerminal::new(80, 4);
        let mut button = Button::new("x".repeat(45));
        button.print(&mut term).expect("print");
        assert_eq!(term.screen()[1], format!("| [ {} ]  |", "x".repeat(45)));
    }

    #[test]
    fn left_click_runs_onclick_with_the_button() {
        let clicks = Rc::new(Cell::new(0));
        let seen = Rc::clone(&clicks);
        let mut button = Button::new("go").with_onclick(move |_, caller| {
            assert_eq!(caller.type_name(), "Button");
            seen.set(seen.get() + 1);
        });
        button.get_lines().expect("lines");

        let start = button.mouse_targets()[0].start();
        assert!(button.handle_mouse(&MouseEvent::new(MouseAction::LeftClick, start), None));
        assert_eq!(clicks.get(), 1);
    }
}
