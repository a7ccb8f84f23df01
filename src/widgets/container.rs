//! The composite widget: lays children out inside a border and routes input to them.

use std::fmt::Write as _;

use serde_json::{json, Map, Value};
use tracing::{debug, trace, warn};

use crate::core::geometry::{CenteringPolicy, Point, Size, SizePolicy, WidgetAlignment};
use crate::core::keybindings::{ContainerKeys, NavAction};
use crate::core::input::{MouseAction, MouseEvent};
use crate::core::markup::Markup;
use crate::core::output::{OutputGate, TerminalCmd};
use crate::core::style::{self, CharName, CharValue, StyleName, Styled, Template};
use crate::core::terminal::Terminal;
use crate::core::text::visible_width;
use crate::error::{Result, WidgetError};
use crate::widgets::base::{Widget, WidgetBase, WidgetHandle};
use crate::widgets::mouse_target::MouseTarget;

const DEFAULT_WIDTH: usize = 40;

/// A border glyph set: `border` is `[left, top, right, bottom]`, `corner` is
/// `[top-left, top-right, bottom-right, bottom-left]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxStyle {
    pub border: [&'static str; 4],
    pub corner: [&'static str; 4],
}

impl BoxStyle {
    pub const SINGLE: BoxStyle = BoxStyle {
        border: ["│ ", "─", " │", "─"],
        corner: ["┌", "┐", "┘", "└"],
    };
    pub const DOUBLE: BoxStyle = BoxStyle {
        border: ["║ ", "═", " ║", "═"],
        corner: ["╔", "╗", "╝", "╚"],
    };
    pub const ROUNDED: BoxStyle = BoxStyle {
        border: ["│ ", "─", " │", "─"],
        corner: ["╭", "╮", "╯", "╰"],
    };
    pub const ASCII: BoxStyle = BoxStyle {
        border: ["| ", "-", " |", "-"],
        corner: ["+", "+", "+", "+"],
    };
    /// No border rows and no side borders.
    pub const EMPTY: BoxStyle = BoxStyle {
        border: ["", "", "", ""],
        corner: ["", "", "", ""],
    };
}

/// Pads a child's line to the container width and wraps it in the side borders.
struct Aligner {
    left: String,
    right: String,
    fill: String,
    width: usize,
    align: WidgetAlignment,
}

impl Aligner {
    fn inner(&self) -> usize {
        self.width
            .saturating_sub(visible_width(&self.left) + visible_width(&self.right))
    }

    fn apply(&self, text: &str) -> String {
        let total = self.inner().saturating_sub(visible_width(text));
        let (before, after) = match self.align {
            WidgetAlignment::Left => (0, total),
            WidgetAlignment::Center => (total / 2 + total % 2, total / 2),
            WidgetAlignment::Right => (total, 0),
        };
        format!(
            "{}{}{text}{}{}",
            self.left,
            self.fill.repeat(before),
            self.fill.repeat(after),
            self.right
        )
    }

    /// Column of the child's first cell, relative to the container.
    fn offset(&self, child_width: usize) -> usize {
        let left = visible_width(&self.left);
        match self.align {
            WidgetAlignment::Left => left,
            WidgetAlignment::Center => {
                let total = self.inner().saturating_sub(child_width);
                left + total / 2 + total % 2
            }
            WidgetAlignment::Right => self
                .width
                .saturating_sub(visible_width(&self.right) + child_width),
        }
    }
}

/// Resolved border glyphs, already styled.
struct Frame {
    left: String,
    top: String,
    right: String,
    bottom: String,
    corners: [String; 4],
}

impl Frame {
    fn row(&self, left: &str, fill: &str, right: &str, width: usize) -> String {
        let span = width.saturating_sub(visible_width(left) + visible_width(right));
        format!("{left}{}{right}", fill.repeat(span))
    }

    fn border_rows(&self) -> usize {
        usize::from(visible_width(&self.top) > 0) + usize::from(visible_width(&self.bottom) > 0)
    }
}

/// What a layout pass needs from the container while its children are borrowed.
struct Layout<'a> {
    frame: &'a Frame,
    fill: String,
    width: usize,
    origin: Point,
}

impl Layout<'_> {
    fn sidelength(&self) -> usize {
        visible_width(&self.frame.left) + visible_width(&self.frame.right)
    }

    fn aligner(&self, align: WidgetAlignment) -> Aligner {
        Aligner {
            left: self.frame.left.clone(),
            right: self.frame.right.clone(),
            fill: self.fill.clone(),
            width: self.width,
            align,
        }
    }

    fn resolve_width(&self, child: &mut dyn Widget) -> Result<()> {
        let reserved = usize::from(!child.is_container());
        let available = self
            .width
            .saturating_sub(self.sidelength())
            .saturating_sub(reserved);
        let width = child.base().width();

        let resolved = match child.base().size_policy() {
            SizePolicy::Fill => available,
            SizePolicy::Relative => {
                (child.base().relative_width() * available as f64).floor() as usize
            }
            SizePolicy::Static if width > available => {
                return Err(WidgetError::WidthExceeded {
                    widget: child.debug(),
                    width,
                    available,
                });
            }
            SizePolicy::Static => width,
        };
        child.base_mut().set_width(resolved.min(available));
        Ok(())
    }

    /// Size, place and render one child starting at content row `row`. Returns its
    /// aligned lines and mouse targets.
    fn place(&self, child: &mut dyn Widget, row: usize) -> Result<(Vec<String>, Vec<MouseTarget>)> {
        self.resolve_width(child)?;

        let aligner = self.aligner(child.base().parent_align());
        let offset = aligner.offset(child.base().width());
        let top_offset = i32::from(child.is_container());
        let (x, y) = self.origin;
        child
            .base_mut()
            .set_pos((x + offset as i32, y + row as i32 + top_offset));

        let mut aligned = Vec::new();
        for (index, line) in child.get_lines()?.iter().enumerate() {
            let line = aligner.apply(line);
            let actual = visible_width(&line);
            if actual != self.width {
                return Err(WidgetError::LineLength {
                    widget: child.debug(),
                    index,
                    expected: self.width,
                    actual,
                    line,
                });
            }
            aligned.push(line);
        }
        Ok((aligned, child.mouse_targets().to_vec()))
    }
}

/// An ordered list of child widgets drawn inside a border.
///
/// Every layout pass resolves each child's width from its [`SizePolicy`], positions it
/// according to its [`WidgetAlignment`], and checks that each rendered line is exactly as
/// wide as the container. The container's `height` is its number of interior rows; it
/// only grows, padding with blank rows up to the last recorded height.
pub struct Container {
    base: WidgetBase,
    widgets: Vec<Box<dyn Widget>>,
    centered_axis: Option<CenteringPolicy>,
    prev_screen: Size,
    screen: Size,
    stale_frame: bool,
    origin: Point,
    has_printed: bool,
    allow_fullscreen: bool,
    drag_target: Option<usize>,
    keys: ContainerKeys,
    rendered: Vec<String>,
}

impl Styled for Container {
    const TYPE_NAME: &'static str = "Container";

    fn default_template() -> Template {
        Template::new()
            .style(StyleName::Border, style::markup())
            .style(StyleName::Corner, style::markup())
            .style(StyleName::Fill, style::plain())
            .char(CharName::Border, CharValue::list(["| ", "-", " |", "-"]))
            .char(CharName::Corner, CharValue::list(["", "", "", ""]))
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    pub fn new() -> Self {
        let mut base = WidgetBase::new::<Container>();
        base.set_width(DEFAULT_WIDTH);
        base.set_height(0);
        Self {
            base,
            widgets: Vec::new(),
            centered_axis: None,
            prev_screen: (0, 0),
            screen: (0, 0),
            stale_frame: false,
            origin: (1, 1),
            has_printed: false,
            allow_fullscreen: true,
            drag_target: None,
            keys: ContainerKeys::default(),
            rendered: Vec::new(),
        }
    }

    /// A container holding `widgets`, laid out once per addition.
    pub fn with_widgets<I>(widgets: I) -> Result<Self>
    where
        I: IntoIterator<Item = Box<dyn Widget>>,
    {
        let mut container = Self::new();
        for widget in widgets {
            container.add_boxed(widget)?;
        }
        Ok(container)
    }

    /// A container just wide enough for `widget`, never narrower than the default.
    pub fn wrapping(widget: Box<dyn Widget>) -> Result<Self> {
        let mut container = Self::new();
        let needed =
            widget.base().width() + container.sidelength() + usize::from(!widget.is_container());
        container.base.set_width(needed.max(DEFAULT_WIDTH));
        container.add_boxed(widget)?;
        Ok(container)
    }

    /// Append a child and lay out again. On error the child is dropped and the
    /// container is left as it was.
    pub fn add<W: Widget + 'static>(&mut self, widget: W) -> Result<()> {
        self.add_boxed(Box::new(widget))
    }

    pub fn add_boxed(&mut self, mut widget: Box<dyn Widget>) -> Result<()> {
        widget.set_depth_recursive(self.base.depth() + 1);
        widget.get_lines()?;
        widget.base_mut().set_parent(&self.base.cell());
        self.widgets.push(widget);

        if let Err(err) = self.get_lines() {
            if let Some(mut widget) = self.widgets.pop() {
                widget.base_mut().clear_parent();
            }
            warn!(%err, "rejected child");
            return Err(err);
        }
        debug!(children = self.widgets.len(), height = self.base.height(), "added child");
        Ok(())
    }

    /// Replace every child.
    pub fn set_widgets<I>(&mut self, widgets: I) -> Result<()>
    where
        I: IntoIterator<Item = Box<dyn Widget>>,
    {
        for widget in self.widgets.iter_mut() {
            widget.base_mut().clear_parent();
        }
        self.widgets.clear();
        self.drag_target = None;
        self.base.set_selected_index(None);
        for widget in widgets {
            self.add_boxed(widget)?;
        }
        Ok(())
    }

    pub fn pop(&mut self, index: usize) -> Option<Box<dyn Widget>> {
        if index >= self.widgets.len() {
            return None;
        }
        let mut widget = self.widgets.remove(index);
        widget.base_mut().clear_parent();
        self.forget_child(index);
        Some(widget)
    }

    /// Remove the child `handle` points at.
    pub fn remove(&mut self, handle: &WidgetHandle) -> Option<Box<dyn Widget>> {
        let index = self.widgets.iter().position(|widget| handle.is(widget.as_ref()))?;
        self.pop(index)
    }

    fn forget_child(&mut self, index: usize) {
        self.drag_target = match self.drag_target {
            Some(drag) if drag == index => None,
            Some(drag) if drag > index => Some(drag - 1),
            other => other,
        };
        if self
            .base
            .selected_index()
            .is_some_and(|selected| selected >= self.selectables_length())
        {
            self.base.set_selected_index(None);
        }
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Widget> {
        self.widgets.get(index).map(|widget| widget.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Widget + 'static)> {
        self.widgets.get_mut(index).map(|widget| widget.as_mut())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Widget> {
        self.widgets.iter().map(|widget| widget.as_ref())
    }

    pub fn keys(&self) -> &ContainerKeys {
        &self.keys
    }

    pub fn keys_mut(&mut self) -> &mut ContainerKeys {
        &mut self.keys
    }

    pub fn centered_axis(&self) -> Option<CenteringPolicy> {
        self.centered_axis
    }

    pub fn allow_fullscreen(&self) -> bool {
        self.allow_fullscreen
    }

    pub fn set_allow_fullscreen(&mut self, allow: bool) {
        self.allow_fullscreen = allow;
    }

    /// Lines of the last successful layout pass.
    pub fn last_lines(&self) -> &[String] {
        &self.rendered
    }

    /// Apply a border preset.
    pub fn set_box(&mut self, preset: BoxStyle) -> Result<()> {
        self.base
            .set_char(CharName::Border, CharValue::list(preset.border))?;
        self.base
            .set_char(CharName::Corner, CharValue::list(preset.corner))
    }

    /// Combined visible width of the styled left and right borders.
    pub fn sidelength(&self) -> usize {
        let frame = self.frame();
        visible_width(&frame.left) + visible_width(&frame.right)
    }

    /// `(child index, index inside that child)` for every flat selectable index.
    pub fn selection_map(&self) -> Vec<(usize, usize)> {
        self.widgets
            .iter()
            .enumerate()
            .filter(|(_, widget)| widget.is_selectable())
            .flat_map(|(index, widget)| {
                (0..widget.selectables_length()).map(move |local| (index, local))
            })
            .collect()
    }

    fn selected_position(&self) -> Option<(usize, usize)> {
        let selected = self.base.selected_index()?;
        self.selection_map().get(selected).copied()
    }

    /// Point the flat index at whatever `child` now has selected.
    fn sync_selection(&mut self, child: usize) {
        let Some(local) = self.widgets[child].base().selected_index() else {
            return;
        };
        let flat = self
            .selection_map()
            .iter()
            .position(|entry| *entry == (child, local));
        if flat.is_some() {
            self.base.set_selected_index(flat);
        }
    }

    /// The innermost selected widget.
    pub fn selected(&self) -> Option<&dyn Widget> {
        let selected = self.base.selected_index()?;
        self.selectables().get(selected).map(|(widget, _)| *widget)
    }

    /// The direct child holding the selection.
    pub fn selected_child(&self) -> Option<&dyn Widget> {
        let (child, _) = self.selected_position()?;
        self.get(child)
    }

    /// Lay out and move to the middle of `screen` on the axes `policy` selects.
    /// With `store`, later resizes repeat the centering.
    pub fn center(&mut self, policy: CenteringPolicy, store: bool, screen: Size) -> Result<()> {
        self.screen = screen;
        let lines = self.get_lines()?;

        let (mut x, mut y) = self.base.pos();
        if policy.horizontal() {
            x = self.origin.0 + centered(screen.0, self.base.width());
        }
        if policy.vertical() {
            y = self.origin.1 + centered(screen.1, lines.len());
        }
        self.set_pos_adjusted((x, y));

        if store {
            self.centered_axis = Some(policy);
        }
        self.prev_screen = screen;
        debug!(?policy, store, pos = ?(x, y), ?screen, "centered container");
        Ok(())
    }

    /// React to a new terminal size. Returns whether the container moved.
    ///
    /// The next [`print`](Self::print) clears the screen before drawing.
    pub fn handle_resize(&mut self, screen: Size) -> Result<bool> {
        self.screen = screen;
        self.stale_frame = true;
        let recentered = match self.centered_axis {
            Some(policy) => {
                self.center(policy, false, screen)?;
                true
            }
            None => false,
        };
        self.prev_screen = screen;
        debug!(?screen, recentered, "handled resize");
        Ok(recentered)
    }

    fn set_pos_adjusted(&mut self, pos: Point) {
        if self.base.pos() == pos {
            return;
        }
        self.base.set_pos(pos);
        if let Err(err) = self.get_lines() {
            warn!(%err, "layout failed after move");
        }
    }

    /// Draw the current layout, clearing and re-centering first after a resize.
    pub fn print<T: Terminal + ?Sized>(&mut self, term: &mut T) -> Result<()> {
        let screen = term.size();
        self.origin = term.origin();
        self.screen = screen;

        let resized = std::mem::take(&mut self.stale_frame) || screen != self.prev_screen;
        let mut gate = OutputGate::new();
        if resized {
            gate.push(TerminalCmd::ClearScreen);
            if let Some(policy) = self.centered_axis {
                self.center(policy, false, screen)?;
            }
        }
        self.prev_screen = screen;

        if self.fills_screen() {
            self.base.set_pos(self.origin);
        }

        let lines = self.get_lines()?;
        let (x, y) = self.base.pos();
        for (row, line) in lines.into_iter().enumerate() {
            gate.push(TerminalCmd::MoveTo((x, y + row as i32)));
            gate.push(TerminalCmd::Bytes(line));
        }
        gate.flush(term)?;
        self.has_printed = true;
        trace!(pos = ?(x, y), rows = self.rendered.len(), "printed container");
        Ok(())
    }

    /// Blank out the cells the current layout covers.
    pub fn wipe<T: Terminal + ?Sized>(&mut self, term: &mut T) -> Result<()> {
        let lines = self.get_lines()?;
        let (x, y) = self.base.pos();
        let mut gate = OutputGate::new();
        for (row, line) in lines.iter().enumerate() {
            gate.push(TerminalCmd::MoveTo((x, y + row as i32)));
            gate.push(TerminalCmd::Bytes(" ".repeat(visible_width(line))));
        }
        gate.flush(term)?;
        Ok(())
    }

    /// Paint every mouse target of the tree.
    pub fn show_targets<T: Terminal + ?Sized>(&self, term: &mut T, color: Option<u8>) -> Result<()> {
        let mut gate = OutputGate::new();
        gate.extend(self.target_commands(color));
        gate.flush(term)?;
        Ok(())
    }

    fn fills_screen(&self) -> bool {
        self.allow_fullscreen && self.base.size_policy() == SizePolicy::Fill
    }

    fn frame(&self) -> Frame {
        let glyphs = |name: CharName, count: usize| -> Vec<String> {
            let mut glyphs = match self.base.get_char(name) {
                Some(CharValue::List(glyphs)) => glyphs.clone(),
                Some(CharValue::Single(glyph)) => vec![glyph.clone(); count],
                None => Vec::new(),
            };
            glyphs.resize(count, String::new());
            glyphs
        };
        let border: Vec<String> = glyphs(CharName::Border, 4)
            .iter()
            .map(|glyph| self.base.styled(StyleName::Border, glyph))
            .collect();
        let corner: Vec<String> = glyphs(CharName::Corner, 4)
            .iter()
            .map(|glyph| self.base.styled(StyleName::Corner, glyph))
            .collect();
        let [left, top, right, bottom]: [String; 4] = border.try_into().unwrap_or_default();
        let corners: [String; 4] = corner.try_into().unwrap_or_default();
        Frame {
            left,
            top,
            right,
            bottom,
            corners,
        }
    }
}

fn centered(extent: usize, length: usize) -> i32 {
    (extent as i32 - length as i32).div_euclid(2)
}

impl Clone for Container {
    fn clone(&self) -> Self {
        let base = self.base.clone();
        let parent = base.cell();
        let widgets = self
            .widgets
            .iter()
            .map(|widget| {
                let mut copy = widget.box_clone();
                copy.base_mut().set_parent(&parent);
                copy
            })
            .collect();

        Self {
            base,
            widgets,
            centered_axis: self.centered_axis,
            prev_screen: self.prev_screen,
            screen: self.screen,
            stale_frame: false,
            origin: self.origin,
            has_printed: self.has_printed,
            allow_fullscreen: self.allow_fullscreen,
            drag_target: None,
            keys: self.keys.clone(),
            rendered: self.rendered.clone(),
        }
    }
}

impl Widget for Container {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn is_bindable(&self) -> bool {
        true
    }

    fn is_container(&self) -> bool {
        true
    }

    fn print(&mut self, term: &mut dyn Terminal) -> Result<()> {
        Container::print(self, term)
    }

    fn get_lines(&mut self) -> Result<Vec<String>> {
        let frame = self.frame();

        if self.has_printed && !self.base.has_parent() && self.fills_screen() && self.screen != (0, 0)
        {
            let (columns, rows) = self.screen;
            self.base.set_pos(self.origin);
            self.base.set_width(columns);
            self.base.set_height(rows.saturating_sub(frame.border_rows()));
        }

        let fill = self.base.styled(StyleName::Fill, " ");
        let mut lines: Vec<String> = Vec::new();
        let mut targets: Vec<MouseTarget> = Vec::new();

        for child in self.widgets.iter_mut() {
            if self.base.width() == 0 {
                self.base.set_width(child.base().width());
            }
            let layout = Layout {
                frame: &frame,
                fill: fill.clone(),
                width: self.base.width(),
                origin: self.base.pos(),
            };
            let (child_lines, child_targets) = layout.place(child.as_mut(), lines.len())?;
            lines.extend(child_lines);
            targets.extend(child_targets);
        }

        let layout = Layout {
            frame: &frame,
            fill,
            width: self.base.width(),
            origin: self.base.pos(),
        };
        let aligner = layout.aligner(WidgetAlignment::Left);
        while lines.len() < self.base.height() {
            lines.push(aligner.apply(""));
        }
        self.base.set_height(lines.len());

        let width = self.base.width();
        let [top_left, top_right, bottom_right, bottom_left] = &frame.corners;
        if visible_width(&frame.top) > 0 {
            lines.insert(0, frame.row(top_left, &frame.top, top_right, width));
        }
        if visible_width(&frame.bottom) > 0 {
            lines.push(frame.row(bottom_left, &frame.bottom, bottom_right, width));
        }

        for target in &targets {
            target.adjust();
        }
        self.base.set_mouse_targets(targets);
        self.rendered = lines.clone();
        trace!(width, height = self.base.height(), rows = lines.len(), "laid out container");
        Ok(lines)
    }

    fn selectables_length(&self) -> usize {
        self.widgets
            .iter()
            .filter(|widget| widget.is_selectable())
            .map(|widget| widget.selectables_length())
            .sum()
    }

    fn selectables(&self) -> Vec<(&dyn Widget, usize)> {
        self.widgets
            .iter()
            .filter(|widget| widget.is_selectable())
            .flat_map(|widget| {
                widget
                    .selectables()
                    .into_iter()
                    .enumerate()
                    .map(|(local, (inner, _))| (inner, local))
            })
            .collect()
    }

    /// Clear every child's selection, then forward `index` to the child owning it.
    fn select(&mut self, index: Option<usize>) -> Result<()> {
        let map = self.selection_map();
        if let Some(index) = index {
            if map.is_empty() {
                return Err(WidgetError::NotSelectable {
                    widget: Self::TYPE_NAME,
                });
            }
            if index >= map.len() {
                return Err(WidgetError::SelectionOutOfRange {
                    index,
                    length: map.len(),
                });
            }
        }

        for widget in self.widgets.iter_mut().filter(|widget| widget.is_selectable()) {
            widget.select(None)?;
        }
        if let Some(index) = index {
            let (child, local) = map[index];
            self.widgets[child].select(Some(local))?;
        }
        self.base.set_selected_index(index);
        debug!(?index, "container selection");
        Ok(())
    }

    fn handle_key(&mut self, key: &str) -> bool {
        let position = self.selected_position();
        if let Some((child, _)) = position {
            if self.widgets[child].handle_key(key) {
                self.sync_selection(child);
                return true;
            }
        }

        let length = self.selectables_length();
        if length > 1 && self.keys.is_nav(key) {
            let next = match self.base.selected_index() {
                None => Some(0),
                Some(current) if self.keys.matches(key, NavAction::Previous) => {
                    current.checked_sub(1)
                }
                Some(current) => Some(current + 1).filter(|next| *next < length),
            };
            let Some(next) = next else {
                trace!(key, "selection edge reached");
                return false;
            };
            return match self.select(Some(next)) {
                Ok(()) => true,
                Err(err) => {
                    warn!(%err, key, "navigation failed");
                    false
                }
            };
        }

        if self.keys.matches(key, NavAction::Confirm) {
            if let Some((child, _)) = position {
                let widget = &mut self.widgets[child];
                let target = widget
                    .base()
                    .selected_index()
                    .and_then(|local| widget.mouse_targets().get(local).cloned());
                if let Some(target) = target {
                    target.click(widget.as_widget_mut());
                    return true;
                }
            }
        }
        false
    }

    fn handle_mouse(&mut self, event: &MouseEvent, target: Option<MouseTarget>) -> bool {
        let target = target.or_else(|| self.base.get_target(event.pos));
        let owner = target.as_ref().and_then(|target| {
            self.widgets
                .iter()
                .position(|widget| widget.mouse_targets().iter().any(|t| t.ptr_eq(target)))
        });

        let drag = self.drag_target.filter(|index| *index < self.widgets.len());
        let routed = match event.action {
            MouseAction::LeftClick => owner,
            _ => drag.or(owner),
        };
        match event.action {
            MouseAction::LeftClick => self.drag_target = routed,
            MouseAction::Release => self.drag_target = None,
            _ => {}
        }

        let Some(child) = routed else {
            return false;
        };
        let child_target = target.clone().filter(|_| owner == Some(child));
        let handled = self.widgets[child].handle_mouse(event, child_target);

        if handled {
            let flat = target.as_ref().and_then(|target| {
                self.base
                    .mouse_targets()
                    .iter()
                    .position(|candidate| candidate.ptr_eq(target))
            });
            if let Some(flat) = flat {
                if let Err(err) = self.select(Some(flat)) {
                    warn!(%err, index = flat, "could not select clicked target");
                }
            }
        }
        handled
    }

    fn set_depth_recursive(&mut self, depth: usize) {
        self.base.set_depth(depth);
        for widget in self.widgets.iter_mut() {
            widget.set_depth_recursive(depth + 1);
        }
    }

    fn serialized_fields(&self, markup: &dyn Markup) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("_centered_axis".into(), json!(self.centered_axis));
        fields.insert(
            "_widgets".into(),
            Value::Array(self.widgets.iter().map(|widget| widget.serialize(markup)).collect()),
        );
        fields
    }

    fn debug(&self) -> String {
        let mut out = String::from("Container(");
        for widget in &self.widgets {
            let _ = write!(out, "{}, ", widget.debug());
        }
        out.push_str("**attrs)");
        out
    }

    fn find(&self, id: &str) -> Option<&dyn Widget> {
        if self.base.id() == Some(id) {
            return Some(self);
        }
        self.widgets.iter().find_map(|widget| widget.find(id))
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut dyn Widget> {
        if self.base.id() == Some(id) {
            return Some(self);
        }
        self.widgets.iter_mut().find_map(|widget| widget.find_mut(id))
    }
}
