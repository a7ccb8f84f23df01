//! The widget contract and the state every widget carries.

use std::any::Any;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::core::geometry::{Point, SizePolicy, WidgetAlignment};
use crate::core::input::{keys, MouseAction, MouseEvent};
use crate::core::markup::{Markup, TagMarkup};
use crate::core::output::TerminalCmd;
use crate::core::style::{CharName, CharValue, StyleFn, StyleName, Styled, Template};
use crate::core::terminal::Terminal;
use crate::error::{Result, WidgetError};
use crate::runtime::registry::IdRegistry;
use crate::widgets::container::Container;
use crate::widgets::mouse_target::{MouseCallback, MouseTarget};

/// Geometry shared between a widget, its mouse targets, its children's parent link and
/// the id registry. Nothing outside the widget owns it.
#[derive(Debug)]
pub struct WidgetCell {
    type_name: &'static str,
    pos: Cell<Point>,
    width: Cell<usize>,
    height: Cell<usize>,
}

impl WidgetCell {
    pub fn new(type_name: &'static str) -> Rc<Self> {
        Rc::new(Self {
            type_name,
            pos: Cell::new((1, 1)),
            width: Cell::new(1),
            height: Cell::new(1),
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn pos(&self) -> Point {
        self.pos.get()
    }

    pub fn set_pos(&self, pos: Point) {
        self.pos.set(pos);
    }

    pub fn width(&self) -> usize {
        self.width.get()
    }

    pub fn set_width(&self, width: usize) {
        self.width.set(width);
    }

    pub fn height(&self) -> usize {
        self.height.get()
    }

    pub fn set_height(&self, height: usize) {
        self.height.set(height);
    }
}

/// A read-only view of a live widget's geometry.
#[derive(Debug, Clone)]
pub struct WidgetHandle(Rc<WidgetCell>);

impl WidgetHandle {
    pub(crate) fn from_cell(cell: Rc<WidgetCell>) -> Self {
        Self(cell)
    }

    pub(crate) fn cell(&self) -> &Rc<WidgetCell> {
        &self.0
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    pub fn pos(&self) -> Point {
        self.0.pos()
    }

    pub fn width(&self) -> usize {
        self.0.width()
    }

    pub fn height(&self) -> usize {
        self.0.height()
    }

    /// Whether both handles view the same widget.
    pub fn ptr_eq(&self, other: &WidgetHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Whether this handle views `widget`.
    pub fn is(&self, widget: &dyn Widget) -> bool {
        Rc::ptr_eq(&self.0, &widget.base().cell)
    }
}

/// Called with the widget the binding lives on and the key that triggered it.
pub type BindingFn = Rc<dyn Fn(&mut dyn Widget, &str)>;

pub fn binding(callback: impl Fn(&mut dyn Widget, &str) + 'static) -> BindingFn {
    Rc::new(callback)
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum BindingKey {
    /// Runs for every key, before the exact match.
    Any,
    Key(String),
}

impl From<&str> for BindingKey {
    fn from(key: &str) -> Self {
        if key == keys::ANY_KEY {
            Self::Any
        } else {
            Self::Key(key.to_string())
        }
    }
}

impl BindingKey {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Any => keys::ANY_KEY,
            Self::Key(key) => key,
        }
    }
}

#[derive(Clone)]
struct Binding {
    callback: BindingFn,
    description: String,
}

/// State shared by all widgets: identity, geometry, layout policies, style tables,
/// selection, key bindings, mouse targets and the parent link.
pub struct WidgetBase {
    cell: Rc<WidgetCell>,
    id: Option<String>,
    registry: Option<Rc<IdRegistry>>,
    depth: usize,
    size_policy: SizePolicy,
    parent_align: WidgetAlignment,
    relative_width: f64,
    template: Template,
    mouse_targets: Vec<MouseTarget>,
    selected_index: Option<usize>,
    selectables_length: usize,
    bindings: BTreeMap<BindingKey, Binding>,
    parent: Weak<WidgetCell>,
}

impl WidgetBase {
    /// Fresh state for a widget of type `W`, with `W`'s current class template.
    pub fn new<W: Styled>() -> Self {
        Self {
            cell: WidgetCell::new(W::TYPE_NAME),
            id: None,
            registry: None,
            depth: 0,
            size_policy: SizePolicy::default(),
            parent_align: WidgetAlignment::default(),
            relative_width: 1.0,
            template: crate::core::style::class_template::<W>(),
            mouse_targets: Vec::new(),
            selected_index: None,
            selectables_length: 0,
            bindings: BTreeMap::new(),
            parent: Weak::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.cell.type_name()
    }

    pub fn handle(&self) -> WidgetHandle {
        WidgetHandle(Rc::clone(&self.cell))
    }

    pub(crate) fn cell(&self) -> Rc<WidgetCell> {
        Rc::clone(&self.cell)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Register under `id`, releasing any previous id first. Re-assigning the current id
    /// in the same registry does nothing.
    pub fn set_id(&mut self, registry: &Rc<IdRegistry>, id: impl Into<String>) {
        let id = id.into();
        let same_registry = self
            .registry
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, registry));
        if same_registry && self.id.as_deref() == Some(id.as_str()) {
            return;
        }

        self.clear_id();
        registry.register(&id, &self.handle());
        self.id = Some(id);
        self.registry = Some(Rc::clone(registry));
    }

    pub fn clear_id(&mut self) {
        if let (Some(id), Some(registry)) = (self.id.take(), self.registry.take()) {
            registry.release(&id, &self.cell);
        }
    }

    pub fn pos(&self) -> Point {
        self.cell.pos()
    }

    pub fn set_pos(&mut self, pos: Point) {
        self.cell.set_pos(pos);
    }

    pub fn width(&self) -> usize {
        self.cell.width()
    }

    pub fn set_width(&mut self, width: usize) {
        self.cell.set_width(width);
    }

    /// Set the width and switch to [`SizePolicy::Static`].
    pub fn set_static_width(&mut self, width: usize) {
        self.cell.set_width(width);
        self.size_policy = SizePolicy::Static;
    }

    pub fn height(&self) -> usize {
        self.cell.height()
    }

    pub fn set_height(&mut self, height: usize) {
        self.cell.set_height(height);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    pub fn size_policy(&self) -> SizePolicy {
        self.size_policy
    }

    pub fn set_size_policy(&mut self, policy: SizePolicy) {
        self.size_policy = policy;
    }

    pub fn parent_align(&self) -> WidgetAlignment {
        self.parent_align
    }

    pub fn set_parent_align(&mut self, align: WidgetAlignment) {
        self.parent_align = align;
    }

    pub fn relative_width(&self) -> f64 {
        self.relative_width
    }

    /// Fraction of the parent's available width used under [`SizePolicy::Relative`].
    pub fn set_relative_width(&mut self, fraction: f64) {
        self.relative_width = fraction.clamp(0.0, 1.0);
    }

    pub fn parent(&self) -> Option<WidgetHandle> {
        self.parent.upgrade().map(WidgetHandle)
    }

    pub fn has_parent(&self) -> bool {
        self.parent.strong_count() > 0
    }

    pub(crate) fn set_parent(&mut self, parent: &Rc<WidgetCell>) {
        self.parent = Rc::downgrade(parent);
    }

    pub(crate) fn clear_parent(&mut self) {
        self.parent = Weak::new();
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub(crate) fn set_selected_index(&mut self, index: Option<usize>) {
        self.selected_index = index;
    }

    pub fn selectables_length(&self) -> usize {
        self.selectables_length
    }

    pub fn set_selectables_length(&mut self, length: usize) {
        self.selectables_length = length;
    }

    pub fn style(&self, name: StyleName) -> Option<StyleFn> {
        self.template.styles.get(&name).cloned()
    }

    /// Run `text` through style `name` at this widget's depth. Undeclared styles pass text through.
    pub fn styled(&self, name: StyleName, text: &str) -> String {
        match self.template.styles.get(&name) {
            Some(style) => style(self.depth, text),
            None => text.to_string(),
        }
    }

    pub fn set_style(&mut self, name: StyleName, style: StyleFn) -> Result<()> {
        self.template.set_style(self.type_name(), name, style)
    }

    /// Like [`set_style`](Self::set_style), with the name given as a string.
    pub fn set_style_named(&mut self, name: &str, style: StyleFn) -> Result<()> {
        let parsed = name.parse().map_err(|_| WidgetError::UnknownStyle {
            name: name.to_string(),
            widget: self.type_name(),
        })?;
        self.set_style(parsed, style)
    }

    pub fn get_char(&self, name: CharName) -> Option<&CharValue> {
        self.template.chars.get(&name)
    }

    pub fn set_char(&mut self, name: CharName, value: CharValue) -> Result<()> {
        self.template.set_char(self.type_name(), name, value)
    }

    pub fn set_char_named(&mut self, name: &str, value: CharValue) -> Result<()> {
        let parsed = name.parse().map_err(|_| WidgetError::UnknownChar {
            name: name.to_string(),
            widget: self.type_name(),
        })?;
        self.set_char(parsed, value)
    }

    pub(crate) fn chars(&self) -> &BTreeMap<CharName, CharValue> {
        &self.template.chars
    }

    pub fn mouse_targets(&self) -> &[MouseTarget] {
        &self.mouse_targets
    }

    pub(crate) fn set_mouse_targets(&mut self, targets: Vec<MouseTarget>) {
        self.mouse_targets = targets;
    }

    pub fn clear_mouse_targets(&mut self) {
        self.mouse_targets.clear();
    }

    /// Add a target relative to this widget. Newer targets win overlapping hit tests.
    pub fn define_mouse_target(&mut self, left: i32, right: i32, height: i32, top: i32) -> MouseTarget {
        let target = MouseTarget::new(&self.cell, left, right, height, top);
        self.mouse_targets.insert(0, target.clone());
        target
    }

    pub fn get_target(&self, pos: Point) -> Option<MouseTarget> {
        self.mouse_targets
            .iter()
            .find(|target| target.contains(pos))
            .cloned()
    }

    pub(crate) fn insert_binding(&mut self, key: BindingKey, callback: BindingFn, description: String) {
        self.bindings.insert(key, Binding { callback, description });
    }

    fn binding_callback(&self, key: &BindingKey) -> Option<BindingFn> {
        self.bindings.get(key).map(|binding| Rc::clone(&binding.callback))
    }

    /// `(key, description)` of every binding.
    pub fn bindings(&self) -> Vec<(String, String)> {
        self.bindings
            .iter()
            .map(|(key, binding)| (key.as_str().to_string(), binding.description.clone()))
            .collect()
    }
}

impl Clone for WidgetBase {
    /// An independent copy: new geometry cell, no id, no parent. Mouse targets owned by
    /// this widget are rebound to the copy; targets collected from children are dropped.
    fn clone(&self) -> Self {
        let cell = Rc::new(WidgetCell {
            type_name: self.cell.type_name,
            pos: Cell::new(self.cell.pos()),
            width: Cell::new(self.cell.width()),
            height: Cell::new(self.cell.height()),
        });
        let mouse_targets = self
            .mouse_targets
            .iter()
            .filter(|target| target.is_owned_by(&self.cell))
            .map(|target| target.rebind(&cell))
            .collect();

        Self {
            cell,
            id: None,
            registry: None,
            depth: self.depth,
            size_policy: self.size_policy,
            parent_align: self.parent_align,
            relative_width: self.relative_width,
            template: self.template.clone(),
            mouse_targets,
            selected_index: self.selected_index,
            selectables_length: self.selectables_length,
            bindings: self.bindings.clone(),
            parent: Weak::new(),
        }
    }
}

impl Drop for WidgetBase {
    fn drop(&mut self) {
        self.clear_id();
    }
}

impl fmt::Debug for WidgetBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetBase")
            .field("type", &self.type_name())
            .field("id", &self.id)
            .field("pos", &self.pos())
            .field("width", &self.width())
            .field("height", &self.height())
            .field("depth", &self.depth)
            .field("selected_index", &self.selected_index)
            .finish_non_exhaustive()
    }
}

/// Upcasts available on every widget, including through `dyn Widget`.
pub trait AsWidget {
    fn as_widget(&self) -> &dyn Widget;
    fn as_widget_mut(&mut self) -> &mut dyn Widget;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn box_clone(&self) -> Box<dyn Widget>;
}

impl<T: Widget + Clone + 'static> AsWidget for T {
    fn as_widget(&self) -> &dyn Widget {
        self
    }

    fn as_widget_mut(&mut self) -> &mut dyn Widget {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn box_clone(&self) -> Box<dyn Widget> {
        Box::new(self.clone())
    }
}

/// A node of the widget tree.
///
/// `get_lines` is the one method every renderable widget must provide. Every line it
/// returns must be exactly as wide as the parent container will make it once aligned.
pub trait Widget: AsWidget {
    fn base(&self) -> &WidgetBase;

    fn base_mut(&mut self) -> &mut WidgetBase;

    fn type_name(&self) -> &'static str {
        self.base().type_name()
    }

    /// Lay out and render. Updates the widget's own height and mouse targets.
    fn get_lines(&mut self) -> Result<Vec<String>> {
        Err(WidgetError::NotImplemented {
            widget: self.type_name(),
        })
    }

    fn is_bindable(&self) -> bool {
        false
    }

    fn is_container(&self) -> bool {
        false
    }

    fn selectables_length(&self) -> usize {
        self.base().selectables_length()
    }

    /// Every selectable item as `(widget, index inside that widget)`.
    fn selectables(&self) -> Vec<(&dyn Widget, usize)> {
        (0..self.selectables_length())
            .map(|index| (self.as_widget(), index))
            .collect()
    }

    fn is_selectable(&self) -> bool {
        self.selectables_length() != 0
    }

    /// Select an inner item, clamped into range, or clear the selection with `None`.
    fn select(&mut self, index: Option<usize>) -> Result<()> {
        let length = self.selectables_length();
        if length == 0 {
            return Err(WidgetError::NotSelectable {
                widget: self.type_name(),
            });
        }
        let index = index.map(|index| index.min(length - 1));
        self.base_mut().set_selected_index(index);
        Ok(())
    }

    /// Returns whether the key was consumed.
    fn handle_key(&mut self, _key: &str) -> bool {
        false
    }

    /// Resolve the target under the pointer unless one is given, and click it on a left click.
    fn handle_mouse(&mut self, event: &MouseEvent, target: Option<MouseTarget>) -> bool {
        let target = target.or_else(|| self.base().get_target(event.pos));
        match (event.action, target) {
            (MouseAction::LeftClick, Some(target)) => {
                target.click(self.as_widget_mut());
                true
            }
            _ => false,
        }
    }

    fn mouse_targets(&self) -> &[MouseTarget] {
        self.base().mouse_targets()
    }

    /// Commands painting every mouse target of this widget.
    fn target_commands(&self, color: Option<u8>) -> Vec<TerminalCmd> {
        self.mouse_targets()
            .iter()
            .flat_map(|target| target.show(color))
            .collect()
    }

    /// Set the nesting depth of this widget and anything below it.
    fn set_depth_recursive(&mut self, depth: usize) {
        self.base_mut().set_depth(depth);
    }

    /// Bind `key` (or [`keys::ANY_KEY`]) to a callback. The last binding of a key wins.
    fn bind(&mut self, key: &str, callback: BindingFn, description: Option<&str>) -> Result<()> {
        if !self.is_bindable() {
            return Err(WidgetError::NotBindable {
                widget: self.type_name(),
            });
        }
        let description = description
            .map(str::to_string)
            .unwrap_or_else(|| format!("Binding of {key}"));
        debug!(widget = self.type_name(), key, "bound key");
        self.base_mut()
            .insert_binding(BindingKey::from(key), callback, description);
        Ok(())
    }

    /// Run the wildcard binding, then the binding of `key`. Returns whether `key` itself was bound.
    fn execute_binding(&mut self, key: &str) -> bool {
        if let Some(callback) = self.base().binding_callback(&BindingKey::Any) {
            callback(self.as_widget_mut(), key);
        }
        match self.base().binding_callback(&BindingKey::from(key)) {
            Some(callback) => {
                callback(self.as_widget_mut(), key);
                true
            }
            None => false,
        }
    }

    /// Type-specific fields for [`serialize`](Widget::serialize).
    fn serialized_fields(&self, _markup: &dyn Markup) -> Map<String, Value> {
        Map::new()
    }

    fn serialize(&self, markup: &dyn Markup) -> Value {
        serialize_base(self.as_widget(), markup)
    }

    /// [`serialize`](Widget::serialize) with the default markup, encoded as JSON text.
    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.serialize(&TagMarkup))?)
    }

    /// A constructor-like description.
    fn debug(&self) -> String {
        format!("{}()", self.type_name())
    }

    /// A deep, independent copy. The copy has no id.
    fn copy(&self) -> Box<dyn Widget> {
        self.box_clone()
    }

    /// Draw a copy of this widget on its own, inside a default container wide enough for it.
    fn print(&mut self, term: &mut dyn Terminal) -> Result<()> {
        Container::wrapping(self.copy())?.print(term)
    }

    fn find(&self, id: &str) -> Option<&dyn Widget> {
        (self.base().id() == Some(id)).then(|| self.as_widget())
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut dyn Widget> {
        if self.base().id() == Some(id) {
            Some(self.as_widget_mut())
        } else {
            None
        }
    }
}

impl Clone for Box<dyn Widget> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

impl fmt::Debug for dyn Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug())
    }
}

impl dyn Widget {
    pub fn downcast_ref<W: Widget + 'static>(&self) -> Option<&W> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<W: Widget + 'static>(&mut self) -> Option<&mut W> {
        self.as_any_mut().downcast_mut()
    }
}

/// The common record: type, identity, geometry, selection, declared fields, then every
/// glyph set rendered through its style and converted back to markup.
pub fn serialize_base(widget: &dyn Widget, markup: &dyn Markup) -> Value {
    let base = widget.base();
    let (x, y) = base.pos();
    let mut out = Map::new();
    out.insert("type".into(), json!(widget.type_name()));
    out.insert("id".into(), json!(base.id()));
    out.insert("pos".into(), json!([x, y]));
    out.insert("depth".into(), json!(base.depth()));
    out.insert("width".into(), json!(base.width()));
    out.insert("height".into(), json!(base.height()));
    out.insert("selected_index".into(), json!(base.selected_index()));
    out.insert("selectables_length".into(), json!(widget.selectables_length()));
    out.extend(widget.serialized_fields(markup));

    let chars: Map<String, Value> = base
        .chars()
        .iter()
        .map(|(name, value)| {
            let style = name.style();
            let encoded = match value {
                CharValue::Single(glyph) => json!(styled_markup(base, markup, style, glyph)),
                CharValue::List(glyphs) => json!(glyphs
                    .iter()
                    .map(|glyph| styled_markup(base, markup, style, glyph))
                    .collect::<Vec<_>>()),
            };
            (name.as_str().to_string(), encoded)
        })
        .collect();
    out.insert("chars".into(), Value::Object(chars));
    Value::Object(out)
}

/// Render `text` through a style and recover it as markup, for serialized fields.
pub fn styled_markup(base: &WidgetBase, markup: &dyn Markup, style: StyleName, text: &str) -> String {
    markup.get_markup(&base.styled(style, text))
}

/// Builder-style attribute setters for widgets under construction.
pub trait WidgetExt: Widget + Sized {
    fn static_width(mut self, width: usize) -> Self {
        self.base_mut().set_static_width(width);
        self
    }

    fn width(mut self, width: usize) -> Self {
        self.base_mut().set_width(width);
        self
    }

    fn size_policy(mut self, policy: SizePolicy) -> Self {
        self.base_mut().set_size_policy(policy);
        self
    }

    fn relative_width(mut self, fraction: f64) -> Self {
        self.base_mut().set_relative_width(fraction);
        self.base_mut().set_size_policy(SizePolicy::Relative);
        self
    }

    fn align(mut self, align: WidgetAlignment) -> Self {
        self.base_mut().set_parent_align(align);
        self
    }

    fn at(mut self, pos: Point) -> Self {
        self.base_mut().set_pos(pos);
        self
    }

    fn with_id(mut self, registry: &Rc<IdRegistry>, id: &str) -> Self {
        self.base_mut().set_id(registry, id);
        self
    }

    fn boxed(self) -> Box<dyn Widget>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<W: Widget> WidgetExt for W {}

/// Keep `onclick` callbacks cloneable between widget and target.
pub(crate) fn attach_onclick(target: &MouseTarget, onclick: &Option<MouseCallback>) {
    if onclick.is_some() {
        target.set_onclick_rc(onclick.clone());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::core::style::Template;

    #[derive(Clone)]
    struct Stub {
        base: WidgetBase,
    }

    impl Styled for Stub {
        const TYPE_NAME: &'static str = "Stub";

        fn default_template() -> Template {
            Template::new()
        }
    }

    impl Widget for Stub {
        fn base(&self) -> &WidgetBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut WidgetBase {
            &mut self.base
        }

        fn is_bindable(&self) -> bool {
            true
        }
    }

    fn stub() -> Stub {
        Stub {
            base: WidgetBase::new::<Stub>(),
        }
    }

    #[test]
    fn base_get_lines_is_not_implemented() {
        let err = stub().get_lines().expect_err("no renderer");
        assert!(matches!(err, WidgetError::NotImplemented { widget: "Stub" }));
    }

    #[test]
    fn select_requires_selectables_and_clamps() {
        let mut widget = stub();
        assert!(matches!(
            widget.select(Some(0)),
            Err(WidgetError::NotSelectable { .. })
        ));

        widget.base_mut().set_selectables_length(3);
        widget.select(Some(10)).expect("clamped");
        assert_eq!(widget.base().selected_index(), Some(2));
        widget.select(None).expect("cleared");
        assert_eq!(widget.base().selected_index(), None);
    }

    #[test]
    fn wildcard_runs_before_exact_binding_and_last_bind_wins() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut widget = stub();

        let any_log = Rc::clone(&log);
        widget
            .bind(keys::ANY_KEY, binding(move |_, key| any_log.borrow_mut().push(format!("any:{key}"))), None)
            .expect("bind any");
        let first = Rc::clone(&log);
        widget
            .bind("x", binding(move |_, _| first.borrow_mut().push("first".into())), None)
            .expect("bind x");
        let second = Rc::clone(&log);
        widget
            .bind("x", binding(move |_, _| second.borrow_mut().push("second".into())), Some("replace"))
            .expect("rebind x");

        assert!(widget.execute_binding("x"));
        assert!(!widget.execute_binding("y"));
        assert_eq!(*log.borrow(), vec!["any:x", "second", "any:y"]);
        assert!(widget
            .base()
            .bindings()
            .contains(&("x".to_string(), "replace".to_string())));
    }

    #[test]
    fn left_click_hits_the_newest_target() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut widget = stub();
        widget.base_mut().set_width(10);

        let older = widget.base_mut().define_mouse_target(0, 0, 1, 0);
        let log = Rc::clone(&hits);
        older.set_onclick(move |_, _| log.borrow_mut().push("older"));
        let newer = widget.base_mut().define_mouse_target(0, 0, 1, 0);
        let log = Rc::clone(&hits);
        newer.set_onclick(move |_, _| log.borrow_mut().push("newer"));

        let inside = MouseEvent::new(MouseAction::LeftClick, newer.start());
        assert!(widget.handle_mouse(&inside, None));
        let release = MouseEvent::new(MouseAction::Release, newer.start());
        assert!(!widget.handle_mouse(&release, None));
        let outside = MouseEvent::new(MouseAction::LeftClick, (100, 100));
        assert!(!widget.handle_mouse(&outside, None));

        assert_eq!(*hits.borrow(), vec!["newer"]);
    }

    #[test]
    fn serialize_carries_the_common_fields() {
        let mut widget = stub();
        widget.base_mut().set_width(7);
        let record = widget.serialize(&TagMarkup);
        assert_eq!(record["type"], json!("Stub"));
        assert_eq!(record["pos"], json!([1, 1]));
        assert_eq!(record["width"], json!(7));
        assert_eq!(record["selected_index"], json!(null));
        assert_eq!(record["chars"], json!({}));
    }

    #[test]
    fn copies_are_independent_and_anonymous() {
        let registry = IdRegistry::new();
        let mut widget = stub();
        widget.base_mut().set_id(&registry, "original");

        let mut copy = widget.copy();
        copy.base_mut().set_width(30);

        assert_eq!(copy.base().id(), None);
        assert_eq!(widget.base().width(), 1);
        assert_eq!(registry.len(), 1);
        assert!(registry
            .get("original")
            .is_some_and(|handle| handle.is(&widget)));
    }
}
