//! Rectangular hit regions bound to a widget.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::geometry::Point;
use crate::core::output::{background256, TerminalCmd, RESET};
use crate::widgets::base::{Widget, WidgetCell};

/// Called with the clicked target and the widget that dispatched the click.
pub type MouseCallback = Rc<dyn Fn(&MouseTarget, &mut dyn Widget)>;

const DEFAULT_SHOW_COLOR: u8 = 210;

struct TargetInner {
    owner: Weak<WidgetCell>,
    left: i32,
    right: i32,
    height: i32,
    top: i32,
    start: Cell<Point>,
    end: Cell<Point>,
    onclick: RefCell<Option<MouseCallback>>,
}

/// A hit region whose corners are derived from its owner's position and width.
///
/// Cloning yields another handle to the same region; equality is identity.
#[derive(Clone)]
pub struct MouseTarget(Rc<TargetInner>);

impl MouseTarget {
    pub(crate) fn new(owner: &Rc<WidgetCell>, left: i32, right: i32, height: i32, top: i32) -> Self {
        let target = Self(Rc::new(TargetInner {
            owner: Rc::downgrade(owner),
            left,
            right,
            height,
            top,
            start: Cell::new((0, 0)),
            end: Cell::new((0, 0)),
            onclick: RefCell::new(None),
        }));
        target.adjust();
        target
    }

    /// Same offsets and callback, bound to another owner.
    pub(crate) fn rebind(&self, owner: &Rc<WidgetCell>) -> Self {
        let inner = &self.0;
        let target = Self::new(owner, inner.left, inner.right, inner.height, inner.top);
        *target.0.onclick.borrow_mut() = inner.onclick.borrow().clone();
        target
    }

    pub fn left(&self) -> i32 {
        self.0.left
    }

    pub fn right(&self) -> i32 {
        self.0.right
    }

    pub fn height(&self) -> i32 {
        self.0.height
    }

    pub fn top(&self) -> i32 {
        self.0.top
    }

    pub fn start(&self) -> Point {
        self.0.start.get()
    }

    pub fn end(&self) -> Point {
        self.0.end.get()
    }

    /// Recompute both corners from the owner's current position and width.
    ///
    /// A target whose owner has been dropped keeps its last corners.
    pub fn adjust(&self) {
        let Some(owner) = self.0.owner.upgrade() else {
            return;
        };
        let (x, y) = owner.pos();
        let width = owner.width() as i32;
        let inner = &self.0;
        inner.start.set((x + inner.left - 1, y + 1 + inner.top));
        inner
            .end
            .set((x + width - 1 - inner.right, y + inner.top + inner.height));
    }

    /// Inclusive on both corners.
    pub fn contains(&self, (x, y): Point) -> bool {
        let (start, end) = (self.start(), self.end());
        start.0 <= x && x <= end.0 && start.1 <= y && y <= end.1
    }

    pub fn set_onclick(&self, callback: impl Fn(&MouseTarget, &mut dyn Widget) + 'static) {
        *self.0.onclick.borrow_mut() = Some(Rc::new(callback));
    }

    pub fn set_onclick_rc(&self, callback: Option<MouseCallback>) {
        *self.0.onclick.borrow_mut() = callback;
    }

    pub fn has_onclick(&self) -> bool {
        self.0.onclick.borrow().is_some()
    }

    /// Run the click callback, if any, with `caller` as the dispatching widget.
    pub fn click(&self, caller: &mut dyn Widget) {
        let callback = self.0.onclick.borrow().clone();
        if let Some(callback) = callback {
            callback(self, caller);
        }
    }

    pub fn is_owned_by(&self, cell: &Rc<WidgetCell>) -> bool {
        std::ptr::eq(self.0.owner.as_ptr(), Rc::as_ptr(cell))
    }

    pub fn ptr_eq(&self, other: &MouseTarget) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Commands painting the region with a background color.
    pub fn show(&self, color: Option<u8>) -> Vec<TerminalCmd> {
        let (start, end) = (self.start(), self.end());
        let length = (end.0 - start.0).max(0) as usize;
        let fill = format!(
            "{}{}{RESET}",
            background256(color.unwrap_or(DEFAULT_SHOW_COLOR)),
            " ".repeat(length)
        );
        (start.1..=end.1)
            .flat_map(|y| [TerminalCmd::MoveTo((start.0, y)), TerminalCmd::bytes(fill.clone())])
            .collect()
    }
}

impl PartialEq for MouseTarget {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for MouseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MouseTarget")
            .field("start", &self.start())
            .field("end", &self.end())
            .field("has_onclick", &self.has_onclick())
            .finish()
    }
}
