use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pretty_assertions::assert_eq;
use termgui::{
    Button, Container, MouseAction, MouseEvent, Styled, Template, Widget, WidgetBase,
};

#[test]
fn clicking_a_child_selects_its_target_and_runs_its_callback() {
    let clicks = Rc::new(Cell::new(0));
    let mut container = Container::new();
    container.add(Button::new("a")).expect("add");
    let seen = Rc::clone(&clicks);
    container
        .add(Button::new("b").with_onclick(move |_, _| seen.set(seen.get() + 1)))
        .expect("add");
    container.add(Button::new("c")).expect("add");

    let target = container.get(1).expect("child").mouse_targets()[0].clone();
    let flat = container
        .mouse_targets()
        .iter()
        .position(|candidate| *candidate == target)
        .expect("collected by the container");

    let click = MouseEvent::new(MouseAction::LeftClick, target.start());
    assert!(container.handle_mouse(&click, None));
    assert_eq!(clicks.get(), 1);
    assert_eq!(flat, 1);
    assert_eq!(container.base().selected_index(), Some(flat));
}

#[test]
fn clicks_outside_every_target_are_ignored() {
    let mut container = Container::new();
    container.add(Button::new("a")).expect("add");
    let target = container.mouse_targets()[0].clone();
    let (end_x, end_y) = target.end();

    for pos in [(end_x + 1, end_y), (end_x, end_y + 1), (1, 1)] {
        let click = MouseEvent::new(MouseAction::LeftClick, pos);
        assert!(!container.handle_mouse(&click, None), "{pos:?}");
    }
    assert_eq!(container.base().selected_index(), None);
}

#[test]
fn targets_follow_the_container_when_it_moves() {
    let mut container = Container::new();
    container.add(Button::new("a")).expect("add");
    let before = container.mouse_targets()[0].start();

    container.base_mut().set_pos((11, 6));
    container.get_lines().expect("layout");
    let after = container.mouse_targets()[0].start();
    assert_eq!((after.0 - before.0, after.1 - before.1), (10, 5));
}

/// Records every mouse event routed to it.
#[derive(Clone)]
struct Recorder {
    base: WidgetBase,
    seen: Rc<RefCell<Vec<MouseAction>>>,
}

impl Styled for Recorder {
    const TYPE_NAME: &'static str = "Recorder";

    fn default_template() -> Template {
        Template::new()
    }
}

impl Widget for Recorder {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn get_lines(&mut self) -> termgui::Result<Vec<String>> {
        self.base.clear_mouse_targets();
        self.base.define_mouse_target(1, 0, 1, 0);
        Ok(vec![" ".repeat(self.base.width())])
    }

    fn handle_mouse(&mut self, event: &MouseEvent, _target: Option<termgui::MouseTarget>) -> bool {
        self.seen.borrow_mut().push(event.action);
        true
    }
}

#[test]
fn drags_stay_with_the_pressed_child_until_release() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut container = Container::new();
    container
        .add(Recorder {
            base: WidgetBase::new::<Recorder>(),
            seen: Rc::clone(&seen),
        })
        .expect("add");

    let inside = container.mouse_targets()[0].start();
    let outside = (200, 200);
    let events = [
        (MouseAction::LeftClick, inside, true),
        (MouseAction::LeftDrag, outside, true),
        (MouseAction::Release, outside, true),
        (MouseAction::LeftDrag, outside, false),
    ];
    for (action, pos, expected) in events {
        let handled = container.handle_mouse(&MouseEvent::new(action, pos), None);
        assert_eq!(handled, expected, "{action:?}");
    }
    assert_eq!(
        *seen.borrow(),
        vec![MouseAction::LeftClick, MouseAction::LeftDrag, MouseAction::Release]
    );
}

#[test]
fn nested_clicks_select_at_every_level() {
    let mut inner = Container::new();
    inner.add(Button::new("a")).expect("add");
    inner.add(Button::new("b")).expect("add");
    let mut outer = Container::new();
    outer.add(Button::new("top")).expect("add");
    outer.add(inner).expect("add");

    let target = outer
        .get(1)
        .and_then(|inner| inner.mouse_targets().get(1).cloned())
        .expect("inner target");
    let click = MouseEvent::new(MouseAction::LeftClick, target.start());
    assert!(outer.handle_mouse(&click, None));

    assert_eq!(outer.base().selected_index(), Some(2));
    assert_eq!(outer.get(1).and_then(|w| w.base().selected_index()), Some(1));
    assert_eq!(outer.selected().map(|w| w.debug()), Some("Button(label=\"b\")".into()));
}
