use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use termgui::{Button, Container, Label, NavAction, Widget, WidgetError};

fn three_buttons() -> Container {
    let mut container = Container::new();
    for label in ["first", "second", "third"] {
        container.add(Button::new(label)).expect("add button");
    }
    container
}

#[test]
fn next_and_previous_walk_the_selectables() {
    let mut container = three_buttons();
    container.keys_mut().set(NavAction::Next, "j");
    container.keys_mut().set(NavAction::Previous, "k");

    assert!(container.handle_key("j"));
    assert_eq!(container.base().selected_index(), Some(0));
    assert!(container.handle_key("j"));
    assert_eq!(container.base().selected_index(), Some(1));
    assert!(container.handle_key("k"));
    assert_eq!(container.base().selected_index(), Some(0));
    assert!(!container.handle_key("k"));
    assert_eq!(container.base().selected_index(), Some(0));
}

#[test]
fn moving_past_the_last_selectable_bubbles() {
    let mut container = three_buttons();
    container.select(Some(2)).expect("select last");
    assert!(!container.handle_key("down"));
    assert_eq!(container.base().selected_index(), Some(2));
}

#[test]
fn overridden_keys_replace_the_defaults() {
    let mut container = three_buttons();
    container.keys_mut().set(NavAction::Next, vec!["tab", "l"]);
    assert!(!container.handle_key("j"));
    assert!(container.handle_key("tab"));
    assert!(container.handle_key("l"));
    assert_eq!(container.base().selected_index(), Some(1));
}

#[test]
fn a_single_selectable_does_not_navigate() {
    let mut container = Container::new();
    container.add(Label::new("title", 0)).expect("add");
    container.add(Button::new("only")).expect("add");
    assert!(!container.handle_key("j"));
    assert_eq!(container.base().selected_index(), None);
}

#[test]
fn selection_highlights_exactly_one_child() {
    let mut container = three_buttons();
    container.select(Some(1)).expect("select");
    container.select(Some(2)).expect("select");

    let selected: Vec<Option<usize>> = container
        .iter()
        .map(|widget| widget.base().selected_index())
        .collect();
    assert_eq!(selected, vec![None, None, Some(0)]);

    container.select(None).expect("clear");
    assert!(container.iter().all(|widget| widget.base().selected_index().is_none()));
}

#[test]
fn selection_errors() {
    let mut empty = Container::new();
    empty.add(Label::new("text", 0)).expect("add");
    assert!(matches!(
        empty.select(Some(0)),
        Err(WidgetError::NotSelectable { .. })
    ));

    let mut container = three_buttons();
    assert!(matches!(
        container.select(Some(3)),
        Err(WidgetError::SelectionOutOfRange { index: 3, length: 3 })
    ));

    let mut label = Label::new("plain", 0);
    assert!(matches!(
        label.select(Some(0)),
        Err(WidgetError::NotSelectable { widget: "Label" })
    ));

    let mut button = Button::new("clamped");
    button.select(Some(9)).expect("clamp");
    assert_eq!(button.base().selected_index(), Some(0));
}

#[test]
fn nested_containers_hand_the_selection_across() {
    let mut left = Container::new();
    left.add(Button::new("a")).expect("add");
    left.add(Button::new("b")).expect("add");
    let mut right = Container::new();
    right.add(Button::new("c")).expect("add");
    right.add(Button::new("d")).expect("add");

    let mut outer = Container::new();
    outer.add(left).expect("add");
    outer.add(right).expect("add");
    assert_eq!(outer.selectables_length(), 4);

    let mut visited = Vec::new();
    while outer.handle_key("j") {
        visited.push(outer.base().selected_index());
    }
    assert_eq!(visited, vec![Some(0), Some(1), Some(2), Some(3)]);
    assert_eq!(outer.selected().map(|widget| widget.debug()), Some("Button(label=\"d\")".into()));
    assert_eq!(
        outer.get(0).and_then(|widget| widget.base().selected_index()),
        None
    );
}

#[test]
fn confirm_clicks_the_selected_button() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut container = Container::new();
    for label in ["yes", "no"] {
        let log = Rc::clone(&log);
        let button = Button::new(label).with_onclick(move |_, caller| {
            log.borrow_mut().push(caller.debug());
        });
        container.add(button).expect("add");
    }

    container.handle_key("down");
    container.handle_key("down");
    assert!(container.handle_key("enter"));
    assert_eq!(*log.borrow(), vec!["Button(label=\"no\")".to_string()]);
}
