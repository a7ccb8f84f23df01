use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use termgui::{
    Button, CenteringPolicy, Container, IdRegistry, Label, TagMarkup, Widget, WidgetExt,
};

#[test]
fn ids_resolve_to_widgets_inside_a_tree() {
    let registry = IdRegistry::new();
    let mut container = Container::new();
    container
        .add(Label::new("title", 0).with_id(&registry, "title"))
        .expect("add");
    container
        .add(Button::new("ok").with_id(&registry, "ok"))
        .expect("add");

    let handle = registry.get("ok").expect("registered");
    let found = container.find("ok").expect("found in tree");
    assert!(handle.is(found));
    assert_eq!(handle.pos(), found.base().pos());
    assert_eq!(registry.ids(), vec!["ok", "title"]);

    let removed = container.remove(&handle).expect("removed");
    assert_eq!(removed.base().id(), Some("ok"));
    drop(removed);
    assert!(registry.get("ok").is_none());
    assert!(container.find("ok").is_none());
}

#[test]
fn copies_never_share_an_id() {
    let registry = IdRegistry::new();
    let mut container = Container::new();
    container.base_mut().set_id(&registry, "root");
    container
        .add(Label::new("child", 0).with_id(&registry, "child"))
        .expect("add");

    let copy = container.copy();
    assert_eq!(copy.base().id(), None);
    assert!(copy.find("child").is_none());
    assert_eq!(registry.len(), 2);

    drop(copy);
    assert!(registry.get("root").is_some_and(|handle| handle.is(&container)));
}

#[test]
fn copies_lay_out_independently() {
    let mut container = Container::new();
    container.add(Label::new("child", 0)).expect("add");
    let mut copy = container.copy();
    copy.base_mut().set_width(20);

    let copied = copy.get_lines().expect("layout copy");
    let original = container.get_lines().expect("layout original");
    assert_eq!(copied[0].len(), 20);
    assert_eq!(original[0].len(), 40);
}

#[test]
fn container_serializes_children_and_chars() {
    let mut container = Container::new();
    container.add(Label::new("[bold]hi", 1)).expect("add");
    container.add(Button::new("go")).expect("add");

    let record = container.serialize(&TagMarkup);
    assert_eq!(record["type"], json!("Container"));
    assert_eq!(record["width"], json!(40));
    assert_eq!(record["height"], json!(2));
    assert_eq!(record["selectables_length"], json!(1));
    assert_eq!(record["_centered_axis"], Value::Null);
    assert_eq!(record["chars"]["border"], json!(["| ", "-", " |", "-"]));
    assert_eq!(record["chars"]["corner"], json!(["", "", "", ""]));

    let widgets = record["_widgets"].as_array().expect("children");
    assert_eq!(widgets.len(), 2);
    assert_eq!(widgets[0]["type"], json!("Label"));
    assert_eq!(widgets[0]["value"], json!("[bold]hi[/]"));
    assert_eq!(widgets[1]["type"], json!("Button"));
    assert_eq!(widgets[1]["chars"]["delimiter"], json!(["\\[ ", " ]"]));
}

#[test]
fn stored_centering_and_json_round_trip_to_value() {
    let mut container = Container::new().static_width(30);
    container.add(Label::new("x", 0)).expect("add");
    container
        .center(CenteringPolicy::Vertical, true, (80, 24))
        .expect("center");

    let text = container.to_json().expect("json");
    let value: Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value["_centered_axis"], json!("VERTICAL"));
    assert_eq!(value["pos"], json!([1, 11]));
}
