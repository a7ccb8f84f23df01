mod fixture;

use pretty_assertions::assert_eq;
use termgui::{
    visible_width, BoxStyle, Container, Label, SizePolicy, Widget, WidgetAlignment, WidgetError,
    WidgetExt,
};

#[test]
fn label_in_container_matches_golden() {
    let mut container = Container::new();
    container.add(Label::new("hello", 2)).expect("add label");

    let lines = container.get_lines().expect("layout");
    assert_eq!(lines, fixture::read_lines("label_in_container.txt"));
}

#[test]
fn nested_containers_match_golden() {
    let mut inner = Container::new();
    inner.add(Label::new("inner", 0)).expect("add label");
    let mut outer = Container::new();
    outer.add(inner).expect("add container");

    let lines = outer.get_lines().expect("layout");
    assert_eq!(lines, fixture::read_lines("nested_containers.txt"));
}

#[test]
fn box_preset_and_alignment_match_golden() {
    let mut container = Container::new();
    container.base_mut().set_width(20);
    container.set_box(BoxStyle::DOUBLE).expect("preset");
    container
        .add(Label::new("mid", 0).static_width(3).align(WidgetAlignment::Center))
        .expect("add centered");
    container
        .add(Label::new("end", 0).static_width(3).align(WidgetAlignment::Right))
        .expect("add right");

    let lines = container.get_lines().expect("layout");
    assert_eq!(lines, fixture::read_lines("double_box_alignment.txt"));
}

#[test]
fn every_line_matches_the_container_width() {
    let alignments = [
        WidgetAlignment::Left,
        WidgetAlignment::Center,
        WidgetAlignment::Right,
    ];
    for width in [12, 25, 40, 63] {
        for align in alignments {
            let mut container = Container::new();
            container.base_mut().set_width(width);
            container
                .add(Label::new("a [bold]styled[/] label that wraps", 1).align(align))
                .expect("fill label");
            container
                .add(Label::new("ab", 0).static_width(2).align(align))
                .expect("static label");
            container
                .add(Label::new("relative", 0).relative_width(0.5).align(align))
                .expect("relative label");
            let mut nested = Container::new();
            nested.add(Label::new("deep", 0)).expect("nested label");
            container.add(nested).expect("nested container");

            let lines = container.get_lines().expect("layout");
            for (index, line) in lines.iter().enumerate() {
                assert_eq!(
                    visible_width(line),
                    width,
                    "width {width}, {align:?}, line {index}: {line:?}"
                );
            }
        }
    }
}

#[test]
fn layout_twice_is_identical() {
    let mut container = Container::new();
    container.add(Label::new("one", 0)).expect("add");
    container
        .add(Label::new("two", 0).align(WidgetAlignment::Center))
        .expect("add");

    let first = container.get_lines().expect("layout");
    let second = container.get_lines().expect("layout");
    assert_eq!(first, second);
    assert_eq!(container.last_lines(), second.as_slice());
}

#[test]
fn oversized_static_child_fails_before_any_line() {
    let mut container = Container::new();
    container.base_mut().set_width(20);
    container.add(Label::new("kept", 0)).expect("add");
    let before = container.get_lines().expect("layout");

    let err = container
        .add(Label::new("wide", 0).static_width(30))
        .expect_err("width exceeded");
    match err {
        WidgetError::WidthExceeded {
            width, available, ..
        } => {
            assert_eq!(width, 30);
            assert_eq!(available, 15);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(container.len(), 1);
    assert_eq!(container.last_lines(), before.as_slice());
}

#[test]
fn misbehaving_child_reports_line_length() {
    #[derive(Clone)]
    struct Overflow {
        base: termgui::WidgetBase,
    }

    impl termgui::Styled for Overflow {
        const TYPE_NAME: &'static str = "Overflow";

        fn default_template() -> termgui::Template {
            termgui::Template::new()
        }
    }

    impl Widget for Overflow {
        fn base(&self) -> &termgui::WidgetBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut termgui::WidgetBase {
            &mut self.base
        }

        fn get_lines(&mut self) -> termgui::Result<Vec<String>> {
            Ok(vec!["fits".into(), "x".repeat(self.base.width() + 5)])
        }
    }

    let mut container = Container::new();
    let err = container
        .add(Overflow {
            base: termgui::WidgetBase::new::<Overflow>(),
        })
        .expect_err("line too long");
    assert!(matches!(
        err,
        WidgetError::LineLength {
            index: 1,
            expected: 40,
            ..
        }
    ));
    assert!(err.is_layout());
    assert!(container.is_empty());
}

#[test]
fn height_counts_interior_rows_and_keeps_padding() {
    let mut container = Container::new();
    container.add(Label::new("one", 0)).expect("add");
    container.add(Label::new("two", 0)).expect("add");
    assert_eq!(container.base().height(), 2);

    container.base_mut().set_height(4);
    let lines = container.get_lines().expect("layout");
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[4], format!("|{}|", " ".repeat(38)));
    assert_eq!(container.base().size_policy(), SizePolicy::Fill);
}
