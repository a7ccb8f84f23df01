mod fixture;

use pretty_assertions::assert_eq;
use termgui::{
    CenteringPolicy, EnvConfig, InputToken, Label, Session, Terminal, VirtualTerminal, Widget,
};

#[test]
fn stored_centering_is_reapplied_on_resize() {
    let mut container = fixture::pinned(40);
    container.add(Label::new("centered", 0)).expect("add");

    container
        .center(CenteringPolicy::All, true, (80, 24))
        .expect("center");
    assert_eq!(container.base().pos(), (21, 11));

    assert!(container.handle_resize((100, 30)).expect("resize"));
    assert_eq!(container.base().pos(), (31, 14));
    assert_eq!(container.base().width(), 40);
    assert_eq!(container.base().height(), 1);
    assert_eq!(container.get(0).map(|w| w.base().pos()), Some((33, 15)));
}

#[test]
fn centering_one_axis_keeps_the_other() {
    let mut container = fixture::pinned(20);
    container.add(Label::new("x", 0)).expect("add");
    container.base_mut().set_pos((5, 7));

    container
        .center(CenteringPolicy::Horizontal, true, (80, 24))
        .expect("center");
    assert_eq!(container.base().pos(), (31, 7));
    assert_eq!(container.centered_axis(), Some(CenteringPolicy::Horizontal));
}

#[test]
fn unstored_centering_is_not_repeated() {
    let mut container = fixture::pinned(20);
    container.add(Label::new("x", 0)).expect("add");
    container
        .center(CenteringPolicy::All, false, (80, 24))
        .expect("center");
    let pos = container.base().pos();

    assert!(!container.handle_resize((120, 40)).expect("resize"));
    assert_eq!(container.base().pos(), pos);
}

#[test]
fn session_recenters_and_redraws_after_a_resize_token() {
    let mut root = fixture::pinned(40);
    root.add(Label::new("hello", 0)).expect("add");
    root.center(CenteringPolicy::All, true, (80, 24)).expect("center");

    let mut session = Session::new(VirtualTerminal::new(80, 24), root, EnvConfig::default());
    session.terminal_mut().resize(100, 30);
    session.run(|_| false).expect("run");

    assert_eq!(session.root().base().pos(), (31, 14));
    let screen = session.terminal().screen();
    assert_eq!(screen[13], format!("{}{}", " ".repeat(30), "-".repeat(40)));
    assert_eq!(session.terminal().size(), (100, 30));
}

#[test]
fn redraw_after_a_resize_clears_the_previous_frame() {
    let mut root = fixture::pinned(40);
    root.add(Label::new("hello", 0)).expect("add");
    root.center(CenteringPolicy::All, true, (80, 24)).expect("center");
    let mut session = Session::new(VirtualTerminal::new(80, 24), root, EnvConfig::default());

    session.print().expect("first print");
    assert_eq!(
        session.terminal().screen()[10],
        format!("{}{}", " ".repeat(20), "-".repeat(40))
    );
    session.terminal_mut().take_output();

    session.terminal_mut().set_size(100, 30);
    assert!(session
        .dispatch(&InputToken::Resize((100, 30)))
        .expect("dispatch"));
    session.print().expect("redraw");

    assert!(session.terminal().output().contains("\x1b[2J"));
    let screen = session.terminal().screen();
    assert_eq!(screen[10], "");
    assert_eq!(screen[13], format!("{}{}", " ".repeat(30), "-".repeat(40)));

    session.terminal_mut().take_output();
    session.print().expect("steady print");
    assert!(!session.terminal().output().contains("\x1b[2J"));
}

#[test]
fn uncentered_container_still_clears_after_a_resize() {
    let mut term = VirtualTerminal::new(30, 8);
    let mut container = fixture::pinned(20);
    container.add(Label::new("stay", 0)).expect("add");
    container.print(&mut term).expect("print");
    term.take_output();

    assert!(!container.handle_resize(term.size()).expect("resize"));
    container.print(&mut term).expect("print");
    assert!(term.output().starts_with("\x1b[2J"));
    assert_eq!(term.screen()[1], "| stay             |");
}

#[test]
fn fullscreen_root_fills_the_terminal_after_first_print() {
    let mut term = VirtualTerminal::new(30, 8);
    let mut root = termgui::Container::new();
    root.add(Label::new("full", 0)).expect("add");

    root.print(&mut term).expect("first print");
    root.print(&mut term).expect("second print");
    assert_eq!(root.base().width(), 30);
    assert_eq!(root.last_lines().len(), 8);
    assert_eq!(root.base().pos(), (1, 1));

    term.set_size(40, 10);
    assert!(!root.handle_resize(term.size()).expect("resize"));
    root.print(&mut term).expect("print after resize");
    assert_eq!(root.base().width(), 40);
    assert_eq!(root.last_lines().len(), 10);
}
