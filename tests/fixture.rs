#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use termgui::{Container, Widget};

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read fixture {name}: {err}"))
}

/// Fixture rows with the trailing newline dropped.
pub fn read_lines(name: &str) -> Vec<String> {
    read_fixture(name)
        .replace("\r\n", "\n")
        .lines()
        .map(str::to_string)
        .collect()
}

/// A root container that stays where it is put when printed.
pub fn pinned(width: usize) -> Container {
    let mut container = Container::new();
    container.base_mut().set_static_width(width);
    container.set_allow_fullscreen(false);
    container
}
