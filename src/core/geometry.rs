//! Positions, sizes and the layout policies widgets carry.

use serde::{Deserialize, Serialize};

/// Terminal-relative `(x, y)`; the origin is `(1, 1)` on most platforms.
pub type Point = (i32, i32);

/// `(width, height)` in cells.
pub type Size = (usize, usize);

/// How a parent container resolves its available width into a child's width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizePolicy {
    #[default]
    Fill,
    Static,
    /// A fraction of the available width, taken from the widget's `relative_width`.
    Relative,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WidgetAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Axes a container is centered on. "No centering" is `Option::None` at use sites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CenteringPolicy {
    #[default]
    All,
    Horizontal,
    Vertical,
}

impl CenteringPolicy {
    pub fn horizontal(self) -> bool {
        matches!(self, Self::All | Self::Horizontal)
    }

    pub fn vertical(self) -> bool {
        matches!(self, Self::All | Self::Vertical)
    }
}
