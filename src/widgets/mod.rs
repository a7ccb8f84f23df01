//! The widget tree: the shared widget contract plus the built-in widgets.

pub mod base;
pub mod button;
pub mod container;
pub mod label;
pub mod mouse_target;

pub use base::{binding, BindingFn, Widget, WidgetBase, WidgetExt, WidgetHandle};
pub use button::Button;
pub use container::{BoxStyle, Container};
pub use label::Label;
pub use mouse_target::{MouseCallback, MouseTarget};
