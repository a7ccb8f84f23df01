//! Error types for layout, selection, binding and driver failures.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WidgetError>;

#[derive(Debug, Error)]
pub enum WidgetError {
    /// A `Static` child is wider than its parent's interior.
    #[error("widget {widget}'s static width of {width} exceeds its parent's available width {available}")]
    WidthExceeded {
        widget: String,
        width: usize,
        available: usize,
    },

    /// A child produced a line that does not fill its parent exactly.
    #[error(
        "widget {widget} returned a line of invalid length at index {index}: ({actual} != {expected}): {line:?}"
    )]
    LineLength {
        widget: String,
        index: usize,
        expected: usize,
        actual: usize,
        line: String,
    },

    #[error("widget of type {widget} does not accept bindings")]
    NotBindable { widget: &'static str },

    #[error("object of type {widget} has no selectables")]
    NotSelectable { widget: &'static str },

    #[error("selection index {index} is out of range for {length} selectables")]
    SelectionOutOfRange { index: usize, length: usize },

    #[error("get_lines() is not defined for type {widget}")]
    NotImplemented { widget: &'static str },

    #[error("style {name} is not valid for {widget}")]
    UnknownStyle { name: String, widget: &'static str },

    #[error("char {name} is not valid for {widget}")]
    UnknownChar { name: String, widget: &'static str },

    #[error("char {name} of {widget} must be a list of {expected} glyphs")]
    InvalidChar {
        name: &'static str,
        widget: &'static str,
        expected: usize,
    },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode widget tree: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl WidgetError {
    /// Whether this error comes from a layout pass.
    pub fn is_layout(&self) -> bool {
        matches!(self, Self::WidthExceeded { .. } | Self::LineLength { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::WidgetError;

    #[test]
    fn line_length_message_names_widget_and_index() {
        let err = WidgetError::LineLength {
            widget: "Label(value=\"hi\", padding=0)".to_string(),
            index: 3,
            expected: 10,
            actual: 12,
            line: "| overflow |".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("Label(value=\"hi\""));
        assert!(message.contains("at index 3"));
        assert!(message.contains("(12 != 10)"));
        assert!(err.is_layout());
    }

    #[test]
    fn io_errors_convert() {
        let err: WidgetError = std::io::Error::other("gone").into();
        assert!(matches!(err, WidgetError::Io(_)));
        assert!(!err.is_layout());
    }
}
