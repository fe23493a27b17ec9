//! Renderer-facing snapshot of a form.
//!
//! Renderers (HTML, egui) draw a `RenderedForm` and report edits and submit
//! requests back to the `Form`. They never validate or call the submit
//! handler themselves.

use deskform_types::{FieldDescriptor, FieldKind, FieldName, LayoutDirection};

/// Shown in the error line of a field without an error, so the line never
/// collapses and the layout does not shift when an error appears.
pub const PLACEHOLDER_GLYPH: &str = "...";

/// Marker appended to the label of required fields.
pub const REQUIRED_MARKER: &str = "*";

/// Hint shown above the fields explaining the required marker.
pub const REQUIRED_HINT: &str = "(*) marks a required field.";

/// Label of the built-in submit button.
pub const DEFAULT_SUBMIT_LABEL: &str = "Continue";

/// Everything a renderer needs to draw one frame of a form.
#[derive(Debug)]
pub struct RenderedForm<'a, E> {
    pub direction: LayoutDirection,
    pub required_hint: Option<&'a str>,
    /// Visible fields and custom elements, in list order.
    pub items: Vec<RenderItem<'a, E>>,
    pub submit: SubmitAffordance<'a, E>,
}

impl<'a, E> RenderedForm<'a, E> {
    /// Iterate over the rendered field views, skipping custom elements.
    pub fn fields(&self) -> impl Iterator<Item = &FieldView<'a>> {
        self.items.iter().filter_map(|item| match item {
            RenderItem::Field(view) => Some(view),
            RenderItem::Custom(_) => None,
        })
    }

    /// Look up the view of a rendered field.
    pub fn field(&self, name: &str) -> Option<&FieldView<'a>> {
        self.fields().find(|view| view.name().as_str() == name)
    }
}

#[derive(Debug)]
pub enum RenderItem<'a, E> {
    /// A bound field, wrapped with label, required marker and error line.
    Field(FieldView<'a>),
    /// A caller-built element, passed through untouched.
    Custom(&'a E),
}

/// One bound field as it should be drawn.
#[derive(Debug, Clone)]
pub struct FieldView<'a> {
    descriptor: &'a FieldDescriptor,
    value: &'a str,
    has_error: bool,
    error: ErrorLine<'a>,
}

impl<'a> FieldView<'a> {
    pub(crate) fn new(descriptor: &'a FieldDescriptor, value: &'a str, error: Option<&'a str>) -> Self {
        let error_line = match error {
            Some(message) if !message.is_empty() => ErrorLine::Message(message),
            _ => ErrorLine::Placeholder,
        };
        Self {
            descriptor,
            value,
            has_error: error.is_some(),
            error: error_line,
        }
    }

    pub fn name(&self) -> &'a FieldName {
        self.descriptor.name()
    }

    pub fn label(&self) -> String {
        self.descriptor.display_label()
    }

    pub fn kind(&self) -> &'a FieldKind {
        self.descriptor.kind()
    }

    pub fn is_required(&self) -> bool {
        self.descriptor.is_required()
    }

    pub fn class_name(&self) -> Option<&'a str> {
        self.descriptor.class_name()
    }

    /// Current value bound to the input.
    pub fn value(&self) -> &'a str {
        self.value
    }

    /// Whether the field currently fails validation. May be true while the
    /// error line shows the placeholder (rules with an empty message).
    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn error(&self) -> &ErrorLine<'a> {
        &self.error
    }
}

/// Content of the line under an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLine<'a> {
    Message(&'a str),
    Placeholder,
}

impl<'a> ErrorLine<'a> {
    /// Text to draw; never empty.
    pub fn text(&self) -> &'a str {
        match self {
            Self::Message(message) => message,
            Self::Placeholder => PLACEHOLDER_GLYPH,
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, Self::Message(_))
    }
}

/// How the submit trigger is drawn. Either way, triggering it must go
/// through `Form::submit`.
#[derive(Debug)]
pub enum SubmitAffordance<'a, E> {
    /// The built-in button.
    Default { label: &'a str },
    /// Caller-supplied children replace the built-in button.
    Children(&'a [E]),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_line_never_empty() {
        let field = FieldDescriptor::text("name", "Name");

        let view = FieldView::new(&field, "", None);
        assert_eq!(view.error().text(), PLACEHOLDER_GLYPH);
        assert!(!view.has_error());

        let view = FieldView::new(&field, "", Some(""));
        assert_eq!(view.error().text(), PLACEHOLDER_GLYPH);
        assert!(view.has_error());

        let view = FieldView::new(&field, "", Some("Required"));
        assert_eq!(view.error(), &ErrorLine::Message("Required"));
    }
}
