use crate::FieldName;

/// A single field in a form.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Key of this field in `FormValues`; also the rendered element id.
    name: FieldName,

    /// Caption shown next to the input.
    label: String,

    /// The kind of field (determines the input widget).
    kind: FieldKind,

    /// Value used when the form is built without an explicit default.
    default_value: Option<String>,

    /// Whether a required marker is rendered next to the label.
    required: bool,

    /// Whether the field is rendered at all.
    visible: bool,

    /// Presentation-only class hint for renderers.
    class_name: Option<String>,
}

impl FieldDescriptor {
    /// Create a new field.
    pub fn new(name: impl Into<FieldName>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            default_value: None,
            required: false,
            visible: true,
            class_name: None,
        }
    }

    /// Single-line text field.
    pub fn text(name: impl Into<FieldName>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::text(TextInput::Text))
    }

    /// Single-line input of a specific HTML-like input type.
    pub fn input(name: impl Into<FieldName>, label: impl Into<String>, input: TextInput) -> Self {
        Self::new(name, label, FieldKind::text(input))
    }

    /// Multi-line text field.
    pub fn textarea(name: impl Into<FieldName>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::TextArea { placeholder: None, rows: 3 })
    }

    /// Drop-down with the given options, in display order.
    pub fn select(
        name: impl Into<FieldName>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(name, label, FieldKind::Select { options, placeholder: None })
    }

    /// Yes/no checkbox, unchecked (`"false"`) unless a default says otherwise.
    pub fn checkbox(name: impl Into<FieldName>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Checkbox).with_default("false")
    }

    /// File picker; the value is a local path.
    pub fn file(name: impl Into<FieldName>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::File { accept: None })
    }

    /// Mark the field as required (renders the required marker).
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Hide the field. It stays part of the form state.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Set the descriptor-level default value.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set the placeholder for kinds that show one.
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        match &mut self.kind {
            FieldKind::Text { placeholder, .. }
            | FieldKind::TextArea { placeholder, .. }
            | FieldKind::Select { placeholder, .. } => *placeholder = Some(text),
            FieldKind::Checkbox | FieldKind::File { .. } => {}
        }
        self
    }

    /// Set the presentation class hint.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn name(&self) -> &FieldName {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Show or hide the field.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// The label to display, falling back to a humanized field name.
    pub fn display_label(&self) -> String {
        if self.label.trim().is_empty() {
            self.name.humanized()
        } else {
            self.label.clone()
        }
    }
}

/// The kind of field, carrying only the attributes that kind needs.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Single-line input.
    Text {
        input: TextInput,
        placeholder: Option<String>,
    },

    /// Multi-line input.
    TextArea {
        placeholder: Option<String>,
        rows: usize,
    },

    /// Pick exactly one of the options.
    Select {
        options: Vec<SelectOption>,
        placeholder: Option<String>,
    },

    /// Boolean toggle, stored as `"true"` / `"false"`.
    Checkbox,

    /// Local file path to be uploaded by the caller.
    File { accept: Option<String> },
}

impl FieldKind {
    /// Single-line input without placeholder.
    pub fn text(input: TextInput) -> Self {
        Self::Text {
            input,
            placeholder: None,
        }
    }

    /// The options of a choice kind.
    pub fn options(&self) -> Option<&[SelectOption]> {
        match self {
            Self::Select { options, .. } => Some(options),
            _ => None,
        }
    }

    /// The placeholder text, if any.
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Self::Text { placeholder, .. }
            | Self::TextArea { placeholder, .. }
            | Self::Select { placeholder, .. } => placeholder.as_deref(),
            Self::Checkbox | Self::File { .. } => None,
        }
    }

    /// Check if this is a choice kind.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Select { .. })
    }

    /// Check whether `value` is acceptable for this kind without any schema.
    ///
    /// Selects accept the empty string (nothing chosen) or one of their option
    /// values; checkboxes accept `"true"`, `"false"` and the empty string.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Select { options, .. } => {
                value.is_empty() || options.iter().any(|option| option.value == value)
            }
            Self::Checkbox => matches!(value, "" | "true" | "false"),
            _ => true,
        }
    }
}

/// HTML-like input types for single-line fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextInput {
    #[default]
    Text,
    Email,
    Password,
    Number,
    Date,
    Tel,
}

impl TextInput {
    /// The matching `type` attribute for HTML inputs.
    pub fn as_html_type(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Number => "number",
            Self::Date => "date",
            Self::Tel => "tel",
        }
    }
}

/// One entry of a select field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value stored in the form state when this option is chosen.
    pub value: String,

    /// Text shown to the user.
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl ToString, label: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
        }
    }
}

/// One entry of a form's field list: either a descriptor the engine renders
/// and binds, or a caller-built element passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum FormItem<E> {
    Field(FieldDescriptor),
    Custom(E),
}

impl<E> FormItem<E> {
    /// The descriptor, if this item is one.
    pub fn as_field(&self) -> Option<&FieldDescriptor> {
        match self {
            Self::Field(field) => Some(field),
            Self::Custom(_) => None,
        }
    }
}

impl<E> From<FieldDescriptor> for FormItem<E> {
    fn from(field: FieldDescriptor) -> Self {
        Self::Field(field)
    }
}

/// Visual arrangement of label and input. Has no effect on validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutDirection {
    /// Label and input side by side.
    #[default]
    Row,
    /// Label above input.
    Column,
}
