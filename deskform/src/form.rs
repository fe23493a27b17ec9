//! The form engine: bound field state, validation and gated submission.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use deskform_types::{
    FieldDescriptor, FieldName, FormError, FormItem, FormValues, LayoutDirection, NoValidation,
    ValidationErrors, Validator,
};
use tracing::{debug, warn};

use crate::render::{
    DEFAULT_SUBMIT_LABEL, FieldView, REQUIRED_HINT, RenderItem, RenderedForm, SubmitAffordance,
};
use crate::MountToken;

type SubmitHandler = Box<dyn FnMut(FormValues)>;
type WatchHandler = Box<dyn FnMut(&FormValues)>;

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// All fields passed; the submit handler was called once.
    Submitted,
    /// Validation failed; the submit handler was not called.
    Rejected { errors: ValidationErrors },
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted)
    }
}

/// Transient state owned by one form.
#[derive(Debug, Default)]
struct FormState {
    values: FormValues,
    errors: ValidationErrors,
    /// Number of submit attempts; once non-zero, edits re-validate.
    submit_attempts: usize,
}

/// Configuration for a `Form`.
///
/// `E` is the renderer's element type for custom items and children
/// (raw HTML for `deskform-html`, a draw closure for `deskform-egui`).
pub struct FormBuilder<E = ()> {
    items: Vec<FormItem<E>>,
    validator: Box<dyn Validator>,
    on_submit: SubmitHandler,
    default_values: FormValues,
    direction: LayoutDirection,
    on_values_change: Option<WatchHandler>,
    children: Vec<E>,
    submit_label: String,
    required_hint: Option<String>,
}

impl<E> FormBuilder<E> {
    /// Create a builder from a field list, a validator and the submit handler.
    pub fn new(
        items: Vec<FormItem<E>>,
        validator: impl Validator + 'static,
        on_submit: impl FnMut(FormValues) + 'static,
    ) -> Self {
        Self {
            items,
            validator: Box::new(validator),
            on_submit: Box::new(on_submit),
            default_values: FormValues::new(),
            direction: LayoutDirection::default(),
            on_values_change: None,
            children: Vec::new(),
            submit_label: DEFAULT_SUBMIT_LABEL.to_string(),
            required_hint: Some(REQUIRED_HINT.to_string()),
        }
    }

    /// Create a builder from plain descriptors.
    pub fn from_fields(
        fields: Vec<FieldDescriptor>,
        validator: impl Validator + 'static,
        on_submit: impl FnMut(FormValues) + 'static,
    ) -> Self {
        Self::new(
            fields.into_iter().map(FormItem::Field).collect(),
            validator,
            on_submit,
        )
    }

    /// Create a builder that accepts any values.
    pub fn without_validation(
        items: Vec<FormItem<E>>,
        on_submit: impl FnMut(FormValues) + 'static,
    ) -> Self {
        Self::new(items, NoValidation, on_submit)
    }

    /// Initial values, applied once at construction. They take precedence
    /// over each descriptor's own default.
    pub fn default_values(mut self, values: FormValues) -> Self {
        self.default_values = values;
        self
    }

    pub fn layout_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Watch callback, called with all current values after every change.
    pub fn on_values_change(mut self, watch: impl FnMut(&FormValues) + 'static) -> Self {
        self.on_values_change = Some(Box::new(watch));
        self
    }

    /// Replace the built-in submit button with caller elements.
    pub fn children(mut self, children: Vec<E>) -> Self {
        self.children = children;
        self
    }

    pub fn submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self
    }

    pub fn required_hint(mut self, hint: impl Into<String>) -> Self {
        self.required_hint = Some(hint.into());
        self
    }

    pub fn without_required_hint(mut self) -> Self {
        self.required_hint = None;
        self
    }

    /// Validate the configuration and seed the form state.
    ///
    /// # Errors
    /// - `DuplicateField` when two descriptors share a name
    /// - `UndeclaredValidatorField` when the validator has rules for a field
    ///   that is not in the list
    /// - `UndeclaredDefault` when a default value names an unknown field
    /// - `InvalidValue` when a seeded value is not acceptable for its kind
    pub fn build(self) -> Result<Form<E>, FormError> {
        let mut declared = HashSet::new();
        for field in self.items.iter().filter_map(FormItem::as_field) {
            if !declared.insert(field.name().clone()) {
                return Err(FormError::DuplicateField(field.name().clone()));
            }
        }

        if let Some(name) = self
            .validator
            .referenced_fields()
            .into_iter()
            .find(|name| !declared.contains(name))
        {
            return Err(FormError::UndeclaredValidatorField(name));
        }

        if let Some(name) = self.default_values.names().find(|name| !declared.contains(*name)) {
            return Err(FormError::UndeclaredDefault(name.clone()));
        }

        let mut values = FormValues::new();
        for field in self.items.iter().filter_map(FormItem::as_field) {
            let seed = self
                .default_values
                .get(field.name().as_str())
                .or(field.default_value())
                .unwrap_or_default();
            if !field.kind().accepts(seed) {
                return Err(FormError::InvalidValue {
                    field: field.name().clone(),
                    value: seed.to_string(),
                });
            }
            values.insert(field.name().clone(), seed);
        }

        Ok(Form {
            items: self.items,
            validator: self.validator,
            on_submit: self.on_submit,
            on_values_change: self.on_values_change,
            initial: values.clone(),
            state: FormState {
                values,
                ..FormState::default()
            },
            direction: self.direction,
            children: self.children,
            submit_label: self.submit_label,
            required_hint: self.required_hint,
            anchor: Arc::new(()),
        })
    }
}

/// A live form: owns its values and errors for as long as it exists.
///
/// ```
/// use deskform::{FieldDescriptor, Form, FormBuilder, Rule, Schema};
///
/// let schema = Schema::new().field("name", Rule::string().required("Name is required"));
/// let mut form: Form = FormBuilder::from_fields(
///     vec![FieldDescriptor::text("name", "Name").required()],
///     schema,
///     |values| println!("submitted {values:?}"),
/// )
/// .build()
/// .unwrap();
///
/// assert!(!form.submit().is_submitted());
/// form.set_value("name", "Ana").unwrap();
/// assert!(form.submit().is_submitted());
/// ```
pub struct Form<E = ()> {
    items: Vec<FormItem<E>>,
    validator: Box<dyn Validator>,
    on_submit: SubmitHandler,
    on_values_change: Option<WatchHandler>,
    initial: FormValues,
    state: FormState,
    direction: LayoutDirection,
    children: Vec<E>,
    submit_label: String,
    required_hint: Option<String>,
    anchor: Arc<()>,
}

impl<E> Form<E> {
    /// Current values of all declared fields, hidden ones included.
    pub fn values(&self) -> &FormValues {
        &self.state.values
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.state.values.get(name)
    }

    /// Errors from the most recent validation.
    pub fn errors(&self) -> &ValidationErrors {
        &self.state.errors
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.state.errors.get(name)
    }

    pub fn items(&self) -> &[FormItem<E>] {
        &self.items
    }

    /// Look up a descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.items
            .iter()
            .filter_map(FormItem::as_field)
            .find(|field| field.name().as_str() == name)
    }

    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Number of submit attempts so far.
    pub fn submit_attempts(&self) -> usize {
        self.state.submit_attempts
    }

    /// A token that reports whether this form still exists.
    pub fn mount_token(&self) -> MountToken {
        MountToken::new(&self.anchor)
    }

    /// Set the value of a field and notify the watch callback.
    ///
    /// Setting a field to its current value is not a change and does nothing.
    /// After the first submit attempt, the field's error is refreshed.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let value = value.into();
        let field = self
            .field(name)
            .ok_or_else(|| FormError::UnknownField(FieldName::new(name)))?;
        if !field.kind().accepts(&value) {
            return Err(FormError::InvalidValue {
                field: field.name().clone(),
                value,
            });
        }

        let Some(slot) = self.state.values.get_mut(name) else {
            return Err(FormError::UnknownField(FieldName::new(name)));
        };
        if *slot == value {
            return Ok(());
        }
        *slot = value;

        if self.state.submit_attempts > 0 {
            self.revalidate_field(name);
        }

        if let Some(watch) = self.on_values_change.as_mut() {
            watch(&self.state.values);
        }
        Ok(())
    }

    fn revalidate_field(&mut self, name: &str) {
        let fresh = self.validator.validate(&self.state.values);
        self.state.errors.remove(name);
        if let Some(message) = fresh.get(name) {
            self.state.errors.add(name, message);
        }
    }

    /// Show or hide a field. Its value is left untouched.
    pub fn set_visible(&mut self, name: &str, visible: bool) -> Result<(), FormError> {
        let field = self
            .items
            .iter_mut()
            .find_map(|item| match item {
                FormItem::Field(field) if field.name().as_str() == name => Some(field),
                _ => None,
            })
            .ok_or_else(|| FormError::UnknownField(FieldName::new(name)))?;
        field.set_visible(visible);
        Ok(())
    }

    /// Validate all values and, if they pass, hand a copy to the submit handler.
    ///
    /// The form state is kept either way; resetting or navigating away is up
    /// to the caller.
    pub fn submit(&mut self) -> SubmitOutcome {
        self.state.submit_attempts += 1;
        self.state.errors = self.validator.validate(&self.state.values);

        if !self.state.errors.is_empty() {
            for (name, _) in self.state.errors.iter() {
                if self.field(name.as_str()).is_some_and(|f| !f.is_visible()) {
                    warn!(field = %name, "validation failed on a hidden field");
                }
            }
            debug!(errors = self.state.errors.len(), "submit rejected");
            return SubmitOutcome::Rejected {
                errors: self.state.errors.clone(),
            };
        }

        debug!(fields = self.state.values.len(), "submit accepted");
        (self.on_submit)(self.state.values.clone());
        SubmitOutcome::Submitted
    }

    /// Restore the values the form was built with and clear all errors.
    pub fn reset(&mut self) {
        self.state = FormState {
            values: self.initial.clone(),
            ..FormState::default()
        };
        if let Some(watch) = self.on_values_change.as_mut() {
            watch(&self.state.values);
        }
    }

    /// Snapshot for renderers: visible fields with their values and error
    /// lines, custom elements, and the submit affordance.
    pub fn render(&self) -> RenderedForm<'_, E> {
        let items = self
            .items
            .iter()
            .filter_map(|item| match item {
                FormItem::Custom(element) => Some(RenderItem::Custom(element)),
                FormItem::Field(field) if !field.is_visible() => None,
                FormItem::Field(field) => {
                    let name = field.name().as_str();
                    Some(RenderItem::Field(FieldView::new(
                        field,
                        self.state.values.get(name).unwrap_or_default(),
                        self.state.errors.get(name),
                    )))
                }
            })
            .collect();

        let submit = if self.children.is_empty() {
            SubmitAffordance::Default {
                label: &self.submit_label,
            }
        } else {
            SubmitAffordance::Children(&self.children)
        };

        RenderedForm {
            direction: self.direction,
            required_hint: self.required_hint.as_deref(),
            items,
            submit,
        }
    }
}

impl<E> fmt::Debug for Form<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("values", &self.state.values)
            .field("errors", &self.state.errors)
            .field("submit_attempts", &self.state.submit_attempts)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}
