//! Scripted input for testing forms without a renderer.
//!
//! `FormDriver` plays a fixed sequence of edits into a form and submits it,
//! the way a user would through a renderer. `Capture` records what the submit
//! and watch callbacks received.
//!
//! # Example
//!
//! ```rust
//! use deskform::{Capture, FieldDescriptor, Form, FormBuilder, FormDriver, NoValidation};
//!
//! let submitted = Capture::new();
//! let mut form: Form = FormBuilder::from_fields(
//!     vec![FieldDescriptor::text("host", "Host")],
//!     NoValidation,
//!     submitted.submit_handler(),
//! )
//! .build()
//! .unwrap();
//!
//! let outcome = FormDriver::new()
//!     .with_value("host", "localhost")
//!     .run(&mut form)
//!     .unwrap();
//!
//! assert!(outcome.is_submitted());
//! assert_eq!(submitted.last().unwrap().get("host"), Some("localhost"));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::{Form, FormError, FormValues, SubmitOutcome};

/// Plays pre-defined edits into a form, then submits it.
#[derive(Debug, Clone, Default)]
pub struct FormDriver {
    edits: Vec<(String, String)>,
}

impl FormDriver {
    /// Create a driver with no edits.
    pub fn new() -> Self {
        Self { edits: Vec::new() }
    }

    /// Queue an edit. Edits are applied in the order they were added.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.edits.push((name.into(), value.into()));
        self
    }

    /// Queue a checkbox edit.
    pub fn with_checked(self, name: impl Into<String>, checked: bool) -> Self {
        self.with_value(name, checked.to_string())
    }

    /// Apply all edits, then submit.
    ///
    /// Fails on the first edit the form refuses (unknown field, value not
    /// allowed for the field's kind).
    pub fn run<E>(&self, form: &mut Form<E>) -> Result<SubmitOutcome, FormError> {
        self.apply(form)?;
        Ok(form.submit())
    }

    /// Apply all edits without submitting.
    pub fn apply<E>(&self, form: &mut Form<E>) -> Result<(), FormError> {
        for (name, value) in &self.edits {
            form.set_value(name, value.clone())?;
        }
        Ok(())
    }
}

/// Records every value map passed to a callback.
#[derive(Debug, Clone, Default)]
pub struct Capture {
    calls: Rc<RefCell<Vec<FormValues>>>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    /// A submit handler that records its payload.
    pub fn submit_handler(&self) -> impl FnMut(FormValues) + 'static {
        let calls = Rc::clone(&self.calls);
        move |values| calls.borrow_mut().push(values)
    }

    /// A watch callback that records each value map.
    pub fn watch_handler(&self) -> impl FnMut(&FormValues) + 'static {
        let calls = Rc::clone(&self.calls);
        move |values| calls.borrow_mut().push(values.clone())
    }

    /// Number of recorded calls.
    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// All recorded value maps, oldest first.
    pub fn calls(&self) -> Vec<FormValues> {
        self.calls.borrow().clone()
    }

    pub fn last(&self) -> Option<FormValues> {
        self.calls.borrow().last().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldDescriptor, FormBuilder, NoValidation};

    #[test]
    fn stops_at_first_refused_edit() {
        let submitted = Capture::new();
        let mut form: Form = FormBuilder::from_fields(
            vec![FieldDescriptor::checkbox("is_foreign", "Foreign")],
            NoValidation,
            submitted.submit_handler(),
        )
        .build()
        .unwrap();

        let result = FormDriver::new()
            .with_value("is_foreign", "maybe")
            .run(&mut form);

        assert!(matches!(result, Err(FormError::InvalidValue { .. })));
        assert_eq!(submitted.count(), 0);
    }

    #[test]
    fn checkbox_edits() {
        let submitted = Capture::new();
        let mut form: Form = FormBuilder::from_fields(
            vec![FieldDescriptor::checkbox("is_foreign", "Foreign")],
            NoValidation,
            submitted.submit_handler(),
        )
        .build()
        .unwrap();

        FormDriver::new()
            .with_checked("is_foreign", true)
            .run(&mut form)
            .unwrap();

        assert_eq!(submitted.last().unwrap().get("is_foreign"), Some("true"));
    }

    #[test]
    fn untouched_checkbox_submits_false() {
        let submitted = Capture::new();
        let mut form: Form = FormBuilder::from_fields(
            vec![FieldDescriptor::checkbox("is_foreign", "Foreign")],
            NoValidation,
            submitted.submit_handler(),
        )
        .build()
        .unwrap();

        assert!(FormDriver::new().run(&mut form).unwrap().is_submitted());
        assert_eq!(submitted.last().unwrap().get("is_foreign"), Some("false"));
    }
}
