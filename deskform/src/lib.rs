//! # deskform
//!
//! Declarative forms with validation-gated submission. Renderer-agnostic.
//!
//! A form is built from an ordered list of field descriptors (or custom
//! elements), a `Validator` and a submit handler. The engine owns the current
//! values and errors; it calls the submit handler only when validation passes,
//! and never performs I/O itself.
//!
//! ## Usage
//!
//! ```rust
//! use deskform::{FieldDescriptor, Form, FormBuilder, Rule, Schema, SelectOption};
//!
//! let fields = vec![
//!     FieldDescriptor::select("type", "Equipment type", vec![SelectOption::new(1, "Drill")])
//!         .required(),
//!     FieldDescriptor::textarea("reference", "Reference").required(),
//! ];
//! let schema = Schema::new()
//!     .field("type", Rule::number().required("Pick a type"))
//!     .field("reference", Rule::string().required("Describe the item"));
//!
//! let mut form: Form = FormBuilder::from_fields(fields, schema, |payload| {
//!     println!("create equipment: {payload:?}");
//! })
//! .on_values_change(|values| println!("now: {values:?}"))
//! .build()
//! .unwrap();
//!
//! form.set_value("type", "1").unwrap();
//! form.set_value("reference", "Bosch GSB 13").unwrap();
//! assert!(form.submit().is_submitted());
//! ```
//!
//! ## Renderers
//!
//! Renderers are separate crates that draw `Form::render()` and feed edits
//! back through `Form::set_value` and `Form::submit`:
//! - `deskform-html` - HTML fragments and documents
//! - `deskform-egui` - native window via egui

// Re-export all types from deskform-types
pub use deskform_types::*;

mod form;
pub use form::{Form, FormBuilder, SubmitOutcome};

mod mount;
pub use mount::MountToken;

pub mod render;
pub use render::{
    DEFAULT_SUBMIT_LABEL, ErrorLine, FieldView, PLACEHOLDER_GLYPH, REQUIRED_HINT, REQUIRED_MARKER,
    RenderItem, RenderedForm, SubmitAffordance,
};

// Scripted input for testing forms without a renderer
mod test_driver;
pub use test_driver::{Capture, FormDriver};

/// Values handed to the submit handler.
pub type SubmissionPayload = FormValues;
