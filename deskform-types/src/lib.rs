//! Core types for the deskform crate.
//!
//! This crate provides the foundational types for defining forms:
//! - `FieldDescriptor` and `FieldKind` - Individual fields and their input kinds
//! - `FormItem` - A field descriptor or a caller-built element
//! - `FormValues` and `ValidationErrors` - Current values and failures, keyed by `FieldName`
//! - `Validator` - The validation capability, and `Schema`, its declarative implementation

mod field_name;
pub use field_name::FieldName;

mod values;
pub use values::{FormValues, ValidationErrors};

mod field;
pub use field::{FieldDescriptor, FieldKind, FormItem, LayoutDirection, SelectOption, TextInput};

mod validator;
pub use validator::{NoValidation, Validator};

mod schema;
pub use schema::{DATE_FORMAT, REQUIRED_MESSAGE, Rule, Schema, ValueType};

mod error;
pub use error::{FormError, SchemaError};
