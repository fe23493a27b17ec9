use crate::FieldName;

/// Configuration and usage errors of a form.
///
/// Validation failures are not errors; they are `ValidationErrors` data.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// Two descriptors share a name.
    #[error("Duplicate field name: {0}")]
    DuplicateField(FieldName),

    /// The validator has rules for a field the form does not declare.
    #[error("Validator references undeclared field: {0}")]
    UndeclaredValidatorField(FieldName),

    /// A default value was supplied for a field the form does not declare.
    #[error("Default value supplied for undeclared field: {0}")]
    UndeclaredDefault(FieldName),

    /// A value was set on a field the form does not declare.
    #[error("Unknown field: {0}")]
    UnknownField(FieldName),

    /// The value is not acceptable for the field's kind (e.g. not one of a
    /// select's options).
    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidValue { field: FieldName, value: String },
}

/// Errors building or applying a `Schema`.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A `matches` rule carried a pattern that does not compile.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A value could not be converted to the rule's type during `cast`.
    #[error("Cannot cast field '{field}' value '{value}' to {expected}")]
    Cast {
        field: FieldName,
        value: String,
        expected: &'static str,
    },
}
