use crate::{FieldName, FormValues, ValidationErrors};

/// Capability that checks a complete set of form values.
///
/// The form engine treats validators as opaque: it only asks for the errors
/// of the current values. `Schema` is the declarative implementation shipped
/// with this crate; any closure `Fn(&FormValues) -> ValidationErrors` works too.
pub trait Validator {
    /// Validate all values at once.
    ///
    /// # Returns
    /// A map of field name -> message for every failing field, empty if the
    /// values are valid. Failures are data, never panics or `Err`s.
    fn validate(&self, values: &FormValues) -> ValidationErrors;

    /// The field names this validator has rules for.
    ///
    /// Used by the engine to reject validators that reference fields absent
    /// from the form. The default implementation reports none, which skips
    /// that check.
    fn referenced_fields(&self) -> Vec<FieldName> {
        Vec::new()
    }
}

impl<F> Validator for F
where
    F: Fn(&FormValues) -> ValidationErrors,
{
    fn validate(&self, values: &FormValues) -> ValidationErrors {
        self(values)
    }
}

/// A validator that accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidation;

impl Validator for NoValidation {
    fn validate(&self, _values: &FormValues) -> ValidationErrors {
        ValidationErrors::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_validators() {
        let validator = |values: &FormValues| {
            let mut errors = ValidationErrors::new();
            if !values.has_value("name") {
                errors.add("name", "Name is required");
            }
            errors
        };

        let empty: FormValues = [("name", "")].into_iter().collect();
        assert_eq!(validator.validate(&empty).get("name"), Some("Name is required"));
        assert!(validator.referenced_fields().is_empty());
    }

    #[test]
    fn no_validation_accepts_everything() {
        let values: FormValues = [("anything", "")].into_iter().collect();
        assert!(NoValidation.validate(&values).is_empty());
    }
}
