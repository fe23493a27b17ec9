use indexmap::IndexMap;

use crate::FieldName;

/// Current values of a form, keyed by field name, in field-list order.
///
/// This is also the submission payload: a fresh copy is handed to the submit
/// handler on every successful submit. Values are the raw strings the user
/// entered; use `Schema::cast` for typed rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: IndexMap<FieldName, String>,
}

impl FormValues {
    /// Create a new empty value map.
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<FieldName>, value: impl Into<String>) -> Option<String> {
        self.values.insert(name.into(), value.into())
    }

    /// Get the value of a field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Get a mutable reference to the value of a field.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut String> {
        self.values.get_mut(name)
    }

    /// Check if a value exists for the field.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Check if the field has a non-blank value.
    pub fn has_value(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.trim().is_empty())
    }

    /// Iterate over the field names in order.
    pub fn names(&self) -> impl Iterator<Item = &FieldName> {
        self.values.keys()
    }

    /// Iterate over all name-value pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &str)> {
        self.values.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<N: Into<FieldName>, V: Into<String>> FromIterator<(N, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl IntoIterator for FormValues {
    type Item = (FieldName, String);
    type IntoIter = indexmap::map::IntoIter<FieldName, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Validation failures keyed by field name. Empty means the values are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: IndexMap<FieldName, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self {
            errors: IndexMap::new(),
        }
    }

    /// Record a message for a field. The first message recorded wins.
    pub fn add(&mut self, name: impl Into<FieldName>, message: impl Into<String>) {
        self.errors.entry(name.into()).or_insert_with(|| message.into());
    }

    /// Get the message for a field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.errors.contains_key(name)
    }

    /// Remove the message for a field, returning it.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.errors.shift_remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &str)> {
        self.errors.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Keep only the errors for which the predicate returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&FieldName, &str) -> bool) {
        self.errors.retain(|name, message| keep(name, message));
    }

    /// Merge another set of errors; existing messages are kept.
    pub fn extend(&mut self, other: ValidationErrors) {
        for (name, message) in other.errors {
            self.add(name, message);
        }
    }
}

impl<N: Into<FieldName>, M: Into<String>> FromIterator<(N, M)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (N, M)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (name, message) in iter {
            errors.add(name, message);
        }
        errors
    }
}
