//! Declarative validation rules keyed by field name.

use std::sync::LazyLock;

use chrono::NaiveDate;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::{FieldName, FormValues, SchemaError, ValidationErrors, Validator};

/// Message used when a required field has no value and the rule carries none.
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Format accepted by `date` rules.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// The type a field's string value must parse as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Number,
    Integer,
    Boolean,
    Date,
}

impl ValueType {
    fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Date => "date",
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            Self::String => "Must be text",
            Self::Number => "Must be a number",
            Self::Integer => "Must be a whole number",
            Self::Boolean => "Must be yes or no",
            Self::Date => "Must be a date (YYYY-MM-DD)",
        }
    }
}

#[derive(Debug, Clone)]
enum Check {
    Min(f64, String),
    Max(f64, String),
    MinLen(usize, String),
    MaxLen(usize, String),
    Email(String),
    Matches(Regex, String),
    OneOf(Vec<String>, String),
}

/// Validation rule for one field.
///
/// Checks run in the order they were added; the first failure is reported.
/// Blank values only fail the `required` check, everything else skips them.
#[derive(Debug, Clone)]
pub struct Rule {
    value_type: ValueType,
    type_message: Option<String>,
    required: Option<String>,
    checks: Vec<Check>,
}

impl Rule {
    fn of(value_type: ValueType) -> Self {
        Self {
            value_type,
            type_message: None,
            required: None,
            checks: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::of(ValueType::String)
    }

    pub fn number() -> Self {
        Self::of(ValueType::Number)
    }

    pub fn integer() -> Self {
        Self::of(ValueType::Integer)
    }

    pub fn boolean() -> Self {
        Self::of(ValueType::Boolean)
    }

    /// A calendar date in `YYYY-MM-DD` form.
    pub fn date() -> Self {
        Self::of(ValueType::Date)
    }

    /// Require a non-blank value. An empty `message` is allowed; renderers
    /// then show the placeholder glyph instead of text.
    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = Some(message.into());
        self
    }

    /// Require a non-blank value with the default message.
    pub fn required_default(self) -> Self {
        self.required(REQUIRED_MESSAGE)
    }

    /// Override the message reported when the value does not parse.
    pub fn type_error(mut self, message: impl Into<String>) -> Self {
        self.type_message = Some(message.into());
        self
    }

    /// Numeric lower bound (inclusive).
    pub fn min(mut self, min: f64, message: impl Into<String>) -> Self {
        self.checks.push(Check::Min(min, message.into()));
        self
    }

    /// Numeric upper bound (inclusive).
    pub fn max(mut self, max: f64, message: impl Into<String>) -> Self {
        self.checks.push(Check::Max(max, message.into()));
        self
    }

    /// Minimum number of characters.
    pub fn min_len(mut self, len: usize, message: impl Into<String>) -> Self {
        self.checks.push(Check::MinLen(len, message.into()));
        self
    }

    /// Maximum number of characters.
    pub fn max_len(mut self, len: usize, message: impl Into<String>) -> Self {
        self.checks.push(Check::MaxLen(len, message.into()));
        self
    }

    pub fn email(mut self, message: impl Into<String>) -> Self {
        self.checks.push(Check::Email(message.into()));
        self
    }

    /// The whole value must match `pattern`.
    pub fn matches(mut self, pattern: &str, message: impl Into<String>) -> Result<Self, SchemaError> {
        let anchored = format!("^(?:{pattern})$");
        let regex = Regex::new(&anchored).map_err(|source| SchemaError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.checks.push(Check::Matches(regex, message.into()));
        Ok(self)
    }

    /// The value must be one of `allowed`.
    pub fn one_of<I, S>(mut self, allowed: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let allowed = allowed.into_iter().map(|s| s.to_string()).collect();
        self.checks.push(Check::OneOf(allowed, message.into()));
        self
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_required(&self) -> bool {
        self.required.is_some()
    }

    /// Check one value. Returns the failure message, if any.
    pub fn check(&self, value: &str) -> Result<(), String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return match &self.required {
                Some(message) => Err(message.clone()),
                None => Ok(()),
            };
        }

        let number = match self.value_type {
            ValueType::Number => Some(
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| self.type_failure())?,
            ),
            ValueType::Integer => Some(trimmed.parse::<i64>().map_err(|_| self.type_failure())? as f64),
            ValueType::Boolean => {
                parse_bool(trimmed).ok_or_else(|| self.type_failure())?;
                None
            }
            ValueType::Date => {
                NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| self.type_failure())?;
                None
            }
            ValueType::String => None,
        };

        for check in &self.checks {
            match check {
                Check::Min(min, message) => {
                    if number.is_some_and(|n| n < *min) {
                        return Err(message.clone());
                    }
                }
                Check::Max(max, message) => {
                    if number.is_some_and(|n| n > *max) {
                        return Err(message.clone());
                    }
                }
                Check::MinLen(len, message) => {
                    if trimmed.chars().count() < *len {
                        return Err(message.clone());
                    }
                }
                Check::MaxLen(len, message) => {
                    if trimmed.chars().count() > *len {
                        return Err(message.clone());
                    }
                }
                Check::Email(message) => {
                    if !EMAIL.is_match(trimmed) {
                        return Err(message.clone());
                    }
                }
                Check::Matches(regex, message) => {
                    if !regex.is_match(trimmed) {
                        return Err(message.clone());
                    }
                }
                Check::OneOf(allowed, message) => {
                    if !allowed.iter().any(|a| a == trimmed) {
                        return Err(message.clone());
                    }
                }
            }
        }

        Ok(())
    }

    fn type_failure(&self) -> String {
        self.type_message
            .clone()
            .unwrap_or_else(|| self.value_type.default_message().to_string())
    }

    fn cast(&self, name: &FieldName, value: &str) -> Result<Value, SchemaError> {
        let trimmed = value.trim();
        let fail = || SchemaError::Cast {
            field: name.clone(),
            value: value.to_string(),
            expected: self.value_type.name(),
        };

        if trimmed.is_empty() {
            return Ok(match self.value_type {
                ValueType::String => Value::String(String::new()),
                _ => Value::Null,
            });
        }

        match self.value_type {
            ValueType::String | ValueType::Date => Ok(Value::String(trimmed.to_string())),
            ValueType::Integer => trimmed.parse::<i64>().map(Value::from).map_err(|_| fail()),
            ValueType::Number => {
                if let Ok(i) = trimmed.parse::<i64>() {
                    return Ok(Value::from(i));
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(fail)
            }
            ValueType::Boolean => parse_bool(trimmed).map(Value::Bool).ok_or_else(fail),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// A set of rules keyed by field name.
///
/// ```
/// use deskform_types::{FormValues, Rule, Schema, Validator};
///
/// let schema = Schema::new()
///     .field("type", Rule::number().required("Pick a type"))
///     .field("reference", Rule::string());
///
/// let values: FormValues = [("type", ""), ("reference", "Bosch")].into_iter().collect();
/// let errors = schema.validate(&values);
/// assert_eq!(errors.get("type"), Some("Pick a type"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: IndexMap<FieldName, Rule>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for a field.
    pub fn field(mut self, name: impl Into<FieldName>, rule: Rule) -> Self {
        self.rules.insert(name.into(), rule);
        self
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Convert string values to a typed JSON row.
    ///
    /// Fields with a rule are converted to the rule's type, blank non-string
    /// values become `null`. Fields without a rule are passed through as
    /// strings.
    pub fn cast(&self, values: &FormValues) -> Result<Map<String, Value>, SchemaError> {
        let mut row = Map::new();
        for (name, value) in values.iter() {
            let cast = match self.rules.get(name) {
                Some(rule) => rule.cast(name, value)?,
                None => Value::String(value.to_string()),
            };
            row.insert(name.to_string(), cast);
        }
        Ok(row)
    }
}

impl Validator for Schema {
    fn validate(&self, values: &FormValues) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for (name, rule) in &self.rules {
            let value = values.get(name.as_str()).unwrap_or("");
            if let Err(message) = rule.check(value) {
                errors.add(name.clone(), message);
            }
        }
        errors
    }

    fn referenced_fields(&self) -> Vec<FieldName> {
        self.rules.keys().cloned().collect()
    }
}
