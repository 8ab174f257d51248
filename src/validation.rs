//! Validation Support
//!
//! Declarative, per-model field checks executed by services before a create
//! or update is accepted. Rules never short-circuit: every failing field is
//! reported.
//!
//! # Example
//!
//! ```rust,ignore
//! use crudfacade::validation::RuleSet;
//!
//! let rules = RuleSet::<ProductModel>::new()
//!     .not_empty("code", "code", |p| &p.code)
//!     .not_empty("name", "name", |p| &p.name);
//!
//! let errors = rules.check(&product, &Messages::default());
//! assert!(errors.is_empty());
//! ```

use crate::messages::Messages;
use serde::Serialize;
use std::fmt;

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// `Ok(())` when nothing was collected, otherwise the collection itself.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was added.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validation rules for one model type.
///
/// Implementations must be pure: the same model and messages always produce
/// the same errors.
pub trait ValidationRules<T>: Send + Sync {
    fn check(&self, model: &T, messages: &Messages) -> ValidationErrors;
}

type Accessor<T> = Box<dyn Fn(&T) -> &str + Send + Sync>;

struct NotEmpty<T> {
    field: &'static str,
    label_key: &'static str,
    value: Accessor<T>,
}

/// Builder for field-presence rules.
pub struct RuleSet<T> {
    rules: Vec<NotEmpty<T>>,
}

impl<T> RuleSet<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Requires the string returned by `value` to contain something other than whitespace.
    ///
    /// `field` is the key reported in the error, `label_key` the dictionary key
    /// used to render the message.
    #[must_use]
    pub fn not_empty<F>(mut self, field: &'static str, label_key: &'static str, value: F) -> Self
    where
        F: Fn(&T) -> &str + Send + Sync + 'static,
    {
        self.rules.push(NotEmpty {
            field,
            label_key,
            value: Box::new(value),
        });
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T> Default for RuleSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ValidationRules<T> for RuleSet<T> {
    fn check(&self, model: &T, messages: &Messages) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for rule in &self.rules {
            if (rule.value)(model).trim().is_empty() {
                let label = messages.label(rule.label_key);
                errors.add(ValidationError::new(rule.field, messages.field_is_empty(label)));
            }
        }
        errors
    }
}

/// Rules that accept everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRules;

impl<T> ValidationRules<T> for NoRules {
    fn check(&self, _model: &T, _messages: &Messages) -> ValidationErrors {
        ValidationErrors::new()
    }
}
