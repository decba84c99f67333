// Rule traits and evaluation context

use crate::{FieldStore, FormValues};
use serde_json::Value;
use std::sync::Arc;

/// Outcome of running a rule against a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    /// Create an invalid result with a message
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Error message, if invalid
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(message) => Some(message),
        }
    }

    pub fn into_message(self) -> Option<String> {
        match self {
            Self::Valid => None,
            Self::Invalid(message) => Some(message),
        }
    }
}

impl From<Result<(), String>> for ValidationResult {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::Valid,
            Err(message) => Self::Invalid(message),
        }
    }
}

enum Peers<'a> {
    Detached,
    Store(&'a FieldStore),
    Values(&'a FormValues),
}

/// Read access to the field under validation and its sibling values
pub struct RuleContext<'a> {
    field: &'a str,
    peers: Peers<'a>,
}

impl<'a> RuleContext<'a> {
    /// Context with no sibling fields
    pub fn detached(field: &'a str) -> Self {
        Self {
            field,
            peers: Peers::Detached,
        }
    }

    /// Context backed by a snapshot of form values
    pub fn with_values(field: &'a str, values: &'a FormValues) -> Self {
        Self {
            field,
            peers: Peers::Values(values),
        }
    }

    pub(crate) fn with_store(field: &'a str, store: &'a FieldStore) -> Self {
        Self {
            field,
            peers: Peers::Store(store),
        }
    }

    /// Name of the field being validated
    pub fn field(&self) -> &str {
        self.field
    }

    /// Current value of another field
    pub fn value(&self, field: &str) -> Option<&Value> {
        match &self.peers {
            Peers::Detached => None,
            Peers::Store(store) => store.value_of(field),
            Peers::Values(values) => values.get(field),
        }
    }
}

/// A single field-level validation rule
///
/// Rules are pure: the same value and sibling values always give the same
/// result. A rule that panics is a defect and the panic is not caught.
pub trait Rule: Send + Sync {
    /// Validate a value
    fn check(&self, value: &Value, ctx: &RuleContext<'_>) -> ValidationResult;

    /// Get rule name
    fn name(&self) -> &'static str;

    /// Validate a value with no sibling fields available
    fn check_value(&self, value: &Value) -> ValidationResult {
        self.check(value, &RuleContext::detached(""))
    }
}

pub type SharedRule = Arc<dyn Rule>;

impl Rule for SharedRule {
    fn check(&self, value: &Value, ctx: &RuleContext<'_>) -> ValidationResult {
        (**self).check(value, ctx)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl Rule for Box<dyn Rule> {
    fn check(&self, value: &Value, ctx: &RuleContext<'_>) -> ValidationResult {
        (**self).check(value, ctx)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Combinators available on every rule
pub trait RuleExt: Rule + Sized + 'static {
    /// Run `next` only if this rule passes
    fn and<R: Rule + 'static>(self, next: R) -> crate::Chain {
        crate::Chain::new().and(self).and(next)
    }

    fn shared(self) -> SharedRule {
        Arc::new(self)
    }
}

impl<R: Rule + Sized + 'static> RuleExt for R {}
