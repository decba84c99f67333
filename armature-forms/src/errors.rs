// Error types for form configuration

use thiserror::Error;

/// Setup defects in a schema, form or binding.
///
/// Field validation failures are never reported through this type; they are
/// data carried by [`ValidationResult::Invalid`](crate::ValidationResult).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Field not declared in schema: {0}")]
    UnknownField(String),

    #[error("Field declared more than once in schema: {0}")]
    DuplicateField(String),

    #[error("Schema field names must not be empty")]
    EmptyFieldName,

    #[error("Invalid form configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FormError>;
