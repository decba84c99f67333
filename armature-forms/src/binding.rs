// Field bindings for UI inputs

use crate::{FieldState, FieldStatus, Form, FormError, Result, ValidationMode, ValidationResult};
use serde_json::Value;

/// Handle connecting one rendered input to its field
///
/// `input` follows the form's [`ValidationMode`]: eager forms validate on
/// every input event, lazy forms store the value and wait for `commit`.
///
/// A binding borrows the form mutably, so only one exists at a time. Use
/// [`FieldHandle`] to keep one handle per rendered input.
pub struct FieldBinding<'f> {
    form: &'f mut Form,
    index: usize,
}

impl<'f> FieldBinding<'f> {
    pub(crate) fn new(form: &'f mut Form, index: usize) -> Self {
        Self { form, index }
    }

    fn state(&self) -> &FieldState {
        self.form.store.state_at(self.index)
    }

    pub fn name(&self) -> &str {
        self.state().name()
    }

    pub fn value(&self) -> &Value {
        self.state().value()
    }

    pub fn error(&self) -> Option<&str> {
        self.state().error()
    }

    pub fn touched(&self) -> bool {
        self.state().touched()
    }

    pub fn status(&self) -> FieldStatus {
        self.state().status()
    }

    /// Set the value and validate, regardless of mode
    pub fn set_value(&mut self, value: impl Into<Value>) -> ValidationResult {
        self.form.store.set_value_at(self.index, value.into())
    }

    /// Input event; returns the result when validation ran
    pub fn input(&mut self, value: impl Into<Value>) -> Option<ValidationResult> {
        match self.form.config.mode {
            ValidationMode::Eager => Some(self.set_value(value)),
            ValidationMode::Lazy => {
                self.form.store.stage_at(self.index, value.into());
                None
            }
        }
    }

    /// Commit event (change/blur); validates the current value
    pub fn commit(&mut self) -> ValidationResult {
        self.form.store.touch_at(self.index);
        self.form.store.validate_at(self.index)
    }
}

/// Detached handle to one field, resolved once by name
///
/// Handles do not borrow the form, so any number can be held at once;
/// each operation takes the form explicitly. Using a handle with a form
/// built from a different schema layout gives `FormError::UnknownField`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHandle {
    name: String,
    index: usize,
}

impl FieldHandle {
    pub(crate) fn new(name: &str, index: usize) -> Self {
        Self {
            name: name.to_string(),
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, form: &Form) -> Result<usize> {
        match form.store.schema().position(&self.name) {
            Some(idx) if idx == self.index => Ok(idx),
            _ => Err(FormError::UnknownField(self.name.clone())),
        }
    }

    pub fn state<'a>(&self, form: &'a Form) -> Result<&'a FieldState> {
        let idx = self.resolve(form)?;
        Ok(form.store.state_at(idx))
    }

    pub fn value<'a>(&self, form: &'a Form) -> Result<&'a Value> {
        self.state(form).map(FieldState::value)
    }

    pub fn error<'a>(&self, form: &'a Form) -> Result<Option<&'a str>> {
        self.state(form).map(FieldState::error)
    }

    /// Borrow the form as a [`FieldBinding`] for this field
    pub fn bind<'f>(&self, form: &'f mut Form) -> Result<FieldBinding<'f>> {
        let idx = self.resolve(form)?;
        Ok(FieldBinding::new(form, idx))
    }

    pub fn set_value(&self, form: &mut Form, value: impl Into<Value>) -> Result<ValidationResult> {
        Ok(self.bind(form)?.set_value(value))
    }

    pub fn input(&self, form: &mut Form, value: impl Into<Value>) -> Result<Option<ValidationResult>> {
        Ok(self.bind(form)?.input(value))
    }

    pub fn commit(&self, form: &mut Form) -> Result<ValidationResult> {
        Ok(self.bind(form)?.commit())
    }
}
