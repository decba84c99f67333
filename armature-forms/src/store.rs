// Per-field state

use crate::{FieldSpec, Result, RuleContext, Schema, ValidationResult};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

/// Field name to current value
pub type FormValues = BTreeMap<String, Value>;

/// Field name to error message, for invalid fields only
pub type ErrorMap = BTreeMap<String, String>;

/// Where a field sits in its validation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    /// Rule has not run since the field was initialized
    Pristine,
    Valid,
    Invalid,
}

/// Current value, last error and interaction flags of one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldState {
    name: String,
    value: Value,
    error: Option<String>,
    touched: bool,
    #[serde(skip)]
    validated: bool,
}

impl FieldState {
    fn new(name: String, value: Value) -> Self {
        Self {
            name,
            value,
            error: None,
            touched: false,
            validated: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the value was changed through `set_value`
    pub fn touched(&self) -> bool {
        self.touched
    }

    pub fn status(&self) -> FieldStatus {
        match (self.validated, &self.error) {
            (false, _) => FieldStatus::Pristine,
            (true, None) => FieldStatus::Valid,
            (true, Some(_)) => FieldStatus::Invalid,
        }
    }
}

fn empty_value(spec: &FieldSpec) -> Value {
    spec.default_value()
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()))
}

/// State for every field of a schema, in declaration order
#[derive(Debug, Clone)]
pub struct FieldStore {
    schema: Arc<Schema>,
    fields: Vec<FieldState>,
}

impl FieldStore {
    /// Create a store with every schema field at its default value
    pub fn new(schema: Arc<Schema>) -> Self {
        let fields = schema
            .fields()
            .iter()
            .map(|spec| FieldState::new(spec.name().to_string(), empty_value(spec)))
            .collect();

        Self { schema, fields }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Reset a field to `initial`, or to its schema default when `None`
    ///
    /// Fields without a schema default start as the empty string.
    pub fn initialize(&mut self, field: &str, initial: Option<Value>) -> Result<()> {
        let idx = self.schema.index_of(field)?;
        let value = initial.unwrap_or_else(|| empty_value(&self.schema.fields()[idx]));
        self.fields[idx] = FieldState::new(field.to_string(), value);
        Ok(())
    }

    /// Update a field's value, mark it touched and re-run its rule
    pub fn set_value(&mut self, field: &str, value: Value) -> Result<ValidationResult> {
        let idx = self.schema.index_of(field)?;
        Ok(self.set_value_at(idx, value))
    }

    pub fn get_value(&self, field: &str) -> Result<&Value> {
        self.state(field).map(FieldState::value)
    }

    pub fn get_error(&self, field: &str) -> Result<Option<&str>> {
        self.state(field).map(FieldState::error)
    }

    pub fn is_touched(&self, field: &str) -> Result<bool> {
        self.state(field).map(FieldState::touched)
    }

    pub fn state(&self, field: &str) -> Result<&FieldState> {
        let idx = self.schema.index_of(field)?;
        Ok(&self.fields[idx])
    }

    /// Re-run a field's rule without touching its value
    pub fn validate(&mut self, field: &str) -> Result<ValidationResult> {
        let idx = self.schema.index_of(field)?;
        Ok(self.validate_at(idx))
    }

    /// Attach an error produced outside the schema
    pub fn set_error(&mut self, field: &str, message: impl Into<String>) -> Result<()> {
        let idx = self.schema.index_of(field)?;
        let state = &mut self.fields[idx];
        state.error = Some(message.into());
        state.validated = true;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldState> {
        self.fields.iter()
    }

    /// Lookup used by cross-field rules; `None` for undeclared fields
    pub fn value_of(&self, field: &str) -> Option<&Value> {
        self.schema
            .position(field)
            .map(|idx| &self.fields[idx].value)
    }

    /// Snapshot of every field's current value
    pub fn values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|state| (state.name.clone(), state.value.clone()))
            .collect()
    }

    /// Snapshot of every field currently holding an error
    pub fn errors(&self) -> ErrorMap {
        self.fields
            .iter()
            .filter_map(|state| Some((state.name.clone(), state.error.clone()?)))
            .collect()
    }

    pub(crate) fn set_value_at(&mut self, idx: usize, value: Value) -> ValidationResult {
        self.stage_at(idx, value);
        self.touch_at(idx);
        self.validate_at(idx)
    }

    pub(crate) fn stage_at(&mut self, idx: usize, value: Value) {
        self.fields[idx].value = value;
    }

    pub(crate) fn touch_at(&mut self, idx: usize) {
        self.fields[idx].touched = true;
    }

    pub(crate) fn state_at(&self, idx: usize) -> &FieldState {
        &self.fields[idx]
    }

    pub(crate) fn validate_at(&mut self, idx: usize) -> ValidationResult {
        let result = {
            let spec = &self.schema.fields()[idx];
            let ctx = RuleContext::with_store(spec.name(), self);
            spec.rule().check(&self.fields[idx].value, &ctx)
        };

        let state = &mut self.fields[idx];
        state.validated = true;
        state.error = result.message().map(str::to_owned);
        trace!(field = %state.name, valid = result.is_valid(), "field validated");

        result
    }
}
