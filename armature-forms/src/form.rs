// Form evaluator

use crate::{
    ErrorMap, FieldBinding, FieldHandle, FieldState, FieldStore, FormConfig, FormValues, Result, Schema,
    ValidationResult,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Outcome of [`Form::submit`]
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<R> {
    /// Every field passed; holds the callback's return value
    Submitted(R),
    /// At least one field failed; the callback was not called
    Blocked(ErrorMap),
}

impl<R> Submission<R> {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }

    pub fn errors(&self) -> Option<&ErrorMap> {
        match self {
            Self::Submitted(_) => None,
            Self::Blocked(errors) => Some(errors),
        }
    }

    pub fn into_output(self) -> Option<R> {
        match self {
            Self::Submitted(output) => Some(output),
            Self::Blocked(_) => None,
        }
    }
}

/// Create a form with the default configuration
pub fn create_form(
    schema: impl Into<Arc<Schema>>,
    initial_values: Option<FormValues>,
) -> Result<Form> {
    Form::new(schema, initial_values)
}

/// A schema bound to live field state
///
/// The form exclusively owns its state. Callers read through accessors and
/// mutate only through value setters, each of which re-runs validation.
#[derive(Debug, Clone)]
pub struct Form {
    pub(crate) store: FieldStore,
    pub(crate) config: FormConfig,
    initial: FormValues,
    submit_count: usize,
}

impl Form {
    pub fn new(schema: impl Into<Arc<Schema>>, initial_values: Option<FormValues>) -> Result<Self> {
        Self::with_config(schema, initial_values, FormConfig::default())
    }

    /// Create a form, rejecting initial values for undeclared fields
    pub fn with_config(
        schema: impl Into<Arc<Schema>>,
        initial_values: Option<FormValues>,
        config: FormConfig,
    ) -> Result<Self> {
        let schema = schema.into();
        let initial = initial_values.unwrap_or_default();
        ensure_declared(&schema, &initial)?;

        let mut store = FieldStore::new(schema);
        for (field, value) in &initial {
            store.initialize(field, Some(value.clone()))?;
        }

        debug!(
            fields = store.schema().len(),
            mode = ?config.mode,
            "form created"
        );

        let mut form = Self {
            store,
            config,
            initial,
            submit_count: 0,
        };
        if form.config.validate_on_init {
            form.validate_all();
        }
        Ok(form)
    }

    pub fn schema(&self) -> &Arc<Schema> {
        self.store.schema()
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    pub fn field(&self, field: &str) -> Result<&FieldState> {
        self.store.state(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldState> {
        self.store.iter()
    }

    pub fn values(&self) -> FormValues {
        self.store.values()
    }

    pub fn errors(&self) -> ErrorMap {
        self.store.errors()
    }

    pub fn is_valid(&self) -> bool {
        self.store.iter().all(|state| state.error().is_none())
    }

    pub fn submit_count(&self) -> usize {
        self.submit_count
    }

    /// Run every field's rule in declaration order, touched or not
    pub fn validate_all(&mut self) -> ErrorMap {
        let count = self.store.schema().len();
        for idx in 0..count {
            self.store.validate_at(idx);
        }

        let errors = self.store.errors();
        debug!(fields = count, invalid = errors.len(), "form validated");
        errors
    }

    /// Re-run one field's rule without changing its value
    pub fn validate_field(&mut self, field: &str) -> Result<ValidationResult> {
        self.store.validate(field)
    }

    /// Set one field and re-run its rule immediately
    pub fn set_field_value(
        &mut self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<ValidationResult> {
        self.store.set_value(field, value.into())
    }

    /// Bulk update; every listed field is then validated in declaration order
    ///
    /// Nothing is changed if any name is undeclared.
    pub fn set_values(&mut self, values: FormValues) -> Result<()> {
        let schema = self.store.schema().clone();
        ensure_declared(&schema, &values)?;

        let mut changed = Vec::with_capacity(values.len());
        for (field, value) in values {
            let idx = schema.index_of(&field)?;
            self.store.stage_at(idx, value);
            changed.push(idx);
        }

        changed.sort_unstable();
        for idx in changed {
            self.store.touch_at(idx);
            self.store.validate_at(idx);
        }
        Ok(())
    }

    /// Show an error that did not come from the schema, such as a server
    /// response; it stays until the field is next validated
    pub fn set_field_error(&mut self, field: &str, message: impl Into<String>) -> Result<()> {
        self.store.set_error(field, message)
    }

    /// Restore every field to its initial value and clear errors, touched
    /// flags and the submit count
    ///
    /// `Some(values)` replaces the initial values first.
    pub fn reset(&mut self, values: Option<FormValues>) -> Result<()> {
        if let Some(values) = values {
            ensure_declared(self.store.schema(), &values)?;
            self.initial = values;
        }

        let schema = self.store.schema().clone();
        for field in schema.field_names() {
            self.store
                .initialize(field, self.initial.get(field).cloned())?;
        }
        self.submit_count = 0;

        debug!(fields = schema.len(), "form reset");
        Ok(())
    }

    /// Validate everything and call `on_valid` with a value snapshot only
    /// if no field is invalid
    ///
    /// All fields are marked touched so their errors become visible.
    pub fn submit<F, R>(&mut self, on_valid: F) -> Submission<R>
    where
        F: FnOnce(FormValues) -> R,
    {
        self.submit_count += 1;
        for idx in 0..self.store.schema().len() {
            self.store.touch_at(idx);
        }

        let errors = self.validate_all();
        if errors.is_empty() {
            debug!(attempt = self.submit_count, "form submitted");
            Submission::Submitted(on_valid(self.store.values()))
        } else {
            debug!(
                attempt = self.submit_count,
                invalid = errors.len(),
                "form submission blocked"
            );
            Submission::Blocked(errors)
        }
    }

    /// Handle for one rendered input
    pub fn bind_field(&mut self, field: &str) -> Result<FieldBinding<'_>> {
        let idx = self.store.schema().index_of(field)?;
        Ok(FieldBinding::new(self, idx))
    }

    /// Handle for one rendered input that does not borrow the form
    pub fn field_handle(&self, field: &str) -> Result<FieldHandle> {
        let idx = self.store.schema().index_of(field)?;
        Ok(FieldHandle::new(field, idx))
    }

    /// Errors and values for rendering
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "valid": self.is_valid(),
            "errors": self.errors(),
            "values": self.values(),
            "submitCount": self.submit_count,
        })
    }
}

fn ensure_declared(schema: &Schema, values: &FormValues) -> Result<()> {
    for field in values.keys() {
        schema.index_of(field)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::*;
    use crate::{chain, FieldStatus, FormError};
    use serde_json::json;

    fn post_schema() -> Schema {
        Schema::builder()
            .field("category", required())
            .field("title", chain![required(), min_length(3)])
            .build()
            .unwrap()
    }

    fn values(pairs: &[(&str, Value)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_submit_blocked_on_short_title() {
        let initial = values(&[("category", json!("music")), ("title", json!("ab"))]);
        let mut form = create_form(post_schema(), Some(initial)).unwrap();

        let mut calls = 0;
        let outcome = form.submit(|_| calls += 1);

        assert_eq!(calls, 0);
        assert!(!outcome.is_submitted());
        let expected = ErrorMap::from([(
            "title".to_string(),
            "Please type at least 3 characters".to_string(),
        )]);
        assert_eq!(outcome.errors(), Some(&expected));
        assert_eq!(form.errors(), expected);
        assert!(!form.is_valid());
    }

    #[test]
    fn test_submit_passes_values_snapshot() {
        let initial = values(&[("category", json!("music")), ("title", json!("abc"))]);
        let mut form = create_form(post_schema(), Some(initial.clone())).unwrap();

        let mut received = Vec::new();
        let outcome = form.submit(|snapshot| received.push(snapshot));

        assert!(outcome.is_submitted());
        assert_eq!(received, vec![initial]);
        assert_eq!(form.submit_count(), 1);
    }

    #[test]
    fn test_submit_surfaces_untouched_fields() {
        let mut form = create_form(post_schema(), None).unwrap();
        assert!(form.is_valid());

        let errors = form.submit(|_| ()).errors().cloned().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["category"], REQUIRED_MESSAGE);
        assert_eq!(errors["title"], REQUIRED_MESSAGE);
        assert!(form.field("category").unwrap().touched());
    }

    #[test]
    fn test_validate_all_is_idempotent() {
        let initial = values(&[("title", json!("ab"))]);
        let mut form = create_form(post_schema(), Some(initial)).unwrap();

        let first = form.validate_all();
        let second = form.validate_all();
        assert_eq!(first, second);
        assert_eq!(first.keys().collect::<Vec<_>>(), vec!["category", "title"]);
    }

    #[test]
    fn test_validate_all_does_not_touch() {
        let mut form = create_form(post_schema(), None).unwrap();
        form.validate_all();
        assert!(!form.field("title").unwrap().touched());
        assert_eq!(form.field("title").unwrap().status(), FieldStatus::Invalid);
    }

    #[test]
    fn test_set_field_value_revalidates_one_field() {
        let mut form = create_form(post_schema(), None).unwrap();

        let result = form.set_field_value("title", "ab").unwrap();
        assert!(result.is_invalid());
        assert_eq!(form.errors().len(), 1);

        form.set_field_value("title", "abcd").unwrap();
        assert!(form.errors().is_empty());
        assert_eq!(
            form.field("category").unwrap().status(),
            FieldStatus::Pristine
        );
    }

    #[test]
    fn test_unknown_initial_value_rejected() {
        let initial = values(&[("body", json!("text"))]);
        let err = create_form(post_schema(), Some(initial)).unwrap_err();
        assert_eq!(err, FormError::UnknownField("body".to_string()));
    }

    #[test]
    fn test_unknown_field_access() {
        let mut form = create_form(post_schema(), None).unwrap();
        assert!(form.set_field_value("body", "x").is_err());
        assert!(form.bind_field("body").is_err());
        assert!(form.field("body").is_err());
    }

    #[test]
    fn test_validate_on_init() {
        let config = FormConfig::new().with_validate_on_init(true);
        let form = Form::with_config(post_schema(), None, config).unwrap();
        assert_eq!(form.errors().len(), 2);
        assert!(!form.field("title").unwrap().touched());
    }

    #[test]
    fn test_set_values_validates_in_declaration_order() {
        let schema = Schema::builder()
            .field("password", min_length(8))
            .field("confirm", same_as("password"))
            .build()
            .unwrap();
        let mut form = create_form(schema, None).unwrap();

        form.set_values(values(&[
            ("confirm", json!("hunter2222")),
            ("password", json!("hunter2222")),
        ]))
        .unwrap();

        assert!(form.is_valid());
        assert!(form.field("confirm").unwrap().touched());
    }

    #[test]
    fn test_set_values_rejects_unknown_without_mutation() {
        let mut form = create_form(post_schema(), None).unwrap();
        let err = form
            .set_values(values(&[("title", json!("abc")), ("zzz", json!(1))]))
            .unwrap_err();

        assert_eq!(err, FormError::UnknownField("zzz".to_string()));
        assert_eq!(form.field("title").unwrap().value(), &json!(""));
    }

    #[test]
    fn test_cross_field_rule_sees_current_values() {
        let schema = Schema::builder()
            .field("password", required())
            .field("confirm", same_as("password"))
            .build()
            .unwrap();
        let mut form = create_form(schema, None).unwrap();

        form.set_field_value("password", "secret").unwrap();
        assert!(form.set_field_value("confirm", "secre").unwrap().is_invalid());
        assert!(form.set_field_value("confirm", "secret").unwrap().is_valid());

        // Changing the source field does not re-validate its dependents
        form.set_field_value("password", "other").unwrap();
        assert!(form.is_valid());
        assert!(!form.validate_all().is_empty());
    }

    #[test]
    fn test_set_field_error() {
        let mut form = create_form(post_schema(), None).unwrap();
        form.set_field_error("title", "Title already taken").unwrap();
        assert_eq!(form.errors()["title"], "Title already taken");

        form.set_field_value("title", "fresh").unwrap();
        assert!(!form.errors().contains_key("title"));
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let initial = values(&[("category", json!("music"))]);
        let mut form = create_form(post_schema(), Some(initial)).unwrap();

        form.set_field_value("category", "").unwrap();
        form.submit(|_| ());
        assert!(!form.is_valid());

        form.reset(None).unwrap();
        assert!(form.is_valid());
        assert_eq!(form.submit_count(), 0);
        assert_eq!(form.values()["category"], json!("music"));
        assert!(!form.field("category").unwrap().touched());

        form.reset(Some(values(&[("title", json!("Intro"))]))).unwrap();
        assert_eq!(form.values()["category"], json!(""));
        assert_eq!(form.values()["title"], json!("Intro"));
    }

    #[test]
    fn test_to_json() {
        let mut form = create_form(post_schema(), None).unwrap();
        form.set_field_value("title", "ab").unwrap();

        let json = form.to_json();
        assert_eq!(json["valid"], json!(false));
        assert_eq!(json["errors"]["title"], "Please type at least 3 characters");
        assert_eq!(json["values"]["category"], "");
        assert_eq!(json["submitCount"], 0);
    }
}
