// Form schema

use crate::{FormError, Result, Rule, SharedRule};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// A declared field: its name, rule and optional default value
#[derive(Clone)]
pub struct FieldSpec {
    name: String,
    rule: SharedRule,
    default: Option<Value>,
}

impl FieldSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule(&self) -> &dyn Rule {
        &*self.rule
    }

    /// Value a field starts with when no initial value is given
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("rule", &self.rule.name())
            .field("default", &self.default)
            .finish()
    }
}

/// Immutable mapping from field name to rule
///
/// Fields keep their declaration order, which is the order bulk
/// validation visits them in.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    pub(crate) fn position(&self, field: &str) -> Option<usize> {
        self.index.get(field).copied()
    }

    /// Declaration position of a field
    pub fn index_of(&self, field: &str) -> Result<usize> {
        self.position(field).ok_or_else(|| {
            warn!(field = %field, "lookup of field missing from schema");
            FormError::UnknownField(field.to_string())
        })
    }

    pub fn get(&self, field: &str) -> Result<&FieldSpec> {
        self.index_of(field).map(|idx| &self.fields[idx])
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldSpec::name)
    }
}

/// Builder for a [`Schema`]
#[derive(Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field validated by `rule`
    pub fn field<R: Rule + 'static>(self, name: impl Into<String>, rule: R) -> Self {
        self.push(name.into(), Arc::new(rule), None)
    }

    /// Declare a field with a default initial value
    pub fn field_with_default<R: Rule + 'static>(
        self,
        name: impl Into<String>,
        rule: R,
        default: impl Into<Value>,
    ) -> Self {
        self.push(name.into(), Arc::new(rule), Some(default.into()))
    }

    fn push(mut self, name: String, rule: SharedRule, default: Option<Value>) -> Self {
        self.fields.push(FieldSpec {
            name,
            rule,
            default,
        });
        self
    }

    /// Finish the schema, rejecting empty or repeated field names
    pub fn build(self) -> Result<Schema> {
        let mut index = HashMap::with_capacity(self.fields.len());

        for (idx, spec) in self.fields.iter().enumerate() {
            if spec.name.is_empty() {
                return Err(FormError::EmptyFieldName);
            }
            if index.insert(spec.name.clone(), idx).is_some() {
                return Err(FormError::DuplicateField(spec.name.clone()));
            }
        }

        Ok(Schema {
            fields: self.fields,
            index,
        })
    }
}
