// Rule composition

use crate::{Rule, RuleContext, SharedRule, ValidationResult};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type RuleFn = Arc<dyn Fn(&Value, &RuleContext<'_>) -> ValidationResult + Send + Sync>;

/// Ordered list of rules evaluated left to right
///
/// Evaluation stops at the first invalid result and only that message is
/// reported; later rules never run.
#[derive(Clone, Default)]
pub struct Chain {
    rules: Vec<SharedRule>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule to the end of the chain
    pub fn and<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Rule for Chain {
    fn check(&self, value: &Value, ctx: &RuleContext<'_>) -> ValidationResult {
        for rule in &self.rules {
            let result = rule.check(value, ctx);
            if result.is_invalid() {
                return result;
            }
        }
        ValidationResult::Valid
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.name()))
            .finish()
    }
}

/// `first`, then `second` if `first` passed
pub fn compose<A, B>(first: A, second: B) -> Chain
where
    A: Rule + 'static,
    B: Rule + 'static,
{
    Chain::new().and(first).and(second)
}

/// Build a short-circuiting [`Chain`] from a list of rules
///
/// ```
/// use armature_forms::{chain, required, min_length, Rule};
///
/// let rule = chain![required(), min_length(3)];
/// assert_eq!(
///     rule.check_value(&serde_json::json!("")).message(),
///     Some("This field is required")
/// );
/// ```
#[macro_export]
macro_rules! chain {
    ($($rule:expr),* $(,)?) => {
        $crate::Chain::new()$(.and($rule))*
    };
}

/// Rule backed by a closure
#[derive(Clone)]
pub struct Custom {
    name: &'static str,
    check: RuleFn,
}

pub fn custom<F>(name: &'static str, check: F) -> Custom
where
    F: Fn(&Value, &RuleContext<'_>) -> ValidationResult + Send + Sync + 'static,
{
    Custom {
        name,
        check: Arc::new(check),
    }
}

impl Rule for Custom {
    fn check(&self, value: &Value, ctx: &RuleContext<'_>) -> ValidationResult {
        (self.check)(value, ctx)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Custom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom").field("name", &self.name).finish()
    }
}
