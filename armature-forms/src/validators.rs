// Built-in rules

use crate::{Rule, RuleContext, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$")
        .expect("email pattern compiles")
});

pub const REQUIRED_MESSAGE: &str = "This field is required";

/// `null` and the empty string count as "no value"
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Length of strings (in characters) and arrays
fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        // "inf" and "NaN" parse but are not numbers
        Value::String(s) => s.trim().parse().ok().filter(|n: &f64| n.is_finite()),
        _ => None,
    }
}

fn fail(custom: &Option<String>, default: impl FnOnce() -> String) -> ValidationResult {
    ValidationResult::Invalid(custom.clone().unwrap_or_else(default))
}

// Presence

/// Rejects `null` and `""`
#[derive(Debug, Clone, Default)]
pub struct Required {
    message: Option<String>,
}

pub fn required() -> Required {
    Required::default()
}

impl Required {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Rule for Required {
    fn check(&self, value: &Value, _ctx: &RuleContext<'_>) -> ValidationResult {
        if is_blank(value) {
            fail(&self.message, || REQUIRED_MESSAGE.to_string())
        } else {
            ValidationResult::Valid
        }
    }

    fn name(&self) -> &'static str {
        "required"
    }
}

/// Accepts everything; keeps unconstrained fields in the schema
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysValid;

pub fn any() -> AlwaysValid {
    AlwaysValid
}

impl Rule for AlwaysValid {
    fn check(&self, _value: &Value, _ctx: &RuleContext<'_>) -> ValidationResult {
        ValidationResult::Valid
    }

    fn name(&self) -> &'static str {
        "any"
    }
}

// Length

/// Minimum string (character) or array length
#[derive(Debug, Clone)]
pub struct MinLength {
    min: usize,
    message: Option<String>,
}

pub fn min_length(min: usize) -> MinLength {
    MinLength { min, message: None }
}

impl MinLength {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Rule for MinLength {
    fn check(&self, value: &Value, _ctx: &RuleContext<'_>) -> ValidationResult {
        match length_of(value) {
            Some(len) if len < self.min => fail(&self.message, || {
                format!("Please type at least {} characters", self.min)
            }),
            _ => ValidationResult::Valid,
        }
    }

    fn name(&self) -> &'static str {
        "minLength"
    }
}

/// Maximum string (character) or array length
#[derive(Debug, Clone)]
pub struct MaxLength {
    max: usize,
    message: Option<String>,
}

pub fn max_length(max: usize) -> MaxLength {
    MaxLength { max, message: None }
}

impl MaxLength {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Rule for MaxLength {
    fn check(&self, value: &Value, _ctx: &RuleContext<'_>) -> ValidationResult {
        match length_of(value) {
            Some(len) if len > self.max => fail(&self.message, || {
                format!("Please type at most {} characters", self.max)
            }),
            _ => ValidationResult::Valid,
        }
    }

    fn name(&self) -> &'static str {
        "maxLength"
    }
}

// Format

/// Email address format; blank values pass
#[derive(Debug, Clone, Default)]
pub struct IsEmail {
    message: Option<String>,
}

pub fn email() -> IsEmail {
    IsEmail::default()
}

impl IsEmail {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Rule for IsEmail {
    fn check(&self, value: &Value, _ctx: &RuleContext<'_>) -> ValidationResult {
        if is_blank(value) {
            return ValidationResult::Valid;
        }
        match value {
            Value::String(s) if EMAIL_REGEX.is_match(s) => ValidationResult::Valid,
            _ => fail(&self.message, || {
                "Please enter a valid email address".to_string()
            }),
        }
    }

    fn name(&self) -> &'static str {
        "email"
    }
}

/// Validates against a regex pattern; blank values pass
#[derive(Debug, Clone)]
pub struct Matches {
    pattern: Regex,
    message: Option<String>,
}

pub fn matches(pattern: Regex) -> Matches {
    Matches {
        pattern,
        message: None,
    }
}

impl Matches {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Rule for Matches {
    fn check(&self, value: &Value, _ctx: &RuleContext<'_>) -> ValidationResult {
        if is_blank(value) {
            return ValidationResult::Valid;
        }
        match value {
            Value::String(s) if self.pattern.is_match(s) => ValidationResult::Valid,
            _ => fail(&self.message, || {
                "This field has an invalid format".to_string()
            }),
        }
    }

    fn name(&self) -> &'static str {
        "matches"
    }
}

// Numbers

/// Lower bound for numbers and numeric strings
#[derive(Debug, Clone)]
pub struct MinValue {
    min: f64,
    message: Option<String>,
}

pub fn min_value(min: f64) -> MinValue {
    MinValue { min, message: None }
}

impl MinValue {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Rule for MinValue {
    fn check(&self, value: &Value, _ctx: &RuleContext<'_>) -> ValidationResult {
        if is_blank(value) {
            return ValidationResult::Valid;
        }
        match number_of(value) {
            Some(n) if n >= self.min => ValidationResult::Valid,
            Some(_) => fail(&self.message, || {
                format!("Please enter a value of at least {}", self.min)
            }),
            None => fail(&self.message, || NOT_A_NUMBER.to_string()),
        }
    }

    fn name(&self) -> &'static str {
        "minValue"
    }
}

/// Upper bound for numbers and numeric strings
#[derive(Debug, Clone)]
pub struct MaxValue {
    max: f64,
    message: Option<String>,
}

pub fn max_value(max: f64) -> MaxValue {
    MaxValue { max, message: None }
}

impl MaxValue {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Rule for MaxValue {
    fn check(&self, value: &Value, _ctx: &RuleContext<'_>) -> ValidationResult {
        if is_blank(value) {
            return ValidationResult::Valid;
        }
        match number_of(value) {
            Some(n) if n <= self.max => ValidationResult::Valid,
            Some(_) => fail(&self.message, || {
                format!("Please enter a value of at most {}", self.max)
            }),
            None => fail(&self.message, || NOT_A_NUMBER.to_string()),
        }
    }

    fn name(&self) -> &'static str {
        "maxValue"
    }
}

pub const NOT_A_NUMBER: &str = "Please enter a valid number";

// Choices and cross-field

/// Value must equal one of the allowed options; blank values pass
#[derive(Debug, Clone)]
pub struct OneOf {
    options: Vec<Value>,
    message: Option<String>,
}

pub fn one_of<I, V>(options: I) -> OneOf
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    OneOf {
        options: options.into_iter().map(Into::into).collect(),
        message: None,
    }
}

impl OneOf {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Rule for OneOf {
    fn check(&self, value: &Value, _ctx: &RuleContext<'_>) -> ValidationResult {
        if is_blank(value) || self.options.contains(value) {
            ValidationResult::Valid
        } else {
            fail(&self.message, || "Please select a valid option".to_string())
        }
    }

    fn name(&self) -> &'static str {
        "oneOf"
    }
}

/// Value must equal another field's current value
///
/// A sibling that cannot be read is treated as `null`.
#[derive(Debug, Clone)]
pub struct SameAs {
    other: String,
    message: Option<String>,
}

pub fn same_as(other: impl Into<String>) -> SameAs {
    SameAs {
        other: other.into(),
        message: None,
    }
}

impl SameAs {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Rule for SameAs {
    fn check(&self, value: &Value, ctx: &RuleContext<'_>) -> ValidationResult {
        let other = ctx.value(&self.other).unwrap_or(&Value::Null);
        if value == other {
            ValidationResult::Valid
        } else {
            fail(&self.message, || {
                format!("This field must match {}", self.other)
            })
        }
    }

    fn name(&self) -> &'static str {
        "sameAs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormValues;
    use serde_json::json;

    #[test]
    fn test_required_rejects_null_and_empty() {
        let rule = required();
        for value in [Value::Null, json!("")] {
            assert_eq!(
                rule.check_value(&value),
                ValidationResult::invalid(REQUIRED_MESSAGE)
            );
        }
    }

    #[test]
    fn test_required_accepts_other_values() {
        let rule = required();
        for value in [
            json!("a"),
            json!(" "),
            json!(0),
            json!(false),
            json!([]),
            json!({}),
        ] {
            assert!(rule.check_value(&value).is_valid(), "{value}");
        }
    }

    #[test]
    fn test_required_custom_message() {
        let rule = required().with_message("Pick a category");
        assert_eq!(rule.check_value(&json!("")).message(), Some("Pick a category"));
    }

    #[test]
    fn test_any_accepts_everything() {
        assert!(any().check_value(&Value::Null).is_valid());
        assert!(any().check_value(&json!("")).is_valid());
    }

    #[test]
    fn test_min_length_boundaries() {
        let rule = min_length(3);
        assert!(rule.check_value(&json!("abc")).is_valid());
        assert_eq!(
            rule.check_value(&json!("ab")).message(),
            Some("Please type at least 3 characters")
        );
        assert!(rule.check_value(&json!("")).is_invalid());
    }

    #[test]
    fn test_min_length_counts_characters() {
        // 3 chars, 6 bytes
        assert!(min_length(3).check_value(&json!("äöü")).is_valid());
        assert!(min_length(4).check_value(&json!("äöü")).is_invalid());
    }

    #[test]
    fn test_min_length_on_arrays_and_other_shapes() {
        assert!(min_length(2).check_value(&json!(["a"])).is_invalid());
        assert!(min_length(2).check_value(&json!(["a", "b"])).is_valid());
        assert!(min_length(2).check_value(&json!(7)).is_valid());
        assert!(min_length(2).check_value(&Value::Null).is_valid());
    }

    #[test]
    fn test_max_length() {
        let rule = max_length(5);
        assert!(rule.check_value(&json!("exact")).is_valid());
        assert_eq!(
            rule.check_value(&json!("sixsix")).message(),
            Some("Please type at most 5 characters")
        );
    }

    #[test]
    fn test_email() {
        let rule = email();
        assert!(rule.check_value(&json!("user@example.com")).is_valid());
        assert!(rule.check_value(&json!("user+tag@example.co.uk")).is_valid());
        assert!(rule.check_value(&json!("invalid-email")).is_invalid());
        assert!(rule.check_value(&json!("@example.com")).is_invalid());
        assert!(rule.check_value(&json!(42)).is_invalid());
        assert!(rule.check_value(&json!("")).is_valid());
    }

    #[test]
    fn test_matches() {
        let rule = matches(Regex::new(r"^\d{3}-\d{4}$").unwrap()).with_message("Use 555-1234");
        assert!(rule.check_value(&json!("555-1234")).is_valid());
        assert_eq!(rule.check_value(&json!("5551234")).message(), Some("Use 555-1234"));
    }

    #[test]
    fn test_min_and_max_value() {
        let min = min_value(18.0);
        assert!(min.check_value(&json!(18)).is_valid());
        assert!(min.check_value(&json!("21")).is_valid());
        assert_eq!(
            min.check_value(&json!(17)).message(),
            Some("Please enter a value of at least 18")
        );
        assert_eq!(min.check_value(&json!("abc")).message(), Some(NOT_A_NUMBER));

        let max = max_value(10.5);
        assert!(max.check_value(&json!(10.5)).is_valid());
        assert_eq!(
            max.check_value(&json!(11)).message(),
            Some("Please enter a value of at most 10.5")
        );
        assert!(max.check_value(&json!("")).is_valid());
    }

    #[test]
    fn test_number_rules_reject_non_finite_strings() {
        let min = min_value(18.0);
        let max = max_value(10.0);
        for input in ["inf", "-infinity", "NaN", " +inf "] {
            assert_eq!(min.check_value(&json!(input)).message(), Some(NOT_A_NUMBER), "{input}");
            assert_eq!(max.check_value(&json!(input)).message(), Some(NOT_A_NUMBER), "{input}");
        }
        assert!(min.check_value(&json!(" 42 ")).is_valid());
    }

    #[test]
    fn test_number_rules_custom_message_covers_non_numeric() {
        let min = min_value(18.0).with_message("Adults only");
        assert_eq!(min.check_value(&json!("abc")).message(), Some("Adults only"));
        assert_eq!(min.check_value(&json!(12)).message(), Some("Adults only"));

        let max = max_value(10.0).with_message("Ten at most");
        assert_eq!(max.check_value(&json!("NaN")).message(), Some("Ten at most"));
    }

    #[test]
    fn test_one_of() {
        let rule = one_of(["music", "sports"]);
        assert!(rule.check_value(&json!("music")).is_valid());
        assert!(rule.check_value(&json!("cooking")).is_invalid());
        assert!(rule.check_value(&json!("")).is_valid());
    }

    #[test]
    fn test_same_as_reads_sibling() {
        let mut values = FormValues::new();
        values.insert("password".to_string(), json!("hunter22"));

        let rule = same_as("password");
        let ctx = RuleContext::with_values("confirm", &values);
        assert!(rule.check(&json!("hunter22"), &ctx).is_valid());
        assert_eq!(
            rule.check(&json!("hunter2"), &ctx).message(),
            Some("This field must match password")
        );
    }

    #[test]
    fn test_same_as_without_sibling() {
        assert!(same_as("password").check_value(&Value::Null).is_valid());
        assert!(same_as("password").check_value(&json!("x")).is_invalid());
    }
}
