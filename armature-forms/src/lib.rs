//! Form validation for Armature
//!
//! Binds a schema of per-field rules to live field state. Each rule turns a
//! value into [`ValidationResult::Valid`] or an error message; the form
//! tracks values, errors and touched flags, and only lets a submission
//! through when every field passes.
//!
//! # Examples
//!
//! ## Schema and Submit
//!
//! ```
//! use armature_forms::{chain, create_form, min_length, required, Schema};
//!
//! let schema = Schema::builder()
//!     .field("category", required())
//!     .field("title", chain![required(), min_length(3)])
//!     .build()
//!     .unwrap();
//!
//! let mut form = create_form(schema, None).unwrap();
//! form.set_field_value("category", "music").unwrap();
//! form.set_field_value("title", "ab").unwrap();
//!
//! // Blocked: the callback is not called
//! let outcome = form.submit(|values| values);
//! assert!(!outcome.is_submitted());
//! assert_eq!(form.errors()["title"], "Please type at least 3 characters");
//!
//! form.set_field_value("title", "abc").unwrap();
//! let values = form.submit(|values| values).into_output().unwrap();
//! assert_eq!(values["title"], "abc");
//! ```
//!
//! ## Custom and Cross-field Rules
//!
//! ```
//! use armature_forms::{custom, same_as, Rule, RuleExt, ValidationResult, required};
//! use serde_json::json;
//!
//! let no_spaces = custom("noSpaces", |value, _ctx| match value.as_str() {
//!     Some(s) if s.contains(' ') => ValidationResult::invalid("No spaces allowed"),
//!     _ => ValidationResult::Valid,
//! });
//!
//! let username = required().and(no_spaces);
//! assert!(username.check_value(&json!("jane doe")).is_invalid());
//!
//! // Reads the "password" field when checked inside a form
//! let _confirm = same_as("password").with_message("Passwords do not match");
//! ```
//!
//! ## Lazy Bindings
//!
//! ```
//! use armature_forms::{required, Form, FormConfig, Schema};
//!
//! let schema = Schema::builder().field("email", required()).build().unwrap();
//! let mut form = Form::with_config(schema, None, FormConfig::lazy()).unwrap();
//!
//! let mut email = form.bind_field("email").unwrap();
//! assert!(email.input("").is_none());
//! assert!(email.commit().is_invalid());
//! ```

mod binding;
mod config;
mod errors;
mod form;
mod rules;
mod schema;
mod store;
mod traits;
pub mod validators;

pub use binding::*;
pub use config::*;
pub use errors::*;
pub use form::*;
pub use rules::*;
pub use schema::*;
pub use store::*;
pub use traits::*;
pub use validators::*;
