// Form configuration

use crate::{FormError, Result};
use serde::{Deserialize, Serialize};

/// When input events re-run a field's rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Validate on every input event
    #[default]
    Eager,
    /// Validate only when the input is committed (e.g. on change or blur)
    Lazy,
}

/// Per-form options
///
/// ```
/// use armature_forms::{FormConfig, ValidationMode};
///
/// let config = FormConfig::from_toml_str(r#"
///     mode = "lazy"
///     validate_on_init = true
/// "#).unwrap();
///
/// assert_eq!(config.mode, ValidationMode::Lazy);
/// assert!(config.validate_on_init);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub mode: ValidationMode,

    /// Run bulk validation as soon as the form is created
    pub validate_on_init: bool,
}

impl FormConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eager() -> Self {
        Self::default().with_mode(ValidationMode::Eager)
    }

    pub fn lazy() -> Self {
        Self::default().with_mode(ValidationMode::Lazy)
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_validate_on_init(mut self, enabled: bool) -> Self {
        self.validate_on_init = enabled;
        self
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| FormError::Config(format!("TOML parse error: {}", e)))
    }
}
