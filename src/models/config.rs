use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Output settings for one translation. Every field has a default, so an
/// empty JSON object (or no config file at all) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslatorConfig {
    /// Name of the generated class and of the exported binding.
    pub class_name: String,
    /// Spaces per indentation level.
    pub indent: usize,
    /// Write the generation timestamp into the header comment.
    pub include_timestamp: bool,
    /// Render calls to functions declared in the script as `this.<name>(...)`
    /// instead of leaving the callee untouched.
    pub qualify_user_functions: bool,
    /// Render references to input parameters as `this.<name>`. Off by default:
    /// only globals are resolved to fields.
    pub qualify_inputs: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig {
            class_name: "ExpertAdvisor".to_string(),
            indent: 2,
            include_timestamp: true,
            qualify_user_functions: false,
            qualify_inputs: false,
        }
    }
}

impl TranslatorConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if !is_identifier(&self.class_name) {
            return Err(AppError::InvalidConfig(format!(
                "className '{}' is not a valid identifier",
                self.class_name
            )));
        }
        if !(1..=8).contains(&self.indent) {
            return Err(AppError::InvalidConfig(format!(
                "indent must be between 1 and 8, got {}",
                self.indent
            )));
        }
        Ok(())
    }

    /// Indentation prefix for the given nesting depth.
    pub fn indent_for(&self, depth: usize) -> String {
        " ".repeat(self.indent * depth)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
