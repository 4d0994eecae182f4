use std::fmt;

use jsonschema::{Validator, validator_for};
use serde_json::Value;

use crate::io::{DocumentFormat, parse_document_str};

/// Raw structured-text editor used by "advanced" settings editing.
pub trait AdvancedEditor {
    /// Present `code` for editing. Returns the confirmed text, `None` when cancelled.
    /// Editors may call `validator.check` to refuse confirming invalid text.
    fn edit(&mut self, code: &str, validator: &CodeValidator) -> Option<String>;
}

impl<F> AdvancedEditor for F
where
    F: FnMut(&str, &CodeValidator) -> Option<String>,
{
    fn edit(&mut self, code: &str, validator: &CodeValidator) -> Option<String> {
        self(code, validator)
    }
}

/// Syntax plus optional semantic check for advanced edits.
pub struct CodeValidator {
    format: DocumentFormat,
    validator: Option<Validator>,
}

impl fmt::Debug for CodeValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeValidator")
            .field("format", &self.format)
            .field("semantic", &self.validator.is_some())
            .finish()
    }
}

impl CodeValidator {
    /// A schema that fails to compile is skipped; syntax is still checked.
    pub fn new(format: DocumentFormat, schema: Option<&Value>) -> Self {
        let validator = schema.and_then(|schema| match validator_for(schema) {
            Ok(validator) => Some(validator),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring settings schema that does not compile");
                None
            }
        });
        Self { format, validator }
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Parse `code` and check it against the schema. Errors are prefixed with their
    /// instance pointer (`<root>` for the document itself).
    pub fn check(&self, code: &str) -> Result<Value, Vec<String>> {
        let value = parse_document_str(code, self.format).map_err(|err| vec![format!("{err:#}")])?;
        let Some(validator) = &self.validator else {
            return Ok(value);
        };
        let errors: Vec<String> = validator
            .iter_errors(&value)
            .map(|error| {
                let pointer = error.instance_path.to_string();
                let prefix = if pointer.is_empty() {
                    "<root>".to_string()
                } else {
                    pointer
                };
                format!("{prefix}: {error}")
            })
            .collect();
        if errors.is_empty() {
            Ok(value)
        } else {
            Err(errors)
        }
    }
}
