mod builtin;

pub use builtin::BuiltinType;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::schema::{Config, FieldDefinition};
use crate::validate::{compile_pattern, ValidatorKind};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("field type `{0}` is built in and cannot be replaced")]
    ReservedTag(String),
    #[error("field type `{0}` is already registered")]
    DuplicateTag(String),
}

/// Per-type behavior behind one field type tag.
///
/// All methods are pure: outputs depend only on the explicit inputs. Readers
/// and writers return `None` as an absence marker; `write` is `read`'s
/// inverse for values `read` produced.
pub trait FieldTypeHandler: Send + Sync {
    /// Build the validator for a field of this type. The default is a
    /// permissive string validator honoring the field's pattern constraint.
    fn build_validator(&self, field: &FieldDefinition, config: &Config) -> ValidatorKind {
        let _ = config;
        ValidatorKind::String {
            pattern: compile_pattern(field),
            allowed: None,
        }
    }

    /// Transform a stored value into its logical editing form.
    fn read(&self, raw: Option<&Value>, field: &FieldDefinition, config: &Config) -> Option<Value> {
        let _ = (field, config);
        raw.cloned()
    }

    /// Transform a logical editing value back into its stored form.
    fn write(
        &self,
        value: Option<&Value>,
        field: &FieldDefinition,
        config: &Config,
    ) -> Option<Value> {
        let _ = (field, config);
        value.cloned()
    }

    /// Initial value for a freshly created entry.
    fn default_value(&self, field: &FieldDefinition) -> Option<Value> {
        field.options.get("default").cloned()
    }
}

/// Type dispatch table: the closed built-in set plus an open table of custom
/// registrations validated at registration time.
///
/// Lookup is total. An unregistered tag falls back to the generic text
/// handler with a non-fatal diagnostic, never an error.
#[derive(Default)]
pub struct TypeRegistry {
    custom: HashMap<String, Arc<dyn FieldTypeHandler>>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom field type. Built-in tags cannot be shadowed and
    /// duplicate registrations are rejected.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        handler: Arc<dyn FieldTypeHandler>,
    ) -> Result<(), RegistryError> {
        let tag = tag.into();
        if BuiltinType::from_tag(&tag).is_some() {
            return Err(RegistryError::ReservedTag(tag));
        }
        if self.custom.contains_key(&tag) {
            return Err(RegistryError::DuplicateTag(tag));
        }
        self.custom.insert(tag, handler);
        Ok(())
    }

    /// Resolve a tag to its handler. Unknown tags fall back to text.
    #[must_use]
    pub fn handler(&self, tag: &str) -> &dyn FieldTypeHandler {
        if let Some(builtin) = BuiltinType::from_tag(tag) {
            return builtin.handler();
        }
        if let Some(handler) = self.custom.get(tag) {
            return handler.as_ref();
        }
        warn!(%tag, "unknown field type, falling back to text");
        BuiltinType::Text.handler()
    }

    /// Whether a tag resolves without the text fallback.
    #[must_use]
    pub fn is_known(&self, tag: &str) -> bool {
        BuiltinType::from_tag(tag).is_some() || self.custom.contains_key(tag)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
