use super::types::{Config, FieldDefinition};
use super::OBJECT_TAG;

/// Resolution of one mixed-field tag: either a named block template from the
/// configuration, or a primitive type tag handled by the type registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TagTemplate<'a> {
    Block(&'a FieldDefinition),
    Primitive(&'a str),
}

impl<'a> TagTemplate<'a> {
    /// Resolve a tag against the configuration's block list. The structural
    /// `object` tag never resolves to a block.
    #[must_use]
    pub fn resolve(config: &'a Config, tag: &'a str) -> Self {
        if tag != OBJECT_TAG {
            if let Some(block) = config.block(tag) {
                return Self::Block(block);
            }
        }
        Self::Primitive(tag)
    }
}

/// Substitute a block template into the field that references it.
///
/// This is a single substitution: the returned definition is used as-is, and
/// any block reference *inside* the returned tree is not resolved again
/// (block-of-block substitution is intentionally unsupported).
///
/// The reference site keeps control of identity and cardinality: `name` and
/// `required` always come from the referencing field, and its `list`,
/// `label`, `pattern`, and `options` override the block's own when set.
#[must_use]
pub fn substitute_block(reference: &FieldDefinition, block: &FieldDefinition) -> FieldDefinition {
    let mut expanded = block.clone();
    expanded.name = reference.name.clone();
    expanded.required = reference.required;
    if reference.label.is_some() {
        expanded.label = reference.label.clone();
    }
    if reference.list.is_enabled() {
        expanded.list = reference.list;
    }
    if reference.pattern.is_some() {
        expanded.pattern = reference.pattern.clone();
    }
    for (key, value) in &reference.options {
        expanded.options.insert(key.clone(), value.clone());
    }
    expanded
}
