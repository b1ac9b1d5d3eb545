use std::collections::BTreeMap;

use tracing::warn;

use super::{FieldValidator, ValidatorKind, ValidatorNode};
use crate::registry::TypeRegistry;
use crate::schema::{substitute_block, Config, FieldDefinition, FieldType, TagTemplate};

/// Compile a field tree into a composite validator.
///
/// Compilation never fails: unknown types fall back to a permissive string
/// validator and unbuildable constraints degrade to accept-anything, both
/// with diagnostics.
#[must_use]
pub fn build_validator(
    fields: &[FieldDefinition],
    config: &Config,
    registry: &TypeRegistry,
) -> ValidatorNode {
    ValidatorNode {
        kind: build_object(fields, config, registry, true),
        optional: true,
    }
}

fn build_object(
    fields: &[FieldDefinition],
    config: &Config,
    registry: &TypeRegistry,
    allow_blocks: bool,
) -> ValidatorKind {
    ValidatorKind::Object {
        fields: fields
            .iter()
            .map(|field| FieldValidator {
                name: field.name.clone(),
                node: build_field(field, config, registry, allow_blocks),
            })
            .collect(),
    }
}

fn build_field(
    field: &FieldDefinition,
    config: &Config,
    registry: &TypeRegistry,
    allow_blocks: bool,
) -> ValidatorNode {
    // Block substitution comes before type dispatch. It happens exactly once
    // per reference: a block reached through another block is not expanded.
    if let FieldType::Single(tag) = &field.field_type {
        if let TagTemplate::Block(block) = TagTemplate::resolve(config, tag) {
            if !allow_blocks {
                warn!(%tag, "block-of-block reference is not supported, accepting any value");
                return ValidatorNode::any(true);
            }
            let expanded = substitute_block(field, block);
            return build_field(&expanded, config, registry, false);
        }
    }

    let kind = match &field.field_type {
        FieldType::Mixed(tags) => build_union(tags, config, registry, allow_blocks),
        FieldType::Single(_) if field.is_object() => {
            build_object(&field.fields, config, registry, allow_blocks)
        }
        FieldType::Single(tag) => registry.handler(tag).build_validator(field, config),
    };

    // Wrap in a list validator unless the type already produced one.
    let kind = if field.list.is_enabled() && !matches!(kind, ValidatorKind::List { .. }) {
        ValidatorKind::List {
            item: Box::new(ValidatorNode {
                kind,
                optional: false,
            }),
            min: field.list.min(),
            max: field.list.max(),
        }
    } else {
        kind
    };

    ValidatorNode {
        kind,
        optional: !field.required,
    }
}

fn build_union(
    tags: &[String],
    config: &Config,
    registry: &TypeRegistry,
    allow_blocks: bool,
) -> ValidatorKind {
    let mut variants = BTreeMap::new();
    for tag in tags {
        let node = match TagTemplate::resolve(config, tag) {
            TagTemplate::Block(block) => {
                if allow_blocks {
                    build_field(block, config, registry, false)
                } else {
                    warn!(%tag, "block-of-block reference is not supported, accepting any value");
                    ValidatorNode::any(true)
                }
            }
            TagTemplate::Primitive(tag) => {
                let synthetic = FieldDefinition::primitive(tag);
                ValidatorNode {
                    kind: registry.handler(tag).build_validator(&synthetic, config),
                    optional: false,
                }
            }
        };
        variants.insert(tag.clone(), node);
    }
    ValidatorKind::Union { variants }
}
