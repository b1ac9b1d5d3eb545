use serde_json::{Map, Value};

use crate::registry::TypeRegistry;
use crate::schema::{Config, FieldDefinition, FieldType};

/// Walk a field tree and a value tree in lock-step, producing a new tree by
/// calling `apply` at every leaf.
///
/// Total coverage guarantee: the output carries exactly the declared field
/// names at every level, regardless of how complete (or malformed) the input
/// tree is. A null or non-object root is treated as `{}`.
pub fn deep_map<F>(value: &Value, fields: &[FieldDefinition], apply: &F) -> Value
where
    F: Fn(Option<&Value>, &FieldDefinition) -> Value,
{
    let empty = Map::new();
    let object = value.as_object().unwrap_or(&empty);
    let mut out = Map::new();
    for field in fields {
        out.insert(field.name.clone(), map_field(object.get(&field.name), field, apply));
    }
    Value::Object(out)
}

fn map_field<F>(value: Option<&Value>, field: &FieldDefinition, apply: &F) -> Value
where
    F: Fn(Option<&Value>, &FieldDefinition) -> Value,
{
    match &field.field_type {
        FieldType::Mixed(tags) => {
            if field.list.is_enabled() {
                let elements = value.and_then(Value::as_array).map_or(&[][..], Vec::as_slice);
                Value::Array(
                    elements
                        .iter()
                        .map(|element| map_mixed_element(element, tags, field, apply))
                        .collect(),
                )
            } else {
                map_mixed(value, tags, field, apply)
            }
        }
        FieldType::Single(_) if field.is_object() => {
            if field.list.is_enabled() {
                let elements = value.and_then(Value::as_array).map_or(&[][..], Vec::as_slice);
                Value::Array(
                    elements
                        .iter()
                        .map(|element| deep_map(element, &field.fields, apply))
                        .collect(),
                )
            } else {
                // Recurse against the sub-object, or {} when absent.
                deep_map(value.unwrap_or(&Value::Null), &field.fields, apply)
            }
        }
        FieldType::Single(_) => {
            if field.list.is_enabled() {
                let element_field = field.as_element();
                let elements = value.and_then(Value::as_array).map_or(&[][..], Vec::as_slice);
                Value::Array(
                    elements
                        .iter()
                        .map(|element| apply(Some(element), &element_field))
                        .collect(),
                )
            } else {
                apply(value, field)
            }
        }
    }
}

fn map_mixed<F>(value: Option<&Value>, tags: &[String], field: &FieldDefinition, apply: &F) -> Value
where
    F: Fn(Option<&Value>, &FieldDefinition) -> Value,
{
    if let Some(Value::Object(entry)) = value {
        if let Some(Value::String(tag)) = entry.get("tag") {
            if tags.iter().any(|t| t == tag) {
                return rewrap(tag, apply(entry.get("value"), field));
            }
        }
    }
    // No usable tag: produce a placeholder via apply.
    apply(None, field)
}

fn map_mixed_element<F>(
    element: &Value,
    tags: &[String],
    field: &FieldDefinition,
    apply: &F,
) -> Value
where
    F: Fn(Option<&Value>, &FieldDefinition) -> Value,
{
    if let Value::Object(entry) = element {
        if let Some(Value::String(tag)) = entry.get("tag") {
            if tags.iter().any(|t| t == tag) {
                return rewrap(tag, apply(entry.get("value"), field));
            }
        }
    }
    // Malformed list elements pass through unchanged.
    element.clone()
}

fn rewrap(tag: &str, value: Value) -> Value {
    let mut out = Map::new();
    out.insert("tag".to_string(), Value::String(tag.to_string()));
    out.insert("value".to_string(), value);
    Value::Object(out)
}

/// The read path: transform stored values into their logical editing form
/// via each type's registered reader.
#[must_use]
pub fn read_values(
    raw: &Value,
    fields: &[FieldDefinition],
    config: &Config,
    registry: &TypeRegistry,
) -> Value {
    deep_map(raw, fields, &|value, field| {
        apply_handler(value, field, config, registry, true)
    })
}

/// The write path: transform logical values back into their stored form via
/// each type's registered writer.
#[must_use]
pub fn write_values(
    values: &Value,
    fields: &[FieldDefinition],
    config: &Config,
    registry: &TypeRegistry,
) -> Value {
    deep_map(values, fields, &|value, field| {
        apply_handler(value, field, config, registry, false)
    })
}

/// The initial value tree for a new entry, from each type's default
/// provider. Every declared field is present.
#[must_use]
pub fn default_values(
    fields: &[FieldDefinition],
    config: &Config,
    registry: &TypeRegistry,
) -> Value {
    deep_map(&Value::Null, fields, &|_, field| match &field.field_type {
        FieldType::Mixed(_) => Value::Null,
        FieldType::Single(tag) if config.block(tag).is_some() => Value::Null,
        FieldType::Single(tag) => registry
            .handler(tag)
            .default_value(field)
            .unwrap_or(Value::Null),
    })
}

fn apply_handler(
    value: Option<&Value>,
    field: &FieldDefinition,
    config: &Config,
    registry: &TypeRegistry,
    reading: bool,
) -> Value {
    match &field.field_type {
        // Mixed inner values and block references carry no single scalar
        // type, so they pass through untransformed.
        FieldType::Mixed(_) => value.cloned().unwrap_or(Value::Null),
        FieldType::Single(tag) => {
            if config.block(tag).is_some() {
                return value.cloned().unwrap_or(Value::Null);
            }
            let handler = registry.handler(tag);
            let transformed = if reading {
                handler.read(value, field, config)
            } else {
                handler.write(value, field, config)
            };
            transformed.unwrap_or(Value::Null)
        }
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
