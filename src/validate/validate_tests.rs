use serde_json::{json, Value};

use super::*;
use crate::registry::TypeRegistry;
use crate::schema::{Config, FieldDefinition};

fn fields(raw: Value) -> Vec<FieldDefinition> {
    serde_json::from_value(raw).expect("Should deserialize fields")
}

fn config_with_blocks(raw: Value) -> Config {
    Config {
        blocks: fields(raw),
        ..Config::default()
    }
}

fn compile(field_tree: Value, config: &Config) -> ValidatorNode {
    build_validator(&fields(field_tree), config, &TypeRegistry::new())
}

#[test]
fn test_mixed_field_tagging() {
    let config = config_with_blocks(json!([
        { "name": "quote", "type": "object",
          "fields": [{ "name": "text", "type": "string", "required": true }] }
    ]));
    let validator = compile(
        json!([{ "name": "part", "type": ["quote", "image"], "required": true }]),
        &config,
    );

    let ok = json!({ "part": { "tag": "quote", "value": { "text": "x" } } });
    assert!(validator.validate(&ok).is_empty());

    let retagged = json!({ "part": { "tag": "image", "value": { "text": "x" } } });
    let issues = validator.validate(&retagged);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, "part.value");
    assert_eq!(issues[0].message, "must be a string");
}

#[test]
fn test_union_rejects_undeclared_and_missing_tags() {
    let validator = compile(
        json!([{ "name": "part", "type": ["string", "number"], "required": true }]),
        &Config::default(),
    );

    let issues = validator.validate(&json!({ "part": { "tag": "boolean", "value": true } }));
    assert_eq!(issues[0].message, "has unknown tag `boolean`");

    let issues = validator.validate(&json!({ "part": { "value": 1 } }));
    assert_eq!(issues[0].message, "is missing its tag");

    let issues = validator.validate(&json!({ "part": "not tagged" }));
    assert_eq!(issues[0].message, "must be a tagged value");
}

#[test]
fn test_all_sibling_failures_are_collected() {
    let validator = compile(
        json!([
            { "name": "title", "type": "string", "required": true },
            { "name": "count", "type": "number", "required": true },
            { "name": "draft", "type": "boolean", "required": true }
        ]),
        &Config::default(),
    );

    let issues = validator.validate(&json!({ "count": "three" }));
    let paths: Vec<_> = issues.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(paths, vec!["title", "count", "draft"]);
    assert_eq!(issues[1].message, "must be a number");
}

#[test]
fn test_optional_fields_pass_when_absent_or_null() {
    let validator = compile(
        json!([{ "name": "subtitle", "type": "string" }]),
        &Config::default(),
    );
    assert!(validator.validate(&json!({})).is_empty());
    assert!(validator.validate(&json!({ "subtitle": null })).is_empty());

    let issues = validator.validate(&json!({ "subtitle": 7 }));
    assert_eq!(issues[0].message, "must be a string");
}

#[test]
fn test_list_bounds_and_element_paths() {
    let validator = compile(
        json!([{ "name": "tags", "type": "string", "required": true,
                 "list": { "min": 2, "max": 3 } }]),
        &Config::default(),
    );

    let issues = validator.validate(&json!({ "tags": ["a"] }));
    assert_eq!(issues[0].message, "must have at least 2 entries");

    let issues = validator.validate(&json!({ "tags": ["a", "b", "c", "d"] }));
    assert_eq!(issues[0].message, "must have at most 3 entries");

    let issues = validator.validate(&json!({ "tags": ["a", 2] }));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, "tags[1]");
}

#[test]
fn test_nested_object_paths_are_dotted_and_bracketed() {
    let validator = compile(
        json!([{ "name": "sections", "type": "object", "required": true, "list": true,
                 "fields": [{ "name": "heading", "type": "string", "required": true }] }]),
        &Config::default(),
    );

    let issues = validator.validate(&json!({ "sections": [{ "heading": "ok" }, {}] }));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, "sections[1].heading");
    assert_eq!(issues[0].message, "is required");
}

#[test]
fn test_pattern_constraint_uses_custom_message() {
    let validator = compile(
        json!([{ "name": "slug", "type": "string", "required": true,
                 "pattern": { "regex": "^[a-z-]+$", "message": "lowercase words only" } }]),
        &Config::default(),
    );
    assert!(validator.validate(&json!({ "slug": "hello-there" })).is_empty());

    let issues = validator.validate(&json!({ "slug": "Hello" }));
    assert_eq!(issues[0].message, "lowercase words only");
}

#[test]
fn test_invalid_pattern_degrades_to_no_constraint() {
    let validator = compile(
        json!([{ "name": "slug", "type": "string", "required": true,
                 "pattern": "([unclosed" }]),
        &Config::default(),
    );
    assert!(validator.validate(&json!({ "slug": "anything goes" })).is_empty());
}

#[test]
fn test_block_substitution_honors_reference_site_overrides() {
    let config = config_with_blocks(json!([
        { "name": "gallery", "type": "object",
          "fields": [{ "name": "caption", "type": "string", "required": true }] }
    ]));
    // The reference supplies required and list; the block supplies the shape.
    let validator = compile(
        json!([{ "name": "galleries", "type": "gallery", "required": true, "list": true }]),
        &config,
    );

    let issues = validator.validate(&json!({}));
    assert_eq!(issues[0].path, "galleries");
    assert_eq!(issues[0].message, "is required");

    let issues = validator.validate(&json!({ "galleries": [{ "caption": "x" }, {}] }));
    assert_eq!(issues[0].path, "galleries[1].caption");
}

#[test]
fn test_block_of_block_accepts_anything() {
    let config = config_with_blocks(json!([
        { "name": "outer", "type": "inner" },
        { "name": "inner", "type": "object",
          "fields": [{ "name": "x", "type": "string", "required": true }] }
    ]));
    let validator = compile(
        json!([{ "name": "part", "type": "outer", "required": true }]),
        &config,
    );

    // The nested reference is left unresolved; any value passes.
    assert!(validator.validate(&json!({ "part": { "not": "checked" } })).is_empty());
    assert!(validator.validate(&json!({})).is_empty());
}

#[test]
fn test_unknown_type_falls_back_to_permissive_string() {
    let validator = compile(
        json!([{ "name": "widget", "type": "gizmo", "required": true }]),
        &Config::default(),
    );
    assert!(validator.validate(&json!({ "widget": "fine" })).is_empty());

    let issues = validator.validate(&json!({ "widget": 42 }));
    assert_eq!(issues[0].message, "must be a string");
}

#[test]
fn test_select_membership_and_number_bounds() {
    let validator = compile(
        json!([
            { "name": "status", "type": "select", "required": true,
              "options": { "values": ["draft", "published"] } },
            { "name": "rating", "type": "number", "required": true,
              "options": { "min": 1, "max": 5 } }
        ]),
        &Config::default(),
    );
    assert!(validator
        .validate(&json!({ "status": "draft", "rating": 3 }))
        .is_empty());

    let issues = validator.validate(&json!({ "status": "archived", "rating": 9 }));
    assert_eq!(issues[0].message, "must be one of: draft, published");
    assert_eq!(issues[1].message, "must be at most 5");
}

#[test]
fn test_compilation_never_fails_on_weird_trees() {
    let config = config_with_blocks(json!([
        { "name": "loop", "type": "loop" }
    ]));
    // A block whose type is itself. Compilation still terminates.
    let validator = compile(
        json!([{ "name": "part", "type": ["loop"], "list": true }]),
        &config,
    );
    assert!(validator.validate(&json!({ "part": [] })).is_empty());
}
