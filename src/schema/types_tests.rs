use super::*;
use serde_json::json;

#[test]
fn test_field_type_defaults_to_text() {
    let field: FieldDefinition = serde_json::from_value(json!({ "name": "summary" }))
        .expect("Should deserialize");
    assert_eq!(field.field_type, FieldType::Single("text".to_string()));
    assert!(!field.required);
    assert!(field.list.is_disabled());
}

#[test]
fn test_field_type_untagged_forms() {
    let scalar: FieldDefinition =
        serde_json::from_value(json!({ "name": "date", "type": "date" }))
            .expect("Should deserialize");
    assert_eq!(scalar.scalar_tag(), Some("date"));

    let mixed: FieldDefinition =
        serde_json::from_value(json!({ "name": "body", "type": ["quote", "image"] }))
            .expect("Should deserialize");
    assert_eq!(
        mixed.mixed_tags(),
        Some(&["quote".to_string(), "image".to_string()][..])
    );
}

#[test]
fn test_list_spec_forms() {
    let flag: FieldDefinition =
        serde_json::from_value(json!({ "name": "tags", "list": true }))
            .expect("Should deserialize");
    assert!(flag.list.is_enabled());
    assert_eq!(flag.list.min(), None);

    let bounds: FieldDefinition =
        serde_json::from_value(json!({ "name": "tags", "list": { "min": 1, "max": 5 } }))
            .expect("Should deserialize");
    assert!(bounds.list.is_enabled());
    assert_eq!(bounds.list.min(), Some(1));
    assert_eq!(bounds.list.max(), Some(5));
}

#[test]
fn test_pattern_spec_forms() {
    let bare: FieldDefinition =
        serde_json::from_value(json!({ "name": "slug", "pattern": "^[a-z-]+$" }))
            .expect("Should deserialize");
    let pattern = bare.pattern.expect("Pattern should be present");
    assert_eq!(pattern.regex(), "^[a-z-]+$");
    assert!(pattern.message().is_none());

    let detailed: FieldDefinition = serde_json::from_value(json!({
        "name": "slug",
        "pattern": { "regex": "^[a-z-]+$", "message": "lowercase only" }
    }))
    .expect("Should deserialize");
    let pattern = detailed.pattern.expect("Pattern should be present");
    assert_eq!(pattern.message(), Some("lowercase only"));
}

#[test]
fn test_content_kind_and_format_wire_names() {
    let ct: ContentTypeDefinition = serde_json::from_value(json!({
        "name": "posts",
        "type": "collection",
        "path": "content/posts",
        "format": "yaml-frontmatter"
    }))
    .expect("Should deserialize");
    assert_eq!(ct.kind, ContentKind::Collection);
    assert_eq!(ct.format, Some(SerializationFormat::YamlFrontmatter));
    assert_eq!(SerializationFormat::TomlFrontmatter.as_str(), "toml-frontmatter");
}

#[test]
fn test_delimiter_spec_forms() {
    let same: DelimiterSpec = serde_json::from_value(json!("~~~")).expect("Should deserialize");
    assert_eq!(same.resolve(), ("~~~", "~~~"));

    let pair: DelimiterSpec =
        serde_json::from_value(json!(["<<<", ">>>"])).expect("Should deserialize");
    assert_eq!(pair.resolve(), ("<<<", ">>>"));
}

#[test]
fn test_primary_field_override_wins_over_title() {
    let ct: ContentTypeDefinition = serde_json::from_value(json!({
        "name": "posts",
        "path": "posts",
        "fields": [{ "name": "title" }, { "name": "headline" }],
        "view": { "primary": "headline" }
    }))
    .expect("Should deserialize");
    assert_eq!(ct.primary_field(), Some("headline"));
}

#[test]
fn test_primary_field_title_then_first() {
    let mut ct: ContentTypeDefinition = serde_json::from_value(json!({
        "name": "posts",
        "path": "posts",
        "fields": [{ "name": "date" }, { "name": "title" }]
    }))
    .expect("Should deserialize");
    assert_eq!(ct.primary_field(), Some("title"));

    ct.fields.retain(|f| f.name != "title");
    assert_eq!(ct.primary_field(), Some("date"));

    ct.fields.clear();
    assert_eq!(ct.primary_field(), None);
}

#[test]
fn test_serialization_uses_camel_case_and_skips_defaults() {
    let field: FieldDefinition =
        serde_json::from_value(json!({ "name": "title", "type": "string" }))
            .expect("Should deserialize");
    let json = serde_json::to_string(&field).expect("Should serialize");
    assert!(json.contains("\"type\":\"string\""));
    assert!(!json.contains("list"));
    assert!(!json.contains("pattern"));
    assert!(!json.contains("fields"));
}

#[test]
fn test_dialect_classification() {
    assert_eq!(
        SerializationFormat::JsonFrontmatter.dialect(),
        Some(Dialect::Json)
    );
    assert!(SerializationFormat::JsonFrontmatter.is_frontmatter());
    assert!(!SerializationFormat::Yaml.is_frontmatter());
    assert_eq!(SerializationFormat::Raw.dialect(), None);
}
