use serde_json::{json, Value};

use super::*;
use crate::schema::DelimiterSpec;

fn opts(format: SerializationFormat) -> CodecOptions {
    CodecOptions::new(format)
}

#[test]
fn test_yaml_frontmatter_parse_and_stringify_round_trip() {
    let text = "---\ntitle: Hi\n---\nBody text";
    let options = opts(SerializationFormat::YamlFrontmatter);

    let data = parse(text, &options).expect("Should parse");
    assert_eq!(data, json!({ "title": "Hi", "body": "Body text" }));

    let out = stringify(&data, &options).expect("Should stringify");
    assert_eq!(out, text);
}

#[test]
fn test_json_default_braces_capture_delimiters_byte_identically() {
    let text = "{\n\"a\":1\n}\nBody";
    let options = opts(SerializationFormat::JsonFrontmatter);

    let data = parse(text, &options).expect("Should parse");
    assert_eq!(data, json!({ "a": 1, "body": "Body" }));

    let out = stringify(&data, &options).expect("Should stringify");
    assert_eq!(out, text);
}

#[test]
fn test_toml_frontmatter_with_plus_delimiters() {
    let text = "+++\ntitle = \"Hi\"\n+++\nBody";
    let options = opts(SerializationFormat::TomlFrontmatter);

    let data = parse(text, &options).expect("Should parse");
    assert_eq!(data, json!({ "title": "Hi", "body": "Body" }));

    let out = stringify(&data, &options).expect("Should stringify");
    assert_eq!(out, text);
}

#[test]
fn test_single_string_delimiter_override() {
    let mut options = opts(SerializationFormat::YamlFrontmatter);
    options.delimiters = Some(DelimiterSpec::Same("~~~".to_string()));

    let text = "~~~\ntitle: Hi\n~~~\nBody";
    let data = parse(text, &options).expect("Should parse");
    assert_eq!(data, json!({ "title": "Hi", "body": "Body" }));
    assert_eq!(stringify(&data, &options).expect("Should stringify"), text);
}

#[test]
fn test_delimiter_pair_override() {
    let mut options = opts(SerializationFormat::JsonFrontmatter);
    options.delimiters = Some(DelimiterSpec::Pair("<<<".to_string(), ">>>".to_string()));

    // Overridden JSON delimiters fence a complete JSON document.
    let text = "<<<\n{\n  \"a\": 1\n}\n>>>\nBody";
    let data = parse(text, &options).expect("Should parse");
    assert_eq!(data, json!({ "a": 1, "body": "Body" }));
}

#[test]
fn test_non_matching_text_becomes_body() {
    let options = opts(SerializationFormat::YamlFrontmatter);
    for text in ["no fences here", "--- inline, not a fence", "---\nnever closed"] {
        let data = parse(text, &options).expect("Should parse");
        assert_eq!(data, json!({ "body": text }));
    }
}

#[test]
fn test_scalar_block_is_not_frontmatter() {
    let options = opts(SerializationFormat::YamlFrontmatter);
    let text = "---\njust a string\n---\nBody";
    let data = parse(text, &options).expect("Should parse");
    assert_eq!(data, json!({ "body": text }));
}

#[test]
fn test_empty_body_is_omitted_and_block_round_trips() {
    let options = opts(SerializationFormat::YamlFrontmatter);
    let data = parse("---\na: 1\n---", &options).expect("Should parse");
    assert_eq!(data, json!({ "a": 1 }));

    let out = stringify(&data, &options).expect("Should stringify");
    assert_eq!(out, "---\na: 1\n---\n");
    assert_eq!(parse(&out, &options).expect("Should reparse"), data);
}

#[test]
fn test_empty_remainder_emits_empty_block() {
    let options = opts(SerializationFormat::YamlFrontmatter);
    let out = stringify(&json!({ "body": "Only text" }), &options).expect("Should stringify");
    assert_eq!(out, "---\n---\nOnly text");
    assert_eq!(
        parse(&out, &options).expect("Should reparse"),
        json!({ "body": "Only text" })
    );
}

#[test]
fn test_body_leading_newline_normalization() {
    let options = opts(SerializationFormat::YamlFrontmatter);
    let data = parse("---\na: 1\n---\n\nBody", &options).expect("Should parse");
    assert_eq!(data, json!({ "a": 1, "body": "Body" }));
}

#[test]
fn test_whole_file_formats_round_trip() {
    let object = json!({
        "title": "Hello",
        "count": 3,
        "draft": false,
        "tags": ["a", "b"],
        "meta": { "slug": "hello" }
    });
    for format in [
        SerializationFormat::Yaml,
        SerializationFormat::Json,
        SerializationFormat::Toml,
    ] {
        let options = opts(format);
        let text = stringify(&object, &options).expect("Should stringify");
        let back = parse(&text, &options).expect("Should parse");
        assert_eq!(back, object, "round trip failed for {format}");
    }
}

#[test]
fn test_frontmatter_formats_round_trip() {
    let object = json!({
        "title": "Hello",
        "count": 3,
        "body": "Some\n\nbody text"
    });
    for format in [
        SerializationFormat::YamlFrontmatter,
        SerializationFormat::JsonFrontmatter,
        SerializationFormat::TomlFrontmatter,
    ] {
        let options = opts(format);
        let text = stringify(&object, &options).expect("Should stringify");
        let back = parse(&text, &options).expect("Should parse");
        assert_eq!(back, object, "round trip failed for {format}");
    }
}

#[test]
fn test_stringify_is_deterministic() {
    let object = json!({ "b": 2, "a": 1, "body": "text" });
    let options = opts(SerializationFormat::YamlFrontmatter);
    let first = stringify(&object, &options).expect("Should stringify");
    let second = stringify(&object, &options).expect("Should stringify");
    assert_eq!(first, second);
}

#[test]
fn test_blank_whole_file_parses_to_empty_object() {
    for format in [
        SerializationFormat::Yaml,
        SerializationFormat::Json,
        SerializationFormat::Toml,
    ] {
        let data = parse("", &opts(format)).expect("Should parse");
        assert_eq!(data, json!({}));
        let data = parse("   \n", &opts(format)).expect("Should parse");
        assert_eq!(data, json!({}));
    }
}

#[test]
fn test_malformed_block_is_an_error() {
    let options = opts(SerializationFormat::YamlFrontmatter);
    let result = parse("---\ntitle: [unclosed\n---\nBody", &options);
    assert!(matches!(result, Err(CodecError::Yaml(_))));

    let options = opts(SerializationFormat::TomlFrontmatter);
    let result = parse("+++\ntitle = = broken\n+++\nBody", &options);
    assert!(matches!(result, Err(CodecError::TomlParse(_))));
}

#[test]
fn test_raw_format_is_body_passthrough() {
    let options = opts(SerializationFormat::Raw);
    let data = parse("anything at all", &options).expect("Should parse");
    assert_eq!(data, json!({ "body": "anything at all" }));
    assert_eq!(
        stringify(&data, &options).expect("Should stringify"),
        "anything at all"
    );
}

#[test]
fn test_multi_entry_json_block_style() {
    let options = opts(SerializationFormat::JsonFrontmatter);
    let out = stringify(&json!({ "a": 1, "b": [1, 2], "body": "B" }), &options)
        .expect("Should stringify");
    assert_eq!(out, "{\n\"a\":1,\n\"b\":[1,2]\n}\nB");
    assert_eq!(
        parse(&out, &options).expect("Should reparse"),
        json!({ "a": 1, "b": [1, 2], "body": "B" })
    );
}

#[test]
fn test_nested_values_stay_inline_in_default_json_blocks() {
    let options = opts(SerializationFormat::JsonFrontmatter);
    let object = json!({ "meta": { "a": 1, "b": 2 }, "body": "B" });
    let out = stringify(&object, &options).expect("Should stringify");
    // Nested objects serialize compactly, so no bare `}` line can cut the
    // block short when reparsing.
    assert_eq!(out, "{\n\"meta\":{\"a\":1,\"b\":2}\n}\nB");
    assert_eq!(parse(&out, &options).expect("Should reparse"), object);
}

#[test]
fn test_body_value_that_is_not_a_string_is_dropped_on_stringify() {
    let options = opts(SerializationFormat::Raw);
    assert_eq!(
        stringify(&json!({ "body": 42 }), &options).expect("Should stringify"),
        ""
    );
}
