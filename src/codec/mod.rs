mod frontmatter;
mod value;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::schema::{DelimiterSpec, Dialect, SerializationFormat};

/// Reserved key carrying the free-text remainder of a frontmatter file (and
/// the whole text of `raw`/`code`/`datagrid` files).
pub const BODY_KEY: &str = "body";

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Parsing/serialization options for one content type.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecOptions {
    pub format: SerializationFormat,
    /// Frontmatter delimiter override; `None` means the dialect default.
    pub delimiters: Option<DelimiterSpec>,
}

impl CodecOptions {
    #[must_use]
    pub fn new(format: SerializationFormat) -> Self {
        Self {
            format,
            delimiters: None,
        }
    }
}

/// Deserialize stored file text into a value tree.
///
/// A [`CodecError`] is fatal to this one file only; callers iterating many
/// files must catch per file and continue.
pub fn parse(text: &str, opts: &CodecOptions) -> Result<Value, CodecError> {
    match opts.format {
        SerializationFormat::Raw | SerializationFormat::Code | SerializationFormat::Datagrid => {
            Ok(body_value(text))
        }
        SerializationFormat::Yaml | SerializationFormat::Json | SerializationFormat::Toml => {
            // Whole-file structured data; the dialect is always present here.
            match opts.format.dialect() {
                Some(dialect) => parse_whole(text, dialect),
                None => Ok(body_value(text)),
            }
        }
        SerializationFormat::YamlFrontmatter
        | SerializationFormat::JsonFrontmatter
        | SerializationFormat::TomlFrontmatter => match opts.format.dialect() {
            Some(dialect) => frontmatter::parse(text, dialect, opts.delimiters.as_ref()),
            None => Ok(body_value(text)),
        },
    }
}

/// Serialize a value tree back into file text.
///
/// This is the left inverse of [`parse`] for parser-produced inputs, and is
/// byte-deterministic: identical `(format, delimiters, value)` inputs always
/// produce identical text.
pub fn stringify(data: &Value, opts: &CodecOptions) -> Result<String, CodecError> {
    match opts.format {
        SerializationFormat::Raw | SerializationFormat::Code | SerializationFormat::Datagrid => {
            Ok(body_text(data))
        }
        SerializationFormat::Yaml | SerializationFormat::Json | SerializationFormat::Toml => {
            match opts.format.dialect() {
                Some(dialect) => stringify_whole(data, dialect),
                None => Ok(body_text(data)),
            }
        }
        SerializationFormat::YamlFrontmatter
        | SerializationFormat::JsonFrontmatter
        | SerializationFormat::TomlFrontmatter => match opts.format.dialect() {
            Some(dialect) => frontmatter::stringify(data, dialect, opts.delimiters.as_ref()),
            None => Ok(body_text(data)),
        },
    }
}

pub(crate) fn body_value(text: &str) -> Value {
    let mut map = Map::new();
    map.insert(BODY_KEY.to_string(), Value::String(text.to_string()));
    Value::Object(map)
}

fn body_text(data: &Value) -> String {
    data.get(BODY_KEY)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn parse_whole(text: &str, dialect: Dialect) -> Result<Value, CodecError> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    match dialect {
        Dialect::Yaml => Ok(serde_yaml::from_str(text)?),
        Dialect::Json => Ok(serde_json::from_str(text)?),
        Dialect::Toml => {
            let table: toml::Table = toml::from_str(text)?;
            Ok(value::toml_to_json(toml::Value::Table(table)))
        }
    }
}

fn stringify_whole(data: &Value, dialect: Dialect) -> Result<String, CodecError> {
    match dialect {
        Dialect::Yaml => Ok(serde_yaml::to_string(data)?),
        Dialect::Json => {
            let mut text = serde_json::to_string_pretty(data)?;
            text.push('\n');
            Ok(text)
        }
        Dialect::Toml => {
            let table = match data {
                Value::Object(map) => value::json_map_to_toml_table(map),
                _ => toml::Table::new(),
            };
            Ok(toml::to_string(&table)?)
        }
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
