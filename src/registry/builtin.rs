use chrono::NaiveDate;
use pulldown_cmark::{Options, Parser};
use pulldown_cmark_to_cmark::cmark;
use serde_json::Value;
use uuid::Uuid;

use super::FieldTypeHandler;
use crate::schema::{Config, FieldDefinition};
use crate::validate::{compile_pattern, ValidatorKind};

/// Logical (editing-side) date format. Stored values may use a custom
/// `options.format`; the read transform converts to this canonical form.
const LOGICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// The closed set of built-in field types, exhaustiveness-checked at compile
/// time. Custom extensions go through [`super::TypeRegistry`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Boolean,
    Code,
    Date,
    File,
    Image,
    Number,
    RichText,
    Select,
    String,
    Text,
    Uuid,
}

impl BuiltinType {
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "boolean" => Some(Self::Boolean),
            "code" => Some(Self::Code),
            "date" => Some(Self::Date),
            "file" => Some(Self::File),
            "image" => Some(Self::Image),
            "number" => Some(Self::Number),
            "rich-text" => Some(Self::RichText),
            "select" => Some(Self::Select),
            "string" => Some(Self::String),
            "text" => Some(Self::Text),
            "uuid" => Some(Self::Uuid),
            _ => None,
        }
    }

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Code => "code",
            Self::Date => "date",
            Self::File => "file",
            Self::Image => "image",
            Self::Number => "number",
            Self::RichText => "rich-text",
            Self::Select => "select",
            Self::String => "string",
            Self::Text => "text",
            Self::Uuid => "uuid",
        }
    }

    #[must_use]
    pub(crate) fn handler(self) -> &'static dyn FieldTypeHandler {
        match self {
            Self::Boolean => &BooleanHandler,
            Self::Code => &CodeHandler,
            Self::Date => &DateHandler,
            Self::File => &MediaHandler,
            Self::Image => &MediaHandler,
            Self::Number => &NumberHandler,
            Self::RichText => &RichTextHandler,
            Self::Select => &SelectHandler,
            Self::String => &StringHandler,
            Self::Text => &TextHandler,
            Self::Uuid => &UuidHandler,
        }
    }
}

/// Multi-line text. Also the fallback for unknown tags.
pub(crate) struct TextHandler;
impl FieldTypeHandler for TextHandler {}

/// Single-line string.
pub(crate) struct StringHandler;
impl FieldTypeHandler for StringHandler {}

/// Source snippets; text with no extra behavior.
pub(crate) struct CodeHandler;
impl FieldTypeHandler for CodeHandler {}

pub(crate) struct BooleanHandler;
impl FieldTypeHandler for BooleanHandler {
    fn build_validator(&self, _field: &FieldDefinition, _config: &Config) -> ValidatorKind {
        ValidatorKind::Boolean
    }
}

pub(crate) struct NumberHandler;
impl FieldTypeHandler for NumberHandler {
    fn build_validator(&self, field: &FieldDefinition, _config: &Config) -> ValidatorKind {
        ValidatorKind::Number {
            min: field.options.get("min").and_then(Value::as_f64),
            max: field.options.get("max").and_then(Value::as_f64),
        }
    }

    /// Stored numbers sometimes arrive as strings (notably from TOML and
    /// YAML quoting); reparse them into numbers.
    fn read(
        &self,
        raw: Option<&Value>,
        _field: &FieldDefinition,
        _config: &Config,
    ) -> Option<Value> {
        match raw {
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if let Ok(int) = trimmed.parse::<i64>() {
                    return Some(Value::from(int));
                }
                if let Some(float) = trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                {
                    return Some(Value::Number(float));
                }
                raw.cloned()
            }
            _ => raw.cloned(),
        }
    }
}

pub(crate) struct DateHandler;

impl DateHandler {
    fn storage_format(field: &FieldDefinition) -> &str {
        field
            .options
            .get("format")
            .and_then(Value::as_str)
            .unwrap_or(LOGICAL_DATE_FORMAT)
    }
}

impl FieldTypeHandler for DateHandler {
    /// Logical values are always in the canonical `%Y-%m-%d` form; the
    /// read/write pair converts from and to the storage format.
    fn build_validator(&self, _field: &FieldDefinition, _config: &Config) -> ValidatorKind {
        ValidatorKind::Date {
            format: LOGICAL_DATE_FORMAT.to_string(),
        }
    }

    fn read(&self, raw: Option<&Value>, field: &FieldDefinition, _config: &Config) -> Option<Value> {
        match raw {
            Some(Value::String(s)) => match NaiveDate::parse_from_str(s, Self::storage_format(field))
            {
                Ok(date) => Some(Value::String(
                    date.format(LOGICAL_DATE_FORMAT).to_string(),
                )),
                // Unparseable dates pass through unchanged.
                Err(_) => raw.cloned(),
            },
            _ => raw.cloned(),
        }
    }

    fn write(
        &self,
        value: Option<&Value>,
        field: &FieldDefinition,
        _config: &Config,
    ) -> Option<Value> {
        match value {
            Some(Value::String(s)) => match NaiveDate::parse_from_str(s, LOGICAL_DATE_FORMAT) {
                Ok(date) => Some(Value::String(
                    date.format(Self::storage_format(field)).to_string(),
                )),
                Err(_) => value.cloned(),
            },
            _ => value.cloned(),
        }
    }
}

pub(crate) struct SelectHandler;

impl SelectHandler {
    /// `options.values` entries are either bare strings or `{value, label}`.
    fn allowed_values(field: &FieldDefinition) -> Option<Vec<String>> {
        let values = field.options.get("values")?.as_array()?;
        Some(
            values
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(m) => m.get("value").and_then(Value::as_str).map(str::to_string),
                    _ => None,
                })
                .collect(),
        )
    }
}

impl FieldTypeHandler for SelectHandler {
    fn build_validator(&self, field: &FieldDefinition, _config: &Config) -> ValidatorKind {
        ValidatorKind::String {
            pattern: compile_pattern(field),
            allowed: Self::allowed_values(field),
        }
    }
}

/// Shared handler for `image` and `file` fields: rewrites stored paths
/// between the media output prefix (what the published site sees) and the
/// media input prefix (where the file lives in the repository).
pub(crate) struct MediaHandler;

impl MediaHandler {
    fn swap_root(value: &str, from: &str, to: &str) -> Option<String> {
        if from.is_empty() {
            return None;
        }
        let trimmed = value.strip_prefix('/').unwrap_or(value);
        let rest = trimmed.strip_prefix(from)?;
        if rest.is_empty() || rest.starts_with('/') {
            return Some(format!("{to}{rest}"));
        }
        None
    }

    fn rewrite(raw: Option<&Value>, config: &Config, to_input: bool) -> Option<Value> {
        let media = config.media.first()?;
        let (from, to) = if to_input {
            (media.output.as_str(), media.input.as_str())
        } else {
            (media.input.as_str(), media.output.as_str())
        };
        match raw {
            Some(Value::String(s)) => Self::swap_root(s, from, to).map(Value::String),
            _ => None,
        }
    }
}

impl FieldTypeHandler for MediaHandler {
    fn read(&self, raw: Option<&Value>, _field: &FieldDefinition, config: &Config) -> Option<Value> {
        Self::rewrite(raw, config, true).or_else(|| raw.cloned())
    }

    fn write(
        &self,
        value: Option<&Value>,
        _field: &FieldDefinition,
        config: &Config,
    ) -> Option<Value> {
        Self::rewrite(value, config, false).or_else(|| value.cloned())
    }
}

pub(crate) struct RichTextHandler;

impl FieldTypeHandler for RichTextHandler {
    /// Writing normalizes the markdown so stored text stays stable across
    /// edits that do not change the rendered document.
    fn write(
        &self,
        value: Option<&Value>,
        _field: &FieldDefinition,
        _config: &Config,
    ) -> Option<Value> {
        match value {
            Some(Value::String(s)) => Some(Value::String(normalize_markdown(s))),
            _ => value.cloned(),
        }
    }
}

pub(crate) struct UuidHandler;

impl FieldTypeHandler for UuidHandler {
    fn default_value(&self, field: &FieldDefinition) -> Option<Value> {
        field
            .options
            .get("default")
            .cloned()
            .or_else(|| Some(Value::String(Uuid::new_v4().to_string())))
    }
}

/// Reparse-and-print markdown so equivalent inputs serialize identically.
fn normalize_markdown(input: &str) -> String {
    let parser = Parser::new_ext(input, Options::all());
    let mut output = String::new();
    let _ = cmark(parser, &mut output);
    output.trim_end().to_string()
}
