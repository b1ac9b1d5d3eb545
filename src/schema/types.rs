use serde::{Deserialize, Serialize};

use super::OBJECT_TAG;

/// Canonical configuration produced by the normalizer.
///
/// Instances are immutable after normalization. Callers that hold a shared
/// copy (e.g. behind a cache) must hand out clones, never references into
/// the cached structure; the resolver functions in [`crate::config`] do this.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Declared content types, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<ContentTypeDefinition>,
    /// Media roots for file/image fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaDefinition>,
    /// Named reusable field templates, referenced by tag from mixed fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<FieldDefinition>,
}

impl Config {
    /// Look up a block template by name.
    #[must_use]
    pub fn block(&self, tag: &str) -> Option<&FieldDefinition> {
        self.blocks.iter().find(|b| b.name == tag)
    }
}

/// Whether a content type maps to a folder of entries or a single file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Collection,
    File,
}

/// Serialization format of an entry's on-disk text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SerializationFormat {
    Raw,
    Code,
    Datagrid,
    Yaml,
    Json,
    Toml,
    YamlFrontmatter,
    JsonFrontmatter,
    TomlFrontmatter,
}

/// Wire dialect underlying a [`SerializationFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Yaml,
    Json,
    Toml,
}

impl SerializationFormat {
    /// The wire dialect, when the format carries structured data.
    #[must_use]
    pub fn dialect(self) -> Option<Dialect> {
        match self {
            Self::Yaml | Self::YamlFrontmatter => Some(Dialect::Yaml),
            Self::Json | Self::JsonFrontmatter => Some(Dialect::Json),
            Self::Toml | Self::TomlFrontmatter => Some(Dialect::Toml),
            Self::Raw | Self::Code | Self::Datagrid => None,
        }
    }

    /// Whether the structured data is embedded as a fenced frontmatter block.
    #[must_use]
    pub fn is_frontmatter(self) -> bool {
        matches!(
            self,
            Self::YamlFrontmatter | Self::JsonFrontmatter | Self::TomlFrontmatter
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Code => "code",
            Self::Datagrid => "datagrid",
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
            Self::YamlFrontmatter => "yaml-frontmatter",
            Self::JsonFrontmatter => "json-frontmatter",
            Self::TomlFrontmatter => "toml-frontmatter",
        }
    }
}

impl std::fmt::Display for SerializationFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frontmatter delimiter override: one string used for both ends, or an
/// explicit `[open, close]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DelimiterSpec {
    Same(String),
    Pair(String, String),
}

impl DelimiterSpec {
    /// The `(open, close)` pair.
    #[must_use]
    pub fn resolve(&self) -> (&str, &str) {
        match self {
            Self::Same(s) => (s, s),
            Self::Pair(open, close) => (open, close),
        }
    }
}

/// View options for a content type (presentation hints).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewOptions {
    /// Explicit primary-field override. Takes precedence over a field
    /// literally named `title`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    /// Default sort field names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<String>,
}

/// A declared shape of editable content: a `collection` of many files or a
/// single `file`, with storage path, naming pattern, format, and field tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ContentKind,
    #[serde(default)]
    pub path: String,
    /// Filename pattern for new entries (collections only). The normalizer
    /// assigns a default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// File extension, inferred from `path`/`filename` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Serialization format. `None` before normalization; the normalizer
    /// always infers one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<SerializationFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiters: Option<DelimiterSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub view: ViewOptions,
}

impl ContentTypeDefinition {
    /// The field driving `{primary}` filename tokens and list displays.
    ///
    /// Precedence: explicit `view.primary` override, then a field literally
    /// named `title`, then the first declared field.
    #[must_use]
    pub fn primary_field(&self) -> Option<&str> {
        if let Some(primary) = self.view.primary.as_deref() {
            return Some(primary);
        }
        if self.fields.iter().any(|f| f.name == "title") {
            return Some("title");
        }
        self.fields.first().map(|f| f.name.as_str())
    }
}

fn default_media_name() -> String {
    "media".to_string()
}

/// Media root declaration for file/image fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaDefinition {
    #[serde(default = "default_media_name")]
    pub name: String,
    /// Repository-relative folder where uploads land.
    #[serde(default)]
    pub input: String,
    /// Public path prefix written into content. Defaults to `input`.
    #[serde(default)]
    pub output: String,
    /// Allowed file extensions. Empty means unrestricted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
}

/// Field type: one scalar tag, the structural `object` tag, or a set of
/// alternative tags (a *mixed* field).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldType {
    Single(String),
    Mixed(Vec<String>),
}

impl Default for FieldType {
    fn default() -> Self {
        Self::Single("text".to_string())
    }
}

/// List cardinality: `false` (scalar), `true` (unbounded list), or bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListSpec {
    Flag(bool),
    Bounds {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<u64>,
    },
}

impl Default for ListSpec {
    fn default() -> Self {
        Self::Flag(false)
    }
}

impl ListSpec {
    /// Whether the field holds a list at all.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::Flag(false))
    }

    /// Serde helper: skip serializing the default (disabled) spec.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        !self.is_enabled()
    }

    #[must_use]
    pub fn min(self) -> Option<u64> {
        match self {
            Self::Bounds { min, .. } => min,
            Self::Flag(_) => None,
        }
    }

    #[must_use]
    pub fn max(self) -> Option<u64> {
        match self {
            Self::Bounds { max, .. } => max,
            Self::Flag(_) => None,
        }
    }
}

/// Pattern constraint: a bare regex string or `{regex, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
    Bare(String),
    Detailed {
        regex: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl PatternSpec {
    #[must_use]
    pub fn regex(&self) -> &str {
        match self {
            Self::Bare(regex) | Self::Detailed { regex, .. } => regex,
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Bare(_) => None,
            Self::Detailed { message, .. } => message.as_deref(),
        }
    }
}

/// One named, typed slot in a content type's field tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "ListSpec::is_disabled")]
    pub list: ListSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<PatternSpec>,
    /// Free-form, type-specific options (e.g. `values` for selects,
    /// `format` for dates, `min`/`max` for numbers).
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub options: serde_json::Map<String, serde_json::Value>,
    /// Nested fields, for `object` fields and block templates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDefinition>,
}

impl FieldDefinition {
    /// A bare field of the given scalar type, used for synthesized
    /// per-tag and per-element schemas.
    #[must_use]
    pub fn primitive(tag: &str) -> Self {
        Self {
            name: tag.to_string(),
            label: None,
            field_type: FieldType::Single(tag.to_string()),
            required: true,
            list: ListSpec::default(),
            pattern: None,
            options: serde_json::Map::new(),
            fields: Vec::new(),
        }
    }

    /// Whether this is the structural `object` type.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(&self.field_type, FieldType::Single(tag) if tag == OBJECT_TAG)
    }

    /// The declared tags of a mixed field, when this field is mixed.
    #[must_use]
    pub fn mixed_tags(&self) -> Option<&[String]> {
        match &self.field_type {
            FieldType::Mixed(tags) => Some(tags),
            FieldType::Single(_) => None,
        }
    }

    /// The scalar type tag, when this field is not mixed.
    #[must_use]
    pub fn scalar_tag(&self) -> Option<&str> {
        match &self.field_type {
            FieldType::Single(tag) => Some(tag),
            FieldType::Mixed(_) => None,
        }
    }

    /// A copy of this field with the list spec cleared, used when mapping
    /// over the elements of a list field.
    #[must_use]
    pub fn as_element(&self) -> Self {
        let mut element = self.clone();
        element.list = ListSpec::Flag(false);
        element
    }
}
