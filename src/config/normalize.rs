use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::registry::BuiltinType;
use crate::schema::{
    Config, ContentKind, ContentTypeDefinition, FieldDefinition, FieldType, MediaDefinition,
    SerializationFormat, OBJECT_TAG,
};

/// Filename pattern assigned to collections that declare none.
pub const DEFAULT_FILENAME_PATTERN: &str = "{year}-{month}-{day}-{primary}.md";

/// Extensions treated as source code when a content type has no fields.
const CODE_EXTENSIONS: &[&str] = &[
    "c", "cpp", "css", "go", "h", "htm", "html", "java", "js", "json", "jsx", "py", "rb", "rs",
    "sass", "scss", "sh", "svg", "toml", "ts", "tsx", "xml", "yaml", "yml",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One structural diagnostic from normalization. Issues never abort
/// normalization; callers render them inline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigIssue {
    pub severity: Severity,
    pub message: String,
    /// Byte-offset range into the raw source, when derivable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<(usize, usize)>,
    /// Path into the configuration tree, when the source offset is not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ConfigIssue {
    fn error(message: String, path: Option<String>) -> Self {
        Self {
            severity: Severity::Error,
            message,
            range: None,
            path,
        }
    }

    fn warning(message: String, path: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            range: None,
            path: Some(path),
        }
    }
}

/// Result of normalization: the canonical config plus every diagnostic
/// encountered on the way. Never an `Err`.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub config: Config,
    pub issues: Vec<ConfigIssue>,
}

/// Parse raw YAML configuration source and canonicalize it. Malformed
/// syntax becomes a single positional issue over an empty config; blank
/// source is an empty config with no issues.
#[must_use]
pub fn normalize_source(source: &str) -> Normalized {
    if source.trim().is_empty() {
        return Normalized::default();
    }
    match serde_yaml::from_str::<Value>(source) {
        Ok(raw) => normalize_value(&raw),
        Err(err) => {
            let range = err.location().map(|loc| {
                let start = loc.index();
                (start, (start + 1).min(source.len()))
            });
            Normalized {
                config: Config::default(),
                issues: vec![ConfigIssue {
                    severity: Severity::Error,
                    message: err.to_string(),
                    range,
                    path: None,
                }],
            }
        }
    }
}

/// Canonicalize an already-parsed configuration tree.
///
/// Canonical form: media shorthand expanded, slashes trimmed from stored
/// paths, collections given a default filename pattern, extension and
/// format inferred when absent, duplicate sibling fields dropped (first
/// declaration wins). Pure and idempotent.
#[must_use]
pub fn normalize_value(raw: &Value) -> Normalized {
    let mut issues = Vec::new();
    let mut config = Config::default();

    let Some(map) = raw.as_object() else {
        if !raw.is_null() {
            issues.push(ConfigIssue::error(
                "configuration must be a mapping".to_string(),
                None,
            ));
        }
        return Normalized { config, issues };
    };

    if let Some(entries) = map.get("blocks") {
        config.blocks = collect_entries(entries, "blocks", &mut issues);
    }
    if let Some(entries) = map.get("media") {
        config.media = collect_media(entries, &mut issues);
    }
    if let Some(entries) = map.get("content") {
        config.content = collect_entries(entries, "content", &mut issues);
    }

    for media in &mut config.media {
        media.input = trim_slashes(&media.input);
        media.output = trim_slashes(&media.output);
        if media.output.is_empty() {
            media.output = media.input.clone();
        }
    }

    dedup_fields(&mut config.blocks, "blocks", &mut issues);
    for (index, content) in config.content.iter_mut().enumerate() {
        canonicalize_content(content, &format!("content[{index}]"), &mut issues);
    }

    let blocks = config.blocks.clone();
    for (index, content) in config.content.iter().enumerate() {
        for field in &content.fields {
            check_field_tags(
                field,
                &format!("content[{index}].fields.{}", field.name),
                &blocks,
                &mut issues,
            );
        }
    }

    Normalized { config, issues }
}

/// Deserialize a homogeneous list of configuration entries, skipping
/// entries that do not fit and recording a pathed issue for each.
fn collect_entries<T: serde::de::DeserializeOwned>(
    entries: &Value,
    key: &str,
    issues: &mut Vec<ConfigIssue>,
) -> Vec<T> {
    let Some(list) = entries.as_array() else {
        issues.push(ConfigIssue::error(
            format!("`{key}` must be a list"),
            Some(key.to_string()),
        ));
        return Vec::new();
    };
    let mut out = Vec::with_capacity(list.len());
    for (index, entry) in list.iter().enumerate() {
        match serde_json::from_value::<T>(entry.clone()) {
            Ok(parsed) => out.push(parsed),
            Err(err) => issues.push(ConfigIssue::error(
                err.to_string(),
                Some(format!("{key}[{index}]")),
            )),
        }
    }
    out
}

/// Media accepts a bare path string (shorthand for `{input, output}`), a
/// single definition object, or a list of either.
fn collect_media(entries: &Value, issues: &mut Vec<ConfigIssue>) -> Vec<MediaDefinition> {
    let list: Vec<Value> = match entries {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    };
    let mut out = Vec::with_capacity(list.len());
    for (index, entry) in list.iter().enumerate() {
        let expanded = match entry {
            Value::String(path) => serde_json::json!({ "input": path, "output": path }),
            other => other.clone(),
        };
        match serde_json::from_value::<MediaDefinition>(expanded) {
            Ok(media) => out.push(media),
            Err(err) => issues.push(ConfigIssue::error(
                err.to_string(),
                Some(format!("media[{index}]")),
            )),
        }
    }
    out
}

fn canonicalize_content(
    content: &mut ContentTypeDefinition,
    path: &str,
    issues: &mut Vec<ConfigIssue>,
) {
    content.path = trim_slashes(&content.path);

    if content.kind == ContentKind::Collection && content.filename.is_none() {
        content.filename = Some(DEFAULT_FILENAME_PATTERN.to_string());
    }

    if content.extension.is_none() {
        content.extension = match content.kind {
            ContentKind::Collection => content.filename.as_deref().and_then(extension_of),
            ContentKind::File => extension_of(&content.path),
        };
    }

    if content.format.is_none() {
        content.format = Some(infer_format(content));
    }

    dedup_fields(&mut content.fields, &format!("{path}.fields"), issues);
}

/// Format inference, applied only when the config leaves format unset:
/// fields present pick the dialect matching the extension (whole-file) or
/// fall back to yaml frontmatter; field-less types are passthrough.
fn infer_format(content: &ContentTypeDefinition) -> SerializationFormat {
    let extension = content.extension.as_deref().unwrap_or("");
    if !content.fields.is_empty() {
        return match extension {
            "json" => SerializationFormat::Json,
            "toml" => SerializationFormat::Toml,
            "yaml" | "yml" => SerializationFormat::Yaml,
            _ => SerializationFormat::YamlFrontmatter,
        };
    }
    if extension == "csv" {
        SerializationFormat::Datagrid
    } else if CODE_EXTENSIONS.contains(&extension) {
        SerializationFormat::Code
    } else {
        SerializationFormat::Raw
    }
}

fn trim_slashes(path: &str) -> String {
    path.trim_matches('/').to_string()
}

/// Extension of the last path segment. Filename patterns keep their
/// tokens out of the result; `{primary}.md` infers `md`.
fn extension_of(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next().unwrap_or(path);
    let (stem, extension) = segment.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() || extension.contains(['{', '}']) {
        return None;
    }
    Some(extension.to_string())
}

/// Drop duplicate sibling field names, keeping the first declaration, and
/// recurse into nested fields.
fn dedup_fields(fields: &mut Vec<FieldDefinition>, path: &str, issues: &mut Vec<ConfigIssue>) {
    let mut seen = std::collections::HashSet::new();
    fields.retain(|field| {
        if seen.insert(field.name.clone()) {
            true
        } else {
            warn!(field = %field.name, %path, "duplicate field name, keeping first declaration");
            issues.push(ConfigIssue::warning(
                format!("duplicate field name `{}`", field.name),
                format!("{path}.{}", field.name),
            ));
            false
        }
    });
    for field in fields.iter_mut() {
        dedup_fields(&mut field.fields, &format!("{path}.{}", field.name), issues);
    }
}

/// Warn on type tags that are neither built in nor declared blocks. These
/// still normalize (the registry degrades them to text at use time).
fn check_field_tags(
    field: &FieldDefinition,
    path: &str,
    blocks: &[FieldDefinition],
    issues: &mut Vec<ConfigIssue>,
) {
    let known = |tag: &str| {
        tag == OBJECT_TAG
            || BuiltinType::from_tag(tag).is_some()
            || blocks.iter().any(|b| b.name == tag)
    };
    match &field.field_type {
        FieldType::Single(tag) => {
            if !known(tag) {
                warn!(%tag, %path, "unknown field type");
                issues.push(ConfigIssue::warning(
                    format!("unknown field type `{tag}`"),
                    path.to_string(),
                ));
            }
        }
        FieldType::Mixed(tags) => {
            for tag in tags {
                if !known(tag) {
                    warn!(%tag, %path, "unknown mixed-field tag");
                    issues.push(ConfigIssue::warning(
                        format!("unknown mixed-field tag `{tag}`"),
                        path.to_string(),
                    ));
                }
            }
        }
    }
    for nested in &field.fields {
        check_field_tags(nested, &format!("{path}.{}", nested.name), blocks, issues);
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
