use crate::schema::{Config, ContentTypeDefinition, MediaDefinition};

/// Normalize a path to `/seg/.../` form for prefix comparison.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// Resolve the content type responsible for a stored path: among all content
/// types whose path is a prefix of the query, the one with the longest path
/// wins. Ties break deterministically in favor of the later declaration.
///
/// Returns an independent copy; the shared configuration is never aliased.
#[must_use]
pub fn resolve_by_path(config: &Config, path: &str) -> Option<ContentTypeDefinition> {
    let query = normalize_path(path);
    config
        .content
        .iter()
        .filter(|ct| query.starts_with(&normalize_path(&ct.path)))
        .max_by_key(|ct| normalize_path(&ct.path).len())
        .cloned()
}

/// Resolve a content type by exact name. Returns an independent copy.
#[must_use]
pub fn resolve_content_by_name(config: &Config, name: &str) -> Option<ContentTypeDefinition> {
    config.content.iter().find(|ct| ct.name == name).cloned()
}

/// Resolve a media definition by exact name. Returns an independent copy.
#[must_use]
pub fn resolve_media_by_name(config: &Config, name: &str) -> Option<MediaDefinition> {
    config.media.iter().find(|m| m.name == name).cloned()
}
