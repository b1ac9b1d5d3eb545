mod normalize;
mod resolve;

pub use normalize::{
    normalize_source, normalize_value, ConfigIssue, Normalized, Severity,
    DEFAULT_FILENAME_PATTERN,
};
pub use resolve::{resolve_by_path, resolve_content_by_name, resolve_media_by_name};
