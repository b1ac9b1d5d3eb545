//! Filename generation for new collection entries: single-brace token
//! interpolation over the entry's value tree plus the current local time.
//! Collision avoidance against existing files belongs to the storage
//! writer, not here.

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::schema::ContentTypeDefinition;

/// Static regex for filename tokens (compiled once on first use).
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([a-zA-Z][a-zA-Z0-9_.-]*)\}").expect("TOKEN is a valid regex literal")
});

/// Interpolate `pattern` against the current local time. See [`generate_at`].
#[must_use]
pub fn generate(pattern: &str, content_type: &ContentTypeDefinition, values: &Value) -> String {
    generate_at(pattern, content_type, values, Local::now().naive_local())
}

/// Interpolate `pattern` at an explicit timestamp.
///
/// Date tokens (`{year}`, `{month}`, `{day}`, `{hour}`, `{minute}`,
/// `{second}`) render zero-padded. `{primary}` slugifies the content
/// type's primary field value; `{fields.<dotted-path>}` slugifies the
/// value at that path. Absent or falsy values render empty; unrecognized
/// tokens pass through unchanged.
#[must_use]
pub fn generate_at(
    pattern: &str,
    content_type: &ContentTypeDefinition,
    values: &Value,
    now: NaiveDateTime,
) -> String {
    TOKEN
        .replace_all(pattern, |captures: &regex::Captures<'_>| {
            let token = &captures[1];
            match token {
                "year" => format!("{:04}", now.year()),
                "month" => format!("{:02}", now.month()),
                "day" => format!("{:02}", now.day()),
                "hour" => format!("{:02}", now.hour()),
                "minute" => format!("{:02}", now.minute()),
                "second" => format!("{:02}", now.second()),
                "primary" => content_type
                    .primary_field()
                    .map(|name| slug_at(values, name))
                    .unwrap_or_default(),
                _ => match token.strip_prefix("fields.") {
                    Some(path) => slug_at(values, path),
                    None => captures[0].to_string(),
                },
            }
        })
        .into_owned()
}

/// Slugified string form of the value at a dotted path. Absent and falsy
/// values are empty.
fn slug_at(values: &Value, path: &str) -> String {
    let mut current = values;
    for segment in path.split('.') {
        match current.get(segment) {
            Some(next) => current = next,
            None => return String::new(),
        }
    }
    let text = match current {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Null | Value::Bool(false) => return String::new(),
        Value::Array(_) | Value::Object(_) => return String::new(),
    };
    if text.is_empty() || text == "0" {
        return String::new();
    }
    slug::slugify(text)
}
