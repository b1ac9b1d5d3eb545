use serde_json::{Map, Value};

use super::{body_value, value, CodecError, BODY_KEY};
use crate::schema::{DelimiterSpec, Dialect};

/// Dialect-specific default delimiter pairs.
#[must_use]
pub(crate) fn default_delimiters(dialect: Dialect) -> (&'static str, &'static str) {
    match dialect {
        Dialect::Yaml => ("---", "---"),
        Dialect::Toml => ("+++", "+++"),
        Dialect::Json => ("{", "}"),
    }
}

fn resolve_delimiters<'a>(
    dialect: Dialect,
    spec: Option<&'a DelimiterSpec>,
) -> (&'a str, &'a str) {
    match spec {
        Some(spec) => spec.resolve(),
        None => default_delimiters(dialect),
    }
}

/// Whether the block must be captured including its delimiter lines.
///
/// JSON frontmatter under the default brace delimiters keeps the braces,
/// since they double as JSON syntax. This is load-bearing for round-trip
/// fidelity and must not be "fixed".
fn braces_are_syntax(dialect: Dialect, open: &str, close: &str) -> bool {
    dialect == Dialect::Json && open == "{" && close == "}"
}

/// Parse fenced-frontmatter text. Text not matching
/// `start-delimiter, block, end-delimiter, optional body` is returned
/// unparsed as `{body: <original text>}`.
pub(crate) fn parse(
    text: &str,
    dialect: Dialect,
    delimiters: Option<&DelimiterSpec>,
) -> Result<Value, CodecError> {
    let (open, close) = resolve_delimiters(dialect, delimiters);
    let include_delims = braces_are_syntax(dialect, open, close);
    let Some((block, body)) = split(text, open, close, include_delims) else {
        return Ok(body_value(text));
    };

    let data = if block.trim().is_empty() {
        Value::Object(Map::new())
    } else {
        match dialect {
            Dialect::Yaml => serde_yaml::from_str(&block)?,
            Dialect::Json => serde_json::from_str(&block)?,
            Dialect::Toml => {
                let table: toml::Table = toml::from_str(&block)?;
                value::toml_to_json(toml::Value::Table(table))
            }
        }
    };

    // A block that is valid wire syntax but not a key/value table does not
    // fit the frontmatter shape; treat the whole text as body.
    let Value::Object(mut map) = data else {
        return Ok(body_value(text));
    };
    if !body.is_empty() {
        map.insert(BODY_KEY.to_string(), Value::String(body));
    }
    Ok(Value::Object(map))
}

/// Serialize a value tree as fenced frontmatter: the `body` key is dropped,
/// the remainder serialized as the block (an empty block when nothing
/// remains), and the body reattached unchanged after the block.
pub(crate) fn stringify(
    data: &Value,
    dialect: Dialect,
    delimiters: Option<&DelimiterSpec>,
) -> Result<String, CodecError> {
    let empty = Map::new();
    let object = data.as_object().unwrap_or(&empty);
    let body = object.get(BODY_KEY).and_then(Value::as_str).unwrap_or("");
    let mut rest = object.clone();
    rest.remove(BODY_KEY);

    let (open, close) = resolve_delimiters(dialect, delimiters);
    let mut out = String::new();

    if braces_are_syntax(dialect, open, close) {
        // The serialized block supplies the braces itself.
        out.push_str(&json_block(&rest)?);
        out.push('\n');
    } else {
        out.push_str(open);
        out.push('\n');
        if !rest.is_empty() {
            out.push_str(&serialize_block(&rest, dialect)?);
        }
        out.push_str(close);
        out.push('\n');
    }

    out.push_str(body);
    Ok(out)
}

fn serialize_block(map: &Map<String, Value>, dialect: Dialect) -> Result<String, CodecError> {
    match dialect {
        Dialect::Yaml => Ok(serde_yaml::to_string(&Value::Object(map.clone()))?),
        Dialect::Json => {
            let mut block = serde_json::to_string_pretty(&Value::Object(map.clone()))?;
            block.push('\n');
            Ok(block)
        }
        Dialect::Toml => Ok(toml::to_string(&value::json_map_to_toml_table(map))?),
    }
}

/// JSON block in the default-brace style: braces on their own lines, one
/// top-level entry per line, compact separators. Parsing this style back
/// reproduces the input byte for byte.
fn json_block(map: &Map<String, Value>) -> Result<String, CodecError> {
    let mut out = String::from("{");
    let last = map.len().saturating_sub(1);
    for (index, (key, entry)) in map.iter().enumerate() {
        out.push('\n');
        out.push_str(&serde_json::to_string(key)?);
        out.push(':');
        out.push_str(&serde_json::to_string(entry)?);
        if index != last {
            out.push(',');
        }
    }
    out.push_str("\n}");
    Ok(out)
}

/// Split `text` into `(block, body)` on delimiter lines. The body is the
/// remainder after the closing delimiter line, minus exactly one leading
/// newline.
fn split(text: &str, open: &str, close: &str, include_delims: bool) -> Option<(String, String)> {
    let after_open = text.strip_prefix(open)?.strip_prefix('\n')?;
    let (block_end, rest_start) = find_close(after_open, close)?;
    let inner = &after_open[..block_end];
    let rest = &after_open[rest_start..];
    let body = rest.strip_prefix('\n').unwrap_or(rest);
    let block = if include_delims {
        format!("{open}\n{inner}\n{close}")
    } else {
        inner.to_string()
    };
    Some((block, body.to_string()))
}

/// Locate the closing delimiter line. Returns `(block_end, rest_start)`
/// offsets into the text after the opening delimiter line.
fn find_close(after_open: &str, close: &str) -> Option<(usize, usize)> {
    let first_line = format!("{close}\n");
    if let Some(_rest) = after_open.strip_prefix(&first_line) {
        return Some((0, first_line.len()));
    }
    if after_open == close {
        return Some((0, close.len()));
    }
    let middle = format!("\n{close}\n");
    if let Some(at) = after_open.find(&middle) {
        return Some((at, at + middle.len()));
    }
    let terminal = format!("\n{close}");
    if after_open.ends_with(&terminal) {
        return Some((after_open.len() - terminal.len(), after_open.len()));
    }
    None
}
