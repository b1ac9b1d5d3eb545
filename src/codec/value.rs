use serde_json::Value;

/// Convert a parsed TOML value into the crate's common value representation.
/// Datetimes become their canonical string form.
pub(crate) fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, entry)| (key, toml_to_json(entry)))
                .collect(),
        ),
    }
}

/// Convert a JSON value into TOML. Nulls have no TOML representation and
/// are omitted from tables and arrays.
pub(crate) fn json_to_toml(value: &Value) -> Option<toml::Value> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(toml::Value::Boolean(*b)),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => toml::Value::Integer(i),
            None => toml::Value::Float(n.as_f64().unwrap_or_default()),
        }),
        Value::String(s) => Some(toml::Value::String(s.clone())),
        Value::Array(items) => Some(toml::Value::Array(
            items.iter().filter_map(json_to_toml).collect(),
        )),
        Value::Object(map) => Some(toml::Value::Table(json_map_to_toml_table(map))),
    }
}

pub(crate) fn json_map_to_toml_table(map: &serde_json::Map<String, Value>) -> toml::Table {
    map.iter()
        .filter_map(|(key, entry)| json_to_toml(entry).map(|v| (key.clone(), v)))
        .collect()
}
