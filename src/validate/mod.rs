mod builder;

pub use builder::build_validator;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::schema::FieldDefinition;

/// One validation failure: a dotted/bracketed field path plus a message.
///
/// Failures are always collected per tree, never short-circuited, so the
/// presentation collaborator can render every sibling error inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// A compiled pattern constraint with an optional custom failure message.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub regex: Regex,
    pub message: Option<String>,
}

/// Compile a field's pattern constraint. An invalid regex degrades to no
/// constraint (with a diagnostic) rather than failing compilation.
#[must_use]
pub fn compile_pattern(field: &FieldDefinition) -> Option<CompiledPattern> {
    let spec = field.pattern.as_ref()?;
    match Regex::new(spec.regex()) {
        Ok(regex) => Some(CompiledPattern {
            regex,
            message: spec.message().map(str::to_string),
        }),
        Err(err) => {
            warn!(field = %field.name, %err, "invalid pattern regex, constraint skipped");
            None
        }
    }
}

/// A compiled validator mirroring a field tree's structure.
#[derive(Debug, Clone)]
pub struct ValidatorNode {
    pub kind: ValidatorKind,
    /// Optional/nullable values pass without further checks.
    pub optional: bool,
}

/// Per-field validator for one entry of an object validator.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    pub name: String,
    pub node: ValidatorNode,
}

#[derive(Debug, Clone)]
pub enum ValidatorKind {
    /// Accepts anything; the degraded form of unbuildable validators.
    Any,
    Boolean,
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    String {
        pattern: Option<CompiledPattern>,
        allowed: Option<Vec<String>>,
    },
    /// A date string in the given chrono format.
    Date {
        format: String,
    },
    Object {
        fields: Vec<FieldValidator>,
    },
    List {
        item: Box<ValidatorNode>,
        min: Option<u64>,
        max: Option<u64>,
    },
    /// Discriminated union over `{tag, value}` pairs, keyed by `tag`.
    Union {
        variants: BTreeMap<String, ValidatorNode>,
    },
}

impl ValidatorNode {
    /// An accept-anything node.
    #[must_use]
    pub fn any(optional: bool) -> Self {
        Self {
            kind: ValidatorKind::Any,
            optional,
        }
    }

    /// Validate a value tree, collecting every failure.
    #[must_use]
    pub fn validate(&self, value: &Value) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        self.check(Some(value), "", &mut issues);
        issues
    }

    fn check(&self, value: Option<&Value>, path: &str, issues: &mut Vec<ValidationIssue>) {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            if !self.optional {
                issues.push(ValidationIssue::new(path, "is required"));
            }
            return;
        };

        match &self.kind {
            ValidatorKind::Any => {}
            ValidatorKind::Boolean => {
                if !value.is_boolean() {
                    issues.push(ValidationIssue::new(path, "must be a boolean"));
                }
            }
            ValidatorKind::Number { min, max } => match value.as_f64() {
                Some(n) => {
                    if let Some(min) = min {
                        if n < *min {
                            issues.push(ValidationIssue::new(
                                path,
                                format!("must be at least {min}"),
                            ));
                        }
                    }
                    if let Some(max) = max {
                        if n > *max {
                            issues.push(ValidationIssue::new(
                                path,
                                format!("must be at most {max}"),
                            ));
                        }
                    }
                }
                None => issues.push(ValidationIssue::new(path, "must be a number")),
            },
            ValidatorKind::String { pattern, allowed } => match value.as_str() {
                Some(s) => {
                    if let Some(pattern) = pattern {
                        if !pattern.regex.is_match(s) {
                            let message = pattern.message.clone().unwrap_or_else(|| {
                                format!("must match pattern `{}`", pattern.regex.as_str())
                            });
                            issues.push(ValidationIssue::new(path, message));
                        }
                    }
                    if let Some(allowed) = allowed {
                        if !allowed.iter().any(|a| a == s) {
                            issues.push(ValidationIssue::new(
                                path,
                                format!("must be one of: {}", allowed.join(", ")),
                            ));
                        }
                    }
                }
                None => issues.push(ValidationIssue::new(path, "must be a string")),
            },
            ValidatorKind::Date { format } => match value.as_str() {
                Some(s) => {
                    if NaiveDate::parse_from_str(s, format).is_err() {
                        issues.push(ValidationIssue::new(
                            path,
                            format!("must be a date in format `{format}`"),
                        ));
                    }
                }
                None => issues.push(ValidationIssue::new(path, "must be a date string")),
            },
            ValidatorKind::Object { fields } => match value.as_object() {
                Some(object) => {
                    for field in fields {
                        field
                            .node
                            .check(object.get(&field.name), &join(path, &field.name), issues);
                    }
                }
                None => issues.push(ValidationIssue::new(path, "must be an object")),
            },
            ValidatorKind::List { item, min, max } => match value.as_array() {
                Some(elements) => {
                    if let Some(min) = min {
                        if (elements.len() as u64) < *min {
                            issues.push(ValidationIssue::new(
                                path,
                                format!("must have at least {min} entries"),
                            ));
                        }
                    }
                    if let Some(max) = max {
                        if (elements.len() as u64) > *max {
                            issues.push(ValidationIssue::new(
                                path,
                                format!("must have at most {max} entries"),
                            ));
                        }
                    }
                    for (index, element) in elements.iter().enumerate() {
                        item.check(Some(element), &format!("{path}[{index}]"), issues);
                    }
                }
                None => issues.push(ValidationIssue::new(path, "must be a list")),
            },
            ValidatorKind::Union { variants } => {
                let Some(object) = value.as_object() else {
                    issues.push(ValidationIssue::new(path, "must be a tagged value"));
                    return;
                };
                let Some(tag) = object.get("tag").and_then(Value::as_str) else {
                    issues.push(ValidationIssue::new(path, "is missing its tag"));
                    return;
                };
                let Some(variant) = variants.get(tag) else {
                    issues.push(ValidationIssue::new(path, format!("has unknown tag `{tag}`")));
                    return;
                };
                variant.check(object.get("value"), &join(path, "value"), issues);
            }
        }
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
