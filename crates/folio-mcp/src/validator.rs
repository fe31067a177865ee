//! Tool argument validation.
//!
//! Checks raw tool arguments against a [`ValidatorSchema`] and extracts the
//! typed [`ValidatedInput`] the executor works with. `data` and `where` may
//! arrive as JSON-encoded strings; they are decoded before any rule runs, so a
//! string-encoded payload behaves exactly like the parsed object.
//!
//! The first violation wins and is reported with its full field path
//! (`data.items[2].url`).

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

use crate::error::ToolError;
use crate::schema::{
    ArrayRule, BlocksRule, DEFAULT_LIMIT, NumberRule, ObjectRule, StringFormat, StringRule,
    ValidatorSchema, ValueRule,
};

/// Arguments that passed validation, in typed form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedInput {
    pub id: Option<String>,
    /// Document fields for create/update; unknown keys preserved.
    pub data: Option<Map<String, Value>>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort: Option<String>,
    pub filter: Option<Value>,
    pub depth: Option<u8>,
    pub fields: Vec<String>,
    pub locale: Option<String>,
    pub draft: Option<bool>,
}

impl ValidatedInput {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// Field selection with `id` forced in, or `None` to select everything.
    pub fn selection(&self) -> Option<Vec<String>> {
        if self.fields.is_empty() {
            return None;
        }
        let mut select = self.fields.clone();
        if !select.iter().any(|f| f == "id") {
            select.insert(0, "id".to_string());
        }
        Some(select)
    }
}

impl ValidatorSchema {
    /// Validate raw tool arguments.
    pub fn validate(&self, arguments: Value) -> Result<ValidatedInput, ToolError> {
        let mut args = match arguments {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(ToolError::validation(
                    "arguments",
                    format!("expected an object, got {}", json_type(&other)),
                ));
            }
        };

        decode_json_text(&mut args, "data")?;
        decode_json_text(&mut args, "where")?;

        check_object(&self.root, &args, "")?;

        Ok(extract(args))
    }
}

/// Replace a JSON-encoded string argument with its decoded value.
fn decode_json_text(args: &mut Map<String, Value>, key: &str) -> Result<(), ToolError> {
    let Some(Value::String(text)) = args.get(key) else {
        return Ok(());
    };
    let decoded: Value = serde_json::from_str(text).map_err(|e| {
        ToolError::validation(key, format!("expected an object or JSON-encoded object: {}", e))
    })?;
    args.insert(key.to_string(), decoded);
    Ok(())
}

fn extract(mut args: Map<String, Value>) -> ValidatedInput {
    let id = args.remove("id").and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => whole_id(&n),
        _ => None,
    });
    let data = match args.remove("data") {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    };
    let fields = args
        .remove("fields")
        .and_then(|v| match v {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|i| i.as_str().map(String::from))
                    .collect(),
            ),
            _ => None,
        })
        .unwrap_or_default();

    ValidatedInput {
        id,
        data,
        page: args.get("page").and_then(as_whole),
        limit: args.get("limit").and_then(as_whole),
        sort: args.get("sort").and_then(Value::as_str).map(String::from),
        filter: args.remove("where"),
        depth: args
            .get("depth")
            .and_then(as_whole)
            .and_then(|d| u8::try_from(d).ok()),
        fields,
        locale: args.get("locale").and_then(Value::as_str).map(String::from),
        draft: args.get("draft").and_then(Value::as_bool),
    }
}

/// Whole non-negative number, accepting `3.0` as `3`.
fn as_whole(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
}

/// Integer ID text for a numeric ID, accepting `12.0` as `12`.
fn whole_id(n: &serde_json::Number) -> Option<String> {
    if n.is_i64() || n.is_u64() {
        return Some(n.to_string());
    }
    n.as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15)
        .map(|f| (f as i64).to_string())
}

// =============================================================================
// RULE CHECKS
// =============================================================================

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn check_object(rule: &ObjectRule, map: &Map<String, Value>, path: &str) -> Result<(), ToolError> {
    for prop in &rule.properties {
        let field_path = join(path, &prop.name);
        match map.get(&prop.name) {
            None if prop.required => {
                return Err(ToolError::validation(field_path, "is required"));
            }
            None => {}
            Some(value) => check_value(&prop.rule, value, &field_path)?,
        }
    }

    if !rule.allow_unknown {
        if let Some(key) = map.keys().find(|k| rule.property(k).is_none()) {
            return Err(ToolError::validation(
                join(path, key),
                "is not a recognized argument",
            ));
        }
    }

    Ok(())
}

fn check_value(rule: &ValueRule, value: &Value, path: &str) -> Result<(), ToolError> {
    match rule {
        ValueRule::String(r) => check_string(r, value, path),
        ValueRule::Number(r) => check_number(r, value, path),
        ValueRule::Boolean => match value {
            Value::Bool(_) => Ok(()),
            other => Err(type_error(path, "a boolean", other)),
        },
        ValueRule::Enum(options) => match value.as_str() {
            Some(s) if options.iter().any(|o| o == s) => Ok(()),
            Some(s) => Err(ToolError::validation(
                path,
                format!("'{}' is not one of: {}", s, options.join(", ")),
            )),
            None => Err(type_error(path, "a string", value)),
        },
        ValueRule::Array(r) => check_array(r, value, path),
        ValueRule::Object(r) => match value.as_object() {
            Some(map) => check_object(r, map, path),
            None => Err(type_error(path, "an object", value)),
        },
        ValueRule::Blocks(r) => check_blocks(r, value, path),
        ValueRule::Id => match value {
            Value::String(s) if !s.is_empty() => Ok(()),
            Value::Number(n) if whole_id(n).is_some() => Ok(()),
            other => Err(type_error(path, "a non-empty string or integer ID", other)),
        },
        ValueRule::Reference => match value {
            Value::String(_) | Value::Number(_) | Value::Object(_) | Value::Null => Ok(()),
            other => Err(type_error(path, "an ID or a document object", other)),
        },
        ValueRule::Point => match value.as_array() {
            Some(pair) if pair.len() == 2 && pair.iter().all(Value::is_number) => Ok(()),
            _ => Err(ToolError::validation(
                path,
                "expected a [longitude, latitude] pair of numbers",
            )),
        },
        ValueRule::Markdown => match value {
            Value::String(_) | Value::Null => Ok(()),
            Value::Object(map) if map.contains_key("root") => Err(ToolError::conversion(
                path,
                format!(
                    "Field '{}' received a structured rich-text document; send the content as a markdown string instead",
                    path
                ),
            )),
            other => Err(ToolError::conversion(
                path,
                format!(
                    "Field '{}' expects a markdown string, got {}",
                    path,
                    json_type(other)
                ),
            )),
        },
        ValueRule::Filter => match value {
            Value::Object(_) => Ok(()),
            other => Err(type_error(path, "a filter object", other)),
        },
        ValueRule::Any => Ok(()),
    }
}

fn check_string(rule: &StringRule, value: &Value, path: &str) -> Result<(), ToolError> {
    let Some(s) = value.as_str() else {
        return Err(type_error(path, "a string", value));
    };
    let length = s.chars().count() as u64;
    if let Some(min) = rule.min_length {
        if length < min {
            return Err(ToolError::validation(
                path,
                format!("must be at least {} characters", min),
            ));
        }
    }
    if let Some(max) = rule.max_length {
        if length > max {
            return Err(ToolError::validation(
                path,
                format!("must be at most {} characters", max),
            ));
        }
    }
    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(s) {
            return Err(ToolError::validation(
                path,
                format!("does not match pattern {}", pattern.as_str()),
            ));
        }
    }
    match rule.format {
        Some(StringFormat::Email) if !is_email(s) => {
            Err(ToolError::validation(path, "is not a valid email address"))
        }
        Some(StringFormat::DateTime) if !is_iso_date(s) => Err(ToolError::validation(
            path,
            "expected an ISO-8601 date or date-time",
        )),
        _ => Ok(()),
    }
}

fn check_number(rule: &NumberRule, value: &Value, path: &str) -> Result<(), ToolError> {
    let Some(n) = value.as_f64() else {
        return Err(type_error(path, "a number", value));
    };
    if rule.integer && n.fract() != 0.0 {
        return Err(ToolError::validation(path, "must be an integer"));
    }
    if let Some(min) = rule.min {
        if n < min {
            return Err(ToolError::validation(path, format!("must be >= {}", min)));
        }
    }
    if let Some(max) = rule.max {
        if n > max {
            return Err(ToolError::validation(path, format!("must be <= {}", max)));
        }
    }
    Ok(())
}

fn check_len(len: usize, min: Option<u64>, max: Option<u64>, path: &str) -> Result<(), ToolError> {
    let len = len as u64;
    if let Some(min) = min {
        if len < min {
            return Err(ToolError::validation(
                path,
                format!("must have at least {} items", min),
            ));
        }
    }
    if let Some(max) = max {
        if len > max {
            return Err(ToolError::validation(
                path,
                format!("must have at most {} items", max),
            ));
        }
    }
    Ok(())
}

fn check_array(rule: &ArrayRule, value: &Value, path: &str) -> Result<(), ToolError> {
    let Some(items) = value.as_array() else {
        return Err(type_error(path, "an array", value));
    };
    check_len(items.len(), rule.min_items, rule.max_items, path)?;
    for (i, item) in items.iter().enumerate() {
        check_value(&rule.items, item, &format!("{}[{}]", path, i))?;
    }
    Ok(())
}

fn check_blocks(rule: &BlocksRule, value: &Value, path: &str) -> Result<(), ToolError> {
    let Some(rows) = value.as_array() else {
        return Err(type_error(path, "an array of blocks", value));
    };
    check_len(rows.len(), rule.min_items, rule.max_items, path)?;
    for (i, row) in rows.iter().enumerate() {
        let row_path = format!("{}[{}]", path, i);
        let Some(map) = row.as_object() else {
            return Err(type_error(&row_path, "a block object", row));
        };
        let block_type = map.get("blockType").and_then(Value::as_str);
        let Some(variant) = block_type.and_then(|t| rule.variant(t)) else {
            let allowed: Vec<&str> = rule.variants.iter().map(|v| v.slug.as_str()).collect();
            return Err(ToolError::validation(
                format!("{}.blockType", row_path),
                format!("must be one of: {}", allowed.join(", ")),
            ));
        };
        check_object(&variant.fields, map, &row_path)?;
    }
    Ok(())
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !s.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// RFC 3339 date-time with offset, or a full date.
fn is_iso_date(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok() || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn type_error(path: &str, expected: &str, got: &Value) -> ToolError {
    ToolError::validation(path, format!("expected {}, got {}", expected, json_type(got)))
}

/// JSON type name for error messages.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
