//! Redaction of sensitive keys before arguments reach the logs.

use serde_json::Value;

pub const REDACTED: &str = "[REDACTED]";

/// Normalized keys that are always redacted.
const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "confirmpassword",
    "token",
    "accesstoken",
    "refreshtoken",
    "apikey",
    "secret",
    "clientsecret",
    "resetpasswordtoken",
    "verificationtoken",
    "salt",
    "hash",
    "authorization",
];

/// Suffixes that mark a normalized key as sensitive.
const SENSITIVE_SUFFIXES: &[&str] = &["password", "token", "secret", "apikey"];

/// Lowercase and drop `_`/`-` so `api_key`, `apiKey` and `API-KEY` compare equal.
fn normalize(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn is_sensitive(key: &str) -> bool {
    let key = normalize(key);
    SENSITIVE_KEYS.contains(&key.as_str())
        || SENSITIVE_SUFFIXES.iter().any(|s| key.ends_with(s))
}

/// Copy of `value` with every sensitive key's value replaced, at any depth.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = if is_sensitive(k) {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact(v)
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}
