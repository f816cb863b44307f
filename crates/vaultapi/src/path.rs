//! Dotted-path lookup into JSON responses.
//!
//! Vault wraps payloads in envelopes such as `{"data": {"keys": [...]}}`.
//! Callers name the part they want with a path like `data.keys`.

use serde_json::Value;

/// Walk `path` (dot-separated keys) into `value`.
///
/// The walk stops at the first segment that is absent, null, or applied to a
/// non-object, and returns whatever was reached so far. A missing key is not
/// an error: `get_path({"data": {}}, "data.keys")` yields `{}`. The path `.`
/// has only empty segments and therefore returns the whole value.
pub fn get_path<'a>(value: &'a Value, path: &str) -> &'a Value {
    let mut current = value;
    for segment in path.split('.') {
        match current.get(segment) {
            Some(next) if !next.is_null() => current = next,
            _ => break,
        }
    }
    current
}
