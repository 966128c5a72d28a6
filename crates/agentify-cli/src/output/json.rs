//! JSON output formatter

use serde::Serialize;

/// Pretty-printed JSON followed by a newline
pub fn to_pretty<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string_pretty(value)? + "\n")
}
