//! Structured-output satisfaction check.

use serde_json::Value;

/// Check a candidate reply against a target output schema.
///
/// The candidate satisfies the schema iff it parses as JSON and, when the
/// schema declares `"required"` keys, every one of them is present in the
/// parsed object. Deeper typed validation is a collaborator concern, not
/// handled here. Returns the decoded value on satisfaction; `None` drives
/// a retry turn rather than an error.
pub fn satisfies(schema: &Value, candidate: &str) -> Option<Value> {
    let parsed: Value = serde_json::from_str(candidate.trim()).ok()?;

    let required = schema.get("required").and_then(|r| r.as_array());
    if let Some(required) = required {
        let object = parsed.as_object()?;
        for key in required {
            let key = key.as_str()?;
            if !object.contains_key(key) {
                return None;
            }
        }
    }

    Some(parsed)
}
