// Dotted-path lookup into weakly-typed record payloads.
//
// Rationale for a single shared utility:
//   Handlers read operation-specific fields like
//   "sys_mem_info.available_memory" out of arbitrary JSON. Each handler
//   re-implementing the traversal would multiply the edge cases (missing
//   key, intermediate non-object, non-numeric leaf), so the lookup and
//   the numeric coercion live here and nowhere else.
//
// Partiality is load-bearing: a miss returns None, never an error. A
// record lacking a field is skipped for that metric by the caller.

use serde_json::Value;

/// Look up `path` in `root`, where `path` may be a plain key or a
/// dotted path into nested objects.
///
/// A literal key containing dots wins over path traversal, so payloads
/// that store flat keys like `"a.b"` keep working.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let obj = root.as_object()?;
    if let Some(value) = obj.get(path) {
        return Some(value);
    }

    let mut current = root;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Best-effort numeric coercion: numbers pass through, booleans map to
/// 1/0, strings are parsed. Anything else is absent.
pub fn coerce_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_plain_key() {
        let root = json!({"iterations": 42});
        assert_eq!(lookup(&root, "iterations"), Some(&json!(42)));
    }

    #[test]
    fn test_lookup_dotted_path() {
        let root = json!({"sys_mem_info": {"available_memory": 1024}});
        assert_eq!(
            lookup(&root, "sys_mem_info.available_memory"),
            Some(&json!(1024))
        );
    }

    #[test]
    fn test_literal_dotted_key_wins() {
        let root = json!({"a.b": 1, "a": {"b": 2}});
        assert_eq!(lookup(&root, "a.b"), Some(&json!(1)));
    }

    #[test]
    fn test_lookup_missing() {
        let root = json!({"a": {"b": 2}});
        assert_eq!(lookup(&root, "a.c"), None);
        assert_eq!(lookup(&root, "z"), None);
    }

    #[test]
    fn test_lookup_through_non_object() {
        let root = json!({"a": 5});
        assert_eq!(lookup(&root, "a.b"), None);
        assert_eq!(lookup(&json!(null), "a"), None);
        assert_eq!(lookup(&json!([1, 2]), "0"), None);
    }

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(coerce_numeric(&json!(1.5)), Some(1.5));
        assert_eq!(coerce_numeric(&json!(32768)), Some(32768.0));
        assert_eq!(coerce_numeric(&json!(true)), Some(1.0));
        assert_eq!(coerce_numeric(&json!(false)), Some(0.0));
        assert_eq!(coerce_numeric(&json!("123")), Some(123.0));
        assert_eq!(coerce_numeric(&json!(" 4.5 ")), Some(4.5));
        assert_eq!(coerce_numeric(&json!("Hello World")), None);
        assert_eq!(coerce_numeric(&json!(null)), None);
        assert_eq!(coerce_numeric(&json!({"v": 1})), None);
    }
}
