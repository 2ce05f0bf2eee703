//! Record module - the unit of data a job discovers and persists

use serde_json::Value;

/// A single discovered fact: field name to value
///
/// Records carry no identity field. Two records are the same record when
/// they are structurally equal, regardless of the order their fields were
/// written in.
pub type Record = serde_json::Map<String, Value>;

/// Ordered sequence of records, oldest first
pub type RecordSet = Vec<Record>;

/// Compute a stable, field-order-independent key for a record
///
/// Keys are sorted at every nesting level before serializing, so
/// `{"a": 1, "b": 2}` and `{"b": 2, "a": 1}` produce the same key.
///
/// # Examples
///
/// ```
/// use sentinel_domain::{canonical_key, Record};
/// use serde_json::json;
///
/// let a: Record = serde_json::from_value(json!({"title": "X", "url": "u"})).unwrap();
/// let b: Record = serde_json::from_value(json!({"url": "u", "title": "X"})).unwrap();
/// assert_eq!(canonical_key(&a), canonical_key(&b));
/// ```
pub fn canonical_key(record: &Record) -> String {
    let mut out = String::new();
    write_object(record, &mut out);
    out
}

fn write_object(map: &serde_json::Map<String, Value>, out: &mut String) {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    out.push('{');
    for (idx, key) in keys.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(&Value::String((*key).clone()).to_string());
        out.push(':');
        write_value(&map[key.as_str()], out);
    }
    out.push('}');
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => write_object(map, out),
        Value::Array(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
