use serde_json::{Map, Value};

/// Deep-sets `value` at the dot-separated `path`, creating intermediate
/// objects as needed. Non-object intermediates are replaced.
pub fn set_path(root: &mut Value, path: &str, value: Value) {
    if path.is_empty() {
        *root = value;
        return;
    }

    let segments: Vec<&str> = path.split('.').collect();
    let mut current = root;
    for (idx, segment) in segments.iter().enumerate() {
        if idx + 1 == segments.len() {
            ensure_object(current).insert((*segment).to_string(), value);
            return;
        }
        current = ensure_object(current)
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

/// Deep-gets the value at the dot-separated `path`, if present.
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }
    let mut current = root;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Returns true when `path` resolves to any value, including an
/// intermediate non-leaf object.
pub fn has_path(root: &Value, path: &str) -> bool {
    get_path(root, path).is_some()
}

/// Pulls the answer for `name` out of a raw engine response, accepting
/// both a flat `"a.b"` key and a nested path.
pub fn answer_value(raw: &Value, name: &str) -> Option<Value> {
    if let Some(object) = raw.as_object()
        && let Some(value) = object.get(name)
    {
        return Some(value.clone());
    }
    get_path(raw, name).cloned()
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    value.as_object_mut().expect("value is object")
}
