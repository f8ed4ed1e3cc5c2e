use serde_json::Value;

use crate::PathStep;

/// Get a value from a tree by path.
///
/// Returns `None` if any step is missing, or if a `Key` step is applied to a
/// list. An `Index` step applied to a map looks up its decimal key.
pub fn get<'a>(val: &'a Value, path: &[PathStep]) -> Option<&'a Value> {
    let mut current = val;
    for step in path {
        current = match (step, current) {
            (PathStep::Index(idx), Value::Array(arr)) => arr.get(*idx)?,
            (PathStep::Key(_), Value::Array(_)) => return None,
            (step, Value::Object(map)) => map.get(&step.to_key())?,
            _ => return None,
        };
    }
    Some(current)
}

/// Get a mutable reference to a value in a tree by path.
pub fn get_mut<'a>(val: &'a mut Value, path: &[PathStep]) -> Option<&'a mut Value> {
    let mut current = val;
    for step in path {
        current = match (step, current) {
            (PathStep::Index(idx), Value::Array(arr)) => arr.get_mut(*idx)?,
            (PathStep::Key(_), Value::Array(_)) => return None,
            (step, Value::Object(map)) => map.get_mut(&step.to_key())?,
            _ => return None,
        };
    }
    Some(current)
}

/// Returns `true` when the value at `path` exists and is a list.
pub fn is_list_at(val: &Value, path: &[PathStep]) -> bool {
    matches!(get(val, path), Some(Value::Array(_)))
}
