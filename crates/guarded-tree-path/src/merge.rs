use serde_json::Value;

/// Deep-merge `other` onto `base`, returning the merged tree.
///
/// - map onto map: keys merge recursively, new keys are appended.
/// - list onto list: elements merge by position, so `[4, 5, 6]` merged with
///   `[100]` is `[100, 5, 6]`; extra incoming elements are appended.
/// - anything else: the incoming value wins, including an explicit `null`.
///   A `null` replaces the existing entry, it never deletes it.
pub fn merge_deep(base: &Value, other: &Value) -> Value {
    match (base, other) {
        (Value::Object(current), Value::Object(incoming)) => {
            let mut out = current.clone();
            for (key, value) in incoming {
                let merged = match out.get(key) {
                    Some(existing) => merge_deep(existing, value),
                    None => value.clone(),
                };
                out.insert(key.clone(), merged);
            }
            Value::Object(out)
        }
        (Value::Array(current), Value::Array(incoming)) => {
            let mut out = current.clone();
            for (idx, value) in incoming.iter().enumerate() {
                match out.get_mut(idx) {
                    Some(existing) => *existing = merge_deep(existing, value),
                    None => out.push(value.clone()),
                }
            }
            Value::Array(out)
        }
        (_, incoming) => incoming.clone(),
    }
}
