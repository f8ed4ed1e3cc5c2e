use serde_json::{Map, Value};

use crate::{format_json_pointer, PathError, PathStep};

/// Return a copy of `doc` with the value at `path` replaced by `value`.
///
/// Missing map entries along the way are created as empty maps. Writing past
/// the end of a list pads the gap with `null`. The shape of the replaced
/// value does not matter: lists, maps and scalars are all overwritten.
///
/// # Errors
///
/// - [`PathError::InvalidStep`] if a `Key` step is applied to a list.
/// - [`PathError::NotTraversable`] if the path runs through a scalar
///   (including an explicit `null`).
pub fn set_in(doc: &Value, path: &[PathStep], value: Value) -> Result<Value, PathError> {
    if path.is_empty() {
        return Ok(value);
    }
    let mut next = doc.clone();
    set_step(&mut next, path, 0, value)?;
    Ok(next)
}

fn set_step(
    node: &mut Value,
    path: &[PathStep],
    depth: usize,
    value: Value,
) -> Result<(), PathError> {
    let Some((step, rest)) = path[depth..].split_first() else {
        *node = value;
        return Ok(());
    };
    let placeholder = || {
        if rest.is_empty() {
            Value::Null
        } else {
            Value::Object(Map::new())
        }
    };
    let child = match node {
        Value::Object(map) => map.entry(step.to_key()).or_insert_with(placeholder),
        Value::Array(arr) => {
            let idx = step.as_index().ok_or_else(|| PathError::InvalidStep {
                pointer: format_json_pointer(&path[..depth]),
                step: step.to_string(),
            })?;
            if idx >= arr.len() {
                arr.resize(idx, Value::Null);
                arr.push(placeholder());
            }
            &mut arr[idx]
        }
        _ => {
            return Err(PathError::NotTraversable {
                pointer: format_json_pointer(&path[..depth]),
            })
        }
    };
    set_step(child, path, depth + 1, value)
}
