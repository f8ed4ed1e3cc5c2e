use serde_json::Value;

use crate::{format_json_pointer, PathError, PathStep};

/// Return a copy of `doc` with the entry at `path` removed.
///
/// Map entries are removed by key, keeping the order of the remaining keys.
/// List elements are removed without leaving a gap. A path that does not
/// exist leaves the document unchanged. Deleting the root yields `null`.
///
/// # Errors
///
/// - [`PathError::InvalidStep`] if a `Key` step is applied to a list.
/// - [`PathError::NotTraversable`] if the path runs through a scalar.
pub fn delete_in(doc: &Value, path: &[PathStep]) -> Result<Value, PathError> {
    let Some((last, parent_path)) = path.split_last() else {
        return Ok(Value::Null);
    };
    let mut next = doc.clone();
    let Some(parent) = locate_mut(&mut next, parent_path)? else {
        return Ok(next);
    };
    match parent {
        Value::Object(map) => {
            map.shift_remove(&last.to_key());
        }
        Value::Array(arr) => {
            let idx = list_index(parent_path, last)?;
            if idx < arr.len() {
                arr.remove(idx);
            }
        }
        _ => {
            return Err(PathError::NotTraversable {
                pointer: format_json_pointer(parent_path),
            })
        }
    }
    Ok(next)
}

/// Walks `path`, returning `None` as soon as a step is missing.
fn locate_mut<'a>(
    doc: &'a mut Value,
    path: &[PathStep],
) -> Result<Option<&'a mut Value>, PathError> {
    let mut current = doc;
    for (depth, step) in path.iter().enumerate() {
        let next = match current {
            Value::Object(map) => map.get_mut(&step.to_key()),
            Value::Array(arr) => {
                let idx = list_index(&path[..depth], step)?;
                arr.get_mut(idx)
            }
            _ => {
                return Err(PathError::NotTraversable {
                    pointer: format_json_pointer(&path[..depth]),
                })
            }
        };
        current = match next {
            Some(value) => value,
            None => return Ok(None),
        };
    }
    Ok(Some(current))
}

fn list_index(parent_path: &[PathStep], step: &PathStep) -> Result<usize, PathError> {
    step.as_index().ok_or_else(|| PathError::InvalidStep {
        pointer: format_json_pointer(parent_path),
        step: step.to_string(),
    })
}
