//! Non-mutating list edits.
//!
//! Each function borrows the current elements and returns a new list.
//! Indices past the end are clamped to the list length.

use serde_json::Value;

/// Append `items` individually.
pub fn push(list: &[Value], items: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut out = list.to_vec();
    out.extend(items);
    out
}

/// Prepend `items` individually, keeping their order.
pub fn unshift(list: &[Value], items: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut out: Vec<Value> = items.into_iter().collect();
    out.extend_from_slice(list);
    out
}

/// Insert `value` at `index`, shifting later elements right.
///
/// `index == list.len()` appends.
pub fn insert(list: &[Value], index: usize, value: Value) -> Vec<Value> {
    splice(list, index, 0, [value])
}

/// Remove `remove` elements starting at `index` and put `values` in their
/// place. Untouched elements keep their relative order.
pub fn splice(
    list: &[Value],
    index: usize,
    remove: usize,
    values: impl IntoIterator<Item = Value>,
) -> Vec<Value> {
    let start = index.min(list.len());
    let end = start.saturating_add(remove).min(list.len());
    let mut out = Vec::with_capacity(list.len());
    out.extend_from_slice(&list[..start]);
    out.extend(values);
    out.extend_from_slice(&list[end..]);
    out
}

/// Remove the element at `index`. Out-of-range indices leave the list as is.
pub fn remove(list: &[Value], index: usize) -> Vec<Value> {
    splice(list, index, 1, [])
}

/// Join two lists.
pub fn concat(head: &[Value], tail: &[Value]) -> Vec<Value> {
    let mut out = Vec::with_capacity(head.len() + tail.len());
    out.extend_from_slice(head);
    out.extend_from_slice(tail);
    out
}

/// Flatten one level: top-level arrays are spliced in, every other value
/// becomes a single element. Nested arrays inside those arrays are kept.
pub fn flatten(items: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut out = Vec::new();
    for item in items {
        match item {
            Value::Array(inner) => out.extend(inner),
            other => out.push(other),
        }
    }
    out
}
