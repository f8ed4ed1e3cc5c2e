//! Path addressing over `serde_json` trees.
//!
//! Every edit in this crate is non-mutating: it takes the current document by
//! reference and returns a new one, leaving the input untouched.
//!
//! # Example
//!
//! ```
//! use guarded_tree_path::{delete_in, format_json_pointer, get, parse_json_pointer, set_in};
//! use serde_json::json;
//!
//! let doc = json!({"a": {"aa": [1, 2, 3]}});
//! let path = parse_json_pointer("/a/aa/1").unwrap();
//! assert_eq!(format_json_pointer(&path), "/a/aa/1");
//! assert_eq!(get(&doc, &path), Some(&json!(2)));
//!
//! let next = set_in(&doc, &path, json!(20)).unwrap();
//! assert_eq!(next, json!({"a": {"aa": [1, 20, 3]}}));
//! assert_eq!(doc, json!({"a": {"aa": [1, 2, 3]}}));
//!
//! let next = delete_in(&next, &path).unwrap();
//! assert_eq!(next, json!({"a": {"aa": [1, 3]}}));
//! ```

use thiserror::Error;

pub mod types;
pub use types::{Path, PathStep};

mod delete;
mod get;
pub mod list;
mod merge;
mod set;

pub use delete::delete_in;
pub use get::{get, get_mut, is_list_at};
pub use merge::merge_deep;
pub use set::set_in;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("step {step} at {pointer:?} must be a list index")]
    InvalidStep { pointer: String, step: String },
    #[error("value at {pointer:?} cannot hold children")]
    NotTraversable { pointer: String },
    #[error("json pointer {pointer:?} must be absolute or empty")]
    InvalidPointer { pointer: String },
}

/// Unescapes a JSON Pointer path component.
///
/// Per RFC 6901, `~1` is replaced with `/` and `~0` is replaced with `~`.
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // ~1 before ~0, otherwise "~01" would decode to "/"
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a JSON Pointer path component.
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse an RFC 6901 pointer into a typed path.
///
/// Tokens made only of ASCII digits become [`PathStep::Index`], everything
/// else becomes [`PathStep::Key`].
///
/// # Example
///
/// ```
/// use guarded_tree_path::{parse_json_pointer, PathStep};
///
/// assert_eq!(parse_json_pointer("").unwrap(), vec![]);
/// assert_eq!(
///     parse_json_pointer("/c/cc/1").unwrap(),
///     vec![PathStep::from("c"), PathStep::from("cc"), PathStep::Index(1)]
/// );
/// assert!(parse_json_pointer("no-slash").is_err());
/// ```
pub fn parse_json_pointer(pointer: &str) -> Result<Path, PathError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    if !pointer.starts_with('/') {
        return Err(PathError::InvalidPointer {
            pointer: pointer.to_owned(),
        });
    }
    Ok(pointer
        .split('/')
        .skip(1)
        .map(|token| {
            if is_index_token(token) {
                if let Ok(idx) = token.parse::<usize>() {
                    return PathStep::Index(idx);
                }
            }
            PathStep::Key(unescape_component(token))
        })
        .collect())
}

/// Format a path as an RFC 6901 pointer. The root path formats as `""`.
pub fn format_json_pointer(path: &[PathStep]) -> String {
    let mut out = String::new();
    for step in path {
        out.push('/');
        match step {
            PathStep::Key(key) => out.push_str(&escape_component(key)),
            PathStep::Index(idx) => out.push_str(&idx.to_string()),
        }
    }
    out
}

fn is_index_token(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}
