use guarded_tree_path::PathError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("attempted to read tree data without the matching access key")]
    AccessDenied,
    #[error("object at path {pointer:?} was not a list")]
    ShapeMismatch { pointer: String },
    #[error("batch ended at depth {actual}, expected {expected}")]
    BatchIntegrityViolation { expected: usize, actual: usize },
    #[error("step {step} at {pointer:?} must be a list index")]
    InvalidPathStep { pointer: String, step: String },
    #[error("index {index} out of bounds for list of length {len} at {pointer:?}")]
    IndexOutOfBounds {
        pointer: String,
        index: usize,
        len: usize,
    },
    #[error("value at {pointer:?} cannot hold children")]
    NotTraversable { pointer: String },
    #[error("json pointer {pointer:?} must be absolute or empty")]
    InvalidPointer { pointer: String },
}

impl From<PathError> for TreeError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::InvalidStep { pointer, step } => {
                TreeError::InvalidPathStep { pointer, step }
            }
            PathError::NotTraversable { pointer } => TreeError::NotTraversable { pointer },
            PathError::InvalidPointer { pointer } => TreeError::InvalidPointer { pointer },
        }
    }
}
