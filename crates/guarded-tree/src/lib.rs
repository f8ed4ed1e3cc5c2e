//! Guarded, path-scoped mutation of a shared JSON tree.
//!
//! A [`GuardedTreeMutator`] owns one `serde_json::Value` and only changes it
//! through a fixed set of primitives (`set_at`, `delete_at`, `merge_deep`,
//! and list edits such as `push_data` or `splice_at`). Every change replaces
//! the tree with a fresh [`Snapshot`] and hands it to subscribers, unless a
//! batch is open, in which case a single broadcast fires when the outermost
//! batch finishes.
//!
//! Reading the whole tree requires the [`AccessKey`] the mutator was built
//! with. Domain types embed the mutator privately, keep the key to
//! themselves and expose their own operations:
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use guarded_tree::{listener, AccessKey, GuardedTreeMutator, PathStep, Snapshot, TreeError};
//! use serde_json::json;
//!
//! struct Todos {
//!     key: AccessKey,
//!     tree: GuardedTreeMutator,
//! }
//!
//! impl Todos {
//!     fn new() -> Self {
//!         let key = AccessKey::new();
//!         let tree = GuardedTreeMutator::new(json!({"items": []}), &key);
//!         Self { key, tree }
//!     }
//!
//!     fn add(&self, title: &str) -> Result<(), TreeError> {
//!         self.tree.push_data(&[PathStep::from("items")], [title])
//!     }
//!
//!     fn len(&self) -> Result<usize, TreeError> {
//!         let tree = self.tree.read(&self.key)?;
//!         Ok(tree["items"].as_array().map_or(0, Vec::len))
//!     }
//! }
//!
//! let todos = Todos::new();
//! let changes = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&changes);
//! todos.tree.subscribe(&listener(move |_: &Snapshot| counter.set(counter.get() + 1)));
//!
//! todos.add("write docs")?;
//! todos.tree.run_batched(|tree| -> Result<(), TreeError> {
//!     todos.add("review")?;
//!     tree.push_data(&[PathStep::from("items")], ["ship"])
//! })?;
//!
//! assert_eq!(todos.len()?, 3);
//! assert_eq!(changes.get(), 2);
//! # Ok::<(), TreeError>(())
//! ```

mod batch;
mod error;
mod key;
mod mutator;
mod options;

pub use batch::BatchScope;
pub use error::TreeError;
pub use key::AccessKey;
pub use mutator::{GuardedTreeMutator, Snapshot};
pub use options::{MutatorOptions, SpliceNotifications};

pub use guarded_tree_broadcast::{listener, Listener};
pub use guarded_tree_path::{format_json_pointer, parse_json_pointer, Path, PathStep};
