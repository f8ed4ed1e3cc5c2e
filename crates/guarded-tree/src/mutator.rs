use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use guarded_tree_broadcast::{ChangeBroadcaster, Listener};
use guarded_tree_path::{delete_in, format_json_pointer, get, list, merge_deep, set_in, PathStep};
use serde_json::Value;

use crate::batch::BatchScope;
use crate::key::AccessKey;
use crate::options::{MutatorOptions, SpliceNotifications};
use crate::TreeError;

/// Shared, immutable view of the tree at one point in time.
pub type Snapshot = Rc<Value>;

/// Owner of one tree value. Every change goes through a path-scoped
/// primitive and is announced to subscribers as a fresh [`Snapshot`].
pub struct GuardedTreeMutator {
    data: RefCell<Snapshot>,
    key_id: u64,
    depth: Cell<usize>,
    broadcaster: ChangeBroadcaster<Snapshot>,
    options: MutatorOptions,
}

impl GuardedTreeMutator {
    pub fn new(initial: Value, key: &AccessKey) -> Self {
        Self::with_options(initial, key, MutatorOptions::default())
    }

    pub fn with_options(initial: Value, key: &AccessKey, options: MutatorOptions) -> Self {
        Self {
            data: RefCell::new(Rc::new(initial)),
            key_id: key.id(),
            depth: Cell::new(0),
            broadcaster: ChangeBroadcaster::new(),
            options,
        }
    }

    pub fn options(&self) -> MutatorOptions {
        self.options
    }

    pub fn subscribe(&self, listener: &Listener<Snapshot>) -> bool {
        self.broadcaster.register(listener)
    }

    pub fn unsubscribe(&self, listener: &Listener<Snapshot>) -> bool {
        self.broadcaster.unregister(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.broadcaster.count()
    }

    pub fn has_listeners(&self) -> bool {
        self.broadcaster.has_listeners()
    }

    /// Current batch depth. Zero outside any batch.
    pub fn batch_depth(&self) -> usize {
        self.depth.get()
    }

    /// Current tree, for the holder of the key this mutator was built with.
    pub fn read(&self, key: &AccessKey) -> Result<Snapshot, TreeError> {
        if key.id() != self.key_id {
            tracing::debug!("read rejected: access key mismatch");
            return Err(TreeError::AccessDenied);
        }
        Ok(self.snapshot())
    }

    pub fn replace(&self, value: impl Into<Value>) {
        self.commit("replace", &[], value.into());
    }

    /// Run `action` with broadcasts suppressed, then broadcast once.
    ///
    /// The single broadcast fires even when `action` changed nothing. When
    /// `action` fails, its error is returned, edits made before the failure
    /// are kept, and nothing is broadcast. Nested calls coalesce into the
    /// outermost one.
    pub fn run_batched<R, E>(&self, action: impl FnOnce(&Self) -> Result<R, E>) -> Result<R, E>
    where
        E: From<TreeError>,
    {
        let scope = self.begin_batch();
        let out = action(self)?;
        scope.finish()?;
        Ok(out)
    }

    pub fn begin_batch(&self) -> BatchScope<'_> {
        BatchScope::enter(self)
    }

    pub fn merge_deep(&self, other: impl Into<Value>) {
        let current = self.snapshot();
        let next = merge_deep(&current, &other.into());
        self.commit("merge_deep", &[], next);
    }

    pub fn set_at(&self, path: &[PathStep], value: impl Into<Value>) -> Result<(), TreeError> {
        self.write_at("set_at", path, value.into())
    }

    /// Remove the entry at `path`.
    ///
    /// Inside a list the element is spliced out and later elements shift
    /// down. Inside a map the key is removed. The empty path resets the tree
    /// to `null`.
    pub fn delete_at(&self, path: &[PathStep]) -> Result<(), TreeError> {
        let Some((last, parent)) = path.split_last() else {
            self.commit("delete_at", path, Value::Null);
            return Ok(());
        };
        let current = self.snapshot();
        if let Some(Value::Array(items)) = get(&current, parent) {
            let index = last.as_index().ok_or_else(|| TreeError::InvalidPathStep {
                pointer: format_json_pointer(parent),
                step: last.to_string(),
            })?;
            let next = list::remove(items, index);
            return self.write_at("delete_at", parent, Value::Array(next));
        }
        let next = delete_in(&current, path)?;
        self.commit("delete_at", path, next);
        Ok(())
    }

    /// Append `items` to the list at `path`, flattening top-level arrays.
    pub fn concat_after<I>(&self, path: &[PathStep], items: I) -> Result<(), TreeError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let current = self.snapshot();
        let existing = require_list(&current, path)?;
        let tail = list::flatten(items.into_iter().map(Into::into));
        let next = list::concat(existing, &tail);
        self.write_at("concat_after", path, Value::Array(next))
    }

    /// Prepend `items` to the list at `path`, flattening top-level arrays.
    pub fn concat_before<I>(&self, path: &[PathStep], items: I) -> Result<(), TreeError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let current = self.snapshot();
        let existing = require_list(&current, path)?;
        let head = list::flatten(items.into_iter().map(Into::into));
        let next = list::concat(&head, existing);
        self.write_at("concat_before", path, Value::Array(next))
    }

    pub fn push_data<I>(&self, path: &[PathStep], items: I) -> Result<(), TreeError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let current = self.snapshot();
        let existing = require_list(&current, path)?;
        let next = list::push(existing, items.into_iter().map(Into::into));
        self.write_at("push_data", path, Value::Array(next))
    }

    pub fn unshift_data<I>(&self, path: &[PathStep], items: I) -> Result<(), TreeError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let current = self.snapshot();
        let existing = require_list(&current, path)?;
        let next = list::unshift(existing, items.into_iter().map(Into::into));
        self.write_at("unshift_data", path, Value::Array(next))
    }

    pub fn insert_at(
        &self,
        path: &[PathStep],
        index: usize,
        value: impl Into<Value>,
    ) -> Result<(), TreeError> {
        let current = self.snapshot();
        let existing = require_list(&current, path)?;
        let next = list::insert(existing, index, value.into());
        self.write_at("insert_at", path, Value::Array(next))
    }

    /// Replace `remove_count` elements at `index` with `values`.
    ///
    /// Broadcasts twice outside a batch unless the mutator was built with
    /// [`SpliceNotifications::Single`].
    pub fn splice_at<I>(
        &self,
        path: &[PathStep],
        index: usize,
        remove_count: usize,
        values: I,
    ) -> Result<(), TreeError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let current = self.snapshot();
        let existing = require_list(&current, path)?;
        let next = list::splice(existing, index, remove_count, values.into_iter().map(Into::into));
        self.write_at("splice_at", path, Value::Array(next))?;
        if self.options.splice_notifications == SpliceNotifications::Double {
            self.trigger_data_changed();
        }
        Ok(())
    }

    /// Move the element at `from` so it ends up at `to`.
    ///
    /// `to` indexes the list after the element has been taken out, and is
    /// clamped to its length.
    pub fn move_entry_in_list(
        &self,
        path: &[PathStep],
        from: usize,
        to: usize,
    ) -> Result<(), TreeError> {
        let current = self.snapshot();
        let existing = require_list(&current, path)?;
        let Some(entry) = existing.get(from).cloned() else {
            return Err(TreeError::IndexOutOfBounds {
                pointer: format_json_pointer(path),
                index: from,
                len: existing.len(),
            });
        };
        let shortened = list::remove(existing, from);
        let next = list::insert(&shortened, to, entry);
        self.write_at("move_entry_in_list", path, Value::Array(next))
    }

    pub(crate) fn set_batch_depth(&self, depth: usize) {
        self.depth.set(depth);
    }

    /// Broadcast the current snapshot unless a batch is open.
    pub(crate) fn trigger_data_changed(&self) {
        if self.depth.get() > 0 {
            return;
        }
        let snapshot = self.snapshot();
        self.broadcaster.broadcast(&snapshot);
    }

    fn snapshot(&self) -> Snapshot {
        Rc::clone(&self.data.borrow())
    }

    fn write_at(&self, op: &'static str, path: &[PathStep], value: Value) -> Result<(), TreeError> {
        let current = self.snapshot();
        let next = set_in(&current, path, value)?;
        self.commit(op, path, next);
        Ok(())
    }

    fn commit(&self, op: &'static str, path: &[PathStep], next: Value) {
        tracing::trace!(op, pointer = %format_json_pointer(path), "commit");
        // The borrow ends here, before any listener can re-enter.
        *self.data.borrow_mut() = Rc::new(next);
        self.trigger_data_changed();
    }
}

impl fmt::Debug for GuardedTreeMutator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedTreeMutator")
            .field("batch_depth", &self.depth.get())
            .field("listeners", &self.broadcaster.count())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn require_list<'a>(tree: &'a Value, path: &[PathStep]) -> Result<&'a [Value], TreeError> {
    match get(tree, path) {
        Some(Value::Array(items)) => Ok(items.as_slice()),
        _ => Err(TreeError::ShapeMismatch {
            pointer: format_json_pointer(path),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(steps: &[&str]) -> Vec<PathStep> {
        steps.iter().map(|s| PathStep::from(*s)).collect()
    }

    #[test]
    fn test_read_requires_the_construction_key() {
        let key = AccessKey::new();
        let m = GuardedTreeMutator::new(json!({"a": 1}), &key);
        assert_eq!(*m.read(&key).unwrap(), json!({"a": 1}));
        assert_eq!(m.read(&AccessKey::new()), Err(TreeError::AccessDenied));
    }

    #[test]
    fn test_write_replaces_the_snapshot_rc() {
        let key = AccessKey::new();
        let m = GuardedTreeMutator::new(json!({"a": 1}), &key);
        let before = m.read(&key).unwrap();
        m.set_at(&path(&["a"]), 2).unwrap();
        let after = m.read(&key).unwrap();
        assert!(!Rc::ptr_eq(&before, &after));
        assert_eq!(*before, json!({"a": 1}));
        assert_eq!(*after, json!({"a": 2}));
    }

    #[test]
    fn test_require_list_names_the_path() {
        let tree = json!({"a": {"b": 1}});
        let err = require_list(&tree, &path(&["a", "b"])).unwrap_err();
        assert_eq!(err, TreeError::ShapeMismatch { pointer: "/a/b".into() });
    }

    #[test]
    fn test_delete_in_list_rejects_key_step() {
        let key = AccessKey::new();
        let m = GuardedTreeMutator::new(json!({"a": [1, 2]}), &key);
        let err = m.delete_at(&path(&["a", "x"])).unwrap_err();
        assert_eq!(
            err,
            TreeError::InvalidPathStep {
                pointer: "/a".into(),
                step: "\"x\"".into()
            }
        );
    }

    #[test]
    fn test_debug_reports_depth_and_listeners() {
        let key = AccessKey::new();
        let m = GuardedTreeMutator::new(json!(null), &key);
        let text = format!("{m:?}");
        assert!(text.contains("batch_depth: 0"));
        assert!(text.contains("listeners: 0"));
    }
}
