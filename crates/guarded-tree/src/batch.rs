use crate::{GuardedTreeMutator, TreeError};

/// Scope during which broadcasts from `mutator` are suppressed.
///
/// Entering raises the batch depth by one. [`BatchScope::finish`] lowers it
/// again and, at the outermost level, broadcasts the current snapshot once.
/// A scope that is dropped without `finish` (an early return through `?`, or
/// a panic) restores the depth and broadcasts nothing.
#[must_use = "a batch scope broadcasts only when finished"]
#[derive(Debug)]
pub struct BatchScope<'a> {
    mutator: &'a GuardedTreeMutator,
    entry_depth: usize,
    finished: bool,
}

impl<'a> BatchScope<'a> {
    pub(crate) fn enter(mutator: &'a GuardedTreeMutator) -> Self {
        let entry_depth = mutator.batch_depth();
        mutator.set_batch_depth(entry_depth + 1);
        Self {
            mutator,
            entry_depth,
            finished: false,
        }
    }

    /// Depth this scope set on entry.
    pub fn depth(&self) -> usize {
        self.entry_depth + 1
    }

    /// Close the scope.
    ///
    /// Fails with [`TreeError::BatchIntegrityViolation`] when the depth no
    /// longer matches what this scope set, which happens only when a nested
    /// scope was leaked or scopes were closed out of order. The depth is
    /// lowered to at most its pre-entry value either way.
    pub fn finish(mut self) -> Result<(), TreeError> {
        self.finished = true;
        let expected = self.depth();
        let actual = self.mutator.batch_depth();
        self.exit();
        if actual != expected {
            tracing::error!(expected, actual, "batch depth drifted inside scope");
            return Err(TreeError::BatchIntegrityViolation { expected, actual });
        }
        self.mutator.trigger_data_changed();
        Ok(())
    }

    // An exit only ever lowers the depth, so a scope closed after its
    // enclosing one cannot reopen a batch.
    fn exit(&self) {
        let depth = self.entry_depth.min(self.mutator.batch_depth());
        self.mutator.set_batch_depth(depth);
    }
}

impl Drop for BatchScope<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.exit();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use guarded_tree_broadcast::listener;
    use serde_json::json;

    use crate::{AccessKey, GuardedTreeMutator, PathStep, Snapshot, TreeError};

    fn counted(mutator: &GuardedTreeMutator) -> Rc<Cell<usize>> {
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        mutator.subscribe(&listener(move |_: &Snapshot| c.set(c.get() + 1)));
        calls
    }

    #[test]
    fn test_nested_scope_exit_is_silent() {
        let key = AccessKey::new();
        let m = GuardedTreeMutator::new(json!({}), &key);
        let calls = counted(&m);

        let outer = m.begin_batch();
        let inner = m.begin_batch();
        assert_eq!(inner.depth(), 2);
        inner.finish().unwrap();
        assert_eq!(calls.get(), 0);
        outer.finish().unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(m.batch_depth(), 0);
    }

    #[test]
    fn test_dropped_scope_restores_depth_without_broadcast() {
        let key = AccessKey::new();
        let m = GuardedTreeMutator::new(json!({}), &key);
        let calls = counted(&m);

        {
            let _scope = m.begin_batch();
            m.set_at(&[PathStep::from("a")], 1).unwrap();
        }
        assert_eq!(m.batch_depth(), 0);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_leaked_nested_scope_is_reported() {
        let key = AccessKey::new();
        let m = GuardedTreeMutator::new(json!({}), &key);
        let calls = counted(&m);

        let outer = m.begin_batch();
        std::mem::forget(m.begin_batch());
        let err = outer.finish().unwrap_err();
        assert_eq!(
            err,
            TreeError::BatchIntegrityViolation {
                expected: 1,
                actual: 2
            }
        );
        assert_eq!(m.batch_depth(), 0);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_inner_dropped_after_failed_outer_finish() {
        let key = AccessKey::new();
        let m = GuardedTreeMutator::new(json!({}), &key);
        let calls = counted(&m);

        let outer = m.begin_batch();
        let inner = m.begin_batch();
        assert_eq!(
            outer.finish().unwrap_err(),
            TreeError::BatchIntegrityViolation {
                expected: 1,
                actual: 2
            }
        );
        drop(inner);
        assert_eq!(m.batch_depth(), 0);

        m.set_at(&[PathStep::from("a")], 1).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_inner_finished_after_outer_dropped() {
        let key = AccessKey::new();
        let m = GuardedTreeMutator::new(json!({}), &key);
        let calls = counted(&m);

        let outer = m.begin_batch();
        let inner = m.begin_batch();
        drop(outer);
        assert_eq!(
            inner.finish().unwrap_err(),
            TreeError::BatchIntegrityViolation {
                expected: 2,
                actual: 0
            }
        );
        assert_eq!(m.batch_depth(), 0);

        m.set_at(&[PathStep::from("a")], 1).unwrap();
        assert_eq!(calls.get(), 1);
    }
}
