use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_KEY_ID: AtomicU64 = AtomicU64::new(1);

/// Capability token that unlocks [`GuardedTreeMutator::read`].
///
/// Every key has a process-unique identity. Keys are neither `Clone` nor
/// `Copy`, and two separately created keys never match, so a key cannot be
/// forged by building an equal-looking one.
///
/// [`GuardedTreeMutator::read`]: crate::GuardedTreeMutator::read
#[derive(Debug)]
pub struct AccessKey {
    id: u64,
}

impl AccessKey {
    pub fn new() -> Self {
        Self {
            id: NEXT_KEY_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }
}

impl Default for AccessKey {
    fn default() -> Self {
        Self::new()
    }
}
