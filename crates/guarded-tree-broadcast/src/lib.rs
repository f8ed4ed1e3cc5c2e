//! Synchronous change broadcaster.
//!
//! [`ChangeBroadcaster<V>`] keeps an ordered set of listeners and calls each
//! of them with a value on [`broadcast`](ChangeBroadcaster::broadcast).
//!
//! # Invariants
//!
//! 1. Listeners are called in registration order.
//! 2. A listener is registered at most once; identity is the `Rc` allocation.
//! 3. Each broadcast iterates a snapshot of the listener list taken when the
//!    broadcast starts. Registering or unregistering from inside a listener
//!    takes effect on the next broadcast.
//! 4. No borrow of the registry is held while a listener runs.
//!
//! # Failure Modes
//!
//! A panicking listener unwinds through `broadcast`; listeners after it in
//! the same cycle are not called.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use guarded_tree_broadcast::{listener, ChangeBroadcaster};
//!
//! let seen = Rc::new(Cell::new(0));
//! let seen_clone = Rc::clone(&seen);
//! let on_change = listener(move |v: &i32| seen_clone.set(*v));
//!
//! let broadcaster = ChangeBroadcaster::new();
//! assert!(broadcaster.register(&on_change));
//! broadcaster.broadcast(&7);
//! assert_eq!(seen.get(), 7);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A change listener. Clone the `Rc` to keep a handle for unregistering.
pub type Listener<V> = Rc<dyn Fn(&V)>;

/// Wrap a closure as a [`Listener`].
pub fn listener<V>(f: impl Fn(&V) + 'static) -> Listener<V> {
    Rc::new(f)
}

pub struct ChangeBroadcaster<V> {
    listeners: RefCell<Vec<Listener<V>>>,
}

impl<V> Default for ChangeBroadcaster<V> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl<V> fmt::Debug for ChangeBroadcaster<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeBroadcaster")
            .field("listener_count", &self.count())
            .finish()
    }
}

impl<V> ChangeBroadcaster<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `listener` to the set.
    ///
    /// Returns `false` and logs a warning if it was already registered; the
    /// set is left unchanged in that case.
    pub fn register(&self, listener: &Listener<V>) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        if listeners.iter().any(|l| same_listener(l, listener)) {
            tracing::warn!(listener_count = listeners.len(), "listener was already registered");
            return false;
        }
        listeners.push(Rc::clone(listener));
        true
    }

    /// Remove `listener`. Returns `false` if it was not registered.
    pub fn unregister(&self, listener: &Listener<V>) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners.iter().position(|l| same_listener(l, listener)) {
            Some(idx) => {
                listeners.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Call every registered listener with `value`, in registration order.
    pub fn broadcast(&self, value: &V) {
        // Collect first so listeners can re-enter the registry.
        let snapshot: Vec<Listener<V>> = self.listeners.borrow().clone();
        tracing::trace!(listener_count = snapshot.len(), "broadcast");
        for listener in &snapshot {
            listener(value);
        }
    }

    pub fn count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn has_listeners(&self) -> bool {
        !self.listeners.borrow().is_empty()
    }
}

fn same_listener<V>(a: &Listener<V>, b: &Listener<V>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
