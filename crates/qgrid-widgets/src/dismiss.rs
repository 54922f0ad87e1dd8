#![forbid(unsafe_code)]

//! Scoped outside-interaction subscriptions.
//!
//! An open overlay needs two pieces of document-level state: a listener for
//! clicks and key presses outside of it, and (for modal-ish panels) a lock
//! on page scrolling. [`InteractionHub`] tracks both for one UI thread.
//! [`InteractionHub::subscribe`] hands out a [`Subscription`] guard and
//! dropping the guard releases everything it acquired, so every close path
//! (outside click, Escape, explicit dismissal, unmount) cleans up the same
//! way.
//!
//! The hub is single-threaded (`Rc`), matching the UI event loop it serves.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ahash::AHashSet;

#[derive(Debug, Default)]
struct HubInner {
    next_id: u64,
    active: AHashSet<u64>,
    scroll_locks: usize,
}

/// Registry of live outside-interaction subscriptions.
///
/// Cloning yields another handle to the same registry.
#[derive(Debug, Clone, Default)]
pub struct InteractionHub {
    inner: Rc<RefCell<HubInner>>,
}

impl InteractionHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an outside-interaction listener.
    ///
    /// With `lock_scroll`, the page scroll lock is held until the returned
    /// guard is dropped.
    #[must_use = "dropping the subscription releases it immediately"]
    pub fn subscribe(&self, lock_scroll: bool) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.active.insert(id);
        if lock_scroll {
            inner.scroll_locks += 1;
        }
        crate::trace!(id, lock_scroll, active = inner.active.len(), "dismiss.subscribe");
        Subscription {
            id,
            lock_scroll,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Number of live subscriptions.
    pub fn active(&self) -> usize {
        self.inner.borrow().active.len()
    }

    /// Whether the host should route document-level pointer and key events.
    pub fn is_listening(&self) -> bool {
        self.active() > 0
    }

    /// Whether any live subscription holds the scroll lock.
    pub fn is_scroll_locked(&self) -> bool {
        self.inner.borrow().scroll_locks > 0
    }
}

/// RAII guard for one outside-interaction listener.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    lock_scroll: bool,
    hub: Weak<RefCell<HubInner>>,
}

impl Subscription {
    /// Hub-unique id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether this subscription holds a share of the scroll lock.
    pub fn locks_scroll(&self) -> bool {
        self.lock_scroll
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.hub.upgrade() else {
            return;
        };
        let mut inner = inner.borrow_mut();
        if inner.active.remove(&self.id) && self.lock_scroll {
            inner.scroll_locks = inner.scroll_locks.saturating_sub(1);
        }
        crate::trace!(id = self.id, active = inner.active.len(), "dismiss.release");
    }
}
