//! Atomic reference counting for objects that expose an explicit
//! `retain`/`release` contract on top of scope-based ownership.

use std::sync::atomic::{AtomicUsize, Ordering};

/// An atomic reference count that starts at one.
///
/// `release` never underflows: releasing an already released counter is a
/// programming error that panics in debug builds and is logged (and ignored)
/// otherwise.
#[derive(Debug)]
pub struct RefCount {
    count: AtomicUsize,
}

impl Default for RefCount {
    fn default() -> Self {
        RefCount::new()
    }
}

impl RefCount {
    /// Creates a counter holding a single reference.
    pub fn new() -> RefCount {
        RefCount {
            count: AtomicUsize::new(1),
        }
    }

    /// Adds a reference.
    pub fn retain(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Drops a reference. Returns `true` when this call released the last one.
    pub fn release(&self) -> bool {
        let prev = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                count.checked_sub(1)
            });
        match prev {
            Ok(prev) => prev == 1,
            Err(_) => {
                debug_assert!(false, "too many releases");
                log::error!("release called on an object with no outstanding references");
                false
            }
        }
    }

    /// Current number of outstanding references.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Returns `true` once every reference has been released.
    pub fn is_released(&self) -> bool {
        self.count() == 0
    }
}
