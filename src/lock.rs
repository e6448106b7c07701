//! Exclusive-access lock owned by each bit vector.
//!
//! `VectorLock` is a thin wrapper around `parking_lot::Mutex`. It is neither
//! `Clone` nor `Copy`, so a vector's lock identity can never be duplicated.
//! Guards release on drop, including early returns.
//!
//! The lock is not reentrant: calling back into the same vector while holding
//! its guard deadlocks.

use parking_lot::{Mutex, MutexGuard};

/// Mutual-exclusion lock guarding a vector's words.
pub struct VectorLock<T> {
    inner: Mutex<T>,
}

impl<T> VectorLock<T> {
    /// Wrap `value` in a new, unlocked lock.
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    /// Block until the lock is acquired.
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock()
    }

    /// Acquire the lock only if it is free right now.
    #[inline]
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        self.inner.try_lock()
    }
}
