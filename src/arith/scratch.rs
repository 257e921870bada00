//! Reusable scratch values.
//!
//! Modular accumulations allocate big-integer temporaries on every call. A
//! [`ScratchPool`] keeps released temporaries around; callers borrow one
//! through a [`Checkout`] guard that resets the value and returns it to the
//! pool when dropped. Acquiring and releasing are the only synchronization
//! points.

use core::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

const MAX_IDLE: usize = 64;

pub struct ScratchPool<T> {
    idle: Mutex<Vec<T>>,
    make: fn() -> T,
    reset: fn(&mut T),
}

impl<T> ScratchPool<T> {
    pub const fn new(make: fn() -> T, reset: fn(&mut T)) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            make,
            reset,
        }
    }

    /// Borrows a value, creating one when the pool is empty.
    pub fn checkout(&self) -> Checkout<'_, T> {
        let recycled = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        Checkout {
            pool: self,
            value: Some(recycled.unwrap_or_else(self.make)),
        }
    }

    /// Number of values waiting for reuse.
    pub fn idle(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn release(&self, mut value: T) {
        (self.reset)(&mut value);
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < MAX_IDLE {
            idle.push(value);
        }
    }
}

impl<T> core::fmt::Debug for ScratchPool<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScratchPool")
            .field("idle", &self.idle())
            .finish()
    }
}

/// Scoped loan from a [`ScratchPool`].
pub struct Checkout<'a, T> {
    pool: &'a ScratchPool<T>,
    value: Option<T>,
}

impl<T> Deref for Checkout<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value.as_ref().expect("checkout holds a value until dropped")
    }
}

impl<T> DerefMut for Checkout<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value.as_mut().expect("checkout holds a value until dropped")
    }
}

impl<T> Drop for Checkout<'_, T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.release(value);
        }
    }
}
