//! Replicant cells
//!
//! A replicant is a named, shared value with change notification. Every
//! handle cloned from the same replicant sees the same value.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

type Listener<T> = Arc<dyn Fn(&T, &T) + Send + Sync>;

struct Inner<T> {
    name: String,
    value: Mutex<T>,
    listeners: Mutex<Vec<Listener<T>>>,
}

/// Shared value cell with change listeners
pub struct Replicant<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Replicant<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Replicant<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// Creates a replicant holding `default`
    pub fn new(name: impl Into<String>, default: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                value: Mutex::new(default),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns a copy of the current value
    pub fn get(&self) -> T {
        lock(&self.inner.value).clone()
    }

    /// Replaces the value
    ///
    /// The value is always stored. Listeners are called with `(new, old)`
    /// only when it differs from the previous one, after the lock has been
    /// released so they may read or write other replicants.
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        let old = std::mem::replace(&mut *lock(&self.inner.value), value.clone());
        if old == value {
            return false;
        }

        debug!("Replicant {} changed", self.inner.name);
        let listeners: Vec<Listener<T>> = lock(&self.inner.listeners).clone();
        for listener in listeners {
            listener(&value, &old);
        }
        true
    }

    /// Registers a listener called with `(new, old)` on every change
    pub fn on_change<F>(&self, listener: F)
    where
        F: Fn(&T, &T) + Send + Sync + 'static,
    {
        lock(&self.inner.listeners).push(Arc::new(listener));
    }
}

impl<T: fmt::Debug> fmt::Debug for Replicant<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Replicant")
            .field("name", &self.inner.name)
            .field("value", &*lock(&self.inner.value))
            .finish()
    }
}

// A listener that panicked must not take the cell down with it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
