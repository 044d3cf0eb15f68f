//! Process-wide lookup from native window handle to per-window state.
//!
//! The window procedure only receives a handle, so it recovers its window's
//! state here. Entries are added when a window is created and removed when
//! it is destroyed.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

pub struct WindowRegistry<V> {
    entries: RwLock<HashMap<isize, Arc<V>>>,
}

impl<V> Default for WindowRegistry<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> WindowRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` under `handle`, returning any previous entry.
    pub fn insert(&self, handle: isize, value: Arc<V>) -> Option<Arc<V>> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle, value)
    }

    pub fn get(&self, handle: isize) -> Option<Arc<V>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&handle)
            .cloned()
    }

    pub fn remove(&self, handle: isize) -> Option<Arc<V>> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
