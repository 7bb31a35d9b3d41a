use std::vec::Vec;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

///####################################################################################
/// ObjectPool
///####################################################################################

/// Append only arena of objects addressed by their index.
/// Items live as long as the pool; an octree is rebuilt as a whole instead of freeing parts of it.
#[derive(Default, Clone, Debug)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub(crate) struct ObjectPool<T> {
    buffer: Vec<T>,
}

impl<T> ObjectPool<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        ObjectPool {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Stores the item, returning the key it can be accessed with
    pub(crate) fn push(&mut self, item: T) -> usize {
        self.buffer.push(item);
        self.buffer.len() - 1
    }

    pub(crate) fn get(&self, key: usize) -> &T {
        debug_assert!(self.key_is_valid(key));
        &self.buffer[key]
    }

    pub(crate) fn get_mut(&mut self, key: usize) -> &mut T {
        debug_assert!(self.key_is_valid(key));
        &mut self.buffer[key]
    }

    pub(crate) fn key_is_valid(&self, key: usize) -> bool {
        key < self.buffer.len()
    }
}
