//! # Tasklist Testing
//!
//! Testing utilities and helpers for the tasklist reducer architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Property-based testing strategies
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_testing::{InMemorySlotStorage, SequentialIdGenerator};
//!
//! let storage = InMemorySlotStorage::new();
//! let env = TodoEnvironment::new(
//!     Arc::new(SequentialIdGenerator::new()),
//!     TodoStorage::new(Arc::new(storage.clone()), "todos"),
//! );
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tasklist_core::environment::{IdGenerator, SlotStorage, StorageError};


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{
        Arc, AtomicU64, HashMap, IdGenerator, Mutex, Ordering, SlotStorage, StorageError,
    };

    /// Predictable id generator: `id-1`, `id-2`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use tasklist_testing::mocks::SequentialIdGenerator;
    /// use tasklist_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new();
    /// assert_eq!(ids.next_id(), "id-1");
    /// assert_eq!(ids.next_id(), "id-2");
    /// ```
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator starting at `id-1`
        #[must_use]
        pub const fn new() -> Self {
            Self {
                next: AtomicU64::new(0),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
            format!("id-{n}")
        }
    }

    /// In-memory slot storage
    ///
    /// Clones share the same slots, so a test can keep a handle and inspect
    /// what the code under test wrote.
    #[derive(Debug, Clone, Default)]
    pub struct InMemorySlotStorage {
        slots: Arc<Mutex<HashMap<String, String>>>,
        writes: Arc<AtomicU64>,
    }

    impl InMemorySlotStorage {
        /// Create empty storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create storage with one slot already filled
        #[must_use]
        pub fn with_slot(slot: &str, contents: &str) -> Self {
            let storage = Self::new();
            if let Ok(mut slots) = storage.slots.lock() {
                slots.insert(slot.to_string(), contents.to_string());
            }
            storage
        }

        /// Current contents of a slot
        #[must_use]
        pub fn contents(&self, slot: &str) -> Option<String> {
            self.slots.lock().ok()?.get(slot).cloned()
        }

        /// Number of successful writes so far
        #[must_use]
        pub fn write_count(&self) -> u64 {
            self.writes.load(Ordering::Relaxed)
        }
    }

    impl SlotStorage for InMemorySlotStorage {
        fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
            let slots = self
                .slots
                .lock()
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            Ok(slots.get(slot).cloned())
        }

        fn write(&self, slot: &str, contents: &str) -> Result<(), StorageError> {
            let mut slots = self
                .slots
                .lock()
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            slots.insert(slot.to_string(), contents.to_string());
            self.writes.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    /// Storage whose every operation fails
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FailingSlotStorage;

    impl SlotStorage for FailingSlotStorage {
        fn read(&self, _slot: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("read refused".to_string()))
        }

        fn write(&self, _slot: &str, _contents: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("write refused".to_string()))
        }
    }
}

/// Property-based testing strategies
pub mod properties {
    use proptest::prelude::*;

    /// Titles that survive trimming: visible text with optional padding
    pub fn title() -> impl Strategy<Value = String> {
        ("[ \t]{0,3}", "[a-zA-Z0-9][a-zA-Z0-9 .,!?-]{0,30}", "[ \t]{0,3}")
            .prop_map(|(lead, body, trail)| format!("{lead}{body}{trail}"))
    }

    /// Titles that trim to nothing
    pub fn blank_title() -> impl Strategy<Value = String> {
        "[ \t\n]{0,6}"
    }

    /// Either kind of title, roughly one blank in four
    pub fn any_title() -> impl Strategy<Value = String> {
        prop_oneof![3 => title(), 1 => blank_title()]
    }
}

// Re-export commonly used items
pub use mocks::{FailingSlotStorage, InMemorySlotStorage, SequentialIdGenerator};

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;

    #[test]
    fn sequential_ids_are_distinct() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.next_id(), "id-1");
        assert_eq!(ids.next_id(), "id-2");
    }

    #[test]
    fn in_memory_storage_shares_slots_between_clones() {
        let storage = InMemorySlotStorage::new();
        let handle = storage.clone();

        assert_eq!(storage.read("todos").unwrap(), None);
        storage.write("todos", "[]").unwrap();

        assert_eq!(handle.contents("todos").as_deref(), Some("[]"));
        assert_eq!(handle.write_count(), 1);
    }

    #[test]
    fn failing_storage_fails() {
        assert!(FailingSlotStorage.read("todos").is_err());
        assert!(FailingSlotStorage.write("todos", "[]").is_err());
    }
}
