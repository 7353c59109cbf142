//! Task list built on the tasklist reducer architecture.
//!
//! Items can be added, retitled, completed, filtered and deleted. The list is
//! written to a storage slot after every change and read back at start-up.
//!
//! - [`types`]: items, filters, the edit session and [`TodoAction`]
//! - [`reducer`]: [`TodoReducer`], the list controller
//! - [`storage`]: [`TodoStorage`] and the file-backed slot storage
//! - [`router`], [`view`], [`command`]: the terminal front end
//! - [`config`]: settings for the binary
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use tasklist_core::environment::UuidGenerator;
//! use tasklist_runtime::Store;
//! use tasklist_testing::InMemorySlotStorage;
//! use todo::{Filter, TodoAction, TodoEnvironment, TodoReducer, TodoState, TodoStorage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = TodoStorage::new(Arc::new(InMemorySlotStorage::new()), "todos");
//! let env = TodoEnvironment::new(Arc::new(UuidGenerator), storage.clone());
//! let mut store = Store::new(TodoState::with_items(storage.load()), TodoReducer::new(), env);
//!
//! store.send(TodoAction::Add { title: "buy milk".to_string() })?;
//! let id = store.state(|s| s.items[0].id.clone());
//! store.send(TodoAction::Toggle { id })?;
//! store.send(TodoAction::SetFilter { filter: Filter::Active })?;
//!
//! assert!(store.state(|s| s.filtered_items().is_empty()));
//! assert_eq!(storage.load().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod reducer;
pub mod router;
pub mod storage;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use reducer::{TodoEnvironment, TodoReducer};
pub use storage::{FileSlotStorage, TodoStorage};
pub use types::{Counts, EditSession, Filter, Item, ItemId, TodoAction, TodoState};
