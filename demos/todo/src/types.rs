//! Domain types for the task list.
//!
//! A task list is an ordered collection of items plus the view filter and the
//! edit session the user may have open. Only the items are persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque unique identifier for an item
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wraps an identifier string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, fixed at creation
    pub id: ItemId,
    /// Display text, trimmed and never blank
    pub title: String,
    /// Whether the task is done
    #[serde(default)]
    pub completed: bool,
}

impl Item {
    /// Creates an active item
    #[must_use]
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
        }
    }
}

/// View selector over the collection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every item
    #[default]
    All,
    /// Items not yet completed
    Active,
    /// Completed items
    Completed,
}

impl Filter {
    /// Every filter, in display order
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Whether `item` is visible under this filter
    #[must_use]
    pub const fn matches(self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.completed,
            Self::Completed => item.completed,
        }
    }

    /// Lowercase name, as used in routes
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a filter name that is none of `all`, `active`, `completed`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter: {0}")]
pub struct UnknownFilter(pub String);

impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(UnknownFilter(s.to_string())),
        }
    }
}

/// An in-progress edit of one item's title
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditSession {
    /// Item being edited
    pub id: ItemId,
    /// Text currently in the edit field
    pub draft: String,
    /// Set by cancel; the session then ends without touching the title
    pub aborted: bool,
}

impl EditSession {
    /// Opens a session whose draft starts as the current title
    #[must_use]
    pub fn open(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            draft: item.title.clone(),
            aborted: false,
        }
    }
}

/// Active and completed totals
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    /// Items with `completed == false`
    pub active: usize,
    /// Items with `completed == true`
    pub completed: usize,
}

impl Counts {
    /// Total number of items
    #[must_use]
    pub const fn total(self) -> usize {
        self.active + self.completed
    }
}

/// State of the task list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    /// Items in insertion order
    pub items: Vec<Item>,
    /// Current view filter (not persisted)
    pub filter: Filter,
    /// Open edit session, if any (not persisted)
    pub editing: Option<EditSession>,
    /// Why the last save failed; cleared by the next change
    pub save_error: Option<String>,
}

impl TodoState {
    /// Creates an empty list showing everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list from previously loaded items
    #[must_use]
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list has no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of the item with `id`
    #[must_use]
    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// Item with `id`
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// Items not yet completed
    #[must_use]
    pub fn active_items(&self) -> Vec<&Item> {
        self.items.iter().filter(|item| !item.completed).collect()
    }

    /// Completed items
    #[must_use]
    pub fn completed_items(&self) -> Vec<&Item> {
        self.items.iter().filter(|item| item.completed).collect()
    }

    /// Items visible under the current filter
    #[must_use]
    pub fn filtered_items(&self) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| self.filter.matches(item))
            .collect()
    }

    /// Active and completed totals
    #[must_use]
    pub fn counts(&self) -> Counts {
        let active = self.items.iter().filter(|item| !item.completed).count();
        Counts {
            active,
            completed: self.items.len() - active,
        }
    }

    /// True when nothing is left to do (drives the toggle-all checkbox)
    #[must_use]
    pub fn all_completed(&self) -> bool {
        self.counts().active == 0
    }

    /// Whether `id` is the item under edit
    #[must_use]
    pub fn is_editing(&self, id: &ItemId) -> bool {
        self.editing.as_ref().is_some_and(|session| &session.id == id)
    }
}

/// Every user action the list understands
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    /// Append a new item; blank titles are ignored
    Add {
        /// Raw title as typed
        title: String,
    },

    /// Flip one item's completed flag
    Toggle {
        /// Item to flip
        id: ItemId,
    },

    /// Set every item's completed flag
    ToggleAll {
        /// New value for all items
        completed: bool,
    },

    /// Replace a title; a blank title deletes the item
    Edit {
        /// Item to edit
        id: ItemId,
        /// Raw title as typed
        title: String,
    },

    /// Remove one item
    Delete {
        /// Item to remove
        id: ItemId,
    },

    /// Remove every completed item and show all
    DeleteCompleted,

    /// Change the view filter
    SetFilter {
        /// Filter to show
        filter: Filter,
    },

    /// Enter edit mode for an item
    BeginEdit {
        /// Item to edit
        id: ItemId,
    },

    /// Replace the open session's draft
    UpdateDraft {
        /// Current contents of the edit field
        text: String,
    },

    /// Cancel the open session; takes effect at `EndEdit`
    AbortEdit,

    /// Leave edit mode, committing the draft unless aborted
    EndEdit,

    /// Fed back by the persist effect when the write fails
    PersistFailed {
        /// Storage error, as displayed
        message: String,
    },
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;

    fn item(id: &str, title: &str, completed: bool) -> Item {
        Item {
            id: ItemId::new(id),
            title: title.to_string(),
            completed,
        }
    }

    fn sample_state() -> TodoState {
        TodoState::with_items(vec![
            item("a", "buy milk", false),
            item("b", "walk dog", true),
            item("c", "write report", false),
        ])
    }

    #[test]
    fn counts_split_active_and_completed() {
        let state = sample_state();
        assert_eq!(
            state.counts(),
            Counts {
                active: 2,
                completed: 1
            }
        );
        assert_eq!(state.counts().total(), state.len());
        assert!(!state.all_completed());
    }

    #[test]
    fn filtered_items_follow_filter() {
        let mut state = sample_state();
        assert_eq!(state.filtered_items().len(), 3);

        state.filter = Filter::Active;
        let titles: Vec<_> = state.filtered_items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["buy milk", "write report"]);

        state.filter = Filter::Completed;
        assert_eq!(state.filtered_items().len(), 1);
        assert_eq!(state.filtered_items()[0].id, ItemId::new("b"));
    }

    #[test]
    fn position_is_none_for_unknown_id() {
        let state = sample_state();
        assert_eq!(state.position(&ItemId::new("c")), Some(2));
        assert_eq!(state.position(&ItemId::new("zzz")), None);
    }

    #[test]
    fn empty_list_counts_as_all_completed() {
        assert!(TodoState::new().all_completed());
    }

    #[test]
    fn filter_parses_case_insensitively() {
        assert_eq!("Active".parse::<Filter>().unwrap(), Filter::Active);
        assert_eq!("completed".parse::<Filter>().unwrap(), Filter::Completed);
        assert!("done".parse::<Filter>().is_err());
        for filter in Filter::ALL {
            assert_eq!(filter.to_string().parse::<Filter>().unwrap(), filter);
        }
    }

    #[test]
    fn item_serializes_as_flat_record() {
        let json = serde_json::to_string(&item("a", "buy milk", true)).unwrap();
        assert_eq!(json, r#"{"id":"a","title":"buy milk","completed":true}"#);
    }

    #[test]
    fn edit_session_starts_from_title() {
        let session = EditSession::open(&item("a", "buy milk", false));
        assert_eq!(session.draft, "buy milk");
        assert!(!session.aborted);
    }
}
