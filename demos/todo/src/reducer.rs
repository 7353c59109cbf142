//! Reducer logic for the task list.
//!
//! Every mutating action ends with two effects: a `Run` that writes the full
//! item list to storage, then a `Notify` so the view redraws. A failed write
//! feeds `PersistFailed` back so the view can report it. Actions that change
//! nothing (blank titles, ids that are not in the list) return no effects at
//! all.

use crate::storage::TodoStorage;
use crate::types::{EditSession, Filter, Item, ItemId, TodoAction, TodoState};
use std::sync::Arc;
use tasklist_core::{
    SmallVec, effect::Effect, environment::IdGenerator, reducer::Reducer, smallvec,
};

/// Effects returned by the reducer
type Effects = SmallVec<[Effect<TodoAction>; 4]>;

/// Environment dependencies for the task-list reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Source of fresh item ids
    pub ids: Arc<dyn IdGenerator>,
    /// Where the item list is persisted
    pub storage: TodoStorage,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>, storage: TodoStorage) -> Self {
        Self { ids, storage }
    }
}

/// What a title change did to the list
enum TitleChange {
    Renamed,
    Deleted,
    NotFound,
}

/// Reducer for the task list
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Writes the current items, then asks the view to redraw
    fn persist_and_render(state: &mut TodoState, env: &TodoEnvironment) -> Effects {
        state.save_error = None;
        let items = state.items.clone();
        let storage = env.storage.clone();

        smallvec![
            Effect::run(move || {
                let error = storage.save(&items).err()?;
                tracing::error!(slot = storage.slot(), %error, "Failed to persist items");
                Some(TodoAction::PersistFailed {
                    message: error.to_string(),
                })
            }),
            Effect::Notify,
        ]
    }

    /// Draws an id the list does not already contain
    fn fresh_id(state: &TodoState, env: &TodoEnvironment) -> ItemId {
        loop {
            let id = ItemId::new(env.ids.next_id());
            if state.position(&id).is_none() {
                return id;
            }
            tracing::warn!(%id, "Id generator returned an id already in use, retrying");
        }
    }

    /// Removes the item with `id`, closing its edit session if open
    fn remove(state: &mut TodoState, id: &ItemId) -> bool {
        let Some(index) = state.position(id) else {
            return false;
        };
        state.items.remove(index);
        if state.is_editing(id) {
            state.editing = None;
        }
        true
    }

    /// Sets a trimmed title, or deletes the item if it trims to nothing.
    /// An open session on the item keeps its draft in step with the title.
    fn change_title(state: &mut TodoState, id: &ItemId, title: &str) -> TitleChange {
        let title = title.trim();
        if title.is_empty() {
            return if Self::remove(state, id) {
                TitleChange::Deleted
            } else {
                TitleChange::NotFound
            };
        }
        let Some(item) = state.get_mut(id) else {
            return TitleChange::NotFound;
        };
        title.clone_into(&mut item.title);
        if let Some(session) = state.editing.as_mut().filter(|session| &session.id == id) {
            title.clone_into(&mut session.draft);
        }
        TitleChange::Renamed
    }

    /// Closes `session`, committing its draft unless it was aborted.
    /// Returns true when the items changed.
    fn finish_session(state: &mut TodoState, session: EditSession) -> bool {
        if session.aborted {
            tracing::debug!(id = %session.id, "Edit aborted, title unchanged");
            return false;
        }
        !matches!(
            Self::change_title(state, &session.id, &session.draft),
            TitleChange::NotFound
        )
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(&self, state: &mut TodoState, action: TodoAction, env: &TodoEnvironment) -> Effects {
        match action {
            TodoAction::Add { title } => {
                let title = title.trim();
                if title.is_empty() {
                    tracing::trace!("Ignoring blank title");
                    return SmallVec::new();
                }
                let id = Self::fresh_id(state, env);
                tracing::debug!(%id, "Adding item");
                state.items.push(Item::new(id, title));
                Self::persist_and_render(state, env)
            },

            TodoAction::Toggle { id } => match state.get_mut(&id) {
                Some(item) => {
                    item.completed = !item.completed;
                    Self::persist_and_render(state, env)
                },
                None => {
                    tracing::trace!(%id, "Toggle for unknown id ignored");
                    SmallVec::new()
                },
            },

            TodoAction::ToggleAll { completed } => {
                for item in &mut state.items {
                    item.completed = completed;
                }
                Self::persist_and_render(state, env)
            },

            TodoAction::Edit { id, title } => match Self::change_title(state, &id, &title) {
                TitleChange::Renamed | TitleChange::Deleted => Self::persist_and_render(state, env),
                TitleChange::NotFound => {
                    tracing::trace!(%id, "Edit for unknown id ignored");
                    SmallVec::new()
                },
            },

            TodoAction::Delete { id } => {
                if Self::remove(state, &id) {
                    Self::persist_and_render(state, env)
                } else {
                    tracing::trace!(%id, "Delete for unknown id ignored");
                    SmallVec::new()
                }
            },

            TodoAction::DeleteCompleted => {
                state.items.retain(|item| !item.completed);
                if state
                    .editing
                    .as_ref()
                    .is_some_and(|session| state.position(&session.id).is_none())
                {
                    state.editing = None;
                }
                state.filter = Filter::All;
                Self::persist_and_render(state, env)
            },

            TodoAction::SetFilter { filter } => {
                state.filter = filter;
                smallvec![Effect::Notify]
            },

            TodoAction::BeginEdit { id } => {
                // Opening another item ends the current session, as losing focus would.
                let previous = state.editing.take();
                let closed = previous.is_some();
                let changed = previous.is_some_and(|previous| Self::finish_session(state, previous));

                let Some(session) = state.get(&id).map(EditSession::open) else {
                    return if changed {
                        Self::persist_and_render(state, env)
                    } else if closed {
                        smallvec![Effect::Notify]
                    } else {
                        SmallVec::new()
                    };
                };
                state.editing = Some(session);

                if changed {
                    Self::persist_and_render(state, env)
                } else {
                    smallvec![Effect::Notify]
                }
            },

            TodoAction::UpdateDraft { text } => {
                if let Some(session) = state.editing.as_mut() {
                    session.draft = text;
                }
                SmallVec::new()
            },

            TodoAction::AbortEdit => {
                if let Some(session) = state.editing.as_mut() {
                    session.aborted = true;
                }
                SmallVec::new()
            },

            TodoAction::EndEdit => {
                let Some(session) = state.editing.take() else {
                    return SmallVec::new();
                };
                if Self::finish_session(state, session) {
                    Self::persist_and_render(state, env)
                } else {
                    smallvec![Effect::Notify]
                }
            },

            TodoAction::PersistFailed { message } => {
                state.save_error = Some(message);
                smallvec![Effect::Notify]
            },
        }
    }
}
