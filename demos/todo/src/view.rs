//! Terminal rendering of the list.
//!
//! [`ViewModel`] is everything a renderer needs, computed from state alone;
//! [`render`] turns it into text.

use crate::router::route_for;
use crate::types::{Filter, ItemId, TodoState};

/// One visible row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Item behind the row
    pub id: ItemId,
    /// Title, or the live draft when the row is being edited
    pub text: String,
    /// Completed flag
    pub completed: bool,
    /// Whether the row is in edit mode
    pub editing: bool,
}

/// Footer shown whenever the list is non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    /// Number of active items
    pub active_count: usize,
    /// "item" or "items"
    pub active_word: &'static str,
    /// Number of completed items; the clear button is hidden at zero
    pub completed_count: usize,
    /// Selected filter
    pub filter: Filter,
}

/// Derived data a renderer draws from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    /// Rows under the current filter, in list order
    pub rows: Vec<Row>,
    /// The main section is hidden when no row is visible
    pub show_main: bool,
    /// Toggle-all checkbox state
    pub toggle_all_checked: bool,
    /// Footer, absent when the list is empty
    pub footer: Option<Footer>,
    /// Why the last save failed, if it did
    pub save_error: Option<String>,
}

impl ViewModel {
    /// Compute the view for `state`
    #[must_use]
    pub fn from_state(state: &TodoState) -> Self {
        let rows: Vec<Row> = state
            .filtered_items()
            .into_iter()
            .map(|item| {
                let session = state.editing.as_ref().filter(|s| s.id == item.id);
                Row {
                    id: item.id.clone(),
                    text: session.map_or_else(|| item.title.clone(), |s| s.draft.clone()),
                    completed: item.completed,
                    editing: session.is_some(),
                }
            })
            .collect();

        let counts = state.counts();
        let footer = (!state.is_empty()).then(|| Footer {
            active_count: counts.active,
            active_word: pluralize(counts.active, "item", "items"),
            completed_count: counts.completed,
            filter: state.filter,
        });

        Self {
            show_main: !rows.is_empty(),
            rows,
            toggle_all_checked: state.all_completed(),
            footer,
            save_error: state.save_error.clone(),
        }
    }

    /// Id of the 1-based visible row `number`
    #[must_use]
    pub fn row_id(&self, number: usize) -> Option<&ItemId> {
        number
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
            .map(|row| &row.id)
    }
}

/// Singular for exactly one, plural otherwise
#[must_use]
pub const fn pluralize(count: usize, singular: &'static str, plural: &'static str) -> &'static str {
    if count == 1 { singular } else { plural }
}

/// Draw the view as plain text
#[must_use]
pub fn render(view: &ViewModel) -> String {
    let mut out = String::new();

    if view.show_main {
        let toggle = if view.toggle_all_checked { "[x]" } else { "[ ]" };
        out.push_str(&format!("{toggle} mark all as complete\n"));
        for (number, row) in view.rows.iter().enumerate() {
            let check = if row.completed { "[x]" } else { "[ ]" };
            let text = if row.editing {
                format!("> {}_", row.text)
            } else {
                row.text.clone()
            };
            out.push_str(&format!("{:>3}. {check} {text}\n", number + 1));
        }
    }

    if let Some(footer) = &view.footer {
        let links: Vec<String> = Filter::ALL
            .into_iter()
            .map(|filter| {
                let marker = if filter == footer.filter { "*" } else { " " };
                format!("{marker}{}", route_for(filter))
            })
            .collect();
        out.push_str(&format!(
            "{} {} left | {}",
            footer.active_count,
            footer.active_word,
            links.join(" ")
        ));
        if footer.completed_count > 0 {
            out.push_str(&format!(" | clear completed ({})", footer.completed_count));
        }
        out.push('\n');
    }

    if let Some(error) = &view.save_error {
        out.push_str(&format!("! changes not saved: {error}\n"));
    }

    out
}
