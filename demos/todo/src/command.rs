//! Input lines to actions.
//!
//! One command per user gesture. Row numbers are the 1-based positions shown
//! by the last render and are resolved to ids against the same state, so the
//! reducer only ever sees ids it handed out itself.

use crate::router::parse_route;
use crate::types::{ItemId, TodoAction, TodoState};
use crate::view::ViewModel;
use thiserror::Error;

/// Draft line that cancels an open edit session
pub const CANCEL_EDIT: &str = ":cancel";

/// Help text for the shell
pub const HELP: &str = "\
commands:
  add <title>        add an item
  toggle <n>         flip item n
  all on|off         mark every item complete / active
  edit <n> [title]   retitle item n (no title: edit on the next line, :cancel aborts)
  rm <n>             delete item n
  clear              delete completed items
  #/all #/active #/completed
                     choose what to show
  help               this text
  quit               leave";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add <title>`
    Add(String),
    /// `toggle <n>`
    Toggle(usize),
    /// `all on|off`
    ToggleAll(bool),
    /// `edit <n> [title]`
    Edit {
        /// Row number
        row: usize,
        /// New title; `None` opens an interactive session
        title: Option<String>,
    },
    /// `rm <n>`
    Delete(usize),
    /// `clear`
    ClearCompleted,
    /// `#/<filter>`
    Route(String),
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Problems turning a line into actions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// First word is not a command
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    /// A required argument is missing or malformed
    #[error("usage: {0}")]
    Usage(&'static str),

    /// Row number outside the visible rows
    #[error("no item {0} in the current view")]
    NoSuchRow(usize),
}

impl Command {
    /// Parse one input line
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] for unknown commands and bad arguments.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with('/') {
            return Ok(Self::Route(line.to_string()));
        }

        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match word {
            "add" | "a" => Ok(Self::Add(rest.to_string())),
            "toggle" | "t" => parse_row(rest, "toggle <n>").map(Self::Toggle),
            "all" => match rest {
                "on" => Ok(Self::ToggleAll(true)),
                "off" => Ok(Self::ToggleAll(false)),
                _ => Err(CommandError::Usage("all on|off")),
            },
            "edit" | "e" => {
                let (row, title) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let row = parse_row(row, "edit <n> [title]")?;
                let title = (!title.trim().is_empty()).then(|| title.to_string());
                Ok(Self::Edit { row, title })
            },
            "rm" | "delete" => parse_row(rest, "rm <n>").map(Self::Delete),
            "clear" => Ok(Self::ClearCompleted),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// Actions for this command against the rows `state` currently shows
    ///
    /// `Help` and `Quit` produce no actions.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NoSuchRow`] when a row number is not visible.
    pub fn into_actions(self, state: &TodoState) -> Result<Vec<TodoAction>, CommandError> {
        let view = ViewModel::from_state(state);
        let id_at = |row: usize| -> Result<ItemId, CommandError> {
            view.row_id(row).cloned().ok_or(CommandError::NoSuchRow(row))
        };

        let actions = match self {
            Self::Add(title) => vec![TodoAction::Add { title }],
            Self::Toggle(row) => vec![TodoAction::Toggle { id: id_at(row)? }],
            Self::ToggleAll(completed) => vec![TodoAction::ToggleAll { completed }],
            Self::Edit {
                row,
                title: Some(title),
            } => vec![TodoAction::Edit {
                id: id_at(row)?,
                title,
            }],
            Self::Edit { row, title: None } => vec![TodoAction::BeginEdit { id: id_at(row)? }],
            Self::Delete(row) => vec![TodoAction::Delete { id: id_at(row)? }],
            Self::ClearCompleted => vec![TodoAction::DeleteCompleted],
            Self::Route(fragment) => vec![TodoAction::SetFilter {
                filter: parse_route(&fragment),
            }],
            Self::Help | Self::Quit => Vec::new(),
        };
        Ok(actions)
    }
}

/// Actions for a line typed while an edit session is open
///
/// The line is the new draft and ends the session; [`CANCEL_EDIT`] aborts it.
#[must_use]
pub fn edit_session_actions(line: &str) -> Vec<TodoAction> {
    if line.trim() == CANCEL_EDIT {
        vec![TodoAction::AbortEdit, TodoAction::EndEdit]
    } else {
        vec![
            TodoAction::UpdateDraft {
                text: line.to_string(),
            },
            TodoAction::EndEdit,
        ]
    }
}

fn parse_row(text: &str, usage: &'static str) -> Result<usize, CommandError> {
    text.trim().parse().map_err(|_| CommandError::Usage(usage))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;
    use crate::types::{Filter, Item};

    fn state() -> TodoState {
        TodoState {
            filter: Filter::Active,
            ..TodoState::with_items(vec![
                Item::new(ItemId::new("a"), "one"),
                Item {
                    completed: true,
                    ..Item::new(ItemId::new("b"), "two")
                },
                Item::new(ItemId::new("c"), "three"),
            ])
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("add  buy milk ").unwrap(), Command::Add("buy milk".into()));
        assert_eq!(Command::parse("toggle 2").unwrap(), Command::Toggle(2));
        assert_eq!(Command::parse("all off").unwrap(), Command::ToggleAll(false));
        assert_eq!(
            Command::parse("edit 1 new title").unwrap(),
            Command::Edit {
                row: 1,
                title: Some("new title".into())
            }
        );
        assert_eq!(
            Command::parse("edit 3").unwrap(),
            Command::Edit { row: 3, title: None }
        );
        assert_eq!(Command::parse("rm 1").unwrap(), Command::Delete(1));
        assert_eq!(Command::parse("#/completed").unwrap(), Command::Route("#/completed".into()));
        assert_eq!(Command::parse("q").unwrap(), Command::Quit);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(Command::parse("frobnicate"), Err(CommandError::Unknown("frobnicate".into())));
        assert_eq!(Command::parse("toggle x"), Err(CommandError::Usage("toggle <n>")));
        assert_eq!(Command::parse("all maybe"), Err(CommandError::Usage("all on|off")));
    }

    #[test]
    fn rows_resolve_against_filtered_view() {
        let actions = Command::Toggle(2).into_actions(&state()).unwrap();
        assert_eq!(actions, vec![TodoAction::Toggle { id: ItemId::new("c") }]);

        assert_eq!(
            Command::Delete(3).into_actions(&state()),
            Err(CommandError::NoSuchRow(3))
        );
    }

    #[test]
    fn edit_without_title_opens_session() {
        let actions = Command::Edit { row: 1, title: None }.into_actions(&state()).unwrap();
        assert_eq!(actions, vec![TodoAction::BeginEdit { id: ItemId::new("a") }]);
    }

    #[test]
    fn route_becomes_set_filter() {
        let actions = Command::Route("#/completed".into()).into_actions(&state()).unwrap();
        assert_eq!(
            actions,
            vec![TodoAction::SetFilter {
                filter: Filter::Completed
            }]
        );
    }

    #[test]
    fn session_lines() {
        assert_eq!(
            edit_session_actions(" :cancel "),
            vec![TodoAction::AbortEdit, TodoAction::EndEdit]
        );
        assert_eq!(
            edit_session_actions("new text"),
            vec![
                TodoAction::UpdateDraft {
                    text: "new text".into()
                },
                TodoAction::EndEdit
            ]
        );
    }
}
