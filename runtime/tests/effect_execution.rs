//! Integration tests for Store effect execution
//!
//! Covers ordering between `Run` and `Notify` and the FIFO order of feedback
//! actions, using the in-memory slot storage as the side effect.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use tasklist_core::environment::SlotStorage;
use tasklist_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use tasklist_runtime::Store;
use tasklist_testing::InMemorySlotStorage;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum NoteAction {
    /// Append a line and persist
    Append(String),
    /// Persist confirmed (fed back from the Run effect)
    Saved,
    /// Append several lines, each fed back by its own task
    AppendAll(Vec<String>),
}

#[derive(Debug, Default)]
struct NoteState {
    lines: Vec<String>,
    saves_confirmed: usize,
}

#[derive(Clone)]
struct NoteEnvironment {
    storage: Arc<dyn SlotStorage>,
}

struct NoteReducer;

impl Reducer for NoteReducer {
    type State = NoteState;
    type Action = NoteAction;
    type Environment = NoteEnvironment;

    fn reduce(
        &self,
        state: &mut NoteState,
        action: NoteAction,
        env: &NoteEnvironment,
    ) -> SmallVec<[Effect<NoteAction>; 4]> {
        match action {
            NoteAction::Append(line) => {
                state.lines.push(line);
                let text = state.lines.join("\n");
                let storage = Arc::clone(&env.storage);
                smallvec![
                    Effect::run(move || {
                        storage.write("notes", &text).ok()?;
                        Some(NoteAction::Saved)
                    }),
                    Effect::Notify,
                ]
            },
            NoteAction::Saved => {
                state.saves_confirmed += 1;
                SmallVec::new()
            },
            NoteAction::AppendAll(lines) => lines
                .into_iter()
                .map(|line| Effect::run(move || Some(NoteAction::Append(line))))
                .collect(),
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

fn store_with(
    storage: &InMemorySlotStorage,
) -> Store<NoteState, NoteAction, NoteEnvironment, NoteReducer> {
    Store::new(
        NoteState::default(),
        NoteReducer,
        NoteEnvironment {
            storage: Arc::new(storage.clone()),
        },
    )
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn subscribers_see_state_after_persistence() {
    init_tracing();
    let storage = InMemorySlotStorage::new();
    let mut store = store_with(&storage);

    let observed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&observed);
    let written = storage.clone();
    store.subscribe(move |state: &NoteState| {
        sink.borrow_mut()
            .push((state.lines.len(), written.contents("notes")));
    });

    store.send(NoteAction::Append("first".into())).unwrap();
    store.send(NoteAction::Append("second".into())).unwrap();

    assert_eq!(
        *observed.borrow(),
        vec![
            (1, Some("first".to_string())),
            (2, Some("first\nsecond".to_string())),
        ]
    );
}

#[test]
fn feedback_actions_are_applied_before_send_returns() {
    init_tracing();
    let storage = InMemorySlotStorage::new();
    let mut store = store_with(&storage);

    store.send(NoteAction::Append("only".into())).unwrap();

    assert_eq!(store.state(|s| s.saves_confirmed), 1);
    assert_eq!(storage.write_count(), 1);
}

#[test]
fn feedback_actions_run_in_queue_order() {
    init_tracing();
    let storage = InMemorySlotStorage::new();
    let mut store = store_with(&storage);

    store
        .send(NoteAction::AppendAll(vec!["a".into(), "b".into(), "c".into()]))
        .unwrap();

    store.state(|s| {
        assert_eq!(s.lines, ["a", "b", "c"]);
        assert_eq!(s.saves_confirmed, 3);
    });
    assert_eq!(storage.contents("notes").as_deref(), Some("a\nb\nc"));
}

#[test]
fn environment_is_reachable() {
    let storage = InMemorySlotStorage::new();
    let store = store_with(&storage);
    store.environment().storage.write("scratch", "x").unwrap();
    assert_eq!(storage.contents("scratch").as_deref(), Some("x"));
}
