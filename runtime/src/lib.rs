//! # Tasklist Runtime
//!
//! Runtime implementation for the tasklist reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, reducer and environment; executes effects
//! - **Effect Executor**: Runs effect descriptions and feeds actions back to the reducer
//! - **Subscribers**: Observers told to redraw whenever a reducer emits `Effect::Notify`
//!
//! Execution is synchronous. `send` returns only after the action, every
//! effect it produced and every follow-up action have been processed, so
//! callers observe operations as atomic.
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//! store.subscribe(|state| redraw(state));
//!
//! store.send(Action::DoSomething)?;
//!
//! let value = store.state(|s| s.some_field);
//! ```

use std::collections::VecDeque;
use tasklist_core::{effect::Effect, reducer::Reducer};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, PartialEq, Eq)]
    pub enum StoreError {
        /// Effects kept feeding actions back past the configured limit
        ///
        /// State reflects every action processed before the limit was hit.
        #[error("Processed {0} actions in a single send; feedback loop aborted")]
        FeedbackLimitExceeded(usize),
    }
}

pub use error::StoreError;

/// Store configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Upper bound on actions processed by one `send` (the initial action included)
    pub max_actions_per_send: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_actions_per_send: 64,
        }
    }
}

impl StoreConfig {
    /// Set the feedback limit
    #[must_use]
    pub const fn with_max_actions_per_send(mut self, max: usize) -> Self {
        self.max_actions_per_send = max;
        self
    }
}

/// Observer called with the current state on every `Effect::Notify`
type Subscriber<S> = Box<dyn FnMut(&S)>;

/// The Store - runtime coordinator for a reducer
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: S,
    reducer: R,
    environment: E,
    config: StoreConfig,
    subscribers: Vec<Subscriber<S>>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    A: std::fmt::Debug,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// Uses [`StoreConfig::default`].
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_config(initial_state, reducer, environment, StoreConfig::default())
    }

    /// Create a new Store with custom configuration
    #[must_use]
    pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
        Self {
            state: initial_state,
            reducer,
            environment,
            config,
            subscribers: Vec::new(),
        }
    }

    /// Register an observer for `Effect::Notify`
    ///
    /// Observers are called in registration order with the post-action state.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&S) + 'static,
    {
        self.subscribers.push(Box::new(listener));
        tracing::trace!(subscribers = self.subscribers.len(), "Subscriber registered");
    }

    /// Send an action to the store
    ///
    /// Runs the reducer, executes the returned effects in order, and keeps
    /// going until no effect feeds back another action.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::FeedbackLimitExceeded`] when more than
    /// `max_actions_per_send` actions would be processed. The remaining
    /// queued actions are dropped.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub fn send(&mut self, action: A) -> Result<(), StoreError> {
        let mut queue = VecDeque::from([action]);
        let mut processed = 0usize;

        while let Some(action) = queue.pop_front() {
            if processed == self.config.max_actions_per_send {
                tracing::error!(
                    processed,
                    dropped = queue.len() + 1,
                    "Feedback limit reached, dropping remaining actions"
                );
                return Err(StoreError::FeedbackLimitExceeded(processed));
            }
            processed += 1;

            tracing::debug!(?action, "Processing action");

            let effects = {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();
                self.reducer.reduce(&mut self.state, action, &self.environment)
            };

            tracing::trace!("Reducer completed, returned {} effects", effects.len());

            for effect in effects {
                self.execute_effect(effect, &mut queue);
            }
        }

        tracing::debug!(processed, "Action processing completed");
        Ok(())
    }

    /// Read current state via a closure
    ///
    /// ```ignore
    /// let item_count = store.state(|s| s.items.len());
    /// ```
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&self.state)
    }

    /// Borrow the injected environment
    #[must_use]
    pub const fn environment(&self) -> &E {
        &self.environment
    }

    /// Execute a single effect
    ///
    /// - `Notify`: Calls every subscriber with the current state
    /// - `Run`: Runs the task now; a returned action joins the feedback queue
    fn execute_effect(&mut self, effect: Effect<A>, queue: &mut VecDeque<A>) {
        match effect {
            Effect::Notify => {
                tracing::trace!(
                    "Executing Effect::Notify for {} subscribers",
                    self.subscribers.len()
                );
                for subscriber in &mut self.subscribers {
                    subscriber(&self.state);
                }
            },
            Effect::Run(task) => {
                tracing::trace!("Executing Effect::Run");
                if let Some(action) = task() {
                    tracing::trace!(?action, "Effect::Run produced an action, queueing");
                    queue.push_back(action);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tasklist_core::{SmallVec, smallvec};

    #[derive(Debug, Default)]
    struct CounterState {
        count: i64,
    }

    #[derive(Debug)]
    enum CounterAction {
        Increment,
        Ignored,
        IncrementTwiceViaFeedback,
        Forever,
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = CounterState;
        type Action = CounterAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut CounterState,
            action: CounterAction,
            _env: &(),
        ) -> SmallVec<[Effect<CounterAction>; 4]> {
            match action {
                CounterAction::Increment => {
                    state.count += 1;
                    smallvec![Effect::Notify]
                },
                CounterAction::Ignored => SmallVec::new(),
                CounterAction::IncrementTwiceViaFeedback => smallvec![
                    Effect::run(|| Some(CounterAction::Increment)),
                    Effect::run(|| Some(CounterAction::Increment)),
                ],
                CounterAction::Forever => {
                    state.count += 1;
                    smallvec![Effect::run(|| Some(CounterAction::Forever))]
                },
            }
        }
    }

    #[test]
    fn send_applies_action() {
        let mut store = Store::new(CounterState::default(), CounterReducer, ());
        store.send(CounterAction::Increment).unwrap();
        assert_eq!(store.state(|s| s.count), 1);
    }

    #[test]
    fn notify_reaches_subscribers_with_new_state() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::new(CounterState::default(), CounterReducer, ());
        let sink = Rc::clone(&seen);
        store.subscribe(move |state: &CounterState| sink.borrow_mut().push(state.count));

        store.send(CounterAction::Increment).unwrap();
        store.send(CounterAction::Ignored).unwrap();
        store.send(CounterAction::Increment).unwrap();

        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn run_feedback_is_processed_within_send() {
        let mut store = Store::new(CounterState::default(), CounterReducer, ());
        store.send(CounterAction::IncrementTwiceViaFeedback).unwrap();
        assert_eq!(store.state(|s| s.count), 2);
    }

    #[test]
    fn runaway_feedback_hits_limit() {
        let config = StoreConfig::default().with_max_actions_per_send(5);
        let mut store = Store::with_config(CounterState::default(), CounterReducer, (), config);

        let result = store.send(CounterAction::Forever);

        assert_eq!(result, Err(StoreError::FeedbackLimitExceeded(5)));
        assert_eq!(store.state(|s| s.count), 5);
    }
}
