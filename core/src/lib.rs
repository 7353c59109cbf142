//! # Tasklist Core
//!
//! Core traits and types for the tasklist reducer architecture.
//!
//! The crate holds the pieces every feature shares and nothing domain specific:
//!
//! - **State**: Domain state for a feature, owned by the runtime `Store`
//! - **Action**: One variant per user action the feature understands
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies (id generation, slot storage)
//!
//! Everything runs synchronously on the caller's thread. The runtime drains
//! effects before `send` returns, so an action is fully applied, persisted and
//! rendered before the next input event is read.
//!
//! ## Example
//!
//! ```
//! use tasklist_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => {
//!                 state.count += 1;
//!                 smallvec![Effect::Notify]
//!             }
//!         }
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let effects = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! assert_eq!(effects.len(), 1);
//! ```

pub use smallvec::{SmallVec, smallvec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// An empty return value means the action was a no-op: nothing is
        /// persisted and observers are not notified.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    /// Deferred synchronous work carried by [`Effect::Run`].
    ///
    /// Returns `Some(action)` to feed a follow-up action back into the reducer.
    pub type Task<Action> = Box<dyn FnOnce() -> Option<Action>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// Tell every subscriber that state changed and should be redrawn
        Notify,

        /// Arbitrary synchronous computation (I/O such as persistence)
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Run(Task<Action>),
    }

    // Manual Debug implementation since boxed closures don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::Notify => write!(f, "Effect::Notify"),
                Effect::Run(_) => write!(f, "Effect::Run(<task>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap a closure as an [`Effect::Run`]
        #[must_use]
        pub fn run<F>(task: F) -> Self
        where
            F: FnOnce() -> Option<Action> + 'static,
        {
            Effect::Run(Box::new(task))
        }

        /// Returns true for [`Effect::Notify`]
        #[must_use]
        pub const fn is_notify(&self) -> bool {
            matches!(self, Effect::Notify)
        }

        /// Returns true for [`Effect::Run`]
        #[must_use]
        pub const fn is_run(&self) -> bool {
            matches!(self, Effect::Run(_))
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use thiserror::Error;
    use uuid::Uuid;

    /// Id generator trait - abstracts identifier creation for testability
    ///
    /// Every id handed out by one generator must be distinct from every other
    /// id it has handed out.
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier
        fn next_id(&self) -> String;
    }

    /// Production id generator: random UUID v4, hyphenated
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UuidGenerator;

    impl IdGenerator for UuidGenerator {
        fn next_id(&self) -> String {
            Uuid::new_v4().to_string()
        }
    }

    /// Errors raised by a [`SlotStorage`] backend
    #[derive(Error, Debug)]
    pub enum StorageError {
        /// Underlying I/O failed
        #[error("storage I/O failed: {0}")]
        Io(#[from] std::io::Error),

        /// The value could not be encoded for storage
        #[error("failed to serialize slot contents: {0}")]
        Serialization(String),

        /// The backend refused the operation
        #[error("storage unavailable: {0}")]
        Unavailable(String),
    }

    /// Named-slot text storage, the equivalent of a browser's local storage
    ///
    /// Each slot holds one UTF-8 string. Writes replace the whole slot.
    pub trait SlotStorage: Send + Sync {
        /// Read a slot. `Ok(None)` means nothing has been written yet.
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be read.
        fn read(&self, slot: &str) -> Result<Option<String>, StorageError>;

        /// Replace the contents of a slot.
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be written.
        fn write(&self, slot: &str, contents: &str) -> Result<(), StorageError>;
    }
}
