//! Unidirectional state reduction shared by every screen.
//!
//! A screen supplies a [`Reducer`]: `mutate` turns an action into an
//! [`Effect`] (zero or more mutations, possibly produced by async work), and
//! `reduce` folds one mutation into the state. [`Store`] is the single wiring
//! routine that dispatches actions, runs effects and applies mutations.
//!
//! Effects of different actions run concurrently by default. Their mutations
//! are applied one at a time in arrival order, which need not match dispatch
//! order. An action whose [`Reducer::binding`] is [`Binding::LatestWins`]
//! cancels the in-flight effect of the previous action with the same key.

pub mod effect;
pub mod store;

pub use effect::{Effect, Emitter};
pub use store::Store;

use std::fmt;

/// How an action's effect relates to earlier in-flight effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Runs alongside everything else. Never cancelled.
    Concurrent,
    /// Cancels the previous in-flight effect bound to the same key.
    LatestWins(&'static str),
}

/// The extension point implemented by each screen.
pub trait Reducer: Send + Sync + 'static {
    type Action: fmt::Debug + Send + 'static;
    type Mutation: fmt::Debug + Send + 'static;
    type State: Clone + Send + Sync + 'static;

    /// Produces the mutations for `action`.
    ///
    /// `state` is the snapshot current at dispatch time. Failures of async work
    /// must come back as mutations.
    fn mutate(&self, state: &Self::State, action: Self::Action) -> Effect<Self::Mutation>;

    /// Pure, synchronous state transition.
    fn reduce(&self, state: Self::State, mutation: Self::Mutation) -> Self::State;

    fn binding(&self, _action: &Self::Action) -> Binding {
        Binding::Concurrent
    }
}
