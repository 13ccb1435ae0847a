//! The wiring between actions, effects and the shared state slot.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::effect::{is_superseded, Effect, Emitter, Generation, Sink};
use super::{Binding, Reducer};

#[derive(Default)]
struct LatestSlot {
    generation: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

struct Inner<R: Reducer> {
    reducer: R,
    state: watch::Sender<R::State>,
    latest: Mutex<HashMap<&'static str, LatestSlot>>,
}

impl<R: Reducer> Inner<R> {
    /// The single reduction point. The slot's write lock is held across the
    /// staleness check and the reduction, so mutations are folded one at a
    /// time and a superseded task cannot slip one in after `supersede`.
    fn apply(&self, mutation: R::Mutation, generation: Option<&Generation>) -> bool {
        self.state.send_if_modified(|state| {
            if generation.is_some_and(is_superseded) {
                trace!(?mutation, "dropping superseded mutation");
                return false;
            }
            trace!(?mutation, "applying mutation");
            let current = state.clone();
            *state = self.reducer.reduce(current, mutation);
            true
        })
    }
}

/// Holds one screen's state and runs its reducer.
///
/// Cloning a `Store` yields another handle to the same state.
pub struct Store<R: Reducer> {
    inner: Arc<Inner<R>>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R: Reducer> Store<R> {
    pub fn new(reducer: R, initial: R::State) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner {
                reducer,
                state,
                latest: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> R::State {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every applied mutation.
    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.inner.state.subscribe()
    }

    /// Waits until the state satisfies `pred` and returns that state.
    pub async fn wait_until(&self, mut pred: impl FnMut(&R::State) -> bool) -> R::State {
        let mut rx = self.subscribe();
        let result = match rx.wait_for(|state| pred(state)).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        result
    }

    /// Dispatches an action.
    ///
    /// Immediate mutations are applied before this returns. An async effect is
    /// spawned on the current tokio runtime, so actions that produce one must
    /// be sent from within a runtime.
    pub fn send(&self, action: R::Action) {
        debug!(?action, "action received");
        let binding = self.inner.reducer.binding(&action);
        let generation = match binding {
            Binding::LatestWins(key) => Some((key, self.supersede(key))),
            Binding::Concurrent => None,
        };

        let snapshot = self.state();
        let Effect { immediate, task } = self.inner.reducer.mutate(&snapshot, action);

        for mutation in immediate {
            self.inner.apply(mutation, None);
        }

        let Some(task) = task else {
            return;
        };
        let task_generation = generation.as_ref().map(|(_, g)| g.clone());
        let emitter = Emitter::new(self.sink(task_generation.clone()), task_generation);
        let handle = tokio::spawn(task(emitter));

        if let Some((key, (counter, mine))) = generation {
            let mut latest = self.inner.latest.lock().unwrap_or_else(PoisonError::into_inner);
            let slot = latest.entry(key).or_default();
            if slot.generation.load(Ordering::SeqCst) == mine && Arc::ptr_eq(&slot.generation, &counter) {
                slot.handle = Some(handle);
            } else {
                handle.abort();
            }
        }
    }

    /// Cancels the in-flight effect for `key` and returns the new generation.
    fn supersede(&self, key: &'static str) -> (Arc<AtomicU64>, u64) {
        let mut latest = self.inner.latest.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = latest.entry(key).or_default();
        let generation = slot.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(handle) = slot.handle.take() {
            debug!(key, "cancelling superseded effect");
            handle.abort();
        }
        (slot.generation.clone(), generation)
    }

    fn sink(&self, generation: Option<Generation>) -> Sink<R::Mutation> {
        let weak = Arc::downgrade(&self.inner);
        Arc::new(move |mutation| match weak.upgrade() {
            Some(inner) => inner.apply(mutation, generation.as_ref()),
            None => false,
        })
    }
}
