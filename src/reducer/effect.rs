//! Mutation streams produced by `Reducer::mutate`.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
pub(crate) type Task<M> = Box<dyn FnOnce(Emitter<M>) -> BoxFuture + Send + 'static>;
/// Applies a mutation, returning false when it was dropped as stale.
pub(crate) type Sink<M> = Arc<dyn Fn(M) -> bool + Send + Sync + 'static>;
pub(crate) type Generation = (Arc<AtomicU64>, u64);

/// Handle through which an effect task delivers mutations to the store.
pub struct Emitter<M> {
    sink: Sink<M>,
    generation: Option<Generation>,
}

impl<M> Clone for Emitter<M> {
    fn clone(&self) -> Self {
        Self {
            sink: self.sink.clone(),
            generation: self.generation.clone(),
        }
    }
}

impl<M> Emitter<M> {
    pub(crate) fn new(sink: Sink<M>, generation: Option<Generation>) -> Self {
        Self { sink, generation }
    }

    /// True once a newer action with the same latest-wins key was dispatched.
    pub fn is_stale(&self) -> bool {
        self.generation.as_ref().is_some_and(is_superseded)
    }

    /// Delivers a mutation. Returns false if the emitter was superseded and the
    /// mutation dropped. The sink repeats the check under the state lock.
    pub fn emit(&self, mutation: M) -> bool {
        if self.is_stale() {
            return false;
        }
        (self.sink)(mutation)
    }
}

pub(crate) fn is_superseded((current, mine): &Generation) -> bool {
    current.load(Ordering::SeqCst) != *mine
}

/// Zero or more mutations applied right away, followed by an optional async
/// task that emits more.
pub struct Effect<M> {
    pub(crate) immediate: Vec<M>,
    pub(crate) task: Option<Task<M>>,
}

impl<M: Send + 'static> Effect<M> {
    pub fn none() -> Self {
        Self {
            immediate: Vec::new(),
            task: None,
        }
    }

    pub fn just(mutation: M) -> Self {
        Self::many([mutation])
    }

    pub fn many(mutations: impl IntoIterator<Item = M>) -> Self {
        Self {
            immediate: mutations.into_iter().collect(),
            task: None,
        }
    }

    /// Async work that may emit any number of mutations.
    pub fn task<F, Fut>(f: F) -> Self
    where
        F: FnOnce(Emitter<M>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            immediate: Vec::new(),
            task: Some(Box::new(move |emitter| -> BoxFuture { Box::pin(f(emitter)) })),
        }
    }

    /// Async work resolving to exactly one mutation; errors have to be mapped
    /// into the mutation type.
    pub fn future<Fut>(fut: Fut) -> Self
    where
        Fut: Future<Output = M> + Send + 'static,
    {
        Self::task(move |emitter| async move {
            emitter.emit(fut.await);
        })
    }

    /// Prepends a mutation applied before anything else in this effect.
    pub fn starting_with(mut self, mutation: M) -> Self {
        self.immediate.insert(0, mutation);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.immediate.is_empty() && self.task.is_none()
    }
}
