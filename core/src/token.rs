//! Bearer token lookup from an application state source.
//!
//! The state is only ever read. A `StateSource` is either a snapshot value
//! or a thunk returning the current snapshot; `StateToken` pairs it with the
//! caller's extraction function.

use std::sync::Arc;

/// Anything that can hand out the current auth token.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// Where the application state comes from.
pub enum StateSource<S> {
    Value(S),
    Thunk(Arc<dyn Fn() -> S + Send + Sync>),
}

impl<S: Clone> StateSource<S> {
    pub fn thunk(f: impl Fn() -> S + Send + Sync + 'static) -> Self {
        StateSource::Thunk(Arc::new(f))
    }

    pub fn snapshot(&self) -> S {
        match self {
            StateSource::Value(state) => state.clone(),
            StateSource::Thunk(f) => f(),
        }
    }
}

impl<S: Clone> Clone for StateSource<S> {
    fn clone(&self) -> Self {
        match self {
            StateSource::Value(state) => StateSource::Value(state.clone()),
            StateSource::Thunk(f) => StateSource::Thunk(Arc::clone(f)),
        }
    }
}

/// Extracts a token from each fresh state snapshot.
pub struct StateToken<S> {
    state: StateSource<S>,
    get_token: Arc<dyn Fn(&S) -> Option<String> + Send + Sync>,
}

impl<S: Clone> StateToken<S> {
    pub fn new(state: StateSource<S>, get_token: impl Fn(&S) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            state,
            get_token: Arc::new(get_token),
        }
    }
}

impl<S: Clone + Send + Sync> TokenProvider for StateToken<S> {
    fn token(&self) -> Option<String> {
        let state = self.state.snapshot();
        (self.get_token)(&state)
    }
}
