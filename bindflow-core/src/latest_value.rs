// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Single-slot completion cell for a lazily loaded asynchronous value.
//!
//! A [`LatestValue`] owns a loader (an async function producing `Result<T>`) and caches
//! the first successful result. Callers of [`LatestValue::latest`]:
//!
//! - get the cached value immediately once one has completed,
//! - join the in-flight load if one is running (no second load is issued),
//! - start a load if the cell is empty.
//!
//! A failed load is reported to every caller that was waiting on it and leaves the cell
//! empty, so the next caller starts a fresh attempt. Loads never retry on their own.
//!
//! Loads run on a spawned tokio task, so a caller dropping its future does not strand the
//! other waiters. Dropping the last handle aborts a load that is still in flight.
//!
//! ```
//! use bindflow_core::LatestValue;
//! use futures::FutureExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let token = LatestValue::new(|| async { Ok("token".to_string()) }.boxed());
//! assert_eq!(token.latest().await.unwrap(), "token");
//! assert_eq!(token.peek().as_deref(), Some("token"));
//! # }
//! ```

use crate::logging::log_warn;
use crate::{BindflowError, Result};
use event_listener::Event;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;

type Loader<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;

enum Slot<T> {
    Empty,
    Pending { attempt: u64 },
    Ready(T),
}

struct State<T> {
    slot: Slot<T>,
    attempts: u64,
    // Most recent failed attempt, kept so late-waking waiters of that attempt see it.
    failure: Option<(u64, BindflowError)>,
    load: Option<JoinHandle<()>>,
}

struct Inner<T> {
    state: Mutex<State<T>>,
    event: Event,
    loader: Loader<T>,
}

/// Cached asynchronous value with hold-until-first-completion semantics.
///
/// Cheap to clone; all clones share the same slot.
pub struct LatestValue<T: Clone + Send + 'static> {
    inner: Arc<Inner<T>>,
}

impl<T: Clone + Send + 'static> LatestValue<T> {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<T>> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    slot: Slot::Empty,
                    attempts: 0,
                    failure: None,
                    load: None,
                }),
                event: Event::new(),
                loader: Arc::new(loader),
            }),
        }
    }

    /// Returns the most recently completed value, waiting for a load if none has completed.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when the load this call waited on failed.
    pub async fn latest(&self) -> Result<T> {
        let mut awaited: Option<u64> = None;

        loop {
            let listener = {
                let mut state = self.inner.state.lock();
                if let Slot::Ready(value) = &state.slot {
                    return Ok(value.clone());
                }
                if let (Some(attempt), Some((failed, error))) = (awaited, &state.failure) {
                    if *failed >= attempt {
                        return Err(error.clone());
                    }
                }

                let pending = match state.slot {
                    Slot::Pending { attempt } => Some(attempt),
                    _ => None,
                };
                let attempt = match pending {
                    Some(attempt) => attempt,
                    None => self.start_load(&mut state),
                };
                awaited = Some(attempt);

                // Registered while the lock is held: a completion cannot slip in between.
                self.inner.event.listen()
            };

            listener.await;
        }
    }

    /// Starts a load if the cell is empty, without waiting for it.
    pub fn prime(&self) {
        let mut state = self.inner.state.lock();
        if matches!(state.slot, Slot::Empty) {
            self.start_load(&mut state);
        }
    }

    /// The cached value, if a load has completed.
    #[must_use]
    pub fn peek(&self) -> Option<T> {
        match &self.inner.state.lock().slot {
            Slot::Ready(value) => Some(value.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.inner.state.lock().slot, Slot::Pending { .. })
    }

    /// Number of loads issued so far.
    #[must_use]
    pub fn loads_started(&self) -> u64 {
        self.inner.state.lock().attempts
    }

    fn start_load(&self, state: &mut State<T>) -> u64 {
        state.attempts += 1;
        let attempt = state.attempts;
        state.slot = Slot::Pending { attempt };

        let load = (self.inner.loader)();
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            let result = load.await;

            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut state = inner.state.lock();
            if matches!(state.slot, Slot::Pending { attempt: current } if current == attempt) {
                match result {
                    Ok(value) => state.slot = Slot::Ready(value),
                    Err(error) => {
                        log_warn!("load attempt {} failed: {}", attempt, error);
                        state.slot = Slot::Empty;
                        state.failure = Some((attempt, error));
                    }
                }
            }
            drop(state);
            inner.event.notify(usize::MAX);
        });
        state.load = Some(handle);

        attempt
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        if let Some(load) = self.state.get_mut().load.take() {
            load.abort();
        }
    }
}

impl<T: Clone + Send + 'static> Clone for LatestValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
