// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Replay-latest subject.
//!
//! A [`ReplaySubject`] behaves like a [`Subject`](crate::Subject) but keeps the most
//! recently published value in a single slot. Every new subscriber receives that value
//! first, then everything published afterwards.
//!
//! Publishing swaps the slot and fans out under one lock, and subscribing replays the slot
//! and registers under the same lock, so a subscriber racing a publish sees each value
//! exactly once.
//!
//! Errors are forwarded to current subscribers but never stored: only values are replayed.
//!
//! ```
//! use bindflow_core::{ReplaySubject, StreamItem};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let subject = ReplaySubject::new();
//! subject.next(vec![1, 2]).unwrap();
//! subject.next(vec![3]).unwrap();
//!
//! let mut late = subject.subscribe().unwrap();
//! assert_eq!(late.next().await, Some(StreamItem::Value(vec![3])));
//! # }
//! ```

use crate::subject::{broadcast, SubjectBoxStream, SubjectStream};
use crate::{StreamItem, SubjectError};
use futures::channel::mpsc::{self, UnboundedSender};
use parking_lot::Mutex;
use std::sync::Arc;

struct ReplayState<T> {
    closed: bool,
    latest: Option<T>,
    senders: Vec<UnboundedSender<StreamItem<T>>>,
}

/// A hot subject that replays its latest value to new subscribers.
pub struct ReplaySubject<T: Clone + Send + Sync + 'static> {
    state: Arc<Mutex<ReplayState<T>>>,
}

impl<T: Clone + Send + Sync + 'static> ReplaySubject<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ReplayState {
                closed: false,
                latest: None,
                senders: Vec::new(),
            })),
        }
    }

    /// Subscribe and receive the latest value (if any) followed by all later items.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn subscribe(&self) -> Result<SubjectBoxStream<T>, SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        let (tx, rx) = mpsc::unbounded();
        if let Some(latest) = &state.latest {
            // The receiver is held right here, the send cannot fail.
            let _ = tx.unbounded_send(StreamItem::Value(latest.clone()));
        }
        state.senders.push(tx);
        Ok(SubjectStream::into_boxed_stream(rx))
    }

    /// Send an item to all active subscribers; values also replace the replay slot.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn send(&self, item: StreamItem<T>) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        if let StreamItem::Value(value) = &item {
            state.latest = Some(value.clone());
        }
        broadcast(&mut state.senders, &item);
        Ok(())
    }

    /// Publish a value: replaces the replay slot and broadcasts it.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn next(&self, value: T) -> Result<(), SubjectError> {
        self.send(StreamItem::Value(value))
    }

    /// Snapshot of the replay slot.
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        self.state.lock().latest.clone()
    }

    /// Closes the subject, completing all subscriber streams. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.senders.clear();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Returns the number of currently active subscribers (pruned lazily on send).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().senders.len()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for ReplaySubject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> Clone for ReplaySubject<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}
