// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, replay-latest multicast of a cold stream.
//!
//! A [`ReplayShared`] consumes a source stream once on a background task and republishes
//! every item through a [`ReplaySubject`]. Subscribers first receive the most recent value
//! (if any), then everything published afterwards.
//!
//! ## Characteristics
//!
//! - **Hot**: the source is driven whether or not anyone is subscribed.
//! - **Replay-latest**: a late subscriber immediately sees the latest value.
//! - **Error-transparent**: errors are forwarded to current subscribers without closing the
//!   shared stream (place [`on_error_return`](crate::OnErrorExt::on_error_return) upstream to
//!   turn them into values).
//! - **Owned lifecycle**: dropping the `ReplayShared` stops the forwarding task and completes
//!   every subscriber stream.
//!
//! Construction spawns a task and therefore needs a tokio runtime context.
//!
//! ## Example
//!
//! ```rust
//! use bindflow_core::StreamItem;
//! use bindflow_stream::ShareReplayExt;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (tx, rx) = futures::channel::mpsc::unbounded();
//! let shared = rx.share_replay();
//!
//! tx.unbounded_send(StreamItem::Value(1)).unwrap();
//! let mut first = shared.subscribe().unwrap();
//! assert_eq!(first.next().await, Some(StreamItem::Value(1)));
//!
//! // A late subscriber still sees the latest value.
//! let mut late = shared.subscribe().unwrap();
//! assert_eq!(late.next().await, Some(StreamItem::Value(1)));
//! # }
//! ```

use crate::logging::info;
use bindflow_core::{BindflowTask, ReplaySubject, StreamItem, SubjectBoxStream, SubjectError};
use futures::future::{select, Either};
use futures::{Stream, StreamExt};

/// A shared stream that replays its latest value to each new subscriber.
///
/// This is a **subscription factory**: call [`subscribe`](ReplayShared::subscribe) to obtain
/// independent subscriber streams.
pub struct ReplayShared<T: Clone + Send + Sync + 'static> {
    subject: ReplaySubject<T>,
    _task: BindflowTask,
}

impl<T: Clone + Send + Sync + 'static> ReplayShared<T> {
    /// Spawns the forwarding task for `source`.
    ///
    /// Prefer [`ShareReplayExt::share_replay`].
    pub fn new<S>(source: S) -> Self
    where
        S: Stream<Item = StreamItem<T>> + Send + Unpin + 'static,
    {
        let subject = ReplaySubject::new();
        let subject_clone = subject.clone();

        let task = BindflowTask::spawn(|cancel| async move {
            let mut stream = source;
            while let Either::Left((item, _)) = select(stream.next(), cancel.cancelled()).await {
                match item {
                    Some(item) => {
                        if subject_clone.send(item).is_err() {
                            break;
                        }
                    }
                    None => {
                        info!("replay source completed");
                        break;
                    }
                }
            }
            subject_clone.close();
        });

        Self {
            subject,
            _task: task,
        }
    }

    /// Subscribes, receiving the latest value first if one was published.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` once the source has completed.
    pub fn subscribe(&self) -> Result<SubjectBoxStream<T>, SubjectError> {
        self.subject.subscribe()
    }

    /// The most recently published value.
    pub fn latest(&self) -> Option<T> {
        self.subject.latest()
    }

    /// Returns true once the source has completed.
    pub fn is_closed(&self) -> bool {
        self.subject.is_closed()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subject.subscriber_count()
    }
}

impl<T: Clone + Send + Sync + 'static> Drop for ReplayShared<T> {
    fn drop(&mut self) {
        self.subject.close();
    }
}

/// Extension trait for sharing a stream with replay-latest semantics.
pub trait ShareReplayExt<T: Clone + Send + Sync + 'static>: Stream<Item = StreamItem<T>> {
    /// See the [module-level documentation](crate::share_replay).
    fn share_replay(self) -> ReplayShared<T>
    where
        Self: Send + Unpin + Sized + 'static;
}

impl<S, T> ShareReplayExt<T> for S
where
    S: Stream<Item = StreamItem<T>>,
    T: Clone + Send + Sync + 'static,
{
    fn share_replay(self) -> ReplayShared<T>
    where
        Self: Send + Unpin + Sized + 'static,
    {
        ReplayShared::new(self)
    }
}
