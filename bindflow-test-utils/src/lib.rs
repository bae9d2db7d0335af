// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the bindflow workspace.
//!
//! Intended for development and testing only.
//!
//! - [`test_channel`] / [`test_channel_with_errors`]: imperative senders feeding a stream
//! - [`helpers`]: timed assertions on streams
//! - [`fixtures`]: the sample roster and its expected rows
//! - [`scripted`]: session providers and record fetchers with scripted outcomes, call
//!   counters and gates
//!
//! # Example
//!
//! ```rust
//! use bindflow_test_utils::{helpers::unwrap_stream, test_channel};
//! use bindflow_core::StreamItem;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (tx, mut stream) = test_channel();
//! tx.send(42).unwrap();
//! assert_eq!(unwrap_stream(&mut stream, 500).await, StreamItem::Value(42));
//! # }
//! ```

pub mod fixtures;
pub mod helpers;
pub mod scripted;

use bindflow_core::StreamItem;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub use self::scripted::{ScriptedRecordFetcher, ScriptedSessionProvider};

/// Creates a channel whose plain values arrive as `StreamItem::Value`.
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx).map(StreamItem::Value);
    (tx, stream)
}

/// Creates a channel that accepts `StreamItem<T>`, so tests can inject errors.
///
/// ```rust
/// use bindflow_test_utils::test_channel_with_errors;
/// use bindflow_core::{BindflowError, StreamItem};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (tx, mut stream) = test_channel_with_errors::<u32>();
/// tx.send(StreamItem::Error(BindflowError::fetch_failure("503"))).unwrap();
/// assert!(stream.next().await.unwrap().is_error());
/// # }
/// ```
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx);
    (tx, stream)
}
