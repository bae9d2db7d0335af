// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bindflow_core::{LatestValue, StreamItem};
use futures::{Stream, StreamExt};
use std::sync::Arc;

/// Extension trait providing the `with_latest_from` operator.
///
/// Joins each item of the primary stream with the latest completed value of a
/// [`LatestValue`] cell.
pub trait WithLatestFromExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Combines every primary item with the cell's most recently completed value.
    ///
    /// # Behavior
    ///
    /// - Emissions are triggered **only** by the primary stream.
    /// - If the cell already holds a value, it is used as is; the cell is never reloaded
    ///   just because the primary emitted.
    /// - If the cell has not completed yet, the primary item is **held** (not dropped) until
    ///   the in-flight load completes. Items held together resolve against the same load.
    /// - Primary items are emitted in arrival order.
    ///
    /// # Errors
    ///
    /// - A failed load is emitted as `StreamItem::Error` for every primary item that waited
    ///   on it; the stream continues, and the next primary item triggers a fresh load.
    /// - Errors from the primary stream are forwarded unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindflow_core::{LatestValue, StreamItem};
    /// use bindflow_stream::WithLatestFromExt;
    /// use futures::{stream, FutureExt, StreamExt};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let session = LatestValue::new(|| async { Ok::<_, bindflow_core::BindflowError>("abc".to_string()) }.boxed());
    /// let clicks = stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)]);
    ///
    /// let joined: Vec<_> = clicks
    ///     .with_latest_from(session, |click, token| format!("{click}:{token}"))
    ///     .collect()
    ///     .await;
    ///
    /// assert_eq!(joined, vec![
    ///     StreamItem::Value("1:abc".to_string()),
    ///     StreamItem::Value("2:abc".to_string()),
    /// ]);
    /// # }
    /// ```
    fn with_latest_from<U, R, F>(
        self,
        latest: LatestValue<U>,
        selector: F,
    ) -> impl Stream<Item = StreamItem<R>> + Send
    where
        Self: Send + 'static,
        T: Send + 'static,
        U: Clone + Send + Sync + 'static,
        R: Send + 'static,
        F: Fn(T, U) -> R + Send + Sync + 'static;
}

impl<S, T> WithLatestFromExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Sized,
{
    fn with_latest_from<U, R, F>(
        self,
        latest: LatestValue<U>,
        selector: F,
    ) -> impl Stream<Item = StreamItem<R>> + Send
    where
        Self: Send + 'static,
        T: Send + 'static,
        U: Clone + Send + Sync + 'static,
        R: Send + 'static,
        F: Fn(T, U) -> R + Send + Sync + 'static,
    {
        let selector = Arc::new(selector);

        // Every item starts waiting as soon as it arrives, so items held behind the same
        // pending load all observe that load's outcome. `buffered` keeps arrival order.
        self.map(move |item| {
            let latest = latest.clone();
            let selector = Arc::clone(&selector);

            async move {
                match item {
                    StreamItem::Value(value) => match latest.latest().await {
                        Ok(other) => StreamItem::Value(selector(value, other)),
                        Err(e) => StreamItem::Error(e),
                    },
                    StreamItem::Error(e) => StreamItem::Error(e),
                }
            }
        })
        .buffered(usize::MAX)
    }
}
