// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bindflow_core::{BindflowError, StreamItem};
use futures::{Stream, StreamExt};

/// Error-handling operator for streams of `StreamItem<T>`.
pub trait OnErrorExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Replace every error with the value produced by `fallback`.
    ///
    /// The resulting stream only carries values and is never terminated by an upstream
    /// failure. The handler sees each error, which makes it the natural place to log it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindflow_core::{BindflowError, StreamItem};
    /// use bindflow_stream::OnErrorExt;
    /// use futures::{stream, StreamExt};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let rows = stream::iter(vec![
    ///     StreamItem::Error(BindflowError::fetch_failure("bad token")),
    ///     StreamItem::Value(vec!["x"]),
    /// ]);
    ///
    /// let rows: Vec<_> = rows.on_error_return(|_| Vec::new()).collect().await;
    /// assert_eq!(rows, vec![StreamItem::Value(vec![]), StreamItem::Value(vec!["x"])]);
    /// # }
    /// ```
    fn on_error_return<F>(self, fallback: F) -> impl Stream<Item = StreamItem<T>> + Send
    where
        F: FnMut(&BindflowError) -> T + Send + 'static,
        Self: Send + 'static;
}

impl<S, T> OnErrorExt<T> for S
where
    S: Stream<Item = StreamItem<T>>,
    T: Send + 'static,
{
    fn on_error_return<F>(self, mut fallback: F) -> impl Stream<Item = StreamItem<T>> + Send
    where
        F: FnMut(&BindflowError) -> T + Send + 'static,
        Self: Send + 'static,
    {
        self.map(move |item| match item {
            StreamItem::Error(err) => StreamItem::Value(fallback(&err)),
            value => value,
        })
    }
}
