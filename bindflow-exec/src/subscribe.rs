// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::info;
use async_trait::async_trait;
use bindflow_core::{BindflowError, CancellationToken, Result};
use futures::future::{select, Either};
use futures::stream::{Stream, StreamExt};
use std::error::Error;
use std::future::Future;

/// Extension trait for driving a stream into an async handler.
#[async_trait]
pub trait SubscribeExt<T>: Stream<Item = T> + Sized {
    /// Subscribes to the stream with an async handler, processing items sequentially.
    ///
    /// Each item's handler runs to completion before the next item is pulled, so a binder
    /// renders emissions in exactly the order the stream produced them.
    ///
    /// # Behavior
    ///
    /// - Continues until the stream ends or the cancellation token is triggered
    /// - Cancellation is observed while waiting for the next item, so a subscription to a
    ///   stream that never ends can still be stopped
    /// - A failing handler does not stop the subscription
    ///
    /// # Arguments
    ///
    /// * `on_next_func` - Async function called for each item, receiving the item and the
    ///   subscription's cancellation token.
    /// * `cancellation_token` - Optional token to stop processing. `None` never cancels.
    /// * `on_error_callback` - Optional handler for errors returned by `on_next_func`. If
    ///   `None`, errors are collected and returned when the subscription ends.
    ///
    /// # Errors
    ///
    /// Returns `BindflowError::MultipleErrors` if any item failed and no error callback was
    /// provided.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindflow_exec::SubscribeExt;
    /// use futures::stream;
    /// use std::sync::{Arc, Mutex};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let rendered = Arc::new(Mutex::new(Vec::new()));
    /// let sink = rendered.clone();
    ///
    /// stream::iter(vec!["numa08", "mironal"])
    ///     .subscribe(
    ///         move |row, _token| {
    ///             let sink = sink.clone();
    ///             async move {
    ///                 sink.lock().unwrap().push(row);
    ///                 Ok::<(), std::io::Error>(())
    ///             }
    ///         },
    ///         None,
    ///         None::<fn(std::io::Error)>,
    ///     )
    ///     .await
    ///     .unwrap();
    ///
    /// assert_eq!(*rendered.lock().unwrap(), vec!["numa08", "mironal"]);
    /// # }
    /// ```
    async fn subscribe<F, Fut, E, OnError>(
        self,
        on_next_func: F,
        cancellation_token: Option<CancellationToken>,
        on_error_callback: Option<OnError>,
    ) -> Result<()>
    where
        F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        OnError: Fn(E) + Send + Sync + 'static,
        T: Send + 'static,
        E: Error + Send + Sync + 'static;
}

#[async_trait]
impl<S, T> SubscribeExt<T> for S
where
    S: Stream<Item = T> + Send + Unpin + 'static,
    T: Send + 'static,
{
    async fn subscribe<F, Fut, E, OnError>(
        mut self,
        on_next_func: F,
        cancellation_token: Option<CancellationToken>,
        on_error_callback: Option<OnError>,
    ) -> Result<()>
    where
        F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        OnError: Fn(E) + Send + Sync + 'static,
        T: Send + 'static,
        E: Error + Send + Sync + 'static,
    {
        let cancellation_token = cancellation_token.unwrap_or_default();
        let mut collected_errors = Vec::new();

        loop {
            let item = match select(self.next(), cancellation_token.cancelled()).await {
                Either::Left((Some(item), _)) => item,
                Either::Left((None, _)) => break,
                Either::Right(_) => {
                    info!("subscription cancelled");
                    break;
                }
            };

            if let Err(error) = on_next_func(item, cancellation_token.clone()).await {
                match &on_error_callback {
                    Some(on_error_callback) => on_error_callback(error),
                    None => collected_errors.push(error),
                }
            }
        }

        if collected_errors.is_empty() {
            Ok(())
        } else {
            Err(BindflowError::from_user_errors(collected_errors))
        }
    }
}
