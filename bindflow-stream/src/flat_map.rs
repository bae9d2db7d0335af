// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Operators that chain a dependent asynchronous call onto every item.
//!
//! | Operator | In-flight calls | Superseded calls |
//! |----------|-----------------|------------------|
//! | [`flat_map_merge`](FlatMapExt::flat_map_merge) | all run concurrently | none, every call emits, in completion order |
//! | [`flat_map_latest`](FlatMapExt::flat_map_latest) | only the newest | dropped (cancelled) when a new item arrives |

use bindflow_core::{Result, StreamItem};
use futures::stream::{Fuse, FuturesUnordered};
use futures::{Stream, StreamExt};
use pin_project::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Extension trait providing the `flat_map_merge` and `flat_map_latest` operators.
pub trait FlatMapExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Starts `f(value)` for every value and emits each call's outcome as it completes.
    ///
    /// Calls run concurrently and independently: a slow call never delays a faster,
    /// later one, so outcomes can be emitted out of item order. `Err` outcomes become
    /// `StreamItem::Error` items and the stream keeps going.
    ///
    /// Errors arriving from the source stream are forwarded immediately.
    ///
    /// The stream ends once the source has ended and every in-flight call has completed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindflow_core::StreamItem;
    /// use bindflow_stream::FlatMapExt;
    /// use futures::{stream, StreamExt};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let tokens = stream::iter(vec![StreamItem::Value("a"), StreamItem::Value("b")]);
    /// let mut sizes: Vec<_> = tokens
    ///     .flat_map_merge(|token: &str| async move { Ok::<_, bindflow_core::BindflowError>(token.len()) })
    ///     .filter_map(|item| async move { item.ok() })
    ///     .collect()
    ///     .await;
    ///
    /// sizes.sort_unstable();
    /// assert_eq!(sizes, vec![1, 1]);
    /// # }
    /// ```
    fn flat_map_merge<R, Fut, F>(self, f: F) -> FlatMapMerge<Self, F, Fut>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<R>>;

    /// Like [`flat_map_merge`](FlatMapExt::flat_map_merge), but a new value drops the call
    /// still in flight for the previous value, so only the newest value can emit.
    fn flat_map_latest<R, Fut, F>(self, f: F) -> FlatMapLatest<Self, F, Fut>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<R>>;
}

impl<S, T> FlatMapExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Sized,
{
    fn flat_map_merge<R, Fut, F>(self, f: F) -> FlatMapMerge<Self, F, Fut>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        FlatMapMerge {
            source: self.fuse(),
            f,
            in_flight: FuturesUnordered::new(),
        }
    }

    fn flat_map_latest<R, Fut, F>(self, f: F) -> FlatMapLatest<Self, F, Fut>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        FlatMapLatest {
            source: self.fuse(),
            f,
            current: None,
        }
    }
}

/// Stream returned by [`FlatMapExt::flat_map_merge`].
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct FlatMapMerge<S, F, Fut> {
    #[pin]
    source: Fuse<S>,
    f: F,
    in_flight: FuturesUnordered<Fut>,
}

impl<S, F, Fut> FlatMapMerge<S, F, Fut> {
    /// Number of calls started but not yet completed.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

impl<S, T, R, F, Fut> Stream for FlatMapMerge<S, F, Fut>
where
    S: Stream<Item = StreamItem<T>>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    type Item = StreamItem<R>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Start a call for everything the source has ready.
        while let Poll::Ready(Some(item)) = this.source.as_mut().poll_next(cx) {
            match item {
                StreamItem::Value(value) => this.in_flight.push((this.f)(value)),
                StreamItem::Error(e) => return Poll::Ready(Some(StreamItem::Error(e))),
            }
        }

        match this.in_flight.poll_next_unpin(cx) {
            Poll::Ready(Some(outcome)) => Poll::Ready(Some(outcome.into())),
            Poll::Ready(None) if this.source.is_done() => Poll::Ready(None),
            Poll::Ready(None) | Poll::Pending => Poll::Pending,
        }
    }
}

/// Stream returned by [`FlatMapExt::flat_map_latest`].
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct FlatMapLatest<S, F, Fut> {
    #[pin]
    source: Fuse<S>,
    f: F,
    #[pin]
    current: Option<Fut>,
}

impl<S, T, R, F, Fut> Stream for FlatMapLatest<S, F, Fut>
where
    S: Stream<Item = StreamItem<T>>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    type Item = StreamItem<R>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Only the newest value keeps its call; a replaced call is dropped mid-flight.
        while let Poll::Ready(Some(item)) = this.source.as_mut().poll_next(cx) {
            match item {
                StreamItem::Value(value) => this.current.set(Some((this.f)(value))),
                StreamItem::Error(e) => return Poll::Ready(Some(StreamItem::Error(e))),
            }
        }

        if let Some(call) = this.current.as_mut().as_pin_mut() {
            if let Poll::Ready(outcome) = call.poll(cx) {
                this.current.set(None);
                return Poll::Ready(Some(outcome.into()));
            }
            return Poll::Pending;
        }

        if this.source.is_done() {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}
