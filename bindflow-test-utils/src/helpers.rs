// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bindflow_core::StreamItem;
use futures::stream::{Stream, StreamExt};
use std::fmt::Debug;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Waits up to `timeout_ms` for the next item.
///
/// # Panics
///
/// Panics if the stream ends or stays silent for the whole timeout.
pub async fn unwrap_stream<S>(stream: &mut S, timeout_ms: u64) -> S::Item
where
    S: Stream + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(Some(item)) => item,
        Ok(None) => panic!("stream ended while an item was expected"),
        Err(_) => panic!("no item emitted within {timeout_ms}ms"),
    }
}

/// Extracts the value of a `StreamItem`, panicking on an error item.
pub fn unwrap_value<T>(item: StreamItem<T>) -> T {
    match item {
        StreamItem::Value(value) => value,
        StreamItem::Error(e) => panic!("expected a value, got error: {e}"),
    }
}

pub async fn assert_no_element_emitted<S>(stream: &mut S, timeout_ms: u64)
where
    S: Stream + Unpin,
    S::Item: Debug,
{
    tokio::select! {
        item = stream.next() => {
            panic!("Unexpected emission, expected no output: {item:?}");
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}

/// Asserts the stream completes within `timeout_ms`.
pub async fn assert_stream_ended<S>(stream: &mut S, timeout_ms: u64)
where
    S: Stream + Unpin,
    S::Item: Debug,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(None) => {}
        Ok(Some(item)) => panic!("expected the stream to end, got {item:?}"),
        Err(_) => panic!("stream still open after {timeout_ms}ms"),
    }
}
