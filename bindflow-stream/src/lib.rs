// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Stream operators for trigger-driven pipelines.
//!
//! All operators work on streams of [`StreamItem<T>`](bindflow_core::StreamItem): failures
//! travel as items, so a single failed run never terminates the stream it runs in.
//!
//! ## Operator Categories
//!
//! ### Combination
//!
//! - **[`with_latest_from`](WithLatestFromExt::with_latest_from)**: joins each item with the
//!   latest completed value of a [`LatestValue`](bindflow_core::LatestValue), holding items
//!   until the first value exists
//!
//! ### Dependent calls
//!
//! - **[`flat_map_merge`](FlatMapExt::flat_map_merge)**: one concurrent call per item, outcomes
//!   in completion order
//! - **[`flat_map_latest`](FlatMapExt::flat_map_latest)**: a new item drops the previous call
//!
//! ### Error handling
//!
//! - **[`on_error_return`](OnErrorExt::on_error_return)**: replace errors with a fallback value
//!
//! ### Multicasting
//!
//! - **[`share_replay`](ShareReplayExt::share_replay)**: hot, replay-latest fan-out
//!
//! ## Example
//!
//! ```rust
//! use bindflow_core::{BindflowError, LatestValue, StreamItem, Subject};
//! use bindflow_stream::prelude::*;
//! use futures::{FutureExt, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let clicks = Subject::<()>::new();
//! let session = LatestValue::new(|| async { Ok::<_, BindflowError>(2_u32) }.boxed());
//!
//! let shared = clicks
//!     .subscribe()
//!     .unwrap()
//!     .with_latest_from(session, |(), factor| factor)
//!     .flat_map_merge(|factor| async move { Ok::<_, BindflowError>(vec![factor * 10]) })
//!     .on_error_return(|_| Vec::new())
//!     .boxed()
//!     .share_replay();
//!
//! let mut rows = shared.subscribe().unwrap();
//! clicks.next(()).unwrap();
//! assert_eq!(rows.next().await, Some(StreamItem::Value(vec![20])));
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod flat_map;
mod logging;
pub mod on_error;
pub mod share_replay;
pub mod with_latest_from;

pub use self::flat_map::{FlatMapExt, FlatMapLatest, FlatMapMerge};
pub use self::on_error::OnErrorExt;
pub use self::share_replay::{ReplayShared, ShareReplayExt};
pub use self::with_latest_from::WithLatestFromExt;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{FlatMapExt, OnErrorExt, ShareReplayExt, WithLatestFromExt};
}
