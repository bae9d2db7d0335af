// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types shared by every bindflow crate.
//!
//! - [`BindflowError`] / [`StreamItem`]: errors travel through streams as items
//! - [`Subject`]: hot multicast entry point for events
//! - [`ReplaySubject`]: multicast with a replay-latest slot
//! - [`LatestValue`]: cached asynchronous value that holds callers until it first completes
//! - [`CancellationToken`] / [`BindflowTask`]: owned background work

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod cancellation_token;
pub mod error;
pub mod latest_value;
mod logging;
pub mod replay_subject;
pub mod stream_item;
pub mod subject;
pub mod subject_error;
pub mod task;

pub use self::cancellation_token::CancellationToken;
pub use self::error::{BindflowError, IntoBindflowError, Result, ResultExt};
pub use self::latest_value::LatestValue;
pub use self::replay_subject::ReplaySubject;
pub use self::stream_item::StreamItem;
pub use self::subject::{Subject, SubjectBoxStream};
pub use self::subject_error::SubjectError;
pub use self::task::BindflowTask;
