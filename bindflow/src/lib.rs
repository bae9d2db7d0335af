// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Bindflow
//!
//! Reactive data binding for list views.
//!
//! ## Overview
//!
//! A view model owns one input ("load requested") and one output ("display rows"). Every
//! load request is joined with the latest session, used to fetch records, sorted by age and
//! projected into display rows, then published to every observer. The output replays its
//! latest rows to new observers and turns failures into an empty list, so observers
//! subscribe once and never see an error.
//!
//! ## Crates
//!
//! - `bindflow-core`: errors, `StreamItem`, subjects, the `LatestValue` completion cell
//! - `bindflow-stream`: `with_latest_from`, `flat_map_merge`, `flat_map_latest`,
//!   `on_error_return`, `share_replay`
//! - `bindflow-exec`: `subscribe` for binders
//! - `bindflow-roster`: the roster model, collaborators and `RosterViewModel`
//!
//! ## Quick Start
//!
//! ```rust
//! use bindflow::prelude::*;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let view_model = RosterViewModel::new(
//!     StaticSessionProvider::default(),
//!     StaticRecordFetcher::default(),
//! );
//!
//! let mut rows = view_model.outputs().rows();
//! view_model.inputs().request_load().unwrap();
//!
//! let rows = rows.next().await.unwrap();
//! assert_eq!(rows.first().map(|row| row.display_name.as_str()), Some("numa08様"));
//! # }
//! ```

// Re-export core types
pub use bindflow_core::{
    BindflowError, CancellationToken, LatestValue, ReplaySubject, Result, StreamItem, Subject,
    SubjectError,
};

// Re-export operators and the subscriber
pub use bindflow_exec::SubscribeExt;
pub use bindflow_stream::{
    FlatMapExt, OnErrorExt, ReplayShared, ShareReplayExt, WithLatestFromExt,
};

// Re-export the roster view model
pub use bindflow_roster::{
    CachingSessionProvider, Decorations, DisplayRow, PipelineConfig, Record, RecordFetcher,
    RosterInputs, RosterOutputs, RosterViewModel, RosterViewModelType, RowStream, RunPolicy,
    Session, SessionPolicy, SessionProvider, StaticRecordFetcher, StaticSessionProvider,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use bindflow_core::{BindflowError, StreamItem};
    pub use bindflow_exec::SubscribeExt;
    pub use bindflow_roster::prelude::*;
    pub use bindflow_stream::prelude::*;
}
