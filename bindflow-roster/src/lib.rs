// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A roster view model built on bindflow streams.
//!
//! - [`model`]: `Session`, `Record`, `DisplayRow` and the age-sorted projection
//! - [`providers`]: the session provider and record fetcher collaborators, with stand-ins
//! - [`config`]: session and run policies, call timeouts, decorations
//! - [`view_model`]: [`RosterViewModel`], split into [`RosterInputs`] and [`RosterOutputs`]

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod config;
mod logging;
pub mod model;
pub mod providers;
pub mod view_model;

pub use self::config::{PipelineConfig, RunPolicy, SessionPolicy};
pub use self::model::{Decorations, DisplayRow, Record, Session};
pub use self::providers::{
    sample_roster, CachingSessionProvider, RecordFetcher, SessionProvider, StaticRecordFetcher,
    StaticSessionProvider,
};
pub use self::view_model::{
    RosterInputs, RosterOutputs, RosterViewModel, RosterViewModelType, RowStream,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        DisplayRow, PipelineConfig, Record, RecordFetcher, RosterInputs, RosterOutputs,
        RosterViewModel, RosterViewModelType, RunPolicy, Session, SessionPolicy, SessionProvider,
        StaticRecordFetcher, StaticSessionProvider,
    };
}
