// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The roster view model: load requests in, sorted display rows out.
//!
//! Every load request runs the same pipeline:
//!
//! 1. take the session (the most recently completed lookup, or a fresh one per request,
//!    depending on [`SessionPolicy`]);
//! 2. fetch the records for its token;
//! 3. sort them ascending by age (stable) and project each one to a [`DisplayRow`];
//! 4. publish the rows to every subscriber of [`RosterOutputs::rows`].
//!
//! A failure in step 1 or 2 publishes an empty list instead. The output never carries an
//! error and never completes while the view model is alive, so a binder can subscribe once
//! and keep rendering.
//!
//! # Example
//!
//! ```
//! use bindflow_roster::prelude::*;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let view_model = RosterViewModel::new(
//!     StaticSessionProvider::default(),
//!     StaticRecordFetcher::new(vec![Record::new("mironal", 17), Record::new("numa08", 7)]),
//! );
//!
//! let mut rows = view_model.outputs().rows();
//! view_model.inputs().request_load().unwrap();
//!
//! let rows = rows.next().await.unwrap();
//! assert_eq!(rows[0], DisplayRow::new("numa08様", "7ちゃい"));
//! assert_eq!(rows[1], DisplayRow::new("mironal様", "17ちゃい"));
//! # }
//! ```

use crate::config::{PipelineConfig, RunPolicy, SessionPolicy};
use crate::logging::{info, log_warn};
use crate::model::{Decorations, DisplayRow, Session};
use crate::providers::{RecordFetcher, SessionProvider};
use bindflow_core::{
    BindflowError, LatestValue, Result, StreamItem, Subject, SubjectBoxStream, SubjectError,
};
use bindflow_stream::prelude::*;
use bindflow_stream::ReplayShared;
use futures::future::ready;
use futures::stream::{self, BoxStream};
use futures::{FutureExt, Stream, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Stream of published row lists, as handed to binders.
pub type RowStream = BoxStream<'static, Vec<DisplayRow>>;

/// Write side of the view model.
pub trait RosterInputs: Send + Sync {
    /// Requests a new load.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` once the view model has been shut down.
    fn request_load(&self) -> std::result::Result<(), SubjectError>;
}

/// Read side of the view model.
pub trait RosterOutputs: Send + Sync {
    /// Subscribes to the published rows.
    ///
    /// The most recently published list, if any, is delivered first. The stream carries no
    /// errors and ends only after the view model is shut down or dropped.
    fn rows(&self) -> RowStream;

    /// The most recently published list.
    fn latest_rows(&self) -> Option<Vec<DisplayRow>>;
}

/// Access to both sides of a view model.
pub trait RosterViewModelType {
    fn inputs(&self) -> &dyn RosterInputs;
    fn outputs(&self) -> &dyn RosterOutputs;
}

/// Joins load requests with a session, fetches records and publishes sorted display rows.
///
/// Construction spawns the pipeline's forwarding task (and, with
/// [`prefetch_session`](PipelineConfig::prefetch_session), the first session lookup), so it
/// needs a tokio runtime context. Dropping the view model cancels the forwarding task, and
/// a session lookup still in flight is aborted once the pipeline lets go of it.
pub struct RosterViewModel {
    trigger: Subject<()>,
    rows: ReplayShared<Vec<DisplayRow>>,
    session: Option<LatestValue<Session>>,
    config: PipelineConfig,
}

impl RosterViewModel {
    pub fn new<P, F>(sessions: P, records: F) -> Self
    where
        P: SessionProvider + 'static,
        F: RecordFetcher + 'static,
    {
        Self::with_config(sessions, records, PipelineConfig::default())
    }

    pub fn with_config<P, F>(sessions: P, records: F, config: PipelineConfig) -> Self
    where
        P: SessionProvider + 'static,
        F: RecordFetcher + 'static,
    {
        let sessions: Arc<dyn SessionProvider> = Arc::new(sessions);
        let records: Arc<dyn RecordFetcher> = Arc::new(records);
        let decorations = Arc::new(config.decorations.clone());
        let limit = config.call_timeout();

        let trigger = Subject::new();
        let triggers = trigger
            .subscribe()
            .map_or_else(|_| stream::empty().boxed(), |triggers| triggers.boxed());

        let (runs, session) = match config.session_policy {
            SessionPolicy::Latest => {
                let session = LatestValue::new({
                    let sessions = Arc::clone(&sessions);
                    move || {
                        let sessions = Arc::clone(&sessions);
                        async move {
                            bounded(limit, "session lookup", sessions.get_session()).await
                        }
                        .boxed()
                    }
                });
                if config.prefetch_session {
                    session.prime();
                }

                let tokens =
                    triggers.with_latest_from(session.clone(), |(), current| current.token);
                let runs = dispatch(tokens, config.run_policy, move |token: String| {
                    fetch_rows(Arc::clone(&records), token, limit, Arc::clone(&decorations))
                });
                (runs, Some(session))
            }
            SessionPolicy::RefreshPerTrigger => {
                let runs = dispatch(triggers, config.run_policy, move |()| {
                    let sessions = Arc::clone(&sessions);
                    let records = Arc::clone(&records);
                    let decorations = Arc::clone(&decorations);
                    async move {
                        let session =
                            bounded(limit, "session lookup", sessions.get_session()).await?;
                        fetch_rows(records, session.token, limit, decorations).await
                    }
                });
                (runs, None)
            }
        };

        let rows = runs
            .on_error_return(|error| {
                log_warn!("roster load failed, publishing no rows: {}", error);
                Vec::new()
            })
            .boxed()
            .share_replay();

        info!(
            "roster view model started ({:?}, {:?})",
            config.session_policy, config.run_policy
        );

        Self {
            trigger,
            rows,
            session,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The cached session, when joining with the latest lookup and one has completed.
    pub fn cached_session(&self) -> Option<Session> {
        self.session.as_ref().and_then(LatestValue::peek)
    }

    /// Stops accepting load requests.
    ///
    /// Runs already started still publish; afterwards every row stream completes.
    pub fn shutdown(&self) {
        info!("roster view model shutting down");
        self.trigger.close();
    }

    /// Subscribes to the raw shared output, for callers that work with [`StreamItem`]s.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` once the output has completed.
    pub fn subscribe(
        &self,
    ) -> std::result::Result<SubjectBoxStream<Vec<DisplayRow>>, SubjectError> {
        self.rows.subscribe()
    }
}

impl RosterInputs for RosterViewModel {
    fn request_load(&self) -> std::result::Result<(), SubjectError> {
        self.trigger.next(())
    }
}

impl RosterOutputs for RosterViewModel {
    fn rows(&self) -> RowStream {
        match self.rows.subscribe() {
            Ok(rows) => rows.filter_map(|item| ready(item.ok())).boxed(),
            Err(_) => stream::empty().boxed(),
        }
    }

    fn latest_rows(&self) -> Option<Vec<DisplayRow>> {
        self.rows.latest()
    }
}

impl RosterViewModelType for RosterViewModel {
    fn inputs(&self) -> &dyn RosterInputs {
        self
    }

    fn outputs(&self) -> &dyn RosterOutputs {
        self
    }
}

fn dispatch<S, T, F, Fut>(
    source: S,
    run_policy: RunPolicy,
    run: F,
) -> BoxStream<'static, StreamItem<Vec<DisplayRow>>>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
    F: FnMut(T) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Vec<DisplayRow>>> + Send + 'static,
{
    match run_policy {
        RunPolicy::Merge => source.flat_map_merge(run).boxed(),
        RunPolicy::SwitchLatest => source.flat_map_latest(run).boxed(),
    }
}

async fn fetch_rows(
    records: Arc<dyn RecordFetcher>,
    token: String,
    limit: Option<Duration>,
    decorations: Arc<Decorations>,
) -> Result<Vec<DisplayRow>> {
    let fetched = bounded(limit, "record fetch", records.get_records(&token)).await?;
    Ok(decorations.present(fetched))
}

async fn bounded<T>(
    limit: Option<Duration>,
    call: &'static str,
    call_future: impl Future<Output = Result<T>>,
) -> Result<T> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, call_future)
            .await
            .map_err(|_| BindflowError::timeout_error(format!("{call} exceeded {limit:?}")))?,
        None => call_future.await,
    }
}
