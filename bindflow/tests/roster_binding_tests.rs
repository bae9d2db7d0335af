// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bindflow::prelude::*;
use bindflow::{CachingSessionProvider, CancellationToken};
use bindflow_test_utils::fixtures::{employee_rows, employees};
use bindflow_test_utils::helpers::unwrap_stream;
use bindflow_test_utils::{ScriptedRecordFetcher, ScriptedSessionProvider};
use futures::channel::mpsc::unbounded;
use futures::StreamExt;
use std::sync::Arc;

#[derive(Debug)]
struct TableGone;

impl std::fmt::Display for TableGone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "table gone")
    }
}

impl std::error::Error for TableGone {}

#[tokio::test]
async fn test_sample_roster_is_bound_to_table() -> anyhow::Result<()> {
    // Arrange
    let view_model = RosterViewModel::new(
        StaticSessionProvider::default(),
        StaticRecordFetcher::default(),
    );
    let (table_tx, mut table) = unbounded();
    let cancel = CancellationToken::new();
    let binder = tokio::spawn(view_model.outputs().rows().subscribe(
        move |rows: Vec<DisplayRow>, _token| {
            let table_tx = table_tx.clone();
            async move { table_tx.unbounded_send(rows).map_err(|_| TableGone) }
        },
        Some(cancel.clone()),
        None::<fn(TableGone)>,
    ));

    // Act
    view_model.inputs().request_load()?;

    // Assert
    assert_eq!(table.next().await, Some(employee_rows()));
    cancel.cancel();
    binder.await??;
    Ok(())
}

#[tokio::test]
async fn test_cached_provider_feeds_refresh_per_trigger() -> anyhow::Result<()> {
    // Arrange: refresh per trigger, but behind a caching provider
    let sessions = Arc::new(ScriptedSessionProvider::token("abc"));
    let view_model = RosterViewModel::with_config(
        CachingSessionProvider::new(Arc::clone(&sessions)),
        ScriptedRecordFetcher::new().with_records("abc", employees()),
        PipelineConfig::default().with_session_policy(SessionPolicy::RefreshPerTrigger),
    );
    let mut rows = view_model.outputs().rows();

    // Act
    view_model.inputs().request_load()?;
    let first = unwrap_stream(&mut rows, 500).await;
    view_model.inputs().request_load()?;
    let second = unwrap_stream(&mut rows, 500).await;

    // Assert
    assert_eq!(first, employee_rows());
    assert_eq!(second, employee_rows());
    assert_eq!(sessions.calls(), 1);
    Ok(())
}
