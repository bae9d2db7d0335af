// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Table Binder Demo
//!
//! Plays the part of a UI table: subscribes to a roster view model, prints every published
//! row list, and presses "load" a few times. The record source rejects every other call,
//! which shows up as an empty table instead of an error.
//!
//! Usage: `table-binder [config.json]`, logging controlled by `RUST_LOG`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bindflow::prelude::*;
use bindflow::{CancellationToken, PipelineConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Serves the sample roster, failing every second call.
struct FlakyFetcher {
    inner: StaticRecordFetcher,
    calls: AtomicUsize,
}

#[async_trait]
impl RecordFetcher for FlakyFetcher {
    async fn get_records(&self, token: &str) -> bindflow::Result<Vec<Record>> {
        tokio::time::sleep(Duration::from_millis(150)).await;
        if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 1 {
            return Err(BindflowError::fetch_failure(format!(
                "roster service rejected token {token}"
            )));
        }
        self.inner.get_records(token).await
    }
}

fn load_config() -> Result<PipelineConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing config {path}"))
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn render(rows: &[DisplayRow]) {
    println!("┌──────────────────────┬──────────┐");
    if rows.is_empty() {
        println!("│ (no rows)            │          │");
    }
    for row in rows {
        println!("│ {:<20} │ {:<8} │", row.display_name, row.display_age);
    }
    println!("└──────────────────────┴──────────┘");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = load_config()?;
    info!(?config, "starting table binder");

    let view_model = RosterViewModel::with_config(
        StaticSessionProvider::default(),
        FlakyFetcher {
            inner: StaticRecordFetcher::default(),
            calls: AtomicUsize::new(0),
        },
        config,
    );

    let cancel = CancellationToken::new();
    let binder = tokio::spawn(view_model.outputs().rows().subscribe(
        |rows, _token| async move {
            render(&rows);
            Ok::<(), std::io::Error>(())
        },
        Some(cancel.clone()),
        None::<fn(std::io::Error)>,
    ));

    for press in 1..=3 {
        info!(press, "load requested");
        view_model.inputs().request_load()?;
        tokio::time::sleep(Duration::from_millis(400)).await;
    }

    cancel.cancel();
    binder.await??;
    info!("table binder finished");
    Ok(())
}
