// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bindflow_core::{BindflowError, CancellationToken};
use bindflow_exec::SubscribeExt;
use bindflow_roster::DisplayRow;
use bindflow_test_utils::fixtures::employee_rows;
use futures::channel::mpsc::unbounded;
use futures::{stream, StreamExt};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::spawn;

#[derive(Debug, thiserror::Error)]
#[error("Render error: {0}")]
struct RenderError(String);

#[tokio::test]
async fn test_subscribe_renders_items_in_stream_order() -> anyhow::Result<()> {
    // Arrange: the first item takes longer to render than the second
    let rendered = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&rendered);
    let rows = stream::iter(vec![employee_rows(), Vec::new()]);

    // Act
    rows.subscribe(
        move |rows: Vec<DisplayRow>, _token| {
            let sink = Arc::clone(&sink);
            async move {
                if !rows.is_empty() {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
                if let Ok(mut sink) = sink.lock() {
                    sink.push(rows.len());
                }
                Ok::<(), RenderError>(())
            }
        },
        None,
        None::<fn(RenderError)>,
    )
    .await?;

    // Assert
    assert_eq!(*rendered.lock().unwrap(), vec![5, 0]);
    Ok(())
}

#[tokio::test]
async fn test_subscribe_collects_errors_without_callback() -> anyhow::Result<()> {
    // Arrange
    let items = stream::iter(vec![1, 2, 3, 4]);

    // Act
    let result = items
        .subscribe(
            |item: u32, _token| async move {
                if item % 2 == 0 {
                    Err(RenderError(format!("row {item}")))
                } else {
                    Ok(())
                }
            },
            None,
            None::<fn(RenderError)>,
        )
        .await;

    // Assert
    match result {
        Err(BindflowError::MultipleErrors { count, errors }) => {
            assert_eq!(count, 2);
            assert_eq!(errors[0].to_string(), "User error: Render error: row 2");
        }
        other => panic!("expected aggregated errors, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_subscribe_passes_errors_to_callback() -> anyhow::Result<()> {
    // Arrange
    let failures = Arc::new(Mutex::new(Vec::new()));
    let failures_clone = Arc::clone(&failures);
    let items = stream::iter(vec!["ok", "broken", "ok"]);

    // Act
    items
        .subscribe(
            |item: &'static str, _token| async move {
                if item == "broken" {
                    Err(RenderError(item.to_string()))
                } else {
                    Ok(())
                }
            },
            None,
            Some(move |err: RenderError| {
                if let Ok(mut failures) = failures_clone.lock() {
                    failures.push(err.0);
                }
            }),
        )
        .await?;

    // Assert
    assert_eq!(*failures.lock().unwrap(), vec!["broken".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_subscribe_stops_on_cancellation_while_idle() -> anyhow::Result<()> {
    // Arrange: a stream that never ends on its own
    let (tx, rx) = unbounded::<u32>();
    let (seen_tx, mut seen_rx) = unbounded::<u32>();
    let cancel = CancellationToken::new();

    let handle = spawn({
        let cancel = cancel.clone();
        async move {
            rx.subscribe(
                move |item, _token| {
                    let seen_tx = seen_tx.clone();
                    async move {
                        let _ = seen_tx.unbounded_send(item);
                        Ok::<(), RenderError>(())
                    }
                },
                Some(cancel),
                None::<fn(RenderError)>,
            )
            .await
        }
    });

    // Act
    tx.unbounded_send(1)?;
    assert_eq!(seen_rx.next().await, Some(1));
    cancel.cancel();

    // Assert
    tokio::time::timeout(Duration::from_millis(500), handle).await???;
    drop(tx);
    Ok(())
}
