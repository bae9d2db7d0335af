// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bindflow_core::{BindflowError, LatestValue};
use futures::FutureExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

fn gated_loader(
    gate: Arc<Notify>,
    calls: Arc<AtomicUsize>,
) -> LatestValue<String> {
    LatestValue::new(move || {
        let gate = Arc::clone(&gate);
        let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            gate.notified().await;
            Ok(format!("token-{call}"))
        }
        .boxed()
    })
}

#[tokio::test]
async fn concurrent_callers_share_one_in_flight_load() -> anyhow::Result<()> {
    // Arrange
    let gate = Arc::new(Notify::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let cell = gated_loader(Arc::clone(&gate), Arc::clone(&calls));

    // Act
    let first = tokio::spawn({
        let cell = cell.clone();
        async move { cell.latest().await }
    });
    let second = tokio::spawn({
        let cell = cell.clone();
        async move { cell.latest().await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(cell.is_loading());
    gate.notify_one();

    // Assert
    assert_eq!(first.await??, "token-1");
    assert_eq!(second.await??, "token-1");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn completed_value_is_served_without_reloading() -> anyhow::Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let cell = {
        let calls = Arc::clone(&calls);
        LatestValue::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(42_u32) }.boxed()
        })
    };

    assert_eq!(cell.latest().await?, 42);
    assert_eq!(cell.latest().await?, 42);
    assert_eq!(cell.peek(), Some(42));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cell.loads_started(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_load_reaches_waiters_and_next_call_retries() -> anyhow::Result<()> {
    // Arrange: first attempt fails, second succeeds
    let calls = Arc::new(AtomicUsize::new(0));
    let cell = {
        let calls = Arc::clone(&calls);
        LatestValue::new(move || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if call == 0 {
                    Err(BindflowError::session_unavailable("login offline"))
                } else {
                    Ok("fresh".to_string())
                }
            }
            .boxed()
        })
    };

    // Act
    let failed = cell.latest().await;
    let recovered = cell.latest().await;

    // Assert
    assert!(failed.unwrap_err().is_session_unavailable());
    assert_eq!(recovered?, "fresh");
    assert_eq!(cell.loads_started(), 2);
    Ok(())
}

#[tokio::test]
async fn prime_starts_the_load_without_waiting() -> anyhow::Result<()> {
    let gate = Arc::new(Notify::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let cell = gated_loader(Arc::clone(&gate), Arc::clone(&calls));

    cell.prime();
    cell.prime();
    assert!(cell.is_loading());
    assert_eq!(cell.peek(), None);

    gate.notify_one();
    assert_eq!(cell.latest().await?, "token-1");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn dropping_a_waiter_does_not_strand_the_load() -> anyhow::Result<()> {
    let gate = Arc::new(Notify::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let cell = gated_loader(Arc::clone(&gate), Arc::clone(&calls));

    let abandoned = tokio::time::timeout(Duration::from_millis(20), cell.latest()).await;
    assert!(abandoned.is_err());

    gate.notify_one();
    assert_eq!(cell.latest().await?, "token-1");
    Ok(())
}

#[tokio::test]
async fn dropping_the_last_handle_aborts_the_pending_load() -> anyhow::Result<()> {
    // Arrange
    let (held_tx, held_rx) = tokio::sync::oneshot::channel::<()>();
    let held = Arc::new(std::sync::Mutex::new(Some(held_tx)));
    let cell = LatestValue::new(move || {
        let held = held.lock().ok().and_then(|mut slot| slot.take());
        async move {
            let _held = held;
            futures::future::pending::<()>().await;
            Ok("never".to_string())
        }
        .boxed()
    });
    cell.prime();
    assert!(cell.is_loading());

    // Act
    drop(cell);

    // Assert
    let released = tokio::time::timeout(Duration::from_secs(1), held_rx).await?;
    assert!(released.is_err());
    Ok(())
}
