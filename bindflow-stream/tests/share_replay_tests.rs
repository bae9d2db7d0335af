// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bindflow_core::{BindflowError, StreamItem};
use bindflow_stream::ShareReplayExt;
use bindflow_test_utils::helpers::{
    assert_no_element_emitted, assert_stream_ended, unwrap_stream, unwrap_value,
};
use bindflow_test_utils::{test_channel, test_channel_with_errors};
use std::time::Duration;

#[tokio::test]
async fn test_share_replay_delivers_latest_to_late_subscriber() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let shared = source.share_replay();
    let mut early = shared.subscribe()?;

    // Act
    tx.send(1)?;
    tx.send(2)?;
    assert_eq!(unwrap_value(unwrap_stream(&mut early, 500).await), 1);
    assert_eq!(unwrap_value(unwrap_stream(&mut early, 500).await), 2);
    let mut late = shared.subscribe()?;

    // Assert: the late subscriber gets only the latest value, then live values
    assert_eq!(unwrap_value(unwrap_stream(&mut late, 500).await), 2);
    assert_no_element_emitted(&mut late, 50).await;
    tx.send(3)?;
    assert_eq!(unwrap_value(unwrap_stream(&mut late, 500).await), 3);
    assert_eq!(unwrap_value(unwrap_stream(&mut early, 500).await), 3);
    assert_eq!(shared.latest(), Some(3));
    Ok(())
}

#[tokio::test]
async fn test_share_replay_is_hot_without_subscribers() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<&'static str>();
    let shared = source.share_replay();

    // Act
    tx.send("published before anyone listened")?;
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Assert
    let mut subscriber = shared.subscribe()?;
    assert_eq!(
        unwrap_value(unwrap_stream(&mut subscriber, 500).await),
        "published before anyone listened"
    );
    Ok(())
}

#[tokio::test]
async fn test_share_replay_forwards_errors_without_closing() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel_with_errors::<u32>();
    let shared = source.share_replay();
    let mut subscriber = shared.subscribe()?;

    // Act
    tx.send(StreamItem::Error(BindflowError::stream_error("transient")))?;
    tx.send(StreamItem::Value(5))?;

    // Assert
    assert!(unwrap_stream(&mut subscriber, 500).await.is_error());
    assert_eq!(unwrap_value(unwrap_stream(&mut subscriber, 500).await), 5);
    assert!(!shared.is_closed());
    Ok(())
}

#[tokio::test]
async fn test_share_replay_completes_subscribers_when_source_ends() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u32>();
    let shared = source.share_replay();
    let mut subscriber = shared.subscribe()?;

    // Act
    tx.send(1)?;
    drop(tx);

    // Assert
    assert_eq!(unwrap_value(unwrap_stream(&mut subscriber, 500).await), 1);
    assert_stream_ended(&mut subscriber, 500).await;
    assert!(shared.is_closed());
    assert!(shared.subscribe().is_err());
    Ok(())
}

#[tokio::test]
async fn test_share_replay_drop_completes_subscribers() -> anyhow::Result<()> {
    // Arrange
    let (_tx, source) = test_channel::<u32>();
    let shared = source.share_replay();
    let mut subscriber = shared.subscribe()?;

    // Act
    drop(shared);

    // Assert
    assert_stream_ended(&mut subscriber, 500).await;
    Ok(())
}
