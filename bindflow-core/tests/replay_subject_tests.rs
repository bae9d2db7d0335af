// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bindflow_core::{BindflowError, ReplaySubject, StreamItem, SubjectError};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn subscriber_before_first_publish_receives_nothing_replayed() -> anyhow::Result<()> {
    // Arrange
    let subject = ReplaySubject::<Vec<u32>>::new();
    let mut early = subject.subscribe()?;

    // Act
    subject.next(vec![1])?;

    // Assert
    assert_eq!(early.next().await, Some(StreamItem::Value(vec![1])));
    assert!(
        tokio::time::timeout(Duration::from_millis(50), early.next())
            .await
            .is_err(),
        "only one value was published"
    );
    Ok(())
}

#[tokio::test]
async fn late_subscriber_gets_latest_value_then_live_values() -> anyhow::Result<()> {
    // Arrange
    let subject = ReplaySubject::<Vec<u32>>::new();
    subject.next(vec![1])?;
    subject.next(vec![2, 3])?;

    // Act
    let mut late = subject.subscribe()?;
    subject.next(vec![])?;

    // Assert
    assert_eq!(late.next().await, Some(StreamItem::Value(vec![2, 3])));
    assert_eq!(late.next().await, Some(StreamItem::Value(vec![])));
    assert_eq!(subject.latest(), Some(vec![]));
    Ok(())
}

#[tokio::test]
async fn errors_are_forwarded_but_not_replayed() -> anyhow::Result<()> {
    // Arrange
    let subject = ReplaySubject::<u32>::new();
    let mut live = subject.subscribe()?;
    subject.next(7)?;

    // Act
    subject.send(StreamItem::Error(BindflowError::stream_error("boom")))?;
    let mut late = subject.subscribe()?;

    // Assert
    assert_eq!(live.next().await, Some(StreamItem::Value(7)));
    assert!(matches!(live.next().await, Some(StreamItem::Error(_))));
    assert_eq!(late.next().await, Some(StreamItem::Value(7)));
    Ok(())
}

#[tokio::test]
async fn close_completes_subscribers_and_rejects_new_ones() -> anyhow::Result<()> {
    let subject = ReplaySubject::<u32>::new();
    subject.next(1)?;
    let mut stream = subject.subscribe()?;

    subject.close();

    assert_eq!(stream.next().await, Some(StreamItem::Value(1)));
    assert_eq!(stream.next().await, None);
    assert!(matches!(subject.subscribe(), Err(SubjectError::Closed)));
    assert_eq!(subject.next(2), Err(SubjectError::Closed));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_subscribe_and_publish_never_skips_the_final_value() -> anyhow::Result<()> {
    // Arrange
    let subject = Arc::new(ReplaySubject::<usize>::new());
    let publisher = {
        let subject = Arc::clone(&subject);
        tokio::spawn(async move {
            for value in 0..200 {
                let _ = subject.next(value);
                tokio::task::yield_now().await;
            }
        })
    };

    // Act
    let mut subscribers = Vec::new();
    for _ in 0..20 {
        subscribers.push(subject.subscribe()?);
        tokio::task::yield_now().await;
    }
    publisher.await?;
    subject.close();

    // Assert: every subscriber sees a strictly increasing run ending at the last value
    for stream in subscribers {
        let values: Vec<usize> = stream.filter_map(|item| async move { item.ok() }).collect().await;
        assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(values.last(), Some(&199));
    }
    Ok(())
}
