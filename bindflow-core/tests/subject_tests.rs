// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bindflow_core::{StreamItem, Subject, SubjectError};
use futures::StreamExt;

#[tokio::test]
async fn broadcasts_to_multiple_subscribers() -> anyhow::Result<()> {
    let subject = Subject::<i32>::new();
    let mut a = subject.subscribe()?;
    let mut b = subject.subscribe()?;

    subject.next(1)?;

    assert_eq!(a.next().await, Some(StreamItem::Value(1)));
    assert_eq!(b.next().await, Some(StreamItem::Value(1)));
    Ok(())
}

#[tokio::test]
async fn late_subscriber_misses_earlier_items() -> anyhow::Result<()> {
    let subject = Subject::<i32>::new();
    subject.next(1)?;

    let mut late = subject.subscribe()?;
    subject.next(2)?;
    subject.close();

    assert_eq!(late.next().await, Some(StreamItem::Value(2)));
    assert_eq!(late.next().await, None);
    Ok(())
}

#[test]
fn send_and_subscribe_after_close_are_rejected() {
    let subject = Subject::<()>::new();
    subject.close();

    assert_eq!(subject.next(()), Err(SubjectError::Closed));
    assert!(matches!(subject.subscribe(), Err(SubjectError::Closed)));
}

#[test]
fn dropped_subscribers_are_pruned_on_send() -> anyhow::Result<()> {
    let subject = Subject::<()>::new();
    let kept = subject.subscribe()?;
    let dropped = subject.subscribe()?;
    assert_eq!(subject.subscriber_count(), 2);

    drop(dropped);
    subject.next(())?;

    assert_eq!(subject.subscriber_count(), 1);
    drop(kept);
    Ok(())
}
