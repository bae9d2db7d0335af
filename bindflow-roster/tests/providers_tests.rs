// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bindflow_core::BindflowError;
use bindflow_roster::{
    sample_roster, CachingSessionProvider, RecordFetcher, Session, SessionProvider,
    StaticRecordFetcher, StaticSessionProvider,
};
use bindflow_test_utils::fixtures::employees;
use bindflow_test_utils::ScriptedSessionProvider;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_static_collaborators_serve_sample_data() -> anyhow::Result<()> {
    let session = StaticSessionProvider::default().get_session().await?;
    assert_eq!(session, Session::new("test"));

    let records = StaticRecordFetcher::default().get_records(&session.token).await?;
    assert_eq!(records, employees());
    assert_eq!(sample_roster(), employees());
    Ok(())
}

#[tokio::test]
async fn test_caching_provider_memoizes_success() -> anyhow::Result<()> {
    // Arrange
    let inner = Arc::new(ScriptedSessionProvider::new([
        Ok(Session::new("first")),
        Ok(Session::new("second")),
    ]));
    let caching = CachingSessionProvider::new(Arc::clone(&inner));

    // Act & Assert
    assert_eq!(caching.get_session().await?.token, "first");
    assert_eq!(caching.get_session().await?.token, "first");
    assert_eq!(inner.calls(), 1);

    caching.invalidate();
    assert_eq!(caching.cached(), None);
    assert_eq!(caching.get_session().await?.token, "second");
    assert_eq!(inner.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_caching_provider_never_caches_failures() -> anyhow::Result<()> {
    // Arrange
    let inner = Arc::new(ScriptedSessionProvider::new([
        Err(BindflowError::session_unavailable("login offline")),
        Ok(Session::new("abc")),
    ]));
    let caching = CachingSessionProvider::new(Arc::clone(&inner));

    // Act
    let first = caching.get_session().await;
    let second = caching.get_session().await?;

    // Assert
    assert!(matches!(first, Err(ref e) if e.is_session_unavailable()));
    assert_eq!(second.token, "abc");
    assert_eq!(caching.cached(), Some(Session::new("abc")));
    assert_eq!(inner.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_caching_provider_refreshes_after_ttl() -> anyhow::Result<()> {
    // Arrange
    let inner = Arc::new(ScriptedSessionProvider::new([
        Ok(Session::new("first")),
        Ok(Session::new("second")),
    ]));
    let caching = CachingSessionProvider::with_ttl(Arc::clone(&inner), Duration::from_millis(50));

    // Act & Assert
    assert_eq!(caching.get_session().await?.token, "first");
    assert_eq!(caching.get_session().await?.token, "first");
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(caching.get_session().await?.token, "second");
    assert_eq!(inner.calls(), 2);
    Ok(())
}
