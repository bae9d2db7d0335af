// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Collaborators queried by the roster pipeline, plus in-memory stand-ins.
//!
//! Both traits describe single-shot asynchronous calls: each invocation produces exactly one
//! outcome. Real implementations talk to remote services; the stand-ins here serve fixed data.

use crate::model::{Record, Session};
use async_trait::async_trait;
use bindflow_core::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Produces the current login session.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns `BindflowError::SessionUnavailable` (or any other error) when no session can
    /// be produced.
    async fn get_session(&self) -> Result<Session>;
}

/// Fetches the raw roster for a session token.
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    /// # Errors
    ///
    /// Returns `BindflowError::FetchFailure` (or any other error) when the records cannot be
    /// retrieved for `token`.
    async fn get_records(&self, token: &str) -> Result<Vec<Record>>;
}

#[async_trait]
impl<P: SessionProvider + ?Sized> SessionProvider for Arc<P> {
    async fn get_session(&self) -> Result<Session> {
        (**self).get_session().await
    }
}

#[async_trait]
impl<F: RecordFetcher + ?Sized> RecordFetcher for Arc<F> {
    async fn get_records(&self, token: &str) -> Result<Vec<Record>> {
        (**self).get_records(token).await
    }
}

/// Always yields the same session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSessionProvider {
    token: String,
}

impl StaticSessionProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Default for StaticSessionProvider {
    fn default() -> Self {
        Self::new("test")
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn get_session(&self) -> Result<Session> {
        Ok(Session::new(self.token.clone()))
    }
}

/// Memoizes the last session produced by another provider.
///
/// Failures are never cached: the next call asks the wrapped provider again. With a
/// time-to-live, a cached session older than the bound is refreshed on the next call.
/// Concurrent misses may each reach the wrapped provider.
pub struct CachingSessionProvider<P> {
    inner: P,
    ttl: Option<Duration>,
    cached: Mutex<Option<(Session, Instant)>>,
}

impl<P: SessionProvider> CachingSessionProvider<P> {
    /// Caches forever.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            ttl: None,
            cached: Mutex::new(None),
        }
    }

    /// Caches each session for at most `ttl`.
    pub fn with_ttl(inner: P, ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::new(inner)
        }
    }

    /// Drops the cached session, if any.
    pub fn invalidate(&self) {
        *self.cached.lock() = None;
    }

    pub fn cached(&self) -> Option<Session> {
        self.cached.lock().as_ref().map(|(session, _)| session.clone())
    }

    fn fresh(&self) -> Option<Session> {
        let cached = self.cached.lock();
        let (session, stored_at) = cached.as_ref()?;
        match self.ttl {
            Some(ttl) if stored_at.elapsed() >= ttl => None,
            _ => Some(session.clone()),
        }
    }
}

#[async_trait]
impl<P: SessionProvider> SessionProvider for CachingSessionProvider<P> {
    async fn get_session(&self) -> Result<Session> {
        if let Some(session) = self.fresh() {
            return Ok(session);
        }

        let session = self.inner.get_session().await?;
        *self.cached.lock() = Some((session.clone(), Instant::now()));
        Ok(session)
    }
}

/// Serves a fixed roster regardless of the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRecordFetcher {
    records: Vec<Record>,
}

impl StaticRecordFetcher {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl Default for StaticRecordFetcher {
    fn default() -> Self {
        Self::new(sample_roster())
    }
}

#[async_trait]
impl RecordFetcher for StaticRecordFetcher {
    async fn get_records(&self, _token: &str) -> Result<Vec<Record>> {
        Ok(self.records.clone())
    }
}

/// The five-person sample roster, in fetch order.
pub fn sample_roster() -> Vec<Record> {
    vec![
        Record::new("takkumattsu", 37),
        Record::new("mironal", 17),
        Record::new("ryohey", 17),
        Record::new("yanac", 17),
        Record::new("numa08", 7),
    ]
}
