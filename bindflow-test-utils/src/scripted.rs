// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Collaborators with scripted outcomes.
//!
//! Share them with a view model through `Arc` and keep a handle to inspect calls or release
//! gated calls:
//!
//! ```rust
//! use bindflow_roster::SessionProvider;
//! use bindflow_test_utils::ScriptedSessionProvider;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let sessions = Arc::new(ScriptedSessionProvider::token("abc"));
//! let handle = Arc::clone(&sessions);
//!
//! assert_eq!(sessions.get_session().await.unwrap().token, "abc");
//! assert_eq!(handle.calls(), 1);
//! # }
//! ```

use async_trait::async_trait;
use bindflow_core::{BindflowError, Result};
use bindflow_roster::{Record, RecordFetcher, Session, SessionProvider};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Releases gated calls one permit at a time.
#[derive(Debug, Default)]
struct Gate {
    permits: Option<Semaphore>,
}

impl Gate {
    fn closed() -> Self {
        Self {
            permits: Some(Semaphore::new(0)),
        }
    }

    async fn pass(&self) {
        if let Some(permits) = &self.permits {
            if let Ok(permit) = permits.acquire().await {
                permit.forget();
            }
        }
    }

    fn release(&self, calls: usize) {
        if let Some(permits) = &self.permits {
            permits.add_permits(calls);
        }
    }
}

/// A session provider answering each call with the next scripted outcome.
///
/// Once the script is exhausted the last outcome is repeated.
#[derive(Debug)]
pub struct ScriptedSessionProvider {
    outcomes: Mutex<VecDeque<Result<Session>>>,
    last: Mutex<Option<Result<Session>>>,
    gate: Gate,
    calls: AtomicUsize,
}

impl ScriptedSessionProvider {
    pub fn new(outcomes: impl IntoIterator<Item = Result<Session>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            last: Mutex::new(None),
            gate: Gate::default(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answers with `token`.
    pub fn token(token: &str) -> Self {
        Self::new([Ok(Session::new(token))])
    }

    /// Always fails with `SessionUnavailable`.
    pub fn failing(context: &str) -> Self {
        Self::new([Err(BindflowError::session_unavailable(context))])
    }

    /// Makes every call wait until [`release`](Self::release) lets it through.
    #[must_use]
    pub fn gated(mut self) -> Self {
        self.gate = Gate::closed();
        self
    }

    /// Lets `calls` waiting (or future) calls complete.
    pub fn release(&self, calls: usize) {
        self.gate.release(calls);
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_outcome(&self) -> Result<Session> {
        let mut last = self.last.lock();
        if let Some(outcome) = self.outcomes.lock().pop_front() {
            *last = Some(outcome);
        }
        last.clone()
            .unwrap_or_else(|| Err(BindflowError::session_unavailable("nothing scripted")))
    }
}

#[async_trait]
impl SessionProvider for ScriptedSessionProvider {
    async fn get_session(&self) -> Result<Session> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.next_outcome();
        self.gate.pass().await;
        outcome
    }
}

/// A record fetcher answering per token.
///
/// Unknown tokens fail with `FetchFailure`. Optional per-call delays (consumed in call order)
/// let tests make earlier calls complete after later ones.
#[derive(Debug, Default)]
pub struct ScriptedRecordFetcher {
    responses: HashMap<String, Result<Vec<Record>>>,
    delays: Mutex<VecDeque<Duration>>,
    gate: Gate,
    tokens: Mutex<Vec<String>>,
}

impl ScriptedRecordFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_records(mut self, token: &str, records: Vec<Record>) -> Self {
        self.responses.insert(token.to_string(), Ok(records));
        self
    }

    #[must_use]
    pub fn with_failure(mut self, token: &str, context: &str) -> Self {
        self.responses
            .insert(token.to_string(), Err(BindflowError::fetch_failure(context)));
        self
    }

    /// The n-th call sleeps for the n-th delay before answering.
    #[must_use]
    pub fn with_delays(self, delays: impl IntoIterator<Item = Duration>) -> Self {
        *self.delays.lock() = delays.into_iter().collect();
        self
    }

    /// Makes every call wait until [`release`](Self::release) lets it through.
    #[must_use]
    pub fn gated(mut self) -> Self {
        self.gate = Gate::closed();
        self
    }

    pub fn release(&self, calls: usize) {
        self.gate.release(calls);
    }

    pub fn calls(&self) -> usize {
        self.tokens.lock().len()
    }

    /// Tokens received, in call order.
    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens.lock().clone()
    }
}

#[async_trait]
impl RecordFetcher for ScriptedRecordFetcher {
    async fn get_records(&self, token: &str) -> Result<Vec<Record>> {
        self.tokens.lock().push(token.to_string());
        let delay = self.delays.lock().pop_front();

        self.gate.pass().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.responses.get(token).cloned().unwrap_or_else(|| {
            Err(BindflowError::fetch_failure(format!(
                "no records for token {token}"
            )))
        })
    }
}
