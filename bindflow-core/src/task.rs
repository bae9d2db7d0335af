// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Owned background task with cooperative cancellation.

use crate::CancellationToken;
use std::future::Future;

/// A spawned tokio task that is cancelled when its owner drops it.
///
/// The closure receives a [`CancellationToken`]; the task is expected to race its work
/// against `token.cancelled()` and return once cancellation is signalled.
///
/// Spawning requires a tokio runtime context (current-thread or multi-thread).
#[derive(Debug)]
pub struct BindflowTask {
    cancel: CancellationToken,
}

impl BindflowTask {
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        tokio::spawn(f(cancel.clone()));

        Self { cancel }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for BindflowTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
