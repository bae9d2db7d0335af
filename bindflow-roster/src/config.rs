// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Pipeline configuration.
//!
//! Every field is optional when deserializing; missing fields take their defaults.
//!
//! # Example
//!
//! ```
//! use bindflow_roster::{PipelineConfig, RunPolicy, SessionPolicy};
//!
//! let config: PipelineConfig = serde_json::from_str(
//!     r#"{ "run_policy": "switch_latest", "call_timeout_ms": 2000 }"#,
//! ).unwrap();
//!
//! assert_eq!(config.run_policy, RunPolicy::SwitchLatest);
//! assert_eq!(config.session_policy, SessionPolicy::Latest);
//! assert!(config.prefetch_session);
//! ```

use crate::model::Decorations;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where each run takes its session from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPolicy {
    /// Join each trigger with the most recently completed session lookup. A lookup runs
    /// once and is reused until it fails.
    #[default]
    Latest,
    /// Ask the session provider again on every trigger.
    RefreshPerTrigger,
}

/// How overlapping runs are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPolicy {
    /// Runs proceed independently; each publishes when it completes, the last one wins.
    #[default]
    Merge,
    /// A new trigger drops the run still in flight, so only the newest run publishes.
    SwitchLatest,
}

/// Configuration of a [`RosterViewModel`](crate::RosterViewModel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub session_policy: SessionPolicy,
    #[serde(default)]
    pub run_policy: RunPolicy,
    /// Bound applied to each session lookup and each record fetch. `None` waits forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_timeout_ms: Option<u64>,
    /// Start the session lookup at construction instead of on the first trigger.
    #[serde(default = "default_prefetch_session")]
    pub prefetch_session: bool,
    #[serde(default)]
    pub decorations: Decorations,
}

fn default_prefetch_session() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            session_policy: SessionPolicy::default(),
            run_policy: RunPolicy::default(),
            call_timeout_ms: None,
            prefetch_session: default_prefetch_session(),
            decorations: Decorations::default(),
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn with_session_policy(mut self, session_policy: SessionPolicy) -> Self {
        self.session_policy = session_policy;
        self
    }

    #[must_use]
    pub fn with_run_policy(mut self, run_policy: RunPolicy) -> Self {
        self.run_policy = run_policy;
        self
    }

    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn with_prefetch_session(mut self, prefetch_session: bool) -> Self {
        self.prefetch_session = prefetch_session;
        self
    }

    #[must_use]
    pub fn with_decorations(mut self, decorations: Decorations) -> Self {
        self.decorations = decorations;
        self
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }
}
