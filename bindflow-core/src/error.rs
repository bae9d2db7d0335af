// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the bindflow pipeline.
//!
//! [`BindflowError`] is the single error type carried by [`StreamItem::Error`](crate::StreamItem)
//! between operators. Collaborators (session providers, record fetchers) report their
//! failures through it as well, so a pipeline can decide in one place how to contain them.
//!
//! # Examples
//!
//! ```
//! use bindflow_core::{BindflowError, Result};
//!
//! fn lookup() -> Result<String> {
//!     Err(BindflowError::session_unavailable("login service offline"))
//! }
//!
//! assert!(lookup().unwrap_err().is_session_unavailable());
//! ```

/// Root error type for all bindflow operations.
#[derive(Debug, thiserror::Error)]
pub enum BindflowError {
    /// The session provider failed to produce a session.
    #[error("Session unavailable: {context}")]
    SessionUnavailable {
        /// What the provider reported
        context: String,
    },

    /// The record fetcher failed for a given token.
    #[error("Fetch failure: {context}")]
    FetchFailure {
        /// What the fetcher reported
        context: String,
    },

    /// A bounded asynchronous call did not complete in time.
    #[error("Timeout error: {context}")]
    TimeoutError {
        /// Which call expired and its bound
        context: String,
    },

    /// Stream processing encountered an error.
    ///
    /// General error for stream operations that don't fit the other categories.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong during stream processing
        context: String,
    },

    /// Several handler failures collected by a subscriber without an error callback.
    #[error("Multiple errors occurred: {count} errors")]
    MultipleErrors {
        /// Number of errors that occurred
        count: usize,
        /// The individual errors
        errors: Vec<BindflowError>,
    },

    /// Custom error from user code.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BindflowError {
    /// Create a session-unavailable error with the given context
    pub fn session_unavailable(context: impl Into<String>) -> Self {
        Self::SessionUnavailable {
            context: context.into(),
        }
    }

    /// Create a fetch-failure error with the given context
    pub fn fetch_failure(context: impl Into<String>) -> Self {
        Self::FetchFailure {
            context: context.into(),
        }
    }

    /// Create a timeout error with the given context
    pub fn timeout_error(context: impl Into<String>) -> Self {
        Self::TimeoutError {
            context: context.into(),
        }
    }

    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Aggregate user errors into a `MultipleErrors` variant.
    ///
    /// ```
    /// use bindflow_core::BindflowError;
    ///
    /// let errors = vec![std::io::Error::other("a"), std::io::Error::other("b")];
    /// let err = BindflowError::from_user_errors(errors);
    /// assert!(matches!(err, BindflowError::MultipleErrors { count: 2, .. }));
    /// ```
    pub fn from_user_errors<E>(errors: Vec<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let count = errors.len();
        let errors = errors.into_iter().map(Self::user_error).collect();
        Self::MultipleErrors { count, errors }
    }

    #[must_use]
    pub const fn is_session_unavailable(&self) -> bool {
        matches!(self, Self::SessionUnavailable { .. })
    }

    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::FetchFailure { .. })
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::TimeoutError { .. })
    }
}

/// Specialized Result type for bindflow operations.
pub type Result<T> = std::result::Result<T, BindflowError>;

/// Extension trait for converting foreign errors into `BindflowError`.
///
/// Automatically implemented for every `std::error::Error + Send + Sync + 'static`.
pub trait IntoBindflowError {
    /// Convert this error into a `BindflowError` with additional context
    fn into_bindflow_error(self, context: &str) -> BindflowError;

    /// Convert this error into a `BindflowError` without additional context
    fn into_bindflow(self) -> BindflowError
    where
        Self: Sized,
    {
        self.into_bindflow_error("")
    }
}

impl<E: std::error::Error + Send + Sync + 'static> IntoBindflowError for E {
    fn into_bindflow_error(self, context: &str) -> BindflowError {
        if context.is_empty() {
            BindflowError::user_error(self)
        } else {
            BindflowError::stream_error(format!("{context}: {self}"))
        }
    }
}

/// Helper trait for adding context to `Result`s.
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(BindflowError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Errors
    /// Returns `Err(BindflowError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<BindflowError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| prefix(context.into(), e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| prefix(f(), e.into()))
    }
}

// Only user errors are rewritten; the domain variants already say what failed.
fn prefix(context: String, error: BindflowError) -> BindflowError {
    match error {
        BindflowError::UserError(inner) => BindflowError::StreamProcessingError {
            context: format!("{context}: {inner}"),
        },
        other => other,
    }
}

impl Clone for BindflowError {
    fn clone(&self) -> Self {
        match self {
            Self::SessionUnavailable { context } => Self::SessionUnavailable {
                context: context.clone(),
            },
            Self::FetchFailure { context } => Self::FetchFailure {
                context: context.clone(),
            },
            Self::TimeoutError { context } => Self::TimeoutError {
                context: context.clone(),
            },
            Self::StreamProcessingError { context } => Self::StreamProcessingError {
                context: context.clone(),
            },
            Self::MultipleErrors { count, errors } => Self::MultipleErrors {
                count: *count,
                errors: errors.clone(),
            },
            // The boxed error can't be cloned, keep its message
            Self::UserError(e) => Self::StreamProcessingError {
                context: format!("User error: {e}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("disk on fire")]
    struct DiskError;

    #[test]
    fn context_rewrites_user_errors_only() {
        let user: std::result::Result<(), BindflowError> = Err(DiskError.into_bindflow());
        let err = user.context("loading roster").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Stream processing error: loading roster: disk on fire"
        );

        let fetch: std::result::Result<(), BindflowError> =
            Err(BindflowError::fetch_failure("503"));
        let err = fetch.with_context(|| "ignored".to_string()).unwrap_err();
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn clone_keeps_user_error_message() {
        let err = BindflowError::user_error(DiskError);
        assert_eq!(err.clone().to_string(), "Stream processing error: User error: disk on fire");
    }
}
