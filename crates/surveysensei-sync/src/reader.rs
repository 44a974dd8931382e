//! Eventually-consistent reads of freshly written backend state.
//!
//! A [`ConsistentReader`] holds the last successfully fetched value for one
//! resource. Successful reads replace it wholesale; failed reads never clear
//! it. Results whose [`ViewToken`] has gone stale are dropped unapplied.

use std::fmt::Display;
use std::future::Future;

use surveysensei_core::{ViewToken, user_message};
use tracing::{debug, info};

use crate::retry::{RetryPolicy, retry_with_delay};

/// What a refresh did to the displayed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A new value replaced the displayed one.
    Fresh,
    /// All attempts failed; the previous value is still displayed.
    Stale { error: String },
    /// All attempts failed and there was nothing to fall back to.
    Empty { error: String },
    /// The view moved on before the read finished; nothing was applied.
    Superseded,
}

impl ReadOutcome {
    /// Error the user should see, if any. Stale reads keep quiet data but still
    /// report the failure so a manual retry can be offered.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Stale { error } | Self::Empty { error } => Some(error),
            Self::Fresh | Self::Superseded => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConsistentReader<T> {
    current: Option<T>,
    last_error: Option<String>,
    policy: RetryPolicy,
}

impl<T> Default for ConsistentReader<T> {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl<T> ConsistentReader<T> {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            current: None,
            last_error: None,
            policy,
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Forget everything. Used when the reader is pointed at a different
    /// resource, never after a failed read.
    pub fn reset(&mut self) {
        self.current = None;
        self.last_error = None;
    }

    /// Fetch with retries, then apply the result under `token`.
    pub async fn refresh<E, F, Fut>(
        &mut self,
        token: &ViewToken,
        label: &str,
        fetch: F,
    ) -> ReadOutcome
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let result = retry_with_delay(&self.policy, label, fetch).await;
        self.apply(token, result.map_err(|e| user_message(&e)))
    }

    /// Apply a completed read. Split out from [`refresh`](Self::refresh) for
    /// callers that run the fetch elsewhere.
    pub fn apply(&mut self, token: &ViewToken, result: Result<T, String>) -> ReadOutcome {
        if !token.is_current() {
            debug!("read result arrived for a superseded view, dropping");
            return ReadOutcome::Superseded;
        }
        match result {
            Ok(value) => {
                self.current = Some(value);
                self.last_error = None;
                ReadOutcome::Fresh
            }
            Err(error) => {
                self.last_error = Some(error.clone());
                if self.current.is_some() {
                    info!(error = %error, "read failed, keeping previously displayed data");
                    ReadOutcome::Stale { error }
                } else {
                    ReadOutcome::Empty { error }
                }
            }
        }
    }
}
