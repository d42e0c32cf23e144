use std::future::Future;
use std::time::Duration;

use serde::Serialize;

/// A candidate that was observed to be playable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaHandle {
    pub url: String,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub controls: bool,
}

impl MediaHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_type: None,
            content_length: None,
            controls: true,
        }
    }
}

/// Terminal outcome of a single load attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Playable(MediaHandle),
    Failed(String),
}

/// Outcome of probing a whole candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Found(MediaHandle),
    NotFound,
}

impl ProbeResult {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Found(handle) => Some(&handle.url),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Starts one network load for a URL and reports whether it became playable.
///
/// Each call is exactly one load attempt. Dropping the returned future must
/// abandon the attempt and release whatever it holds.
pub trait MediaLoader: Send + Sync {
    fn load(&self, url: &str) -> impl Future<Output = LoadOutcome> + Send;
}

/// Tries candidates strictly one after another and stops at the first playable one.
#[derive(Debug, Clone)]
pub struct Prober<L> {
    loader: L,
    attempt_timeout: Duration,
}

impl<L: MediaLoader> Prober<L> {
    pub fn new(loader: L, attempt_timeout: Duration) -> Self {
        Self {
            loader,
            attempt_timeout,
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Probe `urls` in order.
    ///
    /// An attempt that neither succeeds nor fails within the attempt timeout
    /// is abandoned and counts as a failure. Candidates after the winner are
    /// never loaded.
    pub async fn probe(&self, urls: &[String]) -> ProbeResult {
        for (attempt, url) in urls.iter().enumerate() {
            match tokio::time::timeout(self.attempt_timeout, self.loader.load(url)).await {
                Ok(LoadOutcome::Playable(handle)) => {
                    tracing::debug!(attempt, url = url.as_str(), "media candidate playable");
                    return ProbeResult::Found(handle);
                }
                Ok(LoadOutcome::Failed(reason)) => {
                    tracing::debug!(attempt, url = url.as_str(), %reason, "media candidate failed");
                }
                Err(_) => {
                    tracing::debug!(
                        attempt,
                        url = url.as_str(),
                        timeout_ms = self.attempt_timeout.as_millis() as u64,
                        "media candidate timed out"
                    );
                }
            }
        }

        tracing::debug!(candidates = urls.len(), "no playable media candidate");
        ProbeResult::NotFound
    }
}
