//! Candidate loading for drill sessions.

use async_trait::async_trait;
use thiserror::Error;

use crate::drill::{DrillItem, DrillMode};

// ---------------------------------------------------------------------------
// FetchError
// ---------------------------------------------------------------------------

/// The candidate set could not be loaded.  The session shows an error state
/// and no run starts.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("service responded with status {0}")]
    Status(u16),

    #[error("failed to parse vocabulary list: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else if e.is_decode() {
            FetchError::Parse(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// DrillSource trait
// ---------------------------------------------------------------------------

/// Where drill candidates come from.
#[async_trait]
pub trait DrillSource: Send + Sync {
    /// Items the service schedules for drilling in `mode`.
    async fn fetch_candidates(&self, mode: DrillMode) -> Result<Vec<DrillItem>, FetchError>;

    /// Every vocabulary entry; the looping-mode candidate set.
    async fn fetch_all_vocabulary(&self) -> Result<Vec<DrillItem>, FetchError>;
}

// ---------------------------------------------------------------------------
// MemorySource  (test-only)
// ---------------------------------------------------------------------------

/// In-memory [`DrillSource`] for unit tests.
#[cfg(test)]
pub struct MemorySource {
    candidates: Vec<DrillItem>,
    vocabulary: Vec<DrillItem>,
    fail: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl MemorySource {
    /// Serve `items` as both candidates and vocabulary.
    pub fn new(items: Vec<DrillItem>) -> Self {
        Self {
            vocabulary: items.clone(),
            candidates: items,
            fail: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn with_vocabulary(mut self, vocabulary: Vec<DrillItem>) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// A source whose every call fails with a request error.
    pub fn failing() -> Self {
        let source = Self::new(Vec::new());
        source.set_fail(true);
        source
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), FetchError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(FetchError::Request("connection refused".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[async_trait]
impl DrillSource for MemorySource {
    async fn fetch_candidates(&self, _mode: DrillMode) -> Result<Vec<DrillItem>, FetchError> {
        self.check()?;
        Ok(self.candidates.clone())
    }

    async fn fetch_all_vocabulary(&self) -> Result<Vec<DrillItem>, FetchError> {
        self.check()?;
        Ok(self.vocabulary.clone())
    }
}
