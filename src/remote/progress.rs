//! Progress commits for bounded drilling.

use async_trait::async_trait;
use thiserror::Error;

/// The repetition could not be reported.  The run still completes; the local
/// count stays as it was until the next successful commit or reload.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("service responded with status {0}")]
    Status(u16),

    #[error("failed to parse progress response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for CommitError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            CommitError::Status(status.as_u16())
        } else if e.is_decode() {
            CommitError::Parse(e.to_string())
        } else {
            CommitError::Request(e.to_string())
        }
    }
}

/// Repeat count stored by the service after a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    pub count: u32,
    pub target: u32,
    /// The item reached its target and leaves the drill set.
    pub completed: bool,
}

/// Reports completed repetitions to the remote store.
#[async_trait]
pub trait ProgressCommitter: Send + Sync {
    async fn commit(&self, item_id: &str, increment: u32) -> Result<CommitOutcome, CommitError>;
}

// ---------------------------------------------------------------------------
// MemoryCommitter  (test-only)
// ---------------------------------------------------------------------------

/// In-memory store that behaves like the service: counts go up by the
/// increment and an item completes once its count reaches its target.
#[cfg(test)]
pub struct MemoryCommitter {
    counts: std::sync::Mutex<std::collections::HashMap<String, (u32, u32)>>,
    calls: std::sync::Mutex<Vec<String>>,
    fail: bool,
}

#[cfg(test)]
impl MemoryCommitter {
    pub fn new(items: &[crate::drill::DrillItem]) -> Self {
        let counts = items
            .iter()
            .map(|item| (item.id.clone(), (item.repeat_count, item.repeat_target)))
            .collect();
        Self {
            counts: std::sync::Mutex::new(counts),
            calls: std::sync::Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A store whose every commit fails.
    pub fn failing(items: &[crate::drill::DrillItem]) -> Self {
        Self {
            fail: true,
            ..Self::new(items)
        }
    }

    /// Ids passed to `commit`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored(&self, item_id: &str) -> Option<(u32, u32)> {
        self.counts.lock().unwrap().get(item_id).copied()
    }
}

#[cfg(test)]
#[async_trait]
impl ProgressCommitter for MemoryCommitter {
    async fn commit(&self, item_id: &str, increment: u32) -> Result<CommitOutcome, CommitError> {
        self.calls.lock().unwrap().push(item_id.to_string());
        if self.fail {
            return Err(CommitError::Request("connection reset".into()));
        }
        let mut counts = self.counts.lock().unwrap();
        let entry = counts
            .get_mut(item_id)
            .ok_or(CommitError::Status(404))?;
        entry.0 += increment;
        Ok(CommitOutcome {
            count: entry.0,
            target: entry.1,
            completed: entry.0 >= entry.1,
        })
    }
}
