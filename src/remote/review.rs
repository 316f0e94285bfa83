//! Review submissions for listening and spelling assessments.
//!
//! The service owns the review schedule; this client only fetches what is
//! due and reports a rating per item.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::drill::DrillItem;

use super::source::FetchError;

/// Which skill an assessment checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamKind {
    /// Hear the word, recall its meaning.
    Listening,
    /// Hear the word, type it.
    Spelling,
}

/// Self-assessed recall quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Again,
    Good,
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("service responded with status {0}")]
    Status(u16),

    #[error("failed to parse review response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ReviewError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            ReviewError::Status(status.as_u16())
        } else if e.is_decode() {
            ReviewError::Parse(e.to_string())
        } else {
            ReviewError::Request(e.to_string())
        }
    }
}

/// What the service reports back for a submitted review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewReceipt {
    pub learning_status: String,
    /// Human-readable time until the next review (e.g. "3 days").
    pub next_review_display: String,
}

#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Items due for review in the given assessment.
    async fn fetch_due_reviews(&self, kind: ExamKind) -> Result<Vec<DrillItem>, FetchError>;

    async fn submit_review(
        &self,
        item_id: &str,
        kind: ExamKind,
        rating: Rating,
        user_input: Option<&str>,
    ) -> Result<ReviewReceipt, ReviewError>;
}

// ---------------------------------------------------------------------------
// MemoryReviews  (test-only)
// ---------------------------------------------------------------------------

/// Record of one `submit_review` call.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedReview {
    pub item_id: String,
    pub kind: ExamKind,
    pub rating: Rating,
    pub user_input: Option<String>,
}

#[cfg(test)]
pub struct MemoryReviews {
    due: Vec<DrillItem>,
    submitted: std::sync::Mutex<Vec<SubmittedReview>>,
    fail_submit: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl MemoryReviews {
    pub fn new(due: Vec<DrillItem>) -> Self {
        Self {
            due,
            submitted: std::sync::Mutex::new(Vec::new()),
            fail_submit: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn set_fail_submit(&self, fail: bool) {
        self.fail_submit
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn submitted(&self) -> Vec<SubmittedReview> {
        self.submitted.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl ReviewService for MemoryReviews {
    async fn fetch_due_reviews(&self, _kind: ExamKind) -> Result<Vec<DrillItem>, FetchError> {
        Ok(self.due.clone())
    }

    async fn submit_review(
        &self,
        item_id: &str,
        kind: ExamKind,
        rating: Rating,
        user_input: Option<&str>,
    ) -> Result<ReviewReceipt, ReviewError> {
        if self.fail_submit.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(ReviewError::Request("connection refused".into()));
        }
        self.submitted.lock().unwrap().push(SubmittedReview {
            item_id: item_id.to_string(),
            kind,
            rating,
            user_input: user_input.map(str::to_string),
        });
        let next = match rating {
            Rating::Again => "10 minutes",
            Rating::Good => "3 days",
        };
        Ok(ReviewReceipt {
            learning_status: "exam_listening".into(),
            next_review_display: next.into(),
        })
    }
}
