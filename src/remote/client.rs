//! HTTP client for the vocabulary service.
//!
//! [`ApiClient`] implements every remote boundary the drill player uses:
//! [`DrillSource`], [`SpeechRenderer`], [`ProgressCommitter`] and
//! [`ReviewService`].  All connection details come from [`ServerConfig`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::ServerConfig;
use crate::drill::{DrillItem, DrillMode};

use super::progress::{CommitError, CommitOutcome, ProgressCommitter};
use super::review::{ExamKind, Rating, ReviewError, ReviewReceipt, ReviewService};
use super::source::{DrillSource, FetchError};
use super::speech::{SpeechRenderer, SynthesisError};
use super::types::{
    DueReviews, PlaybackRhythm, ProgressRequest, ProgressResponse, ReviewRequest, ReviewResponse,
    SpeechResponse, VocabularyRecord,
};

/// Shared `reqwest` client bound to one service base URL.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying HTTP client, for components that download audio.
    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Resolve a locator returned by the service.  Relative paths are
    /// served from the same host.
    fn resolve(&self, locator: &str) -> String {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            locator.to_string()
        } else {
            self.url(locator)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, reqwest::Error> {
        self.client
            .get(self.url(path))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    async fn get_items(&self, path: &str) -> Result<Vec<DrillItem>, FetchError> {
        let records: Vec<VocabularyRecord> = self.get_json(path).await?;
        Ok(records
            .into_iter()
            .map(|record| record.into_item(&self.base_url))
            .collect())
    }

    /// Phase gaps configured on the service.
    pub async fn fetch_playback_rhythm(&self) -> Result<PlaybackRhythm, FetchError> {
        Ok(self.get_json("/settings/playback-rhythm").await?)
    }
}

#[async_trait]
impl DrillSource for ApiClient {
    async fn fetch_candidates(&self, mode: DrillMode) -> Result<Vec<DrillItem>, FetchError> {
        match mode {
            DrillMode::Bounded => self.get_items("/listening/v2/grind-queue").await,
            DrillMode::Looping => self.fetch_all_vocabulary().await,
        }
    }

    async fn fetch_all_vocabulary(&self) -> Result<Vec<DrillItem>, FetchError> {
        self.get_items("/listening/v2/all-vocabulary").await
    }
}

#[async_trait]
impl SpeechRenderer for ApiClient {
    async fn render(&self, text: &str) -> Result<String, SynthesisError> {
        let response: SpeechResponse = self
            .client
            .get(self.url("/tts/chinese"))
            .query(&[("text", text)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.audio_url.trim().is_empty() {
            return Err(SynthesisError::EmptyResponse);
        }
        Ok(self.resolve(&response.audio_url))
    }
}

#[async_trait]
impl ProgressCommitter for ApiClient {
    async fn commit(&self, item_id: &str, increment: u32) -> Result<CommitOutcome, CommitError> {
        let body = ProgressRequest {
            vocabulary_id: item_id,
            increment,
        };
        let response: ProgressResponse = self
            .client
            .post(self.url("/listening/v2/grind-progress"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(CommitOutcome {
            count: response.grind_count,
            target: response.grind_target,
            completed: response.completed,
        })
    }
}

#[async_trait]
impl ReviewService for ApiClient {
    async fn fetch_due_reviews(&self, kind: ExamKind) -> Result<Vec<DrillItem>, FetchError> {
        let due: DueReviews = self.get_json("/listening/v2/due-reviews").await?;
        let records = match kind {
            ExamKind::Listening => due.listening,
            ExamKind::Spelling => due.spelling,
        };
        Ok(records
            .into_iter()
            .map(|record| record.into_item(&self.base_url))
            .collect())
    }

    async fn submit_review(
        &self,
        item_id: &str,
        kind: ExamKind,
        rating: Rating,
        user_input: Option<&str>,
    ) -> Result<ReviewReceipt, ReviewError> {
        let body = ReviewRequest {
            vocabulary_id: item_id,
            exam_type: kind,
            rating,
            user_input,
        };
        let response: ReviewResponse = self
            .client
            .post(self.url("/listening/v2/review"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(ReviewReceipt {
            learning_status: response.learning_status,
            next_review_display: response.next_review_display,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::from_config(&ServerConfig {
            base_url: base_url.into(),
        })
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(client("http://localhost:8000/").base_url(), "http://localhost:8000");
    }

    #[test]
    fn relative_locators_resolve_against_base() {
        let api = client("http://localhost:8000");
        assert_eq!(
            api.resolve("/static/tts/abc.mp3"),
            "http://localhost:8000/static/tts/abc.mp3"
        );
        assert_eq!(api.resolve("https://cdn/x.mp3"), "https://cdn/x.mp3");
    }

    #[test]
    fn client_is_object_safe_for_every_boundary() {
        let api = client("http://localhost:8000");
        let _: Box<dyn DrillSource> = Box::new(api.clone());
        let _: Box<dyn SpeechRenderer> = Box::new(api.clone());
        let _: Box<dyn ProgressCommitter> = Box::new(api.clone());
        let _: Box<dyn ReviewService> = Box::new(api);
    }

    /// Nothing listens on port 9; the call must surface as a request error
    /// rather than a panic.
    #[tokio::test]
    async fn unreachable_service_is_a_fetch_error() {
        let api = client("http://127.0.0.1:9");
        let result = api.fetch_all_vocabulary().await;
        assert!(matches!(result, Err(FetchError::Request(_))));
    }
}
