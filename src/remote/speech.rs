//! Speech rendering for the translation phase.

use async_trait::async_trait;
use thiserror::Error;

/// Speech could not be synthesised.  Callers skip the cue; it is never fatal
/// to a run.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("speech service responded with status {0}")]
    Status(u16),

    #[error("speech service returned no audio locator")]
    EmptyResponse,
}

impl From<reqwest::Error> for SynthesisError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => SynthesisError::Status(status.as_u16()),
            None => SynthesisError::Request(e.to_string()),
        }
    }
}

/// Turns text into a playable resource locator.
#[async_trait]
pub trait SpeechRenderer: Send + Sync {
    async fn render(&self, text: &str) -> Result<String, SynthesisError>;
}

// ---------------------------------------------------------------------------
// ScriptedSpeech  (test-only)
// ---------------------------------------------------------------------------

/// Test double that answers every request the same way and records the text
/// it was asked to render.
#[cfg(test)]
pub struct ScriptedSpeech {
    locator: Option<String>,
    delay: std::time::Duration,
    requests: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl ScriptedSpeech {
    /// Always render to `locator`.
    pub fn ok(locator: impl Into<String>) -> Self {
        Self {
            locator: Some(locator.into()),
            delay: std::time::Duration::ZERO,
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Always fail with a request error.
    pub fn failing() -> Self {
        Self {
            locator: None,
            delay: std::time::Duration::ZERO,
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Answer only after `delay`.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechRenderer for ScriptedSpeech {
    async fn render(&self, text: &str) -> Result<String, SynthesisError> {
        self.requests.lock().unwrap().push(text.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.locator
            .clone()
            .ok_or_else(|| SynthesisError::Request("speech service unreachable".into()))
    }
}
