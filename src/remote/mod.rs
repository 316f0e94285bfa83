//! Remote boundaries of the drill player.
//!
//! This module provides:
//! * [`DrillSource`]: loads drill candidates ([`FetchError`]).
//! * [`SpeechRenderer`]: text → playable locator ([`SynthesisError`]).
//! * [`ProgressCommitter`]: reports repetitions ([`CommitError`]).
//! * [`ReviewService`]: due reviews and ratings for assessments.
//! * [`ApiClient`]: the HTTP implementation of all four.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use ear_drill::config::AppConfig;
//! use ear_drill::drill::DrillMode;
//! use ear_drill::remote::{ApiClient, DrillSource};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let api = ApiClient::from_config(&config.server);
//!     let items = api.fetch_candidates(DrillMode::Bounded).await.unwrap();
//!     println!("{} items due", items.len());
//! }
//! ```

pub mod client;
pub mod progress;
pub mod review;
pub mod source;
pub mod speech;
pub mod types;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::ApiClient;
pub use progress::{CommitError, CommitOutcome, ProgressCommitter};
pub use review::{ExamKind, Rating, ReviewError, ReviewReceipt, ReviewService};
pub use source::{DrillSource, FetchError};
pub use speech::{SpeechRenderer, SynthesisError};
pub use types::PlaybackRhythm;

// test-only re-exports so sibling test modules can build sessions without a
// running service.
#[cfg(test)]
pub use progress::MemoryCommitter;
#[cfg(test)]
pub use review::{MemoryReviews, SubmittedReview};
#[cfg(test)]
pub use source::MemorySource;
#[cfg(test)]
pub use speech::ScriptedSpeech;
