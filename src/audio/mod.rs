//! Audio playback: one shared output device, one sound at a time.
//!
//! # Layers
//!
//! ```text
//! Sequencer / ExamSession
//!        │  play(locator) -> PlaybackOutcome      (never fails)
//!        ▼
//! AudioPlayer ── Arc<dyn PlaybackDevice>
//!        │
//!        ├─ RodioDevice   reqwest / fs → rodio::Decoder → Sink
//!        └─ MockDevice    (tests)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ear_drill::audio::{AudioPlayer, RodioDevice};
//! use ear_drill::config::AudioConfig;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let device =
//!     RodioDevice::open_in_background(&AudioConfig::default(), reqwest::Client::new()).await?;
//! let player = AudioPlayer::new(Arc::new(device));
//! player.play("http://localhost:8000/audio/42").await;
//! # Ok(())
//! # }
//! ```

pub mod output;
pub mod player;

pub use output::{DeviceError, RodioDevice};
pub use player::{AudioPlayer, PlaybackDevice, PlaybackError, PlaybackOutcome};

#[cfg(test)]
pub use player::{DeviceCall, MockDevice};
