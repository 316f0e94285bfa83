//! Audio Playback Adapter.
//!
//! [`AudioPlayer`] owns the single shared [`PlaybackDevice`].  `play` always
//! resolves: natural end and device errors both count as "done", so one
//! malformed file can never stall a drill.  `stop` halts the device at once
//! and is safe to call when nothing is playing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

// ---------------------------------------------------------------------------
// PlaybackError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The resource could not be downloaded or read.
    #[error("failed to load audio resource: {0}")]
    Fetch(String),

    #[error("failed to decode audio: {0}")]
    Decode(String),

    /// The output stream rejected the sound.
    #[error("audio output error: {0}")]
    Output(String),
}

// ---------------------------------------------------------------------------
// PlaybackDevice trait
// ---------------------------------------------------------------------------

/// A single playback device.
///
/// `play` assigns the resource, starts it and resolves when it ends
/// naturally, fails, or is halted by `stop`.
#[async_trait]
pub trait PlaybackDevice: Send + Sync {
    async fn play(&self, locator: &str) -> Result<(), PlaybackError>;

    /// Halt playback immediately.  No-op when idle.
    fn stop(&self);
}

// ---------------------------------------------------------------------------
// AudioPlayer
// ---------------------------------------------------------------------------

/// How a `play` call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Finished,
    /// The device reported an error; the cue is treated as done.
    Failed(String),
}

pub struct AudioPlayer {
    device: Arc<dyn PlaybackDevice>,
    playing: AtomicBool,
}

impl AudioPlayer {
    pub fn new(device: Arc<dyn PlaybackDevice>) -> Self {
        Self {
            device,
            playing: AtomicBool::new(false),
        }
    }

    /// Play `locator` to completion.  Never fails; errors are logged and
    /// reported as [`PlaybackOutcome::Failed`].
    pub async fn play(&self, locator: &str) -> PlaybackOutcome {
        let _playing = PlayingFlag::raise(&self.playing);
        match self.device.play(locator).await {
            Ok(()) => PlaybackOutcome::Finished,
            Err(e) => {
                log::warn!("playback of {locator} failed: {e}");
                PlaybackOutcome::Failed(e.to_string())
            }
        }
    }

    pub fn stop(&self) {
        self.device.stop();
        self.playing.store(false, Ordering::SeqCst);
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

/// Lowers the playing flag when a `play` call ends or is dropped mid-way.
struct PlayingFlag<'a>(&'a AtomicBool);

impl<'a> PlayingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for PlayingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// MockDevice  (test-only)
// ---------------------------------------------------------------------------

/// One call observed by [`MockDevice`].
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    Play(String),
    Stop,
}

/// Test double that "plays" each resource for a fixed duration, returns
/// early on `stop`, and records the peak number of overlapping plays.
#[cfg(test)]
pub struct MockDevice {
    duration: std::time::Duration,
    failing: Vec<String>,
    calls: std::sync::Mutex<Vec<DeviceCall>>,
    active: std::sync::atomic::AtomicUsize,
    peak: std::sync::atomic::AtomicUsize,
    stopped: tokio::sync::Notify,
}

#[cfg(test)]
impl MockDevice {
    /// Every resource plays for `duration`.
    pub fn new(duration: std::time::Duration) -> Self {
        Self {
            duration,
            failing: Vec::new(),
            calls: std::sync::Mutex::new(Vec::new()),
            active: std::sync::atomic::AtomicUsize::new(0),
            peak: std::sync::atomic::AtomicUsize::new(0),
            stopped: tokio::sync::Notify::new(),
        }
    }

    /// Resources that finish instantly.
    pub fn instant() -> Self {
        Self::new(std::time::Duration::ZERO)
    }

    /// Make `locator` fail with a decode error.
    pub fn failing_on(mut self, locator: impl Into<String>) -> Self {
        self.failing.push(locator.into());
        self
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn plays(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DeviceCall::Play(locator) => Some(locator),
                DeviceCall::Stop => None,
            })
            .collect()
    }

    /// Largest number of `play` calls that were in flight at once.
    pub fn peak_overlap(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
struct ActivePlay<'a>(&'a std::sync::atomic::AtomicUsize);

#[cfg(test)]
impl Drop for ActivePlay<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[async_trait]
impl PlaybackDevice for MockDevice {
    async fn play(&self, locator: &str) -> Result<(), PlaybackError> {
        self.calls
            .lock()
            .unwrap()
            .push(DeviceCall::Play(locator.to_string()));

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _active = ActivePlay(&self.active);

        if self.failing.iter().any(|f| f == locator) {
            return Err(PlaybackError::Decode(format!("{locator}: unsupported format")));
        }

        if !self.duration.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(self.duration) => {}
                _ = self.stopped.notified() => {}
            }
        }
        Ok(())
    }

    fn stop(&self) {
        self.calls.lock().unwrap().push(DeviceCall::Stop);
        self.stopped.notify_waiters();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn finished_playback() {
        let device = Arc::new(MockDevice::instant());
        let player = AudioPlayer::new(device.clone());

        assert_eq!(player.play("a.mp3").await, PlaybackOutcome::Finished);
        assert_eq!(device.plays(), vec!["a.mp3"]);
        assert!(!player.is_playing());
    }

    #[tokio::test]
    async fn device_error_is_swallowed() {
        let device = Arc::new(MockDevice::instant().failing_on("broken.mp3"));
        let player = AudioPlayer::new(device);

        let outcome = player.play("broken.mp3").await;
        assert!(matches!(outcome, PlaybackOutcome::Failed(msg) if msg.contains("decode")));
        assert!(!player.is_playing());
    }

    #[tokio::test]
    async fn stop_when_idle_is_safe() {
        let device = Arc::new(MockDevice::instant());
        let player = AudioPlayer::new(device.clone());

        player.stop();
        player.stop();
        assert_eq!(device.calls(), vec![DeviceCall::Stop, DeviceCall::Stop]);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_playback_early() {
        let device = Arc::new(MockDevice::new(Duration::from_secs(30)));
        let player = Arc::new(AudioPlayer::new(device.clone()));

        let task = {
            let player = Arc::clone(&player);
            tokio::spawn(async move { player.play("long.mp3").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(player.is_playing());

        let start = tokio::time::Instant::now();
        player.stop();
        assert_eq!(task.await.unwrap(), PlaybackOutcome::Finished);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn player_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AudioPlayer>();
    }
}
