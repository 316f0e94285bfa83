//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::drill::{DrillFilter, DrillMode};
use crate::remote::{ExamKind, PlaybackRhythm};

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Connection settings for the vocabulary service.
///
/// No request timeout is applied. Cancellation never waits on a pending
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the service, without a trailing slash.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// DrillConfig
// ---------------------------------------------------------------------------

/// Session settings for the drill player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillConfig {
    /// Queue policy the session starts in.
    pub mode: DrillMode,
    /// Filter applied to the queue on startup.
    pub filter: DrillFilter,
    /// Repetitions reported to the service per completed bounded run.
    pub progress_increment: u32,
    /// Start playing as soon as the queue is loaded.
    pub autoplay: bool,
    /// Run an assessment of this kind instead of the drill player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam: Option<ExamKind>,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            mode: DrillMode::Bounded,
            filter: DrillFilter::Pending,
            progress_increment: 1,
            autoplay: false,
            exam: None,
        }
    }
}

// ---------------------------------------------------------------------------
// RhythmConfig
// ---------------------------------------------------------------------------

/// Fixed pauses between the phases of a run, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RhythmConfig {
    /// Pause after each primary-language playback.
    pub primary_gap_ms: u64,
    /// Pause after the translation is revealed, before it is spoken.
    pub reveal_gap_ms: u64,
    /// Pause after the translation audio, before the run completes.
    pub trailing_gap_ms: u64,
    /// Extra pause between two consecutive runs.
    pub word_switch_gap_ms: u64,
    /// Replace the gaps above with the service's playback rhythm on startup.
    pub sync_from_server: bool,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            primary_gap_ms: 500,
            reveal_gap_ms: 700,
            trailing_gap_ms: 600,
            word_switch_gap_ms: 0,
            sync_from_server: false,
        }
    }
}

impl RhythmConfig {
    pub fn primary_gap(&self) -> Duration {
        Duration::from_millis(self.primary_gap_ms)
    }

    pub fn reveal_gap(&self) -> Duration {
        Duration::from_millis(self.reveal_gap_ms)
    }

    pub fn trailing_gap(&self) -> Duration {
        Duration::from_millis(self.trailing_gap_ms)
    }

    pub fn word_switch_gap(&self) -> Duration {
        Duration::from_millis(self.word_switch_gap_ms)
    }

    /// Upper bound on the time one run spends waiting, excluding playback
    /// and network latency.
    pub fn run_wait_total(&self, primary_repeats: u8) -> Duration {
        self.primary_gap() * u32::from(primary_repeats) + self.reveal_gap() + self.trailing_gap()
    }

    /// Overwrite the gaps with the rhythm stored on the service.
    ///
    /// `pos_meaning_gap` is applied inside speech rendering and has no local
    /// counterpart.
    pub fn apply_remote(&mut self, rhythm: &PlaybackRhythm) {
        self.primary_gap_ms = rhythm.english_gap;
        self.reveal_gap_ms = rhythm.english_chinese_gap;
        self.word_switch_gap_ms = rhythm.word_switch_gap;
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Playback device settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Output device name as reported by the audio host. `None` means the
    /// system default.
    pub output_device: Option<String>,
    /// Playback volume (1.0 = unchanged).
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            output_device: None,
            volume: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

/// Global hotkey bindings for the navigation controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Toggles play intent.
    pub play_pause: String,
    /// Moves to the previous item.
    pub previous: String,
    /// Moves to the next item.
    pub next: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            play_pause: "F8".into(),
            previous: "F7".into(),
            next: "F9".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use ear_drill::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// println!("drilling in {:?} mode", config.drill.mode);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Vocabulary service connection.
    pub server: ServerConfig,
    /// Session defaults.
    pub drill: DrillConfig,
    /// Phase gaps.
    pub rhythm: RhythmConfig,
    /// Playback device.
    pub audio: AudioConfig,
    /// Global hotkey bindings.
    pub hotkey: HotkeyConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Write the configuration to `path`, creating parent directories as
    /// needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
