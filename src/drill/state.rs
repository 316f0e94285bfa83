//! Run phases and the observable drill state.
//!
//! [`Phase`] is the per-run state machine.  [`DrillState`] is the single
//! source of truth for the presentation layer: current phase, repeat index,
//! translation visibility, current item and queue position.  It is shared as
//! [`SharedState`] (`Arc<Mutex<DrillState>>`); do not hold the lock across
//! `.await` points.
//!
//! Discrete happenings that the presentation layer may want to react to
//! (session completion, skipped cues, failed commits) are sent separately as
//! [`DrillEvent`]s.

use std::sync::{Arc, Mutex};

use super::item::DrillItem;

/// Primary-language plays per run.
pub const PRIMARY_REPEATS: u8 = 3;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Stage of a sequence run.
///
/// ```text
/// Idle ──start──▶ PlayingPrimary{1} ─▶ PlayingPrimary{2} ─▶ PlayingPrimary{3}
///                                                              │
///        PlayingTranslationAudio ◀── RevealingTranslation ◀────┘
///                 │
///                 └──▶ run complete (back to Idle)
/// any phase ──cancel──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Playing the recorded primary-language audio; `repeat` runs 1..=3.
    PlayingPrimary { repeat: u8 },
    RevealingTranslation,
    PlayingTranslationAudio,
}

impl Phase {
    /// First phase of every run.
    pub const START: Phase = Phase::PlayingPrimary { repeat: 1 };

    /// The phase that follows `self` within one run, or `None` after the
    /// last one.  Phases never repeat once left.
    ///
    /// ```
    /// use ear_drill::drill::Phase;
    ///
    /// assert_eq!(Phase::START.next(), Some(Phase::PlayingPrimary { repeat: 2 }));
    /// assert_eq!(
    ///     Phase::PlayingPrimary { repeat: 3 }.next(),
    ///     Some(Phase::RevealingTranslation)
    /// );
    /// assert_eq!(Phase::PlayingTranslationAudio.next(), None);
    /// ```
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Idle => Some(Phase::START),
            Phase::PlayingPrimary { repeat } if repeat < PRIMARY_REPEATS => {
                Some(Phase::PlayingPrimary { repeat: repeat + 1 })
            }
            Phase::PlayingPrimary { .. } => Some(Phase::RevealingTranslation),
            Phase::RevealingTranslation => Some(Phase::PlayingTranslationAudio),
            Phase::PlayingTranslationAudio => None,
        }
    }

    /// Current primary repeat index, `0` outside the primary phase.
    pub fn repeat(self) -> u8 {
        match self {
            Phase::PlayingPrimary { repeat } => repeat,
            _ => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// DrillEvent
// ---------------------------------------------------------------------------

/// Notifications emitted by the sequencer.
///
/// Sent with `try_send`: a slow or absent listener never holds up a run.
#[derive(Debug, Clone, PartialEq)]
pub enum DrillEvent {
    /// A run started on `item_id`.
    RunStarted { item_id: String },
    PhaseChanged { phase: Phase },
    /// An audio cue was skipped because rendering or playback failed.
    CueSkipped { item_id: String, reason: String },
    /// The service stored a repetition.
    ProgressCommitted {
        item_id: String,
        count: u32,
        target: u32,
    },
    /// The item reached its target and left the bounded queue.
    ItemRetired { item_id: String },
    /// The progress commit failed; local state kept its old count.
    CommitFailed { item_id: String, reason: String },
    /// A bounded pass ended with items still queued; position rewound.
    PassFinished { remaining: usize },
    /// Nothing left to drill; the caller should return to the overview.
    SessionComplete,
}

// ---------------------------------------------------------------------------
// DrillState
// ---------------------------------------------------------------------------

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default)]
pub struct DrillState {
    pub phase: Phase,
    pub translation_visible: bool,
    pub current: Option<DrillItem>,
    /// Index of `current` within the filtered view.
    pub position: usize,
    /// Length of the filtered view.
    pub length: usize,
    /// Play intent: runs continue from item to item while set.
    pub playing: bool,
    pub session_complete: bool,
    /// Set when the candidate load failed; no run starts.
    pub load_error: Option<String>,
}

impl DrillState {
    /// Repeat index shown next to the primary text (`0` when not playing it).
    pub fn repeat(&self) -> u8 {
        self.phase.repeat()
    }
}

/// Thread-safe handle to [`DrillState`].
pub type SharedState = Arc<Mutex<DrillState>>;

pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(DrillState::default()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_run_in_strict_order() {
        let mut seen = vec![Phase::START];
        while let Some(next) = seen.last().and_then(|p| p.next()) {
            seen.push(next);
        }
        assert_eq!(
            seen,
            vec![
                Phase::PlayingPrimary { repeat: 1 },
                Phase::PlayingPrimary { repeat: 2 },
                Phase::PlayingPrimary { repeat: 3 },
                Phase::RevealingTranslation,
                Phase::PlayingTranslationAudio,
            ]
        );
    }

    #[test]
    fn idle_leads_to_start() {
        assert_eq!(Phase::Idle.next(), Some(Phase::START));
    }

    #[test]
    fn repeat_is_zero_outside_primary() {
        assert_eq!(Phase::PlayingPrimary { repeat: 2 }.repeat(), 2);
        assert_eq!(Phase::RevealingTranslation.repeat(), 0);
        assert_eq!(Phase::Idle.repeat(), 0);
    }

    #[test]
    fn default_state_is_idle() {
        let state = DrillState::default();
        assert_eq!(state.phase, Phase::Idle);
        assert!(!state.translation_visible);
        assert!(!state.playing);
        assert_eq!(state.repeat(), 0);
    }

    #[test]
    fn shared_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedState>();
    }
}
