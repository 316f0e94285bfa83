//! Playback Sequencer: drives items through the phase state machine.
//!
//! # Run flow
//!
//! ```text
//! run(token)
//!   loop while play intent is set:
//!     current item ── none ──▶ SessionComplete
//!       PlayingPrimary{1..=3}   play recorded audio (if any), primary gap
//!       RevealingTranslation    show translation, reveal gap
//!       PlayingTranslationAudio render "{tag}, {translation}", play, trailing gap
//!       [bounded] commit progress ─▶ update count / retire item
//!       queue.advance()
//!         Moved / Reshuffled ─▶ next item
//!         Exhausted          ─▶ halt (SessionComplete or PassFinished)
//! ```
//!
//! Every wait, playback and network call goes through
//! [`guard`](super::timing::guard), so a cancelled token unwinds the run at
//! its current suspension point.  Rendering, playback and commit failures are
//! logged and reported as [`DrillEvent`]s; they never stop a run.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::audio::{AudioPlayer, PlaybackOutcome};
use crate::config::RhythmConfig;
use crate::remote::{ProgressCommitter, SpeechRenderer};

use super::item::DrillItem;
use super::queue::{Advance, DrillQueue};
use super::state::{DrillEvent, Phase, SharedState};
use super::timing::{check, guard, wait, Cancelled};

/// Queue handle shared by the sequencer and the navigation controller.
///
/// Lock for short critical sections only; never across `.await`.
pub type SharedQueue = Arc<Mutex<DrillQueue>>;

pub fn new_shared_queue(queue: DrillQueue) -> SharedQueue {
    Arc::new(Mutex::new(queue))
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

pub struct Sequencer {
    player: Arc<AudioPlayer>,
    speech: Arc<dyn SpeechRenderer>,
    progress: Arc<dyn ProgressCommitter>,
    queue: SharedQueue,
    state: SharedState,
    events: mpsc::Sender<DrillEvent>,
    rhythm: RhythmConfig,
    increment: u32,
}

impl Sequencer {
    /// Create a sequencer with the default rhythm and an increment of one
    /// repetition per run.
    pub fn new(
        player: Arc<AudioPlayer>,
        speech: Arc<dyn SpeechRenderer>,
        progress: Arc<dyn ProgressCommitter>,
        queue: SharedQueue,
        state: SharedState,
        events: mpsc::Sender<DrillEvent>,
    ) -> Self {
        Self {
            player,
            speech,
            progress,
            queue,
            state,
            events,
            rhythm: RhythmConfig::default(),
            increment: 1,
        }
    }

    pub fn with_rhythm(mut self, rhythm: RhythmConfig) -> Self {
        self.rhythm = rhythm;
        self
    }

    pub fn with_increment(mut self, increment: u32) -> Self {
        self.increment = increment;
        self
    }

    pub fn player(&self) -> &Arc<AudioPlayer> {
        &self.player
    }

    pub fn queue(&self) -> &SharedQueue {
        &self.queue
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    // -----------------------------------------------------------------------
    // Run loop
    // -----------------------------------------------------------------------

    /// Drill from the current position until play intent is cleared, the
    /// queue is exhausted, or `token` is cancelled.
    ///
    /// Only the navigation controller should call this, one run at a time.
    pub async fn run(self: Arc<Self>, token: CancellationToken) {
        if let Err(Cancelled) = self.drive(&token).await {
            self.player.stop();
            log::debug!("sequencer: run cancelled");
        }
        self.enter(Phase::Idle);
    }

    async fn drive(&self, token: &CancellationToken) -> Result<(), Cancelled> {
        loop {
            check(token)?;

            let (item, mode) = {
                let queue = self.queue.lock().unwrap();
                (queue.current().cloned(), queue.mode())
            };
            let Some(item) = item else {
                self.finish_session();
                return Ok(());
            };
            self.publish_position();

            self.run_item(&item, token).await?;

            if mode.commits_progress() {
                self.commit(&item, token).await?;
            }

            let (step, remaining) = {
                let mut queue = self.queue.lock().unwrap();
                let step = queue.advance();
                (step, queue.len())
            };

            match step {
                Advance::Moved(_) | Advance::Reshuffled => {
                    self.set_translation_visible(false);
                    self.publish_position();
                    if !self.is_playing() {
                        return Ok(());
                    }
                    if !self.rhythm.word_switch_gap().is_zero() {
                        wait(self.rhythm.word_switch_gap(), token).await?;
                    }
                }
                Advance::Exhausted => {
                    self.set_playing(false);
                    if remaining <= 1 {
                        self.finish_session();
                    } else {
                        self.queue.lock().unwrap().rewind();
                        self.set_translation_visible(false);
                        self.publish_position();
                        log::info!("sequencer: pass finished, {remaining} items left");
                        self.emit(DrillEvent::PassFinished { remaining });
                    }
                    return Ok(());
                }
            }
        }
    }

    /// One pass of `item` through every phase.
    async fn run_item(&self, item: &DrillItem, token: &CancellationToken) -> Result<(), Cancelled> {
        log::debug!("sequencer: run started for {} ({})", item.id, item.primary_text);
        self.emit(DrillEvent::RunStarted {
            item_id: item.id.clone(),
        });
        self.set_translation_visible(false);

        let mut phase = Phase::START;
        loop {
            self.enter(phase);
            self.execute(phase, item, token).await?;
            match phase.next() {
                Some(next) => phase = next,
                None => return Ok(()),
            }
        }
    }

    async fn execute(
        &self,
        phase: Phase,
        item: &DrillItem,
        token: &CancellationToken,
    ) -> Result<(), Cancelled> {
        match phase {
            Phase::Idle => Ok(()),

            // A missing recording still observes the gap so pacing stays
            // uniform across items.
            Phase::PlayingPrimary { .. } => {
                if let Some(url) = &item.audio_url {
                    self.play_cue(item, url, token).await?;
                }
                wait(self.rhythm.primary_gap(), token).await
            }

            Phase::RevealingTranslation => {
                self.set_translation_visible(true);
                wait(self.rhythm.reveal_gap(), token).await
            }

            Phase::PlayingTranslationAudio => {
                if let Some(text) = item.spoken_translation() {
                    match guard(token, self.speech.render(&text)).await? {
                        Ok(locator) => self.play_cue(item, &locator, token).await?,
                        Err(e) => {
                            log::warn!("sequencer: speech for {} unavailable: {e}", item.id);
                            self.emit(DrillEvent::CueSkipped {
                                item_id: item.id.clone(),
                                reason: e.to_string(),
                            });
                        }
                    }
                }
                wait(self.rhythm.trailing_gap(), token).await
            }
        }
    }

    async fn play_cue(
        &self,
        item: &DrillItem,
        locator: &str,
        token: &CancellationToken,
    ) -> Result<(), Cancelled> {
        if let PlaybackOutcome::Failed(reason) = guard(token, self.player.play(locator)).await? {
            self.emit(DrillEvent::CueSkipped {
                item_id: item.id.clone(),
                reason,
            });
        }
        Ok(())
    }

    /// Report the repetition and fold the service's answer into the queue.
    async fn commit(&self, item: &DrillItem, token: &CancellationToken) -> Result<(), Cancelled> {
        match guard(token, self.progress.commit(&item.id, self.increment)).await? {
            Ok(outcome) => {
                log::debug!(
                    "sequencer: {} at {}/{}",
                    item.id,
                    outcome.count,
                    outcome.target
                );
                {
                    let mut queue = self.queue.lock().unwrap();
                    if outcome.completed {
                        queue.remove(&item.id);
                    } else {
                        queue.update_progress(&item.id, outcome.count, outcome.target);
                    }
                }
                self.emit(DrillEvent::ProgressCommitted {
                    item_id: item.id.clone(),
                    count: outcome.count,
                    target: outcome.target,
                });
                if outcome.completed {
                    log::info!("sequencer: {} reached its target", item.id);
                    self.emit(DrillEvent::ItemRetired {
                        item_id: item.id.clone(),
                    });
                }
            }
            Err(e) => {
                log::warn!("sequencer: progress for {} not saved: {e}", item.id);
                self.emit(DrillEvent::CommitFailed {
                    item_id: item.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Observable state
    // -----------------------------------------------------------------------

    pub fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    pub fn set_playing(&self, playing: bool) {
        self.state.lock().unwrap().playing = playing;
    }

    /// Copy the queue's current item, position and length into the state.
    pub fn publish_position(&self) {
        let (current, position, length) = {
            let queue = self.queue.lock().unwrap();
            (queue.current().cloned(), queue.position(), queue.len())
        };
        let mut st = self.state.lock().unwrap();
        st.current = current;
        st.position = position;
        st.length = length;
    }

    /// Back to a neutral card: idle phase, translation hidden.
    pub fn reset_presentation(&self) {
        self.enter(Phase::Idle);
        self.set_translation_visible(false);
        self.publish_position();
    }

    fn enter(&self, phase: Phase) {
        let changed = {
            let mut st = self.state.lock().unwrap();
            std::mem::replace(&mut st.phase, phase) != phase
        };
        if changed {
            self.emit(DrillEvent::PhaseChanged { phase });
        }
    }

    fn set_translation_visible(&self, visible: bool) {
        self.state.lock().unwrap().translation_visible = visible;
    }

    fn finish_session(&self) {
        self.set_playing(false);
        self.publish_position();
        self.state.lock().unwrap().session_complete = true;
        log::info!("sequencer: session complete");
        self.emit(DrillEvent::SessionComplete);
    }

    fn emit(&self, event: DrillEvent) {
        if let Err(e) = self.events.try_send(event) {
            log::debug!("sequencer: event dropped ({e})");
        }
    }
}

// ---------------------------------------------------------------------------
// Test rig  (test-only)
// ---------------------------------------------------------------------------

/// Builds a sequencer over mock collaborators with an unshuffled queue.
#[cfg(test)]
pub(crate) struct Rig {
    pub items: Vec<DrillItem>,
    pub mode: super::item::DrillMode,
    pub filter: super::item::DrillFilter,
    pub device: Arc<crate::audio::MockDevice>,
    pub speech: Arc<crate::remote::ScriptedSpeech>,
    pub committer: Arc<crate::remote::MemoryCommitter>,
}

#[cfg(test)]
impl Rig {
    pub fn new(items: Vec<DrillItem>, mode: super::item::DrillMode) -> Self {
        let committer = Arc::new(crate::remote::MemoryCommitter::new(&items));
        Self {
            items,
            mode,
            filter: super::item::DrillFilter::All,
            device: Arc::new(crate::audio::MockDevice::instant()),
            speech: Arc::new(crate::remote::ScriptedSpeech::ok("tts://speech.mp3")),
            committer,
        }
    }

    pub fn device(mut self, device: crate::audio::MockDevice) -> Self {
        self.device = Arc::new(device);
        self
    }

    pub fn speech(mut self, speech: crate::remote::ScriptedSpeech) -> Self {
        self.speech = Arc::new(speech);
        self
    }

    pub fn committer(mut self, committer: crate::remote::MemoryCommitter) -> Self {
        self.committer = Arc::new(committer);
        self
    }

    pub fn filter(mut self, filter: super::item::DrillFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn build(&self) -> (Arc<Sequencer>, mpsc::Receiver<DrillEvent>) {
        let (tx, rx) = mpsc::channel(1024);
        let queue = new_shared_queue(DrillQueue::new(self.items.clone(), self.mode, self.filter));
        let sequencer = Sequencer::new(
            Arc::new(AudioPlayer::new(self.device.clone())),
            self.speech.clone(),
            self.committer.clone(),
            queue,
            super::state::new_shared_state(),
            tx,
        );
        let sequencer = Arc::new(sequencer);
        sequencer.publish_position();
        (sequencer, rx)
    }
}

/// Everything currently buffered on `rx`.
#[cfg(test)]
pub(crate) fn drain(rx: &mut mpsc::Receiver<DrillEvent>) -> Vec<DrillEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{DeviceCall, MockDevice};
    use crate::drill::item::{DrillFilter, DrillMode};
    use crate::remote::{MemoryCommitter, ScriptedSpeech};
    use std::time::Duration;
    use tokio::time::Instant;

    fn item(id: &str, count: u32, target: u32) -> DrillItem {
        DrillItem {
            repeat_count: count,
            repeat_target: target,
            audio_url: Some(format!("audio://{id}")),
            tag: Some("n.".into()),
            ..DrillItem::new(id, format!("word-{id}"), format!("词-{id}"))
        }
    }

    fn primary_repeats(events: &[DrillEvent]) -> Vec<u8> {
        events
            .iter()
            .filter_map(|e| match e {
                DrillEvent::PhaseChanged {
                    phase: Phase::PlayingPrimary { repeat },
                } => Some(*repeat),
                _ => None,
            })
            .collect()
    }

    async fn run_to_end(sequencer: &Arc<Sequencer>) {
        sequencer.set_playing(true);
        Arc::clone(sequencer).run(CancellationToken::new()).await;
    }

    // ---- phase order ---

    #[tokio::test(start_paused = true)]
    async fn primary_repeats_one_two_three_then_translation() {
        let rig = Rig::new(vec![item("a", 0, 3)], DrillMode::Bounded);
        let (seq, mut rx) = rig.build();

        run_to_end(&seq).await;
        let events = drain(&mut rx);

        assert_eq!(primary_repeats(&events), vec![1, 2, 3]);
        let phases: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                DrillEvent::PhaseChanged { phase } => Some(*phase),
                _ => None,
            })
            .collect();
        assert_eq!(
            &phases[3..],
            &[
                Phase::RevealingTranslation,
                Phase::PlayingTranslationAudio,
                Phase::Idle
            ]
        );
        assert_eq!(
            rig.device.plays(),
            vec!["audio://a", "audio://a", "audio://a", "tts://speech.mp3"]
        );
        assert_eq!(rig.speech.requests(), vec!["n., 词-a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn item_without_audio_keeps_repeat_pacing() {
        let mut silent = item("a", 0, 3);
        silent.audio_url = None;
        let rig = Rig::new(vec![silent], DrillMode::Bounded);
        let (seq, mut rx) = rig.build();

        let start = Instant::now();
        run_to_end(&seq).await;

        assert_eq!(primary_repeats(&drain(&mut rx)), vec![1, 2, 3]);
        assert_eq!(rig.device.plays(), vec!["tts://speech.mp3"]);
        assert_eq!(start.elapsed(), RhythmConfig::default().run_wait_total(3));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_translation_skips_speech() {
        let mut bare = item("a", 0, 3);
        bare.translation.clear();
        let rig = Rig::new(vec![bare], DrillMode::Bounded);
        let (seq, _rx) = rig.build();

        run_to_end(&seq).await;

        assert!(rig.speech.requests().is_empty());
        assert_eq!(rig.device.plays().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn translation_revealed_during_run() {
        let rig = Rig::new(vec![item("a", 0, 3)], DrillMode::Bounded)
            .device(MockDevice::new(Duration::from_secs(1)));
        let (seq, _rx) = rig.build();
        seq.set_playing(true);

        let task = tokio::spawn(Arc::clone(&seq).run(CancellationToken::new()));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!seq.state().lock().unwrap().translation_visible);
        assert_eq!(seq.state().lock().unwrap().repeat(), 1);

        // 3 × (1 s playback + 0.5 s gap) puts the run in the reveal gap.
        tokio::time::sleep(Duration::from_millis(4_600)).await;
        {
            let st = seq.state().lock().unwrap();
            assert_eq!(st.phase, Phase::RevealingTranslation);
            assert!(st.translation_visible);
        }

        task.await.unwrap();
    }

    // ---- failure handling ---

    #[tokio::test(start_paused = true)]
    async fn synthesis_failure_does_not_stall() {
        let rig = Rig::new(vec![item("a", 0, 3)], DrillMode::Bounded)
            .speech(ScriptedSpeech::failing());
        let (seq, mut rx) = rig.build();

        let start = Instant::now();
        run_to_end(&seq).await;

        assert!(start.elapsed() <= RhythmConfig::default().run_wait_total(3));
        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, DrillEvent::CueSkipped { item_id, .. } if item_id == "a")));
        assert_eq!(rig.committer.calls(), vec!["a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn playback_failure_is_swallowed() {
        let rig = Rig::new(vec![item("a", 0, 3)], DrillMode::Bounded)
            .device(MockDevice::instant().failing_on("audio://a"));
        let (seq, mut rx) = rig.build();

        run_to_end(&seq).await;

        let skipped = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, DrillEvent::CueSkipped { .. }))
            .count();
        assert_eq!(skipped, 3);
        assert_eq!(rig.committer.calls(), vec!["a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn commit_failure_keeps_local_count() {
        let items = vec![item("a", 0, 3)];
        let rig = Rig::new(items.clone(), DrillMode::Bounded)
            .committer(MemoryCommitter::failing(&items));
        let (seq, mut rx) = rig.build();

        run_to_end(&seq).await;

        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, DrillEvent::CommitFailed { .. })));
        assert!(events.contains(&DrillEvent::SessionComplete));
        assert_eq!(seq.queue().lock().unwrap().items()[0].repeat_count, 0);
    }

    // ---- progress and queue policy ---

    #[tokio::test(start_paused = true)]
    async fn bounded_session_retires_completed_items() {
        let rig = Rig::new(vec![item("A", 0, 3), item("B", 2, 3)], DrillMode::Bounded);
        let (seq, mut rx) = rig.build();

        run_to_end(&seq).await;

        assert_eq!(rig.committer.calls(), vec!["A", "B"]);
        {
            let queue = seq.queue().lock().unwrap();
            let left: Vec<_> = queue
                .items()
                .iter()
                .map(|i| (i.id.as_str(), i.repeat_count))
                .collect();
            assert_eq!(left, vec![("A", 1)]);
        }

        let events = drain(&mut rx);
        assert!(events.contains(&DrillEvent::ProgressCommitted {
            item_id: "A".into(),
            count: 1,
            target: 3
        }));
        assert!(events.contains(&DrillEvent::ItemRetired {
            item_id: "B".into()
        }));
        assert_eq!(events.last(), Some(&DrillEvent::PhaseChanged { phase: Phase::Idle }));
        assert!(events.contains(&DrillEvent::SessionComplete));

        let st = seq.state().lock().unwrap();
        assert!(st.session_complete);
        assert!(!st.playing);
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_pass_with_items_left_rewinds() {
        let rig = Rig::new(
            vec![item("a", 0, 3), item("b", 0, 3), item("c", 0, 5)],
            DrillMode::Bounded,
        );
        let (seq, mut rx) = rig.build();

        run_to_end(&seq).await;

        let events = drain(&mut rx);
        assert!(events.contains(&DrillEvent::PassFinished { remaining: 3 }));
        assert!(!events.contains(&DrillEvent::SessionComplete));
        let st = seq.state().lock().unwrap();
        assert_eq!(st.position, 0);
        assert!(!st.playing);
        assert!(!st.translation_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_filter_session_drills_each_item_once() {
        let rig = Rig::new(vec![item("a", 2, 3), item("b", 2, 3)], DrillMode::Bounded)
            .filter(DrillFilter::Pending);
        let (seq, mut rx) = rig.build();

        run_to_end(&seq).await;

        assert_eq!(rig.committer.calls(), vec!["a", "b"]);
        assert!(seq.queue().lock().unwrap().items().is_empty());
        assert!(drain(&mut rx).contains(&DrillEvent::SessionComplete));
    }

    #[tokio::test(start_paused = true)]
    async fn paused_intent_stops_after_current_item() {
        let rig = Rig::new(vec![item("a", 0, 3), item("b", 0, 3)], DrillMode::Bounded);
        let (seq, _rx) = rig.build();

        // Intent never set: the run drills the current item, advances, stops.
        Arc::clone(&seq).run(CancellationToken::new()).await;

        assert_eq!(rig.committer.calls(), vec!["a"]);
        assert_eq!(seq.state().lock().unwrap().position, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn looping_mode_never_commits_and_restarts() {
        let rig = Rig::new(vec![item("a", 0, 3)], DrillMode::Looping);
        let (seq, mut rx) = rig.build();
        seq.set_playing(true);

        let token = CancellationToken::new();
        let task = tokio::spawn(Arc::clone(&seq).run(token.clone()));

        // Two full runs of 2.8 s each.
        tokio::time::sleep(Duration::from_millis(6_000)).await;
        token.cancel();
        task.await.unwrap();

        let runs = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, DrillEvent::RunStarted { .. }))
            .count();
        assert!(runs >= 2, "expected the single item to loop, saw {runs} runs");
        assert!(rig.committer.calls().is_empty());
        assert_eq!(seq.queue().lock().unwrap().position(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn word_switch_gap_separates_runs() {
        let rig = Rig::new(vec![item("a", 0, 3), item("b", 0, 3)], DrillMode::Bounded);
        let (tx, _rx) = mpsc::channel(64);
        let (base, _) = rig.build();
        let rhythm = RhythmConfig {
            word_switch_gap_ms: 1_000,
            ..RhythmConfig::default()
        };
        let seq = Arc::new(
            Sequencer::new(
                Arc::clone(base.player()),
                rig.speech.clone(),
                rig.committer.clone(),
                Arc::clone(base.queue()),
                Arc::clone(base.state()),
                tx,
            )
            .with_rhythm(rhythm.clone()),
        );

        let start = Instant::now();
        run_to_end(&seq).await;

        assert_eq!(
            start.elapsed(),
            rhythm.run_wait_total(3) * 2 + rhythm.word_switch_gap()
        );
    }

    // ---- cancellation ---

    #[tokio::test(start_paused = true)]
    async fn cancelled_mid_run_leaves_no_trace() {
        let rig = Rig::new(vec![item("a", 0, 3)], DrillMode::Bounded)
            .device(MockDevice::new(Duration::from_secs(2)));
        let (seq, _rx) = rig.build();
        seq.set_playing(true);

        let token = CancellationToken::new();
        let task = tokio::spawn(Arc::clone(&seq).run(token.clone()));
        tokio::time::sleep(Duration::from_millis(3_000)).await;
        token.cancel();
        task.await.unwrap();

        assert!(rig.committer.calls().is_empty());
        assert_eq!(rig.committer.stored("a"), Some((0, 3)));
        assert_eq!(seq.state().lock().unwrap().phase, Phase::Idle);
        assert_eq!(rig.device.calls().last(), Some(&DeviceCall::Stop));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_does_not_wait_for_slow_speech() {
        let rig = Rig::new(vec![item("a", 0, 3)], DrillMode::Bounded)
            .speech(ScriptedSpeech::ok("tts://x").with_delay(Duration::from_secs(600)));
        let (seq, _rx) = rig.build();
        seq.set_playing(true);

        let token = CancellationToken::new();
        let task = tokio::spawn(Arc::clone(&seq).run(token.clone()));

        // Past the reveal gap: the render request is pending.
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(rig.speech.requests().len(), 1);

        let start = Instant::now();
        token.cancel();
        task.await.unwrap();

        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(rig.committer.calls().is_empty());
    }
}
