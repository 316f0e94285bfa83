//! Navigation Controller: user commands against the running sequencer.
//!
//! The controller owns at most one active run.  Every command that changes
//! what should be playing first cancels that run, stops the device and waits
//! for the run task to unwind, and only then touches the queue.  Two runs
//! therefore never overlap and no stale audio plays after a command.
//!
//! ```text
//! play      set intent ─▶ spawn run (if none active with intent set)
//! pause     clear intent ─▶ halt
//! next/prev halt ─▶ select ─▶ reset card ─▶ spawn run if intent set
//! select    same as next/prev, for any in-range index
//! filter    halt ─▶ re-anchor ─▶ reset card ─▶ spawn run if intent set
//! load      halt ─▶ fetch + shuffle ─▶ reset card
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::remote::{DrillSource, FetchError};

use super::item::{DrillFilter, DrillMode};
use super::queue::DrillQueue;
use super::sequencer::Sequencer;

struct ActiveRun {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct NavigationController {
    sequencer: Arc<Sequencer>,
    source: Arc<dyn DrillSource>,
    active: Option<ActiveRun>,
}

impl NavigationController {
    pub fn new(sequencer: Arc<Sequencer>, source: Arc<dyn DrillSource>) -> Self {
        Self {
            sequencer,
            source,
            active: None,
        }
    }

    pub fn sequencer(&self) -> &Arc<Sequencer> {
        &self.sequencer
    }

    /// `true` while a run task is alive.
    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|run| !run.handle.is_finished())
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Replace the queue with freshly fetched candidates for `mode`, keeping
    /// the active filter.
    ///
    /// On failure the queue is emptied and the error is recorded in the
    /// state's `load_error`; no run is started.
    pub async fn load(&mut self, mode: DrillMode) -> Result<usize, FetchError> {
        self.sequencer.set_playing(false);
        self.halt().await;

        let filter = self.sequencer.queue().lock().unwrap().filter();
        let result = DrillQueue::load(self.source.as_ref(), mode, filter).await;

        let outcome = match result {
            Ok(queue) => {
                let len = queue.len();
                *self.sequencer.queue().lock().unwrap() = queue;
                let mut st = self.sequencer.state().lock().unwrap();
                st.load_error = None;
                st.session_complete = false;
                Ok(len)
            }
            Err(e) => {
                log::error!("controller: failed to load drill items: {e}");
                *self.sequencer.queue().lock().unwrap() = DrillQueue::empty(mode, filter);
                self.sequencer.state().lock().unwrap().load_error = Some(e.to_string());
                Err(e)
            }
        };
        self.sequencer.reset_presentation();
        outcome
    }

    // -----------------------------------------------------------------------
    // Playback intent
    // -----------------------------------------------------------------------

    /// Start drilling from the current position.  No-op while a run is
    /// active with play intent set.
    ///
    /// A run that is still alive after its intent was cleared is about to
    /// exit, so it is halted and replaced rather than re-armed.
    pub async fn play(&mut self) {
        if self.is_running() && self.sequencer.is_playing() {
            return;
        }
        if self.sequencer.queue().lock().unwrap().is_empty() {
            log::info!("controller: nothing to play");
            self.sequencer.set_playing(false);
            return;
        }
        // Reap a run that finished on its own or is winding down.
        self.halt().await;
        self.sequencer.state().lock().unwrap().session_complete = false;
        self.sequencer.set_playing(true);
        self.spawn_run();
    }

    /// Stop at once: cancel the run and halt the device.
    pub async fn pause(&mut self) {
        self.sequencer.set_playing(false);
        self.halt().await;
    }

    pub async fn toggle(&mut self) {
        if self.sequencer.is_playing() {
            self.pause().await;
        } else {
            self.play().await;
        }
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Jump to the next item.  Returns `false` at the end of the view.
    pub async fn next(&mut self) -> bool {
        let position = self.sequencer.queue().lock().unwrap().position();
        self.select(position + 1).await
    }

    /// Jump to the previous item.  Returns `false` at the start of the view.
    pub async fn previous(&mut self) -> bool {
        let position = self.sequencer.queue().lock().unwrap().position();
        match position.checked_sub(1) {
            Some(index) => self.select(index).await,
            None => false,
        }
    }

    /// Jump to `index` of the filtered view.  Out-of-range indices are
    /// rejected without disturbing the active run.
    pub async fn select(&mut self, index: usize) -> bool {
        if index >= self.sequencer.queue().lock().unwrap().len() {
            log::debug!("controller: index {index} out of range");
            return false;
        }

        self.halt().await;
        let moved = self.sequencer.queue().lock().unwrap().select(index);
        self.sequencer.reset_presentation();
        self.resume();
        moved
    }

    /// Switch the drill filter; the current item keeps its place when it is
    /// still visible.
    pub async fn set_filter(&mut self, filter: DrillFilter) {
        self.halt().await;
        self.sequencer.queue().lock().unwrap().set_filter(filter);
        log::info!("controller: filter set to {filter:?}");
        self.sequencer.reset_presentation();
        self.resume();
    }

    /// Halt everything before exit.
    pub async fn shutdown(&mut self) {
        self.pause().await;
        log::info!("controller: shut down");
    }

    // -----------------------------------------------------------------------
    // Run management
    // -----------------------------------------------------------------------

    fn resume(&mut self) {
        if !self.sequencer.is_playing() {
            return;
        }
        if self.sequencer.queue().lock().unwrap().is_empty() {
            self.sequencer.set_playing(false);
            return;
        }
        self.spawn_run();
    }

    fn spawn_run(&mut self) {
        let token = CancellationToken::new();
        let handle = tokio::spawn(Arc::clone(&self.sequencer).run(token.clone()));
        self.active = Some(ActiveRun { token, handle });
    }

    /// Cancel the active run and wait until it has unwound.
    async fn halt(&mut self) {
        let Some(run) = self.active.take() else {
            return;
        };
        run.token.cancel();
        self.sequencer.player().stop();
        if let Err(e) = run.handle.await {
            log::warn!("controller: run task ended abnormally: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
