//! Drill Queue Manager: the shuffled working set, its filter and position.
//!
//! The base sequence is shuffled once per load.  Everything position-related
//! works on the *filtered view* (the base sequence restricted to the active
//! [`DrillFilter`], relative order preserved), so changing the filter never
//! reorders the remaining items.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::remote::{DrillSource, FetchError};

use super::item::{DrillFilter, DrillItem, DrillMode};

// ---------------------------------------------------------------------------
// Advance
// ---------------------------------------------------------------------------

/// Result of [`DrillQueue::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Position now points at the given index of the filtered view.
    Moved(usize),
    /// Looping mode wrapped around: base reshuffled, position reset to 0.
    Reshuffled,
    /// No further item.  Terminal in bounded mode, or the view is empty.
    Exhausted,
}

// ---------------------------------------------------------------------------
// DrillQueue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DrillQueue {
    items: Vec<DrillItem>,
    mode: DrillMode,
    filter: DrillFilter,
    position: usize,
    /// The item at `position` replaced a current item that left the view, so
    /// the next `advance` must not skip it.
    successor_in_place: bool,
}

impl DrillQueue {
    /// Build a queue over `items` in the given order.
    pub fn new(items: Vec<DrillItem>, mode: DrillMode, filter: DrillFilter) -> Self {
        Self {
            items,
            mode,
            filter,
            position: 0,
            successor_in_place: false,
        }
    }

    pub fn empty(mode: DrillMode, filter: DrillFilter) -> Self {
        Self::new(Vec::new(), mode, filter)
    }

    /// Fetch the candidates for `mode`, shuffle them and start at position 0.
    ///
    /// Bounded sessions drill the service's due candidates; looping sessions
    /// cycle through the whole vocabulary.
    pub async fn load(
        source: &dyn DrillSource,
        mode: DrillMode,
        filter: DrillFilter,
    ) -> Result<Self, FetchError> {
        let items = match mode {
            DrillMode::Bounded => source.fetch_candidates(mode).await?,
            DrillMode::Looping => source.fetch_all_vocabulary().await?,
        };
        log::info!("queue: loaded {} candidates for {:?}", items.len(), mode);

        let mut queue = Self::new(items, mode, filter);
        queue.shuffle(&mut rand::thread_rng());
        Ok(queue)
    }

    /// Uniform Fisher–Yates shuffle of the base sequence; resets position.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.items.shuffle(rng);
        self.position = 0;
        self.successor_in_place = false;
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn mode(&self) -> DrillMode {
        self.mode
    }

    pub fn filter(&self) -> DrillFilter {
        self.filter
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The shuffled base sequence.
    pub fn items(&self) -> &[DrillItem] {
        &self.items
    }

    /// Ordered subsequence of the base matching `filter`.
    pub fn view(&self, filter: DrillFilter) -> Vec<&DrillItem> {
        self.items.iter().filter(|item| filter.matches(item)).collect()
    }

    /// The view under the active filter.
    pub fn visible(&self) -> Vec<&DrillItem> {
        self.view(self.filter)
    }

    /// Length of the active view.
    pub fn len(&self) -> usize {
        self.items.iter().filter(|item| self.filter.matches(item)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current(&self) -> Option<&DrillItem> {
        self.items
            .iter()
            .filter(|item| self.filter.matches(item))
            .nth(self.position)
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Move to the next item of the active view.
    ///
    /// At the last element a bounded queue reports [`Advance::Exhausted`]
    /// (position unchanged); a looping queue reshuffles and restarts at 0.
    /// An empty view is always exhausted.
    pub fn advance(&mut self) -> Advance {
        self.advance_with(&mut rand::thread_rng())
    }

    pub fn advance_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Advance {
        let len = self.len();
        if len == 0 {
            self.successor_in_place = false;
            return Advance::Exhausted;
        }

        if std::mem::take(&mut self.successor_in_place) && self.position < len {
            return Advance::Moved(self.position);
        }

        if self.position + 1 < len {
            self.position += 1;
            return Advance::Moved(self.position);
        }

        match self.mode {
            DrillMode::Bounded => Advance::Exhausted,
            DrillMode::Looping => {
                self.shuffle(rng);
                Advance::Reshuffled
            }
        }
    }

    /// Jump to `index` of the active view.  Out-of-range indices are
    /// rejected and leave the queue untouched.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.len() {
            return false;
        }
        self.position = index;
        self.successor_in_place = false;
        true
    }

    /// Reset to the first item of the view.
    pub fn rewind(&mut self) {
        self.position = 0;
        self.successor_in_place = false;
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Remove an item from the base sequence, keeping the displayed item in
    /// place.  Returns the removed item.
    pub fn remove(&mut self, id: &str) -> Option<DrillItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        let anchor = self.anchor();
        let removed = self.items.remove(index);
        self.reanchor(anchor);
        Some(removed)
    }

    /// Store the repeat count reported by the service.
    pub fn update_progress(&mut self, id: &str, count: u32, target: u32) -> bool {
        let anchor = self.anchor();
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        item.repeat_count = count;
        item.repeat_target = target;
        self.reanchor(anchor);
        true
    }

    /// Switch the active filter.  The current item keeps its place when it
    /// is still visible; otherwise the nearest following item takes over.
    pub fn set_filter(&mut self, filter: DrillFilter) {
        let anchor = self.anchor();
        self.filter = filter;
        self.reanchor(anchor);
        self.successor_in_place = false;
    }

    /// Ids of the current item and every item after it in the view.
    fn anchor(&self) -> Vec<String> {
        self.visible()
            .into_iter()
            .skip(self.position)
            .map(|item| item.id.clone())
            .collect()
    }

    fn reanchor(&mut self, anchor: Vec<String>) {
        let view: Vec<String> = self.visible().into_iter().map(|i| i.id.clone()).collect();
        let mut candidates = anchor.iter();

        if let Some(current) = candidates.next() {
            if let Some(index) = view.iter().position(|id| id == current) {
                self.position = index;
                return;
            }
        }

        let successor = candidates.find_map(|id| view.iter().position(|v| v == id));
        match successor {
            Some(index) => {
                self.position = index;
                self.successor_in_place = true;
            }
            None => {
                self.position = view.len().saturating_sub(1);
                self.successor_in_place = false;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
