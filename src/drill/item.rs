//! Drill items and the queue policies that select them.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DrillItem
// ---------------------------------------------------------------------------

/// One vocabulary entry cycled through the sequencer.
///
/// Owned by [`DrillQueue`](super::DrillQueue).  Only progress commits and
/// explicit removal change it; the sequencer works on clones.
#[derive(Debug, Clone, PartialEq)]
pub struct DrillItem {
    pub id: String,
    /// Word or phrase in the language being drilled.
    pub primary_text: String,
    /// Meaning in the learner's language.  May be empty.
    pub translation: String,
    pub phonetic: Option<String>,
    /// Part-of-speech tag, spoken before the translation.
    pub tag: Option<String>,
    /// Locator of the recorded primary-language audio.
    pub audio_url: Option<String>,
    pub repeat_count: u32,
    pub repeat_target: u32,
    /// Member of the "difficult" group.
    pub flagged: bool,
}

impl DrillItem {
    /// `true` while the item has repetitions left before its target.
    pub fn is_pending(&self) -> bool {
        self.repeat_count < self.repeat_target
    }

    /// Text sent to speech rendering for the translation phase, or `None`
    /// when there is no translation to speak.
    ///
    /// ```
    /// # use ear_drill::drill::DrillItem;
    /// let mut item = DrillItem::new("1", "apple", "苹果");
    /// assert_eq!(item.spoken_translation().as_deref(), Some("苹果"));
    /// item.tag = Some("n.".into());
    /// assert_eq!(item.spoken_translation().as_deref(), Some("n., 苹果"));
    /// ```
    pub fn spoken_translation(&self) -> Option<String> {
        let translation = self.translation.trim();
        if translation.is_empty() {
            return None;
        }
        match self.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(tag) => Some(format!("{tag}, {translation}")),
            None => Some(translation.to_string()),
        }
    }

    /// Minimal constructor; remaining fields take their empty values.
    pub fn new(
        id: impl Into<String>,
        primary_text: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            primary_text: primary_text.into(),
            translation: translation.into(),
            phonetic: None,
            tag: None,
            audio_url: None,
            repeat_count: 0,
            repeat_target: 0,
            flagged: false,
        }
    }
}

// ---------------------------------------------------------------------------
// DrillMode
// ---------------------------------------------------------------------------

/// Completion policy of a drill session.
///
/// | Variant  | Candidates             | Progress commit | End of view          |
/// |----------|------------------------|-----------------|----------------------|
/// | Bounded  | items due for drilling | yes             | session ends         |
/// | Looping  | whole vocabulary       | no              | reshuffle, restart   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrillMode {
    Bounded,
    Looping,
}

impl DrillMode {
    /// Only bounded drilling reports repetitions to the service.
    pub fn commits_progress(self) -> bool {
        matches!(self, DrillMode::Bounded)
    }
}

impl Default for DrillMode {
    fn default() -> Self {
        DrillMode::Bounded
    }
}

// ---------------------------------------------------------------------------
// DrillFilter
// ---------------------------------------------------------------------------

/// Predicate selecting the visible subsequence of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrillFilter {
    All,
    /// Items that have not reached their repeat target.
    Pending,
    /// Items flagged as difficult.
    Difficult,
}

impl DrillFilter {
    pub fn matches(self, item: &DrillItem) -> bool {
        match self {
            DrillFilter::All => true,
            DrillFilter::Pending => item.is_pending(),
            DrillFilter::Difficult => item.flagged,
        }
    }
}

impl Default for DrillFilter {
    fn default() -> Self {
        DrillFilter::Pending
    }
}
