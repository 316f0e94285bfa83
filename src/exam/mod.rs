//! Listening and spelling assessment sessions.
//!
//! An [`ExamSession`] walks the service's due-review list once.  For each
//! item the learner hears the prompt, optionally types the word (spelling),
//! sees the answer and rates their recall.  The rating goes to the service,
//! which owns the review schedule; the session only records what came back.
//!
//! ```text
//! load(kind) ─▶ [present ─▶ check_spelling? ─▶ rate] × items ─▶ complete
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::audio::{AudioPlayer, PlaybackOutcome};
use crate::drill::DrillItem;
use crate::remote::{ExamKind, FetchError, Rating, ReviewError, ReviewService};

#[derive(Debug, Error)]
pub enum ExamError {
    #[error("no item is awaiting a rating")]
    NoCurrentItem,

    #[error("review was not recorded: {0}")]
    Review(#[from] ReviewError),
}

/// Outcome of comparing typed input against the expected word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellingCheck {
    pub correct: bool,
    pub expected: String,
}

/// Read a typed rating: `a`/`again` or `g`/`good`, ignoring case.
pub fn parse_rating(input: &str) -> Option<Rating> {
    match input.trim().to_ascii_lowercase().as_str() {
        "a" | "again" => Some(Rating::Again),
        "g" | "good" => Some(Rating::Good),
        _ => None,
    }
}

/// One rated item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamResult {
    pub item_id: String,
    pub primary_text: String,
    pub rating: Rating,
    pub next_review_display: String,
}

pub struct ExamSession {
    service: Arc<dyn ReviewService>,
    kind: ExamKind,
    items: Vec<DrillItem>,
    position: usize,
    revealed: bool,
    typed: Option<String>,
    results: Vec<ExamResult>,
}

impl ExamSession {
    /// Fetch the items due for `kind`.
    pub async fn load(service: Arc<dyn ReviewService>, kind: ExamKind) -> Result<Self, FetchError> {
        let items = service.fetch_due_reviews(kind).await?;
        log::info!("exam: {} items due for {:?}", items.len(), kind);
        Ok(Self {
            service,
            kind,
            items,
            position: 0,
            revealed: false,
            typed: None,
            results: Vec::new(),
        })
    }

    pub fn kind(&self) -> ExamKind {
        self.kind
    }

    pub fn current(&self) -> Option<&DrillItem> {
        self.items.get(self.position)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.position >= self.items.len()
    }

    /// `true` once the answer for the current item is shown.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn results(&self) -> &[ExamResult] {
        &self.results
    }

    /// Show the current item.  Listening prompts play immediately; spelling
    /// prompts wait for [`play_prompt`](Self::play_prompt).
    pub async fn present(&self, player: &AudioPlayer) -> Option<PlaybackOutcome> {
        match self.kind {
            ExamKind::Listening => self.play_prompt(player).await,
            ExamKind::Spelling => None,
        }
    }

    /// Play the current item's recording.  `None` when there is nothing to
    /// play.
    pub async fn play_prompt(&self, player: &AudioPlayer) -> Option<PlaybackOutcome> {
        let locator = self.current()?.audio_url.as_deref()?;
        Some(player.play(locator).await)
    }

    /// Show the answer without typing anything.
    pub fn reveal(&mut self) {
        if !self.is_complete() {
            self.revealed = true;
        }
    }

    /// Compare `input` with the current word (trimmed, case-insensitive) and
    /// reveal the answer.
    pub fn check_spelling(&mut self, input: &str) -> Option<SpellingCheck> {
        let expected = self.current()?.primary_text.clone();
        let correct = input.trim().to_lowercase() == expected.trim().to_lowercase();
        self.typed = Some(input.trim().to_string());
        self.revealed = true;
        log::debug!("exam: spelling {:?} for {:?}: {correct}", input.trim(), expected);
        Some(SpellingCheck { correct, expected })
    }

    /// Submit `rating` for the current item and move on.
    ///
    /// A failed submission keeps the session on the same item so the rating
    /// can be retried.
    pub async fn rate(&mut self, rating: Rating) -> Result<&ExamResult, ExamError> {
        let item = self.current().cloned().ok_or(ExamError::NoCurrentItem)?;
        let user_input = match self.kind {
            ExamKind::Spelling => self.typed.as_deref(),
            ExamKind::Listening => None,
        };

        let receipt = match self
            .service
            .submit_review(&item.id, self.kind, rating, user_input)
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                log::warn!("exam: review for {} not recorded: {e}", item.id);
                return Err(e.into());
            }
        };

        self.results.push(ExamResult {
            item_id: item.id,
            primary_text: item.primary_text,
            rating,
            next_review_display: receipt.next_review_display,
        });
        self.position += 1;
        self.revealed = false;
        self.typed = None;

        if self.is_complete() {
            log::info!("exam: {:?} session complete", self.kind);
        }
        self.results.last().ok_or(ExamError::NoCurrentItem)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MockDevice;
    use crate::remote::{MemoryReviews, SubmittedReview};

    fn due() -> Vec<DrillItem> {
        vec![
            DrillItem {
                audio_url: Some("audio://apple".into()),
                ..DrillItem::new("1", "Apple", "苹果")
            },
            DrillItem::new("2", "pear", "梨"),
        ]
    }

    async fn session(kind: ExamKind) -> (ExamSession, Arc<MemoryReviews>) {
        let reviews = Arc::new(MemoryReviews::new(due()));
        let session = ExamSession::load(reviews.clone(), kind).await.unwrap();
        (session, reviews)
    }

    #[test]
    fn typed_ratings() {
        assert_eq!(parse_rating(" G\n"), Some(Rating::Good));
        assert_eq!(parse_rating("again"), Some(Rating::Again));
        assert_eq!(parse_rating(""), None);
        assert_eq!(parse_rating("maybe"), None);
    }

    #[tokio::test]
    async fn listening_prompt_plays_on_entry() {
        let (session, _) = session(ExamKind::Listening).await;
        let device = Arc::new(MockDevice::instant());
        let player = AudioPlayer::new(device.clone());

        assert_eq!(session.present(&player).await, Some(PlaybackOutcome::Finished));
        assert_eq!(device.plays(), vec!["audio://apple"]);
    }

    #[tokio::test]
    async fn spelling_prompt_waits_for_request() {
        let (session, _) = session(ExamKind::Spelling).await;
        let device = Arc::new(MockDevice::instant());
        let player = AudioPlayer::new(device.clone());

        assert_eq!(session.present(&player).await, None);
        assert!(device.plays().is_empty());
        assert!(session.play_prompt(&player).await.is_some());
    }

    #[tokio::test]
    async fn item_without_audio_has_no_prompt() {
        let (mut session, _) = session(ExamKind::Listening).await;
        session.rate(Rating::Good).await.unwrap();
        let player = AudioPlayer::new(Arc::new(MockDevice::instant()));

        assert_eq!(session.play_prompt(&player).await, None);
    }

    #[tokio::test]
    async fn spelling_check_ignores_case_and_whitespace() {
        let (mut session, _) = session(ExamKind::Spelling).await;

        let check = session.check_spelling("  apple ").unwrap();
        assert!(check.correct);
        assert_eq!(check.expected, "Apple");
        assert!(session.is_revealed());

        assert!(!session.check_spelling("aple").unwrap().correct);
    }

    #[tokio::test]
    async fn rating_submits_typed_answer_and_advances() {
        let (mut session, reviews) = session(ExamKind::Spelling).await;
        session.check_spelling("aple");

        let result = session.rate(Rating::Again).await.unwrap();
        assert_eq!(result.next_review_display, "10 minutes");
        assert_eq!(session.position(), 1);
        assert!(!session.is_revealed());

        assert_eq!(
            reviews.submitted(),
            vec![SubmittedReview {
                item_id: "1".into(),
                kind: ExamKind::Spelling,
                rating: Rating::Again,
                user_input: Some("aple".into()),
            }]
        );
    }

    #[tokio::test]
    async fn listening_review_sends_no_input() {
        let (mut session, reviews) = session(ExamKind::Listening).await;
        session.reveal();
        session.rate(Rating::Good).await.unwrap();

        assert_eq!(reviews.submitted()[0].user_input, None);
    }

    #[tokio::test]
    async fn failed_submission_keeps_position() {
        let (mut session, reviews) = session(ExamKind::Listening).await;
        reviews.set_fail_submit(true);

        assert!(matches!(
            session.rate(Rating::Good).await,
            Err(ExamError::Review(_))
        ));
        assert_eq!(session.position(), 0);
        assert!(session.results().is_empty());

        reviews.set_fail_submit(false);
        session.rate(Rating::Good).await.unwrap();
        assert_eq!(session.position(), 1);
    }

    #[tokio::test]
    async fn session_completes_after_last_item() {
        let (mut session, _) = session(ExamKind::Listening).await;
        session.rate(Rating::Good).await.unwrap();
        session.rate(Rating::Again).await.unwrap();

        assert!(session.is_complete());
        assert!(session.current().is_none());
        assert!(matches!(
            session.rate(Rating::Good).await,
            Err(ExamError::NoCurrentItem)
        ));

        let ratings: Vec<_> = session.results().iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![Rating::Good, Rating::Again]);
    }
}
