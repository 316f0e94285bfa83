//! Wire types exchanged with the vocabulary service.
//!
//! Only the fields this client reads are declared; everything else in the
//! service's JSON is ignored.

use serde::{Deserialize, Serialize};

use crate::drill::DrillItem;

use super::review::{ExamKind, Rating};

/// One vocabulary record as served by `/listening/v2/*`.
#[derive(Debug, Clone, Deserialize)]
pub struct VocabularyRecord {
    pub id: String,
    pub english: String,
    /// The service sends `null` for words without a translation.
    pub chinese: Option<String>,
    pub ipa: Option<String>,
    pub pos: Option<String>,
    #[serde(default)]
    pub grind_count: u32,
    #[serde(default)]
    pub grind_target: u32,
    #[serde(default)]
    pub in_difficult_group: bool,
    pub audio_file_id: Option<String>,
}

impl VocabularyRecord {
    /// Convert to a [`DrillItem`], resolving the audio file against `base_url`.
    pub fn into_item(self, base_url: &str) -> DrillItem {
        DrillItem {
            id: self.id,
            primary_text: self.english,
            translation: self.chinese.unwrap_or_default(),
            phonetic: self.ipa,
            tag: self.pos,
            audio_url: self
                .audio_file_id
                .filter(|id| !id.is_empty())
                .map(|id| format!("{base_url}/audio/{id}")),
            repeat_count: self.grind_count,
            repeat_target: self.grind_target,
            flagged: self.in_difficult_group,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProgressRequest<'a> {
    pub vocabulary_id: &'a str,
    pub increment: u32,
}

#[derive(Debug, Deserialize)]
pub struct ProgressResponse {
    pub grind_count: u32,
    pub grind_target: u32,
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct SpeechResponse {
    pub audio_url: String,
}

#[derive(Debug, Deserialize)]
pub struct DueReviews {
    #[serde(default)]
    pub listening: Vec<VocabularyRecord>,
    #[serde(default)]
    pub spelling: Vec<VocabularyRecord>,
}

#[derive(Debug, Serialize)]
pub struct ReviewRequest<'a> {
    pub vocabulary_id: &'a str,
    pub exam_type: ExamKind,
    pub rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_input: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewResponse {
    #[serde(default)]
    pub learning_status: String,
    #[serde(default)]
    pub next_review_display: String,
}

/// Phase gaps stored on the service, in milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlaybackRhythm {
    pub english_gap: u64,
    pub english_chinese_gap: u64,
    pub pos_meaning_gap: u64,
    pub word_switch_gap: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_maps_onto_drill_item() {
        let json = r#"{
            "id": "v1",
            "english": "abandon",
            "chinese": "放弃",
            "ipa": "/əˈbændən/",
            "pos": "v.",
            "word_type": "word",
            "level": "hard",
            "grind_count": 2,
            "grind_target": 15,
            "in_difficult_group": true,
            "audio_file_id": "f42"
        }"#;
        let record: VocabularyRecord = serde_json::from_str(json).unwrap();
        let item = record.into_item("http://localhost:8000");

        assert_eq!(item.id, "v1");
        assert_eq!(item.primary_text, "abandon");
        assert_eq!(item.translation, "放弃");
        assert_eq!(item.tag.as_deref(), Some("v."));
        assert_eq!(item.audio_url.as_deref(), Some("http://localhost:8000/audio/f42"));
        assert_eq!((item.repeat_count, item.repeat_target), (2, 15));
        assert!(item.flagged);
    }

    #[test]
    fn sparse_record_uses_defaults() {
        let record: VocabularyRecord =
            serde_json::from_str(r#"{"id": "v2", "english": "run"}"#).unwrap();
        let item = record.into_item("http://x");

        assert!(item.translation.is_empty());
        assert!(item.audio_url.is_none());
        assert!(!item.flagged);
    }

    #[test]
    fn null_translation_reads_as_empty() {
        let record: VocabularyRecord =
            serde_json::from_str(r#"{"id": "v3", "english": "set", "chinese": null}"#).unwrap();
        let item = record.into_item("http://x");

        assert_eq!(item.primary_text, "set");
        assert!(item.translation.is_empty());
    }

    #[test]
    fn review_request_omits_missing_input() {
        let req = ReviewRequest {
            vocabulary_id: "v1",
            exam_type: ExamKind::Listening,
            rating: Rating::Good,
            user_input: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"vocabulary_id": "v1", "exam_type": "listening", "rating": "good"})
        );
    }
}
