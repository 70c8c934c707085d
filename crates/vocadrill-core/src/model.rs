//! Core data model types for vocadrill.
//!
//! These are the wire DTOs the drill-metadata service exchanges with us,
//! plus the challenge-kind enum and the notification type surfaced to the
//! player. The upstream service speaks camelCase JSON with opaque `refId`
//! keys; every collection field defaults to empty so sparse rows parse.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How long a transient notification stays on screen before auto-dismissing.
pub const NOTIFICATION_DISMISS_MS: u64 = 5_000;

/// Join row relating one word to one drill set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillSetEntry {
    /// Unique identifier of this join row.
    pub ref_id: String,
    /// The word this row points at.
    pub word_ref_id: String,
    /// The drill set this row belongs to.
    pub drill_set_ref_id: String,
}

/// Materialized word data — the source of truth for prompts and answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordItem {
    pub ref_id: String,
    pub word: String,
    #[serde(default)]
    pub meanings: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
    #[serde(default, rename = "partsOfSpeeches")]
    pub parts_of_speech: Vec<String>,
}

/// One backend-persisted placeholder/result row per playable item per
/// challenge attempt. Placeholder rows arrive with the optional fields unset;
/// the session fills them in on submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeScoreRow {
    pub ref_id: String,
    /// Foreign key to a `DrillSetEntry`'s `ref_id`.
    pub drill_set_ref_id: String,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub is_correct: Option<bool>,
    /// Expected-answer string the backend stores next to the boolean.
    #[serde(default)]
    pub correct: Option<String>,
}

/// The PUT body element for `.../challenges/challenge/{id}/scores`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
    pub ref_id: String,
    pub drill_challenge_ref_id: String,
    pub drill_set_ref_id: String,
    pub question: String,
    pub response: Option<String>,
    pub is_correct: bool,
    pub correct: String,
}

/// The five drill-challenge variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChallengeKind {
    /// Fill-in-the-blank sentence with multiple-choice options.
    ContextMaster,
    /// Pair words with their meanings; one chance per word.
    MatchMeaning,
    /// Reassemble a shuffled word from its letters.
    WordScramble,
    /// Catch falling definition cards by typing their word.
    FlashcardBlitz,
    /// Type the displayed word before the clock runs out; limited lives.
    SpeedTyper,
}

impl fmt::Display for ChallengeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChallengeKind::ContextMaster => write!(f, "context-master"),
            ChallengeKind::MatchMeaning => write!(f, "match-meaning"),
            ChallengeKind::WordScramble => write!(f, "word-scramble"),
            ChallengeKind::FlashcardBlitz => write!(f, "flashcard-blitz"),
            ChallengeKind::SpeedTyper => write!(f, "speed-typer"),
        }
    }
}

impl FromStr for ChallengeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "context-master" | "context" | "quiz" => Ok(ChallengeKind::ContextMaster),
            "match-meaning" | "matching" | "match" => Ok(ChallengeKind::MatchMeaning),
            "word-scramble" | "scramble" => Ok(ChallengeKind::WordScramble),
            "flashcard-blitz" | "blitz" => Ok(ChallengeKind::FlashcardBlitz),
            "speed-typer" | "typer" => Ok(ChallengeKind::SpeedTyper),
            other => Err(format!("unknown challenge kind: {other}")),
        }
    }
}

/// Severity of a player-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A transient, auto-dismissing message shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub dismiss_after_ms: u64,
}

impl Notification {
    fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            dismiss_after_ms: NOTIFICATION_DISMISS_MS,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_kind_display_and_parse() {
        assert_eq!(ChallengeKind::ContextMaster.to_string(), "context-master");
        assert_eq!(ChallengeKind::SpeedTyper.to_string(), "speed-typer");
        assert_eq!(
            "match-meaning".parse::<ChallengeKind>().unwrap(),
            ChallengeKind::MatchMeaning
        );
        assert_eq!(
            "Scramble".parse::<ChallengeKind>().unwrap(),
            ChallengeKind::WordScramble
        );
        assert_eq!(
            "blitz".parse::<ChallengeKind>().unwrap(),
            ChallengeKind::FlashcardBlitz
        );
        assert!("hangman".parse::<ChallengeKind>().is_err());
    }

    #[test]
    fn word_item_parses_sparse_row() {
        let json = r#"{"refId": "w-1", "word": "ephemeral"}"#;
        let word: WordItem = serde_json::from_str(json).unwrap();
        assert_eq!(word.ref_id, "w-1");
        assert!(word.meanings.is_empty());
        assert!(word.parts_of_speech.is_empty());
    }

    #[test]
    fn word_item_wire_field_names() {
        let json = r#"{
            "refId": "w-2",
            "word": "lucid",
            "meanings": ["easy to understand"],
            "partsOfSpeeches": ["adjective"]
        }"#;
        let word: WordItem = serde_json::from_str(json).unwrap();
        assert_eq!(word.parts_of_speech, vec!["adjective"]);
        let back = serde_json::to_string(&word).unwrap();
        assert!(back.contains("partsOfSpeeches"));
        assert!(back.contains("refId"));
    }

    #[test]
    fn score_row_placeholder_fields_default() {
        let json = r#"{"refId": "s-1", "drillSetRefId": "e-1"}"#;
        let row: ChallengeScoreRow = serde_json::from_str(json).unwrap();
        assert!(row.response.is_none());
        assert!(row.is_correct.is_none());
        assert!(row.correct.is_none());
    }

    #[test]
    fn score_update_serializes_camel_case() {
        let update = ScoreUpdate {
            ref_id: "s-1".into(),
            drill_challenge_ref_id: "c-1".into(),
            drill_set_ref_id: "e-1".into(),
            question: "_____ means lasting a very short time.".into(),
            response: Some("ephemeral".into()),
            is_correct: true,
            correct: "ephemeral".into(),
        };
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains("drillChallengeRefId"));
        assert!(json.contains("isCorrect"));
    }

    #[test]
    fn notification_constructors_set_dismiss() {
        let n = Notification::success("saved");
        assert_eq!(n.severity, Severity::Success);
        assert_eq!(n.dismiss_after_ms, NOTIFICATION_DISMISS_MS);
        assert_eq!(Notification::error("boom").severity, Severity::Error);
    }
}
