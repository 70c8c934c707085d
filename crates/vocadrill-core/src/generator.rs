//! Question generation for the five challenge variants.
//!
//! The generator joins the three fetched collections (score placeholder rows,
//! set-membership rows, word data) into playable questions and derives the
//! per-variant prompt. Rows whose joins miss are dropped, never fatal; the
//! drop count is logged so backend inconsistencies stay visible.
//!
//! All randomness flows through an injected [`rand::Rng`], so tests drive the
//! generator with a seeded `StdRng` and assert on membership and length
//! rather than order.

use std::collections::HashMap;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{ChallengeKind, ChallengeScoreRow, DrillSetEntry, WordItem};

/// Option-list size for the multiple-choice variant.
pub const OPTION_COUNT: usize = 4;
/// Marker substituted for the target word in fill-in-the-blank sentences.
pub const BLANK: &str = "_____";
/// Number of horizontal lanes a falling card can spawn in.
pub const BLITZ_COLUMNS: u8 = 10;
/// Rows a freshly spawned card descends per tick at level zero.
pub const BLITZ_BASE_SPEED: u32 = 1;
/// Extra rows per tick gained with each level.
pub const BLITZ_SPEED_STEP: u32 = 1;
/// Cards per level; the level (and thus speed) steps up every this many cards.
pub const BLITZ_LEVEL_EVERY: usize = 3;
/// Ticks the speed-typer allows per word before the item counts as missed.
pub const TYPER_TICK_BUDGET: u32 = 8;

/// A playable item derived by joining a score row to its word.
///
/// Lives only for the duration of one session; never persisted directly —
/// only the derived response/correctness go back over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    /// `ref_id` of the score placeholder row this item fills.
    pub ref_id: String,
    /// The target word.
    pub word: String,
    /// Human-readable prompt text (also echoed in the submission).
    pub question_text: String,
    /// Canonical expected response for this item.
    pub correct_answer: String,
    pub drill_set_ref_id: String,
    pub drill_challenge_ref_id: String,
    pub prompt: Prompt,
}

/// Per-variant prompt payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Prompt {
    ContextQuiz {
        /// Example sentence with the target word blanked out.
        sentence: String,
        options: Vec<String>,
    },
    MatchMeaning {
        meaning: String,
    },
    WordScramble {
        letters: Vec<char>,
    },
    FlashcardBlitz {
        meaning: String,
        column: u8,
        /// Rows descended per tick; monotonically nondecreasing with level.
        speed: u32,
    },
    SpeedTyper {
        display: String,
        ticks: u32,
    },
}

/// Join the three collections and derive one question per resolvable row.
///
/// Unresolvable rows (no matching set entry, or no matching word) are
/// dropped; the total drop count is logged at `warn`.
pub fn generate<R: Rng + ?Sized>(
    kind: ChallengeKind,
    challenge_ref_id: &str,
    words: &[WordItem],
    set_entries: &[DrillSetEntry],
    score_rows: &[ChallengeScoreRow],
    rng: &mut R,
) -> Vec<GeneratedQuestion> {
    let entries_by_id: HashMap<&str, &DrillSetEntry> = set_entries
        .iter()
        .map(|e| (e.ref_id.as_str(), e))
        .collect();
    let words_by_id: HashMap<&str, &WordItem> =
        words.iter().map(|w| (w.ref_id.as_str(), w)).collect();

    let mut questions = Vec::with_capacity(score_rows.len());
    let mut dropped = 0usize;

    for row in score_rows {
        let Some(entry) = entries_by_id.get(row.drill_set_ref_id.as_str()) else {
            dropped += 1;
            continue;
        };
        let Some(word) = words_by_id.get(entry.word_ref_id.as_str()) else {
            dropped += 1;
            continue;
        };

        let (prompt, question_text, correct_answer) =
            build_prompt(kind, word, words, questions.len(), rng);

        questions.push(GeneratedQuestion {
            ref_id: row.ref_id.clone(),
            word: word.word.clone(),
            question_text,
            correct_answer,
            drill_set_ref_id: row.drill_set_ref_id.clone(),
            drill_challenge_ref_id: challenge_ref_id.to_string(),
            prompt,
        });
    }

    if dropped > 0 {
        tracing::warn!(
            dropped,
            total = score_rows.len(),
            "dropped score rows with no matching set entry or word"
        );
    }

    questions
}

fn build_prompt<R: Rng + ?Sized>(
    kind: ChallengeKind,
    word: &WordItem,
    all_words: &[WordItem],
    index: usize,
    rng: &mut R,
) -> (Prompt, String, String) {
    match kind {
        ChallengeKind::ContextMaster => {
            let sentence = word
                .examples
                .first()
                .cloned()
                .unwrap_or_else(|| format!("The new word we practiced today was {}.", word.word));
            let sentence = blank_out(&sentence, &word.word);
            let mut options = draw_distractors(all_words, &word.word, rng);
            options.push(word.word.clone());
            options.shuffle(rng);
            let text = sentence.clone();
            (
                Prompt::ContextQuiz { sentence, options },
                text,
                word.word.clone(),
            )
        }
        ChallengeKind::MatchMeaning => {
            let meaning = first_meaning(word);
            (
                Prompt::MatchMeaning {
                    meaning: meaning.clone(),
                },
                word.word.clone(),
                meaning,
            )
        }
        ChallengeKind::WordScramble => {
            let letters = scramble_letters(&word.word, rng);
            let text: String = letters.iter().collect();
            (
                Prompt::WordScramble { letters },
                text,
                word.word.clone(),
            )
        }
        ChallengeKind::FlashcardBlitz => {
            let meaning = first_meaning(word);
            let level = (index / BLITZ_LEVEL_EVERY) as u32;
            (
                Prompt::FlashcardBlitz {
                    meaning: meaning.clone(),
                    column: rng.random_range(0..BLITZ_COLUMNS),
                    speed: BLITZ_BASE_SPEED + level * BLITZ_SPEED_STEP,
                },
                meaning,
                word.word.clone(),
            )
        }
        ChallengeKind::SpeedTyper => (
            Prompt::SpeedTyper {
                display: word.word.clone(),
                ticks: TYPER_TICK_BUDGET,
            },
            word.word.clone(),
            word.word.clone(),
        ),
    }
}

fn first_meaning(word: &WordItem) -> String {
    word.meanings
        .first()
        .cloned()
        .unwrap_or_else(|| "no definition available".to_string())
}

/// Sample up to three distinct distractor words, uniformly without
/// replacement, from the other words of the set.
fn draw_distractors<R: Rng + ?Sized>(
    words: &[WordItem],
    target: &str,
    rng: &mut R,
) -> Vec<String> {
    let mut pool: Vec<&str> = words
        .iter()
        .map(|w| w.word.as_str())
        .filter(|w| *w != target)
        .collect();
    pool.sort_unstable();
    pool.dedup();
    pool.choose_multiple(rng, OPTION_COUNT - 1)
        .map(|s| s.to_string())
        .collect()
}

/// Shuffle the word's characters, re-rolling a few times if the shuffle
/// happens to reproduce the original order.
fn scramble_letters<R: Rng + ?Sized>(word: &str, rng: &mut R) -> Vec<char> {
    let original: Vec<char> = word.chars().collect();
    let mut letters = original.clone();
    if letters.len() < 2 {
        return letters;
    }
    letters.shuffle(rng);
    for _ in 0..4 {
        if letters != original {
            break;
        }
        letters.shuffle(rng);
    }
    letters
}

/// Replace whole-word, case-insensitive occurrences of `word` with the
/// blank marker. Word runs are maximal alphanumeric spans, so `art` inside
/// `artful` is left alone.
pub fn blank_out(sentence: &str, word: &str) -> String {
    let target = word.to_lowercase();
    if target.is_empty() {
        return sentence.to_string();
    }
    let mut out = String::with_capacity(sentence.len());
    let mut run = String::new();
    for ch in sentence.chars() {
        if ch.is_alphanumeric() {
            run.push(ch);
        } else {
            flush_run(&mut out, &mut run, &target);
            out.push(ch);
        }
    }
    flush_run(&mut out, &mut run, &target);
    out
}

fn flush_run(out: &mut String, run: &mut String, target: &str) {
    if run.is_empty() {
        return;
    }
    if run.to_lowercase() == target {
        out.push_str(BLANK);
    } else {
        out.push_str(run);
    }
    run.clear();
}

/// Display permutations for the matching board: word positions and meaning
/// positions are shuffled independently so visual placement carries no
/// information about the correct pairing.
#[derive(Debug, Clone)]
pub struct MatchingLayout {
    /// Display slot → question index, for the word column.
    pub word_slots: Vec<usize>,
    /// Display slot → question index, for the meaning column.
    pub meaning_slots: Vec<usize>,
}

pub fn matching_layout<R: Rng + ?Sized>(count: usize, rng: &mut R) -> MatchingLayout {
    let mut word_slots: Vec<usize> = (0..count).collect();
    let mut meaning_slots: Vec<usize> = (0..count).collect();
    word_slots.shuffle(rng);
    meaning_slots.shuffle(rng);
    MatchingLayout {
        word_slots,
        meaning_slots,
    }
}
