//! Mock drill API for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use vocadrill_core::error::ServiceError;
use vocadrill_core::model::{ChallengeScoreRow, DrillSetEntry, ScoreUpdate, WordItem};
use vocadrill_core::traits::DrillApi;

/// A mock `DrillApi` serving canned collections, for exercising the engine
/// and the CLI without a real service.
///
/// Failure toggles let tests drive the degraded paths; submit calls are
/// counted and the last payload captured for assertions.
#[derive(Default)]
pub struct MockDrillApi {
    words: Vec<WordItem>,
    entries: Vec<DrillSetEntry>,
    rows: Vec<ChallengeScoreRow>,
    fail_fetches: bool,
    fail_submit: bool,
    submit_calls: AtomicU32,
    last_submission: Mutex<Option<Vec<ScoreUpdate>>>,
}

impl MockDrillApi {
    pub fn new(
        words: Vec<WordItem>,
        entries: Vec<DrillSetEntry>,
        rows: Vec<ChallengeScoreRow>,
    ) -> Self {
        Self {
            words,
            entries,
            rows,
            ..Default::default()
        }
    }

    /// A consistent drill of `n` words, each with one meaning, one example
    /// sentence, one set entry, and one score placeholder row.
    pub fn with_sample_drill(n: usize) -> Self {
        let (words, entries, rows) = sample_drill(n);
        Self::new(words, entries, rows)
    }

    /// Every fetch fails with a network error.
    pub fn with_failing_fetches(mut self) -> Self {
        self.fail_fetches = true;
        self
    }

    /// Every submit fails with an HTTP 500.
    pub fn with_failing_submit(mut self) -> Self {
        self.fail_submit = true;
        self
    }

    /// Number of submit calls made against this mock.
    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::Relaxed)
    }

    /// The most recent submitted payload, if any.
    pub fn last_submission(&self) -> Option<Vec<ScoreUpdate>> {
        self.last_submission.lock().unwrap().clone()
    }
}

#[async_trait]
impl DrillApi for MockDrillApi {
    async fn fetch_set_entries(
        &self,
        _drill_ref_id: &str,
    ) -> Result<Vec<DrillSetEntry>, ServiceError> {
        if self.fail_fetches {
            return Err(ServiceError::Network("mock fetch failure".into()));
        }
        Ok(self.entries.clone())
    }

    async fn fetch_word_data(&self, _drill_ref_id: &str) -> Result<Vec<WordItem>, ServiceError> {
        if self.fail_fetches {
            return Err(ServiceError::Network("mock fetch failure".into()));
        }
        Ok(self.words.clone())
    }

    async fn fetch_score_rows(
        &self,
        _challenge_ref_id: &str,
    ) -> Result<Vec<ChallengeScoreRow>, ServiceError> {
        if self.fail_fetches {
            return Err(ServiceError::Network("mock fetch failure".into()));
        }
        Ok(self.rows.clone())
    }

    async fn submit_scores(
        &self,
        _challenge_ref_id: &str,
        updates: &[ScoreUpdate],
    ) -> Result<(), ServiceError> {
        self.submit_calls.fetch_add(1, Ordering::Relaxed);
        *self.last_submission.lock().unwrap() = Some(updates.to_vec());
        if self.fail_submit {
            return Err(ServiceError::Api {
                status: 500,
                message: "mock submit failure".into(),
            });
        }
        Ok(())
    }
}

/// Build the three collections for a consistent `n`-word drill.
pub fn sample_drill(n: usize) -> (Vec<WordItem>, Vec<DrillSetEntry>, Vec<ChallengeScoreRow>) {
    let vocab = [
        "ephemeral",
        "lucid",
        "gregarious",
        "taciturn",
        "obstinate",
        "candid",
        "frugal",
        "zealous",
        "placid",
        "astute",
        "tenacious",
        "affable",
    ];
    let words = (0..n)
        .map(|i| {
            let word = if i < vocab.len() {
                vocab[i].to_string()
            } else {
                format!("{}{}", vocab[i % vocab.len()], i)
            };
            WordItem {
                ref_id: format!("w-{i}"),
                word: word.clone(),
                meanings: vec![format!("what {word} means")],
                examples: vec![format!("Everyone agreed the plan was {word}.")],
                synonyms: vec![],
                antonyms: vec![],
                parts_of_speech: vec!["adjective".into()],
            }
        })
        .collect();
    let entries = (0..n)
        .map(|i| DrillSetEntry {
            ref_id: format!("e-{i}"),
            word_ref_id: format!("w-{i}"),
            drill_set_ref_id: "drill-1".into(),
        })
        .collect();
    let rows = (0..n)
        .map(|i| ChallengeScoreRow {
            ref_id: format!("s-{i}"),
            drill_set_ref_id: format!("e-{i}"),
            response: None,
            is_correct: None,
            correct: None,
        })
        .collect();
    (words, entries, rows)
}
