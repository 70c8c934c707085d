//! Challenge orchestration: load, generate, submit.
//!
//! The engine owns one [`DrillApi`] implementation and wires the loader, the
//! question generator, and the result submitter together. Fetch failures are
//! normalized to empty collections at the loader boundary, so a missing
//! backend degrades to the "no data" branch instead of an error path; the
//! submitter is the only step whose failure the player ever hears about.

use rand::Rng;

use crate::error::ServiceError;
use crate::generator;
use crate::mailbox::FlashMailbox;
use crate::model::{
    ChallengeKind, ChallengeScoreRow, DrillSetEntry, Notification, ScoreUpdate, WordItem,
};
use crate::session::Session;
use crate::traits::DrillApi;

/// The three collections one challenge needs, post-normalization.
#[derive(Debug, Clone, Default)]
pub struct LoadedChallenge {
    pub words: Vec<WordItem>,
    pub set_entries: Vec<DrillSetEntry>,
    pub score_rows: Vec<ChallengeScoreRow>,
}

impl LoadedChallenge {
    pub fn is_empty(&self) -> bool {
        self.words.is_empty() || self.set_entries.is_empty() || self.score_rows.is_empty()
    }
}

/// Orchestrates one challenge flow over a [`DrillApi`].
pub struct ChallengeEngine<A> {
    api: A,
    mailbox: FlashMailbox,
}

impl<A: DrillApi> ChallengeEngine<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            mailbox: FlashMailbox::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// The flash slot the submitter posts its outcome notification into.
    pub fn mailbox(&self) -> &FlashMailbox {
        &self.mailbox
    }

    /// Fetch the three collections concurrently.
    ///
    /// A failed fetch yields an empty collection (logged at `warn`), never an
    /// error: downstream the game simply has nothing to play.
    pub async fn load(&self, challenge_ref_id: &str, drill_ref_id: &str) -> LoadedChallenge {
        let (entries, words, rows) = futures::join!(
            self.api.fetch_set_entries(drill_ref_id),
            self.api.fetch_word_data(drill_ref_id),
            self.api.fetch_score_rows(challenge_ref_id),
        );
        LoadedChallenge {
            set_entries: or_empty(entries, "set entries"),
            words: or_empty(words, "word data"),
            score_rows: or_empty(rows, "score rows"),
        }
    }

    /// Load, generate, and open a session. `None` when nothing resolves to a
    /// playable item — the caller renders its empty branch.
    pub async fn start<R: Rng + ?Sized>(
        &self,
        kind: ChallengeKind,
        challenge_ref_id: &str,
        drill_ref_id: &str,
        rng: &mut R,
    ) -> Option<Session> {
        let loaded = self.load(challenge_ref_id, drill_ref_id).await;
        self.start_from(kind, challenge_ref_id, &loaded, rng)
    }

    /// Open a fresh session over already-loaded data. Replays go through
    /// here too: same source rows, fresh shuffles, all answers discarded.
    pub fn start_from<R: Rng + ?Sized>(
        &self,
        kind: ChallengeKind,
        challenge_ref_id: &str,
        loaded: &LoadedChallenge,
        rng: &mut R,
    ) -> Option<Session> {
        let questions = generator::generate(
            kind,
            challenge_ref_id,
            &loaded.words,
            &loaded.set_entries,
            &loaded.score_rows,
            rng,
        );
        if questions.is_empty() {
            tracing::debug!(challenge_ref_id, "no playable items after generation");
            return None;
        }
        Some(Session::new(challenge_ref_id, kind, questions))
    }

    /// Map the accumulated answers to the wire shape and PUT them once.
    ///
    /// Always returns the notification to show; the same notification is
    /// posted to the flash mailbox. No retry on failure.
    pub async fn submit(&self, session: &Session) -> Notification {
        let updates = build_score_updates(session);
        let notification = match self
            .api
            .submit_scores(session.challenge_ref_id(), &updates)
            .await
        {
            Ok(()) => Notification::success(format!("Saved {} challenge results.", updates.len())),
            Err(e) => {
                tracing::error!(error = %e, "score submission failed");
                Notification::error(format!("Could not save your results: {e}"))
            }
        };
        self.mailbox.post(notification.clone());
        notification
    }
}

/// One `ScoreUpdate` per accumulated answer, in play order.
pub fn build_score_updates(session: &Session) -> Vec<ScoreUpdate> {
    session
        .answers()
        .iter()
        .map(|a| ScoreUpdate {
            ref_id: a.ref_id.clone(),
            drill_challenge_ref_id: a.question.drill_challenge_ref_id.clone(),
            drill_set_ref_id: a.question.drill_set_ref_id.clone(),
            question: a.question.question_text.clone(),
            response: a.user_response.clone(),
            is_correct: a.is_correct,
            correct: a.question.correct_answer.clone(),
        })
        .collect()
}

fn or_empty<T>(result: Result<Vec<T>, ServiceError>, what: &str) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch {}; continuing with an empty list", what);
            Vec::new()
        }
    }
}
