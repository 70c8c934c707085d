//! The `DrillApi` seam to the remote drill-metadata service.
//!
//! Implemented over HTTP by the `vocadrill-client` crate; tests use the
//! mock implementation from the same crate. The engine only ever talks to
//! this trait, so everything above it stays transport-agnostic.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::model::{ChallengeScoreRow, DrillSetEntry, ScoreUpdate, WordItem};

/// Async access to the drill-metadata service.
///
/// The three fetches return the raw collections; normalizing failures to
/// empty lists is the loader's job (see [`crate::engine`]), not the
/// transport's, so implementations report errors honestly.
#[async_trait]
pub trait DrillApi: Send + Sync {
    /// Set-membership join rows for one drill.
    async fn fetch_set_entries(&self, drill_ref_id: &str)
        -> Result<Vec<DrillSetEntry>, ServiceError>;

    /// Materialized word data for one drill.
    async fn fetch_word_data(&self, drill_ref_id: &str) -> Result<Vec<WordItem>, ServiceError>;

    /// Existing score placeholder rows for one challenge attempt.
    async fn fetch_score_rows(
        &self,
        challenge_ref_id: &str,
    ) -> Result<Vec<ChallengeScoreRow>, ServiceError>;

    /// Submit the final session results. One shot; the caller does not retry.
    async fn submit_scores(
        &self,
        challenge_ref_id: &str,
        updates: &[ScoreUpdate],
    ) -> Result<(), ServiceError>;
}
