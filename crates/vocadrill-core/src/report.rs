//! Session report types with JSON persistence.
//!
//! A report is what the CLI writes after a submitted session: what was
//! played, how it went, and every accumulated answer. Reports are output
//! artifacts only; nothing reads them back into gameplay.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ChallengeKind;
use crate::session::{Session, SessionAnswer};

/// Aggregate outcome of one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// Fraction of answered items that were correct, 0.0 when nothing was
    /// answered.
    pub accuracy: f64,
}

impl SessionSummary {
    pub fn from_session(session: &Session) -> Self {
        let total = session.answers().len();
        let correct = session.score() as usize;
        let accuracy = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        };
        Self {
            total,
            correct,
            incorrect: total - correct,
            accuracy,
        }
    }
}

/// A complete record of one played (and submitted) session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub kind: ChallengeKind,
    pub challenge_ref_id: String,
    pub drill_ref_id: String,
    pub summary: SessionSummary,
    pub answers: Vec<SessionAnswer>,
}

impl SessionReport {
    pub fn from_session(session: &Session, drill_ref_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            kind: session.kind(),
            challenge_ref_id: session.challenge_ref_id().to_string(),
            drill_ref_id: drill_ref_id.into(),
            summary: SessionSummary::from_session(session),
            answers: session.answers().to_vec(),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
