//! HTTP implementation of the drill-metadata API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::instrument;

use vocadrill_core::error::ServiceError;
use vocadrill_core::model::{ChallengeScoreRow, DrillSetEntry, ScoreUpdate, WordItem};
use vocadrill_core::traits::DrillApi;

/// HTTP client for the drill-metadata service.
///
/// No request timeout and no retries: the upstream contract leaves timeouts
/// to the HTTP stack's defaults, and a failed call is reported once to the
/// caller, which decides how to degrade.
pub struct MetadataClient {
    base_url: String,
    client: reqwest::Client,
}

impl MetadataClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("failed to build HTTP client");
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn get_collection<T>(&self, path: String) -> Result<Vec<T>, ServiceError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status, message });
        }

        let envelope: Envelope<Vec<T>> = response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(envelope.data.unwrap_or_default())
    }
}

/// Uniform `{ "data": <payload> }` response envelope.
///
/// A missing or `null` `data` key yields the empty payload; that is the de
/// facto wire contract of the service.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[async_trait]
impl DrillApi for MetadataClient {
    async fn fetch_set_entries(
        &self,
        drill_ref_id: &str,
    ) -> Result<Vec<DrillSetEntry>, ServiceError> {
        self.get_collection(format!("/drill/metadata/sets/{drill_ref_id}"))
            .await
    }

    async fn fetch_word_data(&self, drill_ref_id: &str) -> Result<Vec<WordItem>, ServiceError> {
        self.get_collection(format!("/drill/metadata/sets/words/data/{drill_ref_id}"))
            .await
    }

    async fn fetch_score_rows(
        &self,
        challenge_ref_id: &str,
    ) -> Result<Vec<ChallengeScoreRow>, ServiceError> {
        self.get_collection(format!(
            "/drill/metadata/challenges/challenge/{challenge_ref_id}/scores"
        ))
        .await
    }

    #[instrument(skip(self, updates), fields(count = updates.len()))]
    async fn submit_scores(
        &self,
        challenge_ref_id: &str,
        updates: &[ScoreUpdate],
    ) -> Result<(), ServiceError> {
        let response = self
            .client
            .put(format!(
                "{}/drill/metadata/challenges/challenge/{challenge_ref_id}/scores",
                self.base_url
            ))
            .json(&updates)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status, message });
        }
        Ok(())
    }
}
