//! Authenticated REST access to the League client
//!
//! Handlers use this for follow-up lookups (resolving a queue id to its
//! display metadata) and the connector uses it to gather base data after a
//! fresh subscription.

use crate::lockfile::LcuCredentials;
use crate::poller;
use async_trait::async_trait;
use riftpresence_core::LcuError;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Display metadata for one matchmaking queue.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct QueueInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub queue_type: String,
    #[serde(default, rename = "isRanked")]
    pub is_ranked: bool,
}

/// Seam for queue-metadata resolution so handlers stay testable without a
/// running client.
#[async_trait]
pub trait QueueLookup: Send + Sync {
    async fn queue_info(&self, queue_id: i64) -> Result<QueueInfo, LcuError>;
}

/// HTTP client for the local client API.
pub struct LcuRestClient {
    base_url: String,
    auth_header: String,
    http: reqwest::Client,
}

impl LcuRestClient {
    pub fn new(creds: &LcuCredentials) -> Result<Self, LcuError> {
        Ok(Self {
            base_url: creds.base_url(),
            auth_header: creds.basic_auth(),
            http: poller::insecure_client()?,
        })
    }

    /// GET a client API path and parse the JSON body.
    pub async fn get(&self, path: &str) -> Result<Value, LcuError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "LCU GET");

        let response = self
            .http
            .get(&url)
            .header("Authorization", &self.auth_header)
            .send()
            .await
            .map_err(|e| LcuError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LcuError::HttpError(format!(
                "{} returned status {}",
                path,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| LcuError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl QueueLookup for LcuRestClient {
    async fn queue_info(&self, queue_id: i64) -> Result<QueueInfo, LcuError> {
        let value = self
            .get(&format!("/lol-game-queues/v1/queues/{queue_id}"))
            .await?;
        serde_json::from_value(value).map_err(|e| LcuError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn queue_info_deserializes_client_shape() {
        let value = json!({
            "id": 420,
            "name": "Ranked Solo/Duo",
            "type": "RANKED_SOLO_5x5",
            "isRanked": true,
            "mapId": 11
        });
        let info: QueueInfo = serde_json::from_value(value).unwrap();
        assert_eq!(
            info,
            QueueInfo {
                name: "Ranked Solo/Duo".into(),
                queue_type: "RANKED_SOLO_5x5".into(),
                is_ranked: true
            }
        );
    }

    #[test]
    fn queue_info_tolerates_missing_fields() {
        let info: QueueInfo = serde_json::from_value(json!({"id": 0})).unwrap();
        assert_eq!(info, QueueInfo::default());
    }
}
