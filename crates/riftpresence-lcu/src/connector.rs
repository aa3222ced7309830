//! Client connection supervisor
//!
//! Owns the credential discovery / subscription lifecycle. The client
//! restarts freely (patches, crashes, region swaps), so the connector loops:
//! discover credentials, wait for the REST surface to answer, seed the
//! state, then hold the websocket until it drops and start over. Exiting
//! the process is the session loop's decision, never the connector's.

use crate::base_data::gather_base_data;
use crate::handlers::Topic;
use crate::lockfile::{self, LcuCredentials};
use crate::poller::{self, wait_until_ready, TimeoutPolicy};
use crate::rest::LcuRestClient;
use crate::subscription::EventSubscription;
use riftpresence_core::{ClientStateHandle, LcuError, MergeNotifier, ENDPOINT_POLL_INTERVAL};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long a freshly-discovered client gets to start answering REST calls.
const READINESS_TIMEOUT: Duration = Duration::from_secs(30);

pub struct LcuConnector {
    state: ClientStateHandle,
    notifier: Arc<dyn MergeNotifier>,
    league_dir: Option<PathBuf>,
}

impl LcuConnector {
    pub fn new(
        state: ClientStateHandle,
        notifier: Arc<dyn MergeNotifier>,
        league_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            state,
            notifier,
            league_dir,
        }
    }

    /// Supervise the connection until the task is aborted.
    pub async fn run(self) {
        loop {
            let Some(creds) = lockfile::discover(self.league_dir.as_deref()) else {
                debug!("No client credentials found, will rescan");
                tokio::time::sleep(ENDPOINT_POLL_INTERVAL).await;
                continue;
            };

            match self.connect_once(&creds).await {
                Ok(()) => info!("Event subscription ended, reconnecting"),
                Err(e) => warn!(error = %e, "Client connection lost"),
            }
            tokio::time::sleep(ENDPOINT_POLL_INTERVAL).await;
        }
    }

    /// One full connection: readiness poll, base data, then the websocket
    /// until it closes.
    async fn connect_once(&self, creds: &LcuCredentials) -> Result<(), LcuError> {
        let probe = poller::insecure_client()?;
        let probe_url = format!("{}{}", creds.base_url(), Topic::Summoner.uri());
        // Credentials can outlive the process that wrote them; a bounded
        // poll filters out stale lockfiles.
        wait_until_ready(
            &probe,
            &probe_url,
            TimeoutPolicy::Bounded(READINESS_TIMEOUT),
        )
        .await
        .map(|_| ())
        .map_err(|_| LcuError::ConnectionError("client API never became ready".to_string()))?;
        info!(port = creds.port, "Client API ready");

        let rest = Arc::new(LcuRestClient::new(creds)?);
        let subscription = EventSubscription::new(
            creds.clone(),
            self.state.clone(),
            rest.clone(),
            self.notifier.clone(),
        );

        // Seed the state before the event stream takes over, and push the
        // seeded snapshot downstream.
        gather_base_data(&rest, &self.state, rest.as_ref()).await?;
        self.notifier.notify();

        subscription.run().await
    }
}
