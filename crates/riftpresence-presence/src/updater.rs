//! Presence updater
//!
//! The single writer to the presence link. Reads a full snapshot, formats
//! it, suppresses no-op pushes, and heals a dropped link in place. A failed
//! push never takes the pipeline down; the next state change simply tries
//! again.

use crate::format;
use crate::reconnect::attempt_reconnect;
use async_trait::async_trait;
use parking_lot::Mutex;
use riftpresence_core::{
    AppConfig, ClientStateHandle, PresenceError, PresenceLink, PresencePayload,
};
use tracing::{debug, error, info, warn};

/// Consumer side of the coalescer: something that can deliver "state
/// changed" downstream.
#[async_trait]
pub trait PresencePush: Send + Sync {
    async fn push(&self);
}

pub struct PresenceUpdater {
    link: tokio::sync::Mutex<Box<dyn PresenceLink>>,
    state: ClientStateHandle,
    config: AppConfig,
    /// Unix seconds when this run started; shown as the activity timer
    /// outside of matches.
    session_start: i64,
    last_payload: Mutex<Option<PresencePayload>>,
}

impl PresenceUpdater {
    pub fn new(link: Box<dyn PresenceLink>, state: ClientStateHandle, config: AppConfig) -> Self {
        Self {
            link: tokio::sync::Mutex::new(link),
            state,
            config,
            session_start: chrono::Utc::now().timestamp(),
            last_payload: Mutex::new(None),
        }
    }

    /// Perform the initial handshake.
    pub async fn connect(&self) -> Result<(), PresenceError> {
        let mut link = self.link.lock().await;
        link.connect()?;
        info!(link = link.name(), "Presence link connected");
        Ok(())
    }

    /// Handshake, falling back to the reconnect budget when the peer is
    /// not up yet.
    pub async fn connect_with_retry(&self) -> Result<(), PresenceError> {
        let mut link = self.link.lock().await;
        match link.connect() {
            Ok(()) => {
                info!(link = link.name(), "Presence link connected");
                Ok(())
            }
            Err(e) => {
                warn!(link = link.name(), error = %e, "Initial handshake failed, retrying");
                attempt_reconnect(link.as_mut()).await
            }
        }
    }

    /// Close the link. Errors are logged and swallowed; this is the
    /// shutdown path.
    pub async fn close(&self) {
        let mut link = self.link.lock().await;
        if let Err(e) = link.close() {
            debug!(error = %e, "Error closing presence link");
        }
    }

    /// Deliver one payload, suppressing repeats and healing a dropped link.
    pub async fn send(&self, payload: PresencePayload) {
        if self.last_payload.lock().as_ref() == Some(&payload) {
            debug!("Presence unchanged, skipping push");
            return;
        }

        let mut link = self.link.lock().await;
        match link.update(&payload) {
            Ok(()) => {
                *self.last_payload.lock() = Some(payload);
            }
            Err(e) if e.is_link_closed() => {
                warn!(link = link.name(), "Presence link dropped, reconnecting");
                match attempt_reconnect(link.as_mut()).await {
                    Ok(()) => {
                        // The peer lost our state with the connection
                        *self.last_payload.lock() = None;
                        if let Err(e) = link.update(&payload) {
                            warn!(error = %e, "Push failed after reconnect");
                        } else {
                            *self.last_payload.lock() = Some(payload);
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Presence link could not be re-established");
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Presence push failed");
            }
        }
    }

    /// Push the current idle (client-side) view of the state.
    pub async fn push_idle(&self) {
        let snapshot = self.state.snapshot();
        if snapshot.gameflow_phase.is_in_game() {
            // The session loop owns the presence while a match runs
            debug!("Match in progress, leaving presence to the live loop");
            return;
        }
        let payload = format::idle_payload(&snapshot, &self.config, self.session_start);
        self.send(payload).await;
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> &ClientStateHandle {
        &self.state
    }
}

#[async_trait]
impl PresencePush for PresenceUpdater {
    async fn push(&self) {
        self.push_idle().await;
    }
}
