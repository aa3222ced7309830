//! Session loop
//!
//! The outermost lifecycle: every poll tick, classify the player state from
//! the process table and act on it. A running match hands control to the
//! live refresh loop; a missing game client ends the process. This loop is
//! the only place that decides to exit.

use crate::process::{PlayerState, ProcessWatcher};
use riftpresence_core::{INGAME_REFRESH_INTERVAL, SESSION_POLL_INTERVAL};
use riftpresence_lcu::{LiveGameClient, TimeoutPolicy};
use riftpresence_presence::{format, PresenceUpdater};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long the live endpoint gets to come up once the game process exists.
const LIVE_READY_TIMEOUT: Duration = Duration::from_secs(30);

pub struct SessionLoop {
    updater: Arc<PresenceUpdater>,
    watcher: ProcessWatcher,
}

impl SessionLoop {
    pub fn new(updater: Arc<PresenceUpdater>, watcher: ProcessWatcher) -> Self {
        Self { updater, watcher }
    }

    /// Run until the game client goes away.
    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            match self.watcher.player_state() {
                PlayerState::InGame => {
                    info!("Match detected, switching to live presence");
                    self.run_match().await;
                }
                PlayerState::InLobby => {
                    tokio::time::sleep(SESSION_POLL_INTERVAL).await;
                }
                PlayerState::Gone => {
                    info!("Game client closed, shutting down");
                    self.updater.close().await;
                    return Ok(());
                }
            }
        }
    }

    /// Push live-game presence every refresh tick until the match ends.
    async fn run_match(&mut self) {
        let live = match LiveGameClient::new() {
            Ok(live) => live,
            Err(e) => {
                warn!(error = %e, "Could not build live-game client");
                tokio::time::sleep(SESSION_POLL_INTERVAL).await;
                return;
            }
        };
        if let Err(e) = live
            .wait_ready(TimeoutPolicy::Bounded(LIVE_READY_TIMEOUT))
            .await
        {
            // Spectator clients and loading screens sometimes never serve
            // live data; fall back to the lobby view
            warn!(error = %e, "Live-game endpoint never became ready");
            return;
        }

        // Splash lookup is one extra request per champion, cached across ticks
        let mut cached_asset: Option<(String, i64, String)> = None;

        while self.watcher.player_state() == PlayerState::InGame {
            match live.snapshot().await {
                Ok(Some(game)) => {
                    let skin_asset = match &game.champion {
                        Some(champion) => {
                            let stale = !matches!(
                                &cached_asset,
                                Some((c, id, _)) if c == champion && *id == game.skin_id
                            );
                            if stale {
                                let url = live.resolve_skin_asset(champion, game.skin_id).await;
                                cached_asset = Some((champion.clone(), game.skin_id, url));
                            }
                            cached_asset.as_ref().map(|(_, _, url)| url.clone())
                        }
                        None => None,
                    };

                    let start = chrono::Utc::now().timestamp() - game.game_time as i64;
                    let snapshot = self.updater.state().snapshot();
                    let payload = format::ingame_payload(
                        &snapshot,
                        &game,
                        skin_asset.as_deref(),
                        self.updater.config(),
                        start,
                    );
                    self.updater.send(payload).await;
                }
                Ok(None) => debug!("Live data not populated yet"),
                Err(e) => {
                    debug!(error = %e, "Live data poll failed");
                }
            }
            tokio::time::sleep(INGAME_REFRESH_INTERVAL).await;
        }
        info!("Match ended, returning to session polling");
    }
}
