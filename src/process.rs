//! Host process detection
//!
//! The bridge keys its lifecycle off which League processes exist: the game
//! executable means a match is running, the client UX alone means lobby
//! duty, and neither means the player is done and we should exit. Discord
//! has to be up before the IPC handshake can work.

use riftpresence_core::WaitPolicy;
use std::time::{Duration, Instant};
use sysinfo::System;
use tracing::{debug, info};

/// Client UX processes (lobby, champ select).
const CLIENT_PROCESSES: &[&str] = &["LeagueClientUx", "LeagueClient"];

/// The game executable itself.
const GAME_PROCESSES: &[&str] = &["League of Legends"];

/// Known Discord flavors.
const DISCORD_PROCESSES: &[&str] = &["Discord", "DiscordPTB", "DiscordCanary", "discord"];

const PROCESS_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// What the player is doing, according to the process table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// The game executable is running.
    InGame,
    /// Only the client is running.
    InLobby,
    /// Neither process exists; the player closed the game.
    Gone,
}

fn matches_any(process_name: &str, candidates: &[&str]) -> bool {
    candidates.iter().any(|c| process_name.contains(c))
}

pub struct ProcessWatcher {
    sys: System,
    discord_names: Vec<String>,
}

impl ProcessWatcher {
    pub fn new(extra_discord_names: &[String]) -> Self {
        let mut discord_names: Vec<String> =
            DISCORD_PROCESSES.iter().map(|s| s.to_string()).collect();
        discord_names.extend(extra_discord_names.iter().cloned());
        Self {
            sys: System::new(),
            discord_names,
        }
    }

    fn running(&mut self, candidates: &[&str]) -> bool {
        self.sys.refresh_processes();
        self.sys
            .processes()
            .values()
            .any(|p| matches_any(p.name(), candidates))
    }

    /// Classify the player's state from the process table.
    pub fn player_state(&mut self) -> PlayerState {
        if self.running(GAME_PROCESSES) {
            PlayerState::InGame
        } else if self.running(CLIENT_PROCESSES) {
            PlayerState::InLobby
        } else {
            PlayerState::Gone
        }
    }

    pub fn league_running(&mut self) -> bool {
        self.player_state() != PlayerState::Gone
    }

    pub fn discord_running(&mut self) -> bool {
        let names = self.discord_names.clone();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        self.running(&names)
    }

    /// Wait for a dependency process per the given policy. Returns whether
    /// it showed up.
    pub async fn wait_for(
        &mut self,
        what: &str,
        policy: WaitPolicy,
        mut present: impl FnMut(&mut Self) -> bool,
    ) -> bool {
        if present(self) {
            return true;
        }
        let deadline = match policy {
            WaitPolicy::NoWait => return false,
            WaitPolicy::Bounded(limit) => Some(Instant::now() + limit),
            WaitPolicy::Infinite => None,
        };
        info!(process = what, "Waiting for process to start");
        loop {
            tokio::time::sleep(PROCESS_POLL_INTERVAL).await;
            if present(self) {
                debug!(process = what, "Process appeared");
                return true;
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_matching_is_substring_based() {
        assert!(matches_any("LeagueClientUx.exe", CLIENT_PROCESSES));
        assert!(matches_any("League of Legends.exe", GAME_PROCESSES));
        assert!(matches_any("DiscordCanary", DISCORD_PROCESSES));
        assert!(!matches_any("firefox", CLIENT_PROCESSES));
    }

    #[test]
    fn game_executable_is_not_a_client_process() {
        // "League of Legends" must not be mistaken for the client UX
        assert!(!matches_any("League of Legends.exe", CLIENT_PROCESSES));
    }
}
