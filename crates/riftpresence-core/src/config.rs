//! Runtime configuration assembled from the CLI.

use std::time::Duration;

/// Default Discord application id ("League of Legends" branding).
pub const DEFAULT_CLIENT_ID: &str = "1194034071588851783";

/// Quiescence window before a burst of merges is pushed downstream.
pub const COALESCE_WINDOW: Duration = Duration::from_secs(1);

/// How often the session loop re-evaluates the player state.
pub const SESSION_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// How often in-game stats are re-read and re-pushed.
pub const INGAME_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Delay between attempts when polling a local endpoint for readiness.
pub const ENDPOINT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Presence reconnect budget when the link drops.
pub const RECONNECT_MAX_TRIES: u32 = 12;
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// How long to wait for a dependency process to appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Check once; fail immediately if absent.
    NoWait,
    /// Keep checking for up to this long.
    Bounded(Duration),
    /// Keep checking until it appears.
    Infinite,
}

impl WaitPolicy {
    /// CLI convention: 0 = no wait, -1 = infinite, n > 0 = n seconds.
    pub fn from_seconds(secs: i64) -> Self {
        match secs {
            0 => WaitPolicy::NoWait,
            n if n < 0 => WaitPolicy::Infinite,
            n => WaitPolicy::Bounded(Duration::from_secs(n as u64)),
        }
    }
}

/// Application configuration, one instance per run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Discord application id used for the presence handshake.
    pub client_id: String,
    /// Show in-game stats (KDA, creep score, gold) in the presence line.
    pub show_stats: bool,
    /// Show the ranked tier/division/LP line.
    pub show_rank: bool,
    /// Prefix the availability with a status emoji.
    pub show_emojis: bool,
    /// Extra process names to accept as the presence host.
    pub extra_process_names: Vec<String>,
    pub wait_for_league: WaitPolicy,
    pub wait_for_discord: WaitPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            show_stats: true,
            show_rank: false,
            show_emojis: false,
            extra_process_names: Vec::new(),
            wait_for_league: WaitPolicy::NoWait,
            wait_for_discord: WaitPolicy::NoWait,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_policy_from_cli_seconds() {
        assert_eq!(WaitPolicy::from_seconds(0), WaitPolicy::NoWait);
        assert_eq!(WaitPolicy::from_seconds(-1), WaitPolicy::Infinite);
        assert_eq!(
            WaitPolicy::from_seconds(30),
            WaitPolicy::Bounded(Duration::from_secs(30))
        );
    }
}
