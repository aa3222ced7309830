//! Shared client state record
//!
//! One `ClientState` exists per process lifetime. Topic handlers merge their
//! fields into it under the handle's lock; the presence updater reads whole
//! snapshots through the same lock, so a push never observes a half-written
//! record. Every field starts at an explicit "unknown" sentinel and is only
//! ever written by the topic that owns it.

use parking_lot::Mutex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Coarse League client session phase, as reported by
/// `/lol-gameflow/v1/gameflow-phase`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GameflowPhase {
    #[default]
    None,
    Lobby,
    Matchmaking,
    CheckedIntoTournament,
    ReadyCheck,
    ChampSelect,
    GameStart,
    InProgress,
    Reconnect,
    WaitingForStats,
    PreEndOfGame,
    EndOfGame,
    TerminatedInError,
    /// Phases this build does not know about yet; kept verbatim.
    Unknown(String),
}

impl GameflowPhase {
    pub fn parse(s: &str) -> Self {
        match s {
            "None" => GameflowPhase::None,
            "Lobby" => GameflowPhase::Lobby,
            "Matchmaking" => GameflowPhase::Matchmaking,
            "CheckedIntoTournament" => GameflowPhase::CheckedIntoTournament,
            "ReadyCheck" => GameflowPhase::ReadyCheck,
            "ChampSelect" => GameflowPhase::ChampSelect,
            "GameStart" => GameflowPhase::GameStart,
            "InProgress" => GameflowPhase::InProgress,
            "Reconnect" => GameflowPhase::Reconnect,
            "WaitingForStats" => GameflowPhase::WaitingForStats,
            "PreEndOfGame" => GameflowPhase::PreEndOfGame,
            "EndOfGame" => GameflowPhase::EndOfGame,
            "TerminatedInError" => GameflowPhase::TerminatedInError,
            other => GameflowPhase::Unknown(other.to_string()),
        }
    }

    /// Whether a match is currently being played (or rejoined).
    pub fn is_in_game(&self) -> bool {
        matches!(self, GameflowPhase::InProgress | GameflowPhase::Reconnect)
    }
}

impl fmt::Display for GameflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameflowPhase::None => "None",
            GameflowPhase::Lobby => "Lobby",
            GameflowPhase::Matchmaking => "Matchmaking",
            GameflowPhase::CheckedIntoTournament => "CheckedIntoTournament",
            GameflowPhase::ReadyCheck => "ReadyCheck",
            GameflowPhase::ChampSelect => "ChampSelect",
            GameflowPhase::GameStart => "GameStart",
            GameflowPhase::InProgress => "InProgress",
            GameflowPhase::Reconnect => "Reconnect",
            GameflowPhase::WaitingForStats => "WaitingForStats",
            GameflowPhase::PreEndOfGame => "PreEndOfGame",
            GameflowPhase::EndOfGame => "EndOfGame",
            GameflowPhase::TerminatedInError => "TerminatedInError",
            GameflowPhase::Unknown(s) => s,
        };
        f.write_str(s)
    }
}

/// Rank record for one ranked queue.
///
/// Empty tier means "never reported". Arena uses rated tier/rating instead
/// of tier/division/LP; both shapes map onto this record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedStats {
    pub tier: String,
    pub division: String,
    pub league_points: i64,
}

impl RankedStats {
    pub fn is_unranked(&self) -> bool {
        self.tier.is_empty() || self.tier == "NONE"
    }

    /// Extract the entry for `queue_type` from a ranked-stats payload
    /// (`queues: [{queueType, tier, division, leaguePoints}, ...]`).
    /// Missing queue or missing fields leave the corresponding sentinel.
    pub fn from_queues(payload: &Value, queue_type: &str) -> Self {
        let Some(entry) = find_queue(payload, queue_type) else {
            return Self::default();
        };
        Self {
            tier: str_field(entry, "tier"),
            division: str_field(entry, "division"),
            league_points: entry
                .get("leaguePoints")
                .and_then(Value::as_i64)
                .unwrap_or(0),
        }
    }

    /// Arena (CHERRY) reports `ratedTier`/`ratedRating` and has no divisions.
    pub fn arena_from_queues(payload: &Value) -> Self {
        let Some(entry) = find_queue(payload, "CHERRY") else {
            return Self::default();
        };
        Self {
            tier: str_field(entry, "ratedTier"),
            division: String::new(),
            league_points: entry
                .get("ratedRating")
                .and_then(Value::as_i64)
                .unwrap_or(0),
        }
    }
}

fn find_queue<'a>(payload: &'a Value, queue_type: &str) -> Option<&'a Value> {
    payload
        .get("queues")?
        .as_array()?
        .iter()
        .find(|q| q.get("queueType").and_then(Value::as_str) == Some(queue_type))
}

fn str_field(entry: &Value, key: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// The single merged view of what the player is currently doing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    // Identity (owned by the summoner and chat topics)
    pub summoner_name: String,
    pub summoner_id: i64,
    pub summoner_level: i64,
    pub summoner_icon: i64,
    pub availability: String,

    // Session (owned by the gameflow and lobby topics)
    pub gameflow_phase: GameflowPhase,
    pub lobby_id: String,
    pub queue_id: i64,
    pub queue: String,
    pub queue_type: String,
    pub queue_is_ranked: bool,
    pub is_custom: bool,
    pub is_practice: bool,
    pub players: u64,
    pub max_players: u64,
    pub map_id: i64,
    pub gamemode: String,

    // Ranked (owned by the ranked-stats topic)
    pub summoner_rank: RankedStats,
    pub summoner_rank_flex: RankedStats,
    pub arena_rank: RankedStats,
    pub tft_rank: RankedStats,
}

impl ClientState {
    pub fn new() -> Self {
        Self {
            // -1 is the client's own "no queue" sentinel
            queue_id: -1,
            ..Default::default()
        }
    }
}

/// Shared handle to the client state.
///
/// The lock is held only for the duration of one merge or one snapshot read,
/// never across a network call.
#[derive(Clone, Default)]
pub struct ClientStateHandle {
    inner: Arc<Mutex<ClientState>>,
}

impl ClientStateHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ClientState::new())),
        }
    }

    /// Apply one merge under the exclusive lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut ClientState) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Read a fully-formed copy for delivery.
    pub fn snapshot(&self) -> ClientState {
        self.inner.lock().clone()
    }
}
