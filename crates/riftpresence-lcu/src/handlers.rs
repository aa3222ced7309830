//! Topic handlers
//!
//! Each subscribed topic owns a disjoint set of `ClientState` fields and
//! merges its payload under the state handle's lock. Missing optional fields
//! keep their prior value; a structurally absent payload (e.g. a lobby
//! delete with no body) is a no-op. Handlers never panic on malformed data.

use crate::rest::QueueLookup;
use riftpresence_core::{
    ClientStateHandle, EventKind, GameflowPhase, LcuEvent, RankedStats,
};
use serde_json::Value;
use tracing::{debug, warn};

/// Sentinel queue id for custom / practice-tool / tutorial lobbies. These
/// are never resolved against the queue-metadata endpoint.
const NO_QUEUE_ID: i64 = -1;

/// The fixed set of subscribed topics. Registered once at startup;
/// immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Summoner,
    ChatStatus,
    GameflowPhase,
    Lobby,
    RankedStats,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::Summoner,
        Topic::ChatStatus,
        Topic::GameflowPhase,
        Topic::Lobby,
        Topic::RankedStats,
    ];

    /// Event uri (doubles as the REST path for base-data gathering).
    pub fn uri(&self) -> &'static str {
        match self {
            Topic::Summoner => "/lol-summoner/v1/current-summoner",
            Topic::ChatStatus => "/lol-chat/v1/me",
            Topic::GameflowPhase => "/lol-gameflow/v1/gameflow-phase",
            Topic::Lobby => "/lol-lobby/v2/lobby",
            Topic::RankedStats => "/lol-ranked/v1/current-ranked-stats",
        }
    }

    /// Look up the handler for an incoming event uri. Events for
    /// unregistered topics are dropped by the caller.
    pub fn for_uri(uri: &str) -> Option<Topic> {
        Topic::ALL.iter().copied().find(|t| t.uri() == uri)
    }

    /// Which event kinds this topic reacts to.
    pub fn accepts(&self, kind: EventKind) -> bool {
        match self {
            // Lobbies are created, mutated, and torn down
            Topic::Lobby => true,
            // Everything else only ever updates in place
            _ => kind == EventKind::Update,
        }
    }

    /// Merge one event into the shared state. Returns `true` when state
    /// changed and a downstream push should be scheduled.
    pub async fn merge(
        &self,
        event: &LcuEvent,
        state: &ClientStateHandle,
        queues: &dyn QueueLookup,
    ) -> bool {
        match self {
            Topic::Summoner => merge_summoner(event, state),
            Topic::ChatStatus => merge_chat(event, state),
            Topic::GameflowPhase => merge_gameflow(event, state),
            Topic::Lobby => merge_lobby(event, state, queues).await,
            Topic::RankedStats => merge_ranked(event, state),
        }
    }
}

fn merge_summoner(event: &LcuEvent, state: &ClientStateHandle) -> bool {
    let Some(data) = event.data.as_ref() else {
        return false;
    };
    state.update(|s| {
        let mut wrote = false;
        if let Some(name) = data.get("displayName").and_then(Value::as_str) {
            s.summoner_name = name.to_string();
            wrote = true;
        }
        if let Some(level) = data.get("summonerLevel").and_then(Value::as_i64) {
            s.summoner_level = level;
            wrote = true;
        }
        if let Some(id) = data.get("summonerId").and_then(Value::as_i64) {
            s.summoner_id = id;
            wrote = true;
        }
        if let Some(icon) = data.get("profileIconId").and_then(Value::as_i64) {
            s.summoner_icon = icon;
            wrote = true;
        }
        wrote
    })
}

fn merge_chat(event: &LcuEvent, state: &ClientStateHandle) -> bool {
    let Some(data) = event.data.as_ref() else {
        return false;
    };
    let mapped = match data.get("availability").and_then(Value::as_str) {
        Some("chat") => "Online",
        Some("away") => "Away",
        // Other states (dnd, mobile, offline) keep the prior value
        _ => return false,
    };
    state.update(|s| s.availability = mapped.to_string());
    true
}

fn merge_gameflow(event: &LcuEvent, state: &ClientStateHandle) -> bool {
    // The phase event body is a bare JSON string
    let Some(phase) = event.data.as_ref().and_then(Value::as_str) else {
        return false;
    };
    let phase = GameflowPhase::parse(phase);
    debug!(%phase, "Gameflow phase updated");
    state.update(|s| s.gameflow_phase = phase);
    true
}

async fn merge_lobby(
    event: &LcuEvent,
    state: &ClientStateHandle,
    queues: &dyn QueueLookup,
) -> bool {
    // Lobby deletes arrive with no body; nothing to merge.
    let Some(data) = event.data.as_ref() else {
        return false;
    };
    let config = data.get("gameConfig");

    let queue_id = state.update(|s| {
        if let Some(id) = data.get("partyId").and_then(Value::as_str) {
            s.lobby_id = id.to_string();
        }
        if let Some(members) = data.get("members").and_then(Value::as_array) {
            s.players = members.len() as u64;
        }
        if let Some(config) = config {
            if let Some(id) = config.get("queueId").and_then(Value::as_i64) {
                s.queue_id = id;
            }
            if let Some(max) = config.get("maxLobbySize").and_then(Value::as_u64) {
                s.max_players = max;
            }
            if let Some(map) = config.get("mapId").and_then(Value::as_i64) {
                s.map_id = map;
            }
            if let Some(mode) = config.get("gameMode").and_then(Value::as_str) {
                s.gamemode = mode.to_string();
            }
            if let Some(custom) = config.get("isCustom").and_then(Value::as_bool) {
                s.is_custom = custom;
            }
            s.is_practice = s.gamemode == "PRACTICETOOL";
            if s.is_practice {
                s.max_players = 1;
            }
        }
        s.queue_id
    });

    if queue_id == NO_QUEUE_ID {
        // Custom game / practice tool / tutorial: no metadata to look up
        state.update(|s| {
            s.queue = if s.is_practice {
                "Practice Tool".to_string()
            } else {
                "Custom Game".to_string()
            };
        });
        return true;
    }

    // Follow-up request outside the lock; the lobby fields above are
    // already merged even if this lookup fails.
    match queues.queue_info(queue_id).await {
        Ok(info) => {
            state.update(|s| {
                s.queue = info.name;
                s.queue_type = info.queue_type;
                s.queue_is_ranked = info.is_ranked;
            });
        }
        Err(e) => {
            warn!(queue_id, error = %e, "Queue metadata lookup failed");
        }
    }
    true
}

fn merge_ranked(event: &LcuEvent, state: &ClientStateHandle) -> bool {
    let Some(data) = event.data.as_ref() else {
        return false;
    };
    let solo = RankedStats::from_queues(data, "RANKED_SOLO_5x5");
    let flex = RankedStats::from_queues(data, "RANKED_FLEX_SR");
    let arena = RankedStats::arena_from_queues(data);
    let tft = RankedStats::from_queues(data, "RANKED_TFT");
    state.update(|s| {
        s.summoner_rank = solo;
        s.summoner_rank_flex = flex;
        s.arena_rank = arena;
        s.tft_rank = tft;
    });
    true
}
