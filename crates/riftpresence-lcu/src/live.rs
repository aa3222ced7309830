//! Live-game data client
//!
//! While a match is running, the game process serves player data on its own
//! loopback endpoint (port 2999), separate from the client API. The session
//! loop polls `allgamedata` every refresh tick and turns it into the in-game
//! presence line.

use crate::poller::{self, wait_until_ready, TimeoutPolicy};
use riftpresence_core::LcuError;
use serde_json::Value;
use tracing::{debug, trace};

pub const LIVE_GAME_URL: &str = "https://127.0.0.1:2999/liveclientdata/allgamedata";

const CDRAGON_BASE: &str = "https://cdn.communitydragon.org/latest/champion";

/// Per-player scoreboard numbers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameStats {
    pub level: i64,
    pub gold: f64,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub creep_score: i64,
}

impl GameStats {
    pub fn kda(&self) -> String {
        format!("{}/{}/{}", self.kills, self.deaths, self.assists)
    }
}

/// One poll of the running game, reduced to what the presence line shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveGame {
    /// Raw mode token (`CLASSIC`, `CHERRY`, `TFT`, ...).
    pub game_mode: String,
    /// Seconds since the match started.
    pub game_time: f64,
    /// Active player's champion, when one is locked in.
    pub champion: Option<String>,
    pub skin_id: i64,
    pub stats: GameStats,
}

impl LiveGame {
    /// Human name for the raw mode token. Unknown tokens pass through.
    pub fn display_mode(&self) -> &str {
        match self.game_mode.as_str() {
            "CLASSIC" => "Summoner's Rift",
            "ARAM" => "Howling Abyss",
            "CHERRY" => "Arena",
            "TFT" => "Teamfight Tactics",
            "PRACTICETOOL" => "Practice Tool",
            "NEXUSBLITZ" => "Nexus Blitz",
            "ULTBOOK" => "Ultimate Spellbook",
            "URF" => "URF",
            "STRAWBERRY" => "Swarm",
            "TUTORIAL" => "Tutorial",
            other => other,
        }
    }

    pub fn is_tft(&self) -> bool {
        self.game_mode == "TFT"
    }

    pub fn is_arena(&self) -> bool {
        self.game_mode == "CHERRY"
    }
}

/// Reduce one `allgamedata` response to a [`LiveGame`].
///
/// Returns `None` when the payload has no game data yet (the endpoint comes
/// up slightly before the match does).
pub fn parse_snapshot(data: &Value) -> Option<LiveGame> {
    let game_data = data.get("gameData")?;
    let game_mode = game_data.get("gameMode")?.as_str()?.to_string();
    let game_time = game_data
        .get("gameTime")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    let active = data.get("activePlayer");
    let mut stats = GameStats::default();
    if let Some(active) = active {
        stats.level = active.get("level").and_then(Value::as_i64).unwrap_or(0);
        stats.gold = active
            .get("currentGold")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
    }

    let mut champion = None;
    let mut skin_id = 0;
    let active_name = active
        .and_then(|a| a.get("riotId").or_else(|| a.get("summonerName")))
        .and_then(Value::as_str);
    if let (Some(name), Some(players)) =
        (active_name, data.get("allPlayers").and_then(Value::as_array))
    {
        if let Some(me) = players.iter().find(|p| {
            p.get("riotId").and_then(Value::as_str) == Some(name)
                || p.get("summonerName").and_then(Value::as_str) == Some(name)
        }) {
            champion = champion_name(me);
            skin_id = me.get("skinID").and_then(Value::as_i64).unwrap_or(0);
            if let Some(scores) = me.get("scores") {
                stats.kills = scores.get("kills").and_then(Value::as_i64).unwrap_or(0);
                stats.deaths = scores.get("deaths").and_then(Value::as_i64).unwrap_or(0);
                stats.assists = scores.get("assists").and_then(Value::as_i64).unwrap_or(0);
                stats.creep_score = scores
                    .get("creepScore")
                    .and_then(Value::as_i64)
                    .unwrap_or(0);
            }
        }
    }

    Some(LiveGame {
        game_mode,
        game_time,
        champion,
        skin_id,
        stats,
    })
}

/// Champion internal name for one player entry.
///
/// `rawChampionName` is the stable identifier
/// (`game_character_displayname_Ahri`); `championName` is localized and only
/// used as a fallback.
fn champion_name(player: &Value) -> Option<String> {
    if let Some(raw) = player.get("rawChampionName").and_then(Value::as_str) {
        if let Some(name) = raw.rsplit('_').next() {
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    player
        .get("championName")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// CDN url for a champion skin splash.
pub fn skin_asset_url(champion: &str, skin_id: i64) -> String {
    format!("{CDRAGON_BASE}/{champion}/splash-art/centered/skin/{skin_id}")
}

/// Seam for "does this asset exist" so the fallback walk is testable
/// without the CDN.
#[async_trait::async_trait]
pub trait AssetProbe: Send + Sync {
    async fn exists(&self, url: &str) -> bool;
}

/// Resolve the splash asset for a champion skin.
///
/// Not every skin has a centered splash on the CDN (chromas in
/// particular); walk the skin id down toward the base skin until one
/// answers, settling for the base-skin url if nothing does.
pub async fn resolve_skin_asset(probe: &dyn AssetProbe, champion: &str, skin_id: i64) -> String {
    let mut id = skin_id.max(0);
    loop {
        let url = skin_asset_url(champion, id);
        if probe.exists(&url).await {
            return url;
        }
        debug!(%url, "No splash at this skin id");
        if id == 0 {
            return url;
        }
        id -= 1;
    }
}

/// HTTP client for the live-game endpoint.
pub struct LiveGameClient {
    http: reqwest::Client,
}

impl LiveGameClient {
    pub fn new() -> Result<Self, LcuError> {
        Ok(Self {
            http: poller::insecure_client()?,
        })
    }

    /// Block until the live endpoint answers, per the given policy.
    pub async fn wait_ready(&self, policy: TimeoutPolicy) -> Result<(), LcuError> {
        wait_until_ready(&self.http, LIVE_GAME_URL, policy).await?;
        Ok(())
    }

    /// One poll of the running game. `None` while the match is still loading.
    pub async fn snapshot(&self) -> Result<Option<LiveGame>, LcuError> {
        let response = self
            .http
            .get(LIVE_GAME_URL)
            .send()
            .await
            .map_err(|e| LcuError::HttpError(e.to_string()))?;
        if !response.status().is_success() {
            return Ok(None);
        }
        let data: Value = response
            .json()
            .await
            .map_err(|e| LcuError::ParseError(e.to_string()))?;
        trace!(game_time = data["gameData"]["gameTime"].as_f64(), "Live data polled");
        Ok(parse_snapshot(&data))
    }

    /// Resolve the splash asset for a champion skin via the CDN.
    pub async fn resolve_skin_asset(&self, champion: &str, skin_id: i64) -> String {
        resolve_skin_asset(self, champion, skin_id).await
    }
}

#[async_trait::async_trait]
impl AssetProbe for LiveGameClient {
    async fn exists(&self, url: &str) -> bool {
        matches!(self.http.head(url).send().await, Ok(response) if response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixture() -> Value {
        json!({
            "activePlayer": {
                "riotId": "Faker#KR1",
                "level": 11,
                "currentGold": 3250.5
            },
            "allPlayers": [
                {
                    "riotId": "Faker#KR1",
                    "championName": "Ahri",
                    "rawChampionName": "game_character_displayname_Ahri",
                    "skinID": 14,
                    "scores": {"kills": 5, "deaths": 1, "assists": 7, "creepScore": 182}
                },
                {
                    "riotId": "Someone#EUW",
                    "championName": "Garen",
                    "rawChampionName": "game_character_displayname_Garen",
                    "skinID": 0,
                    "scores": {"kills": 0, "deaths": 5, "assists": 1, "creepScore": 90}
                }
            ],
            "gameData": {
                "gameMode": "CLASSIC",
                "gameTime": 1184.2
            }
        })
    }

    #[test]
    fn snapshot_extracts_active_player_scoreboard() {
        let game = parse_snapshot(&fixture()).expect("game");
        assert_eq!(game.game_mode, "CLASSIC");
        assert_eq!(game.display_mode(), "Summoner's Rift");
        assert_eq!(game.champion.as_deref(), Some("Ahri"));
        assert_eq!(game.skin_id, 14);
        assert_eq!(game.stats.level, 11);
        assert_eq!(game.stats.kda(), "5/1/7");
        assert_eq!(game.stats.creep_score, 182);
    }

    #[test]
    fn snapshot_without_game_data_is_none() {
        assert!(parse_snapshot(&json!({})).is_none());
        assert!(parse_snapshot(&json!({"activePlayer": {}})).is_none());
    }

    #[test]
    fn snapshot_tolerates_missing_player_list() {
        let game = parse_snapshot(&json!({
            "activePlayer": {"riotId": "A#1", "level": 3, "currentGold": 500.0},
            "gameData": {"gameMode": "TFT", "gameTime": 60.0}
        }))
        .expect("game");
        assert!(game.is_tft());
        assert!(game.champion.is_none());
        assert_eq!(game.stats.level, 3);
    }

    #[test]
    fn champion_comes_from_raw_name() {
        let player = json!({
            "rawChampionName": "game_character_displayname_KaiSa",
            "championName": "Kai'Sa localized"
        });
        assert_eq!(champion_name(&player).as_deref(), Some("KaiSa"));
        // Fallback when the raw name is absent
        let player = json!({"championName": "Garen"});
        assert_eq!(champion_name(&player).as_deref(), Some("Garen"));
    }

    #[test]
    fn mode_display_names() {
        for (raw, display) in [
            ("CHERRY", "Arena"),
            ("ARAM", "Howling Abyss"),
            ("TFT", "Teamfight Tactics"),
            ("SOMETHING_NEW", "SOMETHING_NEW"),
        ] {
            let game = LiveGame {
                game_mode: raw.to_string(),
                ..Default::default()
            };
            assert_eq!(game.display_mode(), display);
        }
    }

    #[test]
    fn skin_asset_url_shape() {
        assert_eq!(
            skin_asset_url("Ahri", 14),
            "https://cdn.communitydragon.org/latest/champion/Ahri/splash-art/centered/skin/14"
        );
    }

    /// Probe that only answers for a fixed set of skin ids, recording every
    /// url it was asked about.
    struct FixedSkins {
        available: Vec<i64>,
        asked: std::sync::Mutex<Vec<String>>,
    }

    impl FixedSkins {
        fn new(available: &[i64]) -> Self {
            Self {
                available: available.to_vec(),
                asked: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl AssetProbe for FixedSkins {
        async fn exists(&self, url: &str) -> bool {
            self.asked.lock().unwrap().push(url.to_string());
            self.available
                .iter()
                .any(|id| url == skin_asset_url("Ahri", *id))
        }
    }

    #[tokio::test]
    async fn chroma_walks_down_to_the_nearest_splash() {
        let probe = FixedSkins::new(&[0, 3]);
        let url = resolve_skin_asset(&probe, "Ahri", 5).await;
        assert_eq!(url, skin_asset_url("Ahri", 3));
        // 5 and 4 were tried and rejected before 3 answered
        assert_eq!(probe.asked.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn walk_stops_at_the_base_skin() {
        let probe = FixedSkins::new(&[]);
        let url = resolve_skin_asset(&probe, "Ahri", 2).await;
        assert_eq!(url, skin_asset_url("Ahri", 0));
        assert_eq!(probe.asked.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn existing_skin_needs_no_walk() {
        let probe = FixedSkins::new(&[14]);
        let url = resolve_skin_asset(&probe, "Ahri", 14).await;
        assert_eq!(url, skin_asset_url("Ahri", 14));
        assert_eq!(probe.asked.lock().unwrap().len(), 1);
    }
}
