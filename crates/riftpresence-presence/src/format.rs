//! Presence payload formatting
//!
//! Pure functions from a state snapshot (plus live-game data when a match is
//! running) to the payload shape the Discord IPC accepts. Everything here is
//! deterministic so the formatting rules can be tested without a link.

use riftpresence_core::{AppConfig, ClientState, GameflowPhase, PresencePayload, RankedStats};
use riftpresence_lcu::LiveGame;

const LEAGUE_LOGO: &str =
    "https://raw.communitydragon.org/latest/plugins/rcp-fe-lol-static-assets/global/default/lol_icon.png";
const TFT_LOGO: &str =
    "https://raw.communitydragon.org/latest/plugins/rcp-fe-lol-static-assets/global/default/tft_icon.png";

const EMOJI_ONLINE: &str = "\u{1f7e2}";
const EMOJI_AWAY: &str = "\u{1f534}";

pub fn profile_icon_url(icon_id: i64) -> String {
    format!("https://cdn.communitydragon.org/latest/profile-icon/{icon_id}")
}

/// Availability display text, optionally prefixed with a status emoji.
pub fn availability_text(state: &ClientState, config: &AppConfig) -> String {
    let availability = if state.availability.is_empty() {
        "Online"
    } else {
        &state.availability
    };
    if config.show_emojis {
        let emoji = if availability == "Away" {
            EMOJI_AWAY
        } else {
            EMOJI_ONLINE
        };
        format!("{emoji} {availability}")
    } else {
        availability.to_string()
    }
}

/// Rank line for the queue the player is currently in, e.g. `Gold II • 40 LP`.
pub fn rank_line(state: &ClientState) -> Option<String> {
    let (rank, unit) = match state.queue_type.as_str() {
        "RANKED_SOLO_5x5" => (&state.summoner_rank, "LP"),
        "RANKED_FLEX_SR" => (&state.summoner_rank_flex, "LP"),
        "CHERRY" => (&state.arena_rank, "RR"),
        "RANKED_TFT" => (&state.tft_rank, "LP"),
        _ => return None,
    };
    if rank.is_unranked() {
        return None;
    }
    Some(format_rank(rank, unit))
}

fn format_rank(rank: &RankedStats, unit: &str) -> String {
    let tier = capitalize(&rank.tier);
    if rank.division.is_empty() {
        format!("{tier} • {} {unit}", rank.league_points)
    } else {
        format!("{tier} {} • {} {unit}", rank.division, rank.league_points)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn lobby_details(state: &ClientState) -> String {
    if state.is_custom || state.is_practice {
        // queue already reads "Custom Game" / "Practice Tool"
        state.queue.clone()
    } else if state.queue.is_empty() {
        "In Lobby".to_string()
    } else {
        format!("In Lobby: {}", state.queue)
    }
}

/// Payload shown while the client is open but no match is running.
pub fn idle_payload(state: &ClientState, config: &AppConfig, start: i64) -> PresencePayload {
    let availability = availability_text(state, config);
    let (details, line) = match &state.gameflow_phase {
        GameflowPhase::Lobby => {
            let party = if state.players > 0 && state.max_players > 1 {
                format!("Party: {} of {}", state.players, state.max_players)
            } else {
                availability.clone()
            };
            (lobby_details(state), party)
        }
        GameflowPhase::Matchmaking | GameflowPhase::ReadyCheck => {
            (format!("In Queue: {}", state.queue), "Searching for a match".to_string())
        }
        GameflowPhase::ChampSelect => {
            (format!("In Champ Select: {}", state.queue), "Picking a champion".to_string())
        }
        GameflowPhase::GameStart | GameflowPhase::InProgress | GameflowPhase::Reconnect => {
            ("In Game".to_string(), availability.clone())
        }
        GameflowPhase::WaitingForStats
        | GameflowPhase::PreEndOfGame
        | GameflowPhase::EndOfGame => ("End of Game".to_string(), availability.clone()),
        _ => ("In Client".to_string(), availability.clone()),
    };

    let mut small_text = if state.summoner_name.is_empty() {
        availability
    } else {
        format!("{} • Lvl {}", state.summoner_name, state.summoner_level)
    };
    if config.show_rank {
        if let Some(rank) = rank_line(state) {
            small_text = format!("{small_text} • {rank}");
        }
    }

    PresencePayload {
        large_image: LEAGUE_LOGO.to_string(),
        large_text: "League of Legends".to_string(),
        details,
        state: line,
        small_image: profile_icon_url(state.summoner_icon),
        small_text,
        start_timestamp: start,
    }
}

/// Payload shown while a match is running. `skin_asset` is the resolved
/// splash url for the locked champion, when there is one.
pub fn ingame_payload(
    state: &ClientState,
    game: &LiveGame,
    skin_asset: Option<&str>,
    config: &AppConfig,
    start: i64,
) -> PresencePayload {
    let (details, line, large_image, large_text) = if game.is_tft() {
        let line = if config.show_stats {
            format!(
                "Lvl {} • {} gold",
                game.stats.level,
                game.stats.gold.round() as i64
            )
        } else {
            availability_text(state, config)
        };
        (
            "Teamfight Tactics".to_string(),
            line,
            TFT_LOGO.to_string(),
            "Teamfight Tactics".to_string(),
        )
    } else {
        let details = if state.queue.is_empty() || state.is_custom || state.is_practice {
            game.display_mode().to_string()
        } else {
            format!("{} ({})", game.display_mode(), state.queue)
        };
        let line = if !config.show_stats {
            availability_text(state, config)
        } else if game.is_arena() {
            format!(
                "{} • {} gold",
                game.stats.kda(),
                game.stats.gold.round() as i64
            )
        } else {
            format!("{} • {} CS", game.stats.kda(), game.stats.creep_score)
        };
        let large_image = skin_asset.unwrap_or(LEAGUE_LOGO).to_string();
        let large_text = game
            .champion
            .clone()
            .unwrap_or_else(|| game.display_mode().to_string());
        (details, line, large_image, large_text)
    };

    let mut small_text = if state.summoner_name.is_empty() {
        availability_text(state, config)
    } else {
        format!("{} • Lvl {}", state.summoner_name, state.summoner_level)
    };
    if config.show_rank {
        if let Some(rank) = rank_line(state) {
            small_text = format!("{small_text} • {rank}");
        }
    }

    PresencePayload {
        large_image,
        large_text,
        details,
        state: line,
        small_image: profile_icon_url(state.summoner_icon),
        small_text,
        start_timestamp: start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use riftpresence_lcu::GameStats;

    fn base_state() -> ClientState {
        let mut state = ClientState::new();
        state.summoner_name = "Faker".into();
        state.summoner_level = 777;
        state.summoner_icon = 29;
        state.availability = "Online".into();
        state
    }

    #[test]
    fn default_phase_shows_in_client() {
        let payload = idle_payload(&base_state(), &AppConfig::default(), 1_700_000_000);
        assert_eq!(payload.details, "In Client");
        assert_eq!(payload.state, "Online");
        assert_eq!(payload.small_text, "Faker • Lvl 777");
        assert_eq!(payload.start_timestamp, 1_700_000_000);
    }

    #[test]
    fn emoji_prefix_is_opt_in() {
        let mut state = base_state();
        state.availability = "Away".into();

        let plain = idle_payload(&state, &AppConfig::default(), 0);
        assert_eq!(plain.state, "Away");

        let config = AppConfig {
            show_emojis: true,
            ..AppConfig::default()
        };
        let emojified = idle_payload(&state, &config, 0);
        assert_eq!(emojified.state, "\u{1f534} Away");
    }

    #[test]
    fn matchmade_lobby_names_the_queue_and_party() {
        let mut state = base_state();
        state.gameflow_phase = GameflowPhase::Lobby;
        state.queue = "Ranked Solo/Duo".into();
        state.players = 2;
        state.max_players = 5;

        let payload = idle_payload(&state, &AppConfig::default(), 0);
        assert_eq!(payload.details, "In Lobby: Ranked Solo/Duo");
        assert_eq!(payload.state, "Party: 2 of 5");
    }

    #[test]
    fn practice_lobby_uses_queue_verbatim() {
        let mut state = base_state();
        state.gameflow_phase = GameflowPhase::Lobby;
        state.queue = "Practice Tool".into();
        state.is_practice = true;
        state.players = 1;
        state.max_players = 1;

        let payload = idle_payload(&state, &AppConfig::default(), 0);
        assert_eq!(payload.details, "Practice Tool");
        assert_eq!(payload.state, "Online");
    }

    #[test]
    fn queue_and_champ_select_phases() {
        let mut state = base_state();
        state.queue = "ARAM".into();

        state.gameflow_phase = GameflowPhase::Matchmaking;
        let payload = idle_payload(&state, &AppConfig::default(), 0);
        assert_eq!(payload.details, "In Queue: ARAM");
        assert_eq!(payload.state, "Searching for a match");

        state.gameflow_phase = GameflowPhase::ChampSelect;
        let payload = idle_payload(&state, &AppConfig::default(), 0);
        assert_eq!(payload.details, "In Champ Select: ARAM");
        assert_eq!(payload.state, "Picking a champion");
    }

    #[test]
    fn rank_line_follows_current_queue() {
        let mut state = base_state();
        state.queue_type = "RANKED_SOLO_5x5".into();
        state.summoner_rank = RankedStats {
            tier: "GOLD".into(),
            division: "II".into(),
            league_points: 40,
        };
        state.arena_rank = RankedStats {
            tier: "ORANGE".into(),
            division: String::new(),
            league_points: 1800,
        };

        assert_eq!(rank_line(&state).as_deref(), Some("Gold II • 40 LP"));

        state.queue_type = "CHERRY".into();
        assert_eq!(rank_line(&state).as_deref(), Some("Orange • 1800 RR"));

        state.queue_type = "RANKED_FLEX_SR".into();
        assert_eq!(rank_line(&state), None);

        state.queue_type = String::new();
        assert_eq!(rank_line(&state), None);
    }

    #[test]
    fn rank_appears_in_small_text_only_when_enabled() {
        let mut state = base_state();
        state.queue_type = "RANKED_SOLO_5x5".into();
        state.summoner_rank = RankedStats {
            tier: "GOLD".into(),
            division: "II".into(),
            league_points: 40,
        };

        let without = idle_payload(&state, &AppConfig::default(), 0);
        assert_eq!(without.small_text, "Faker • Lvl 777");

        let config = AppConfig {
            show_rank: true,
            ..AppConfig::default()
        };
        let with = idle_payload(&state, &config, 0);
        assert_eq!(with.small_text, "Faker • Lvl 777 • Gold II • 40 LP");
    }

    fn live_game(mode: &str) -> LiveGame {
        LiveGame {
            game_mode: mode.to_string(),
            game_time: 600.0,
            champion: Some("Ahri".into()),
            skin_id: 14,
            stats: GameStats {
                level: 11,
                gold: 3250.5,
                kills: 5,
                deaths: 1,
                assists: 7,
                creep_score: 182,
            },
        }
    }

    #[test]
    fn classic_game_shows_kda_and_creep_score() {
        let mut state = base_state();
        state.queue = "Ranked Solo/Duo".into();
        let payload = ingame_payload(
            &state,
            &live_game("CLASSIC"),
            Some("https://example.invalid/splash"),
            &AppConfig::default(),
            100,
        );
        assert_eq!(payload.details, "Summoner's Rift (Ranked Solo/Duo)");
        assert_eq!(payload.state, "5/1/7 • 182 CS");
        assert_eq!(payload.large_image, "https://example.invalid/splash");
        assert_eq!(payload.large_text, "Ahri");
        assert_eq!(payload.start_timestamp, 100);
    }

    #[test]
    fn stats_suppression_falls_back_to_availability() {
        let config = AppConfig {
            show_stats: false,
            ..AppConfig::default()
        };
        let payload = ingame_payload(&base_state(), &live_game("CLASSIC"), None, &config, 0);
        assert_eq!(payload.state, "Online");
    }

    #[test]
    fn tft_game_shows_level_and_gold() {
        let payload = ingame_payload(
            &base_state(),
            &live_game("TFT"),
            None,
            &AppConfig::default(),
            0,
        );
        assert_eq!(payload.details, "Teamfight Tactics");
        assert_eq!(payload.state, "Lvl 11 • 3251 gold");
        assert_eq!(payload.large_image, TFT_LOGO);
    }

    #[test]
    fn arena_game_shows_kda_and_gold() {
        let payload = ingame_payload(
            &base_state(),
            &live_game("CHERRY"),
            None,
            &AppConfig::default(),
            0,
        );
        assert_eq!(payload.details, "Arena");
        assert_eq!(payload.state, "5/1/7 • 3251 gold");
    }
}
