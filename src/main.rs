//! Riftpresence - League of Legends Discord Rich Presence bridge
//!
//! Mirrors what the local League client is doing (lobby, queue, champ
//! select, live match) onto Discord Rich Presence, over the client's event
//! websocket and the live-game data endpoint.

mod process;
mod session;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use process::ProcessWatcher;
use riftpresence_core::logging::{init_logging, LogFormat};
use riftpresence_core::{AppConfig, ClientStateHandle, MergeNotifier, WaitPolicy, DEFAULT_CLIENT_ID};
use riftpresence_lcu::LcuConnector;
use riftpresence_presence::{DiscordLink, PresenceUpdater, UpdateCoalescer};
use session::SessionLoop;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug)]
#[command(name = "riftpresence", version, about = "Discord Rich Presence for League of Legends")]
struct Cli {
    /// Discord application id used for the presence handshake
    #[arg(long, default_value = DEFAULT_CLIENT_ID)]
    client_id: String,

    /// Hide in-game stats (KDA, creep score, gold)
    #[arg(long)]
    no_stats: bool,

    /// Show the ranked tier of the current queue
    #[arg(long)]
    show_rank: bool,

    /// Prefix the availability with a status emoji
    #[arg(long)]
    show_emojis: bool,

    /// Extra process name to accept as a running Discord (repeatable)
    #[arg(long = "add-process", value_name = "NAME")]
    add_process: Vec<String>,

    /// Seconds to wait for the game client (0 = don't wait, -1 = forever)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    wait_for_league: i64,

    /// Seconds to wait for Discord (0 = don't wait, -1 = forever)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    wait_for_discord: i64,

    /// League install directory, for lockfile-based credential discovery
    #[arg(long, value_name = "DIR")]
    league_path: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormatArg::Compact)]
    log_format: LogFormatArg,

    /// Verbose logging (same as RUST_LOG=debug)
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn app_config(&self) -> AppConfig {
        AppConfig {
            client_id: self.client_id.clone(),
            show_stats: !self.no_stats,
            show_rank: self.show_rank,
            show_emojis: self.show_emojis,
            extra_process_names: self.add_process.clone(),
            wait_for_league: WaitPolicy::from_seconds(self.wait_for_league),
            wait_for_discord: WaitPolicy::from_seconds(self.wait_for_discord),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Json => LogFormat::Json,
        LogFormatArg::Compact => LogFormat::Compact,
    };
    init_logging(format, level);

    let config = cli.app_config();
    info!(client_id = %config.client_id, "Starting riftpresence");

    let mut watcher = ProcessWatcher::new(&config.extra_process_names);
    if !watcher
        .wait_for("League client", config.wait_for_league, |w| {
            w.league_running()
        })
        .await
    {
        bail!("the League client is not running (try --wait-for-league)");
    }
    if !watcher
        .wait_for("Discord", config.wait_for_discord, |w| w.discord_running())
        .await
    {
        bail!("Discord is not running (try --wait-for-discord)");
    }

    let link = DiscordLink::new(&config.client_id).context("building Discord IPC client")?;
    let state = ClientStateHandle::new();
    let updater = Arc::new(PresenceUpdater::new(
        Box::new(link),
        state.clone(),
        config.clone(),
    ));
    updater
        .connect_with_retry()
        .await
        .context("connecting to Discord")?;

    let coalescer: Arc<dyn MergeNotifier> = Arc::new(UpdateCoalescer::new(updater.clone()));
    let connector = LcuConnector::new(state, coalescer, cli.league_path.clone());
    let connector_task = tokio::spawn(connector.run());

    // Show something immediately; the connector refines it once base data
    // lands
    updater.push_idle().await;

    let session = SessionLoop::new(updater.clone(), watcher);
    let result = tokio::select! {
        result = session.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            updater.close().await;
            Ok(())
        }
    };

    connector_task.abort();
    result
}
