//! Log output setup

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Transport crates whose debug output drowns ours at loopback polling
/// frequency.
const QUIET_TARGETS: &[&str] = &["hyper", "reqwest", "tungstenite", "tokio_tungstenite"];

/// Log output format, selected with `--log-format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, with targets
    Pretty,
    /// JSON lines
    Json,
    /// Single-line, no targets; the default for interactive use
    Compact,
}

/// Install the global subscriber. `RUST_LOG` overrides the default level.
pub fn init_logging(format: LogFormat, default_level: Level) {
    let mut filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    for target in QUIET_TARGETS {
        if let Ok(directive) = format!("{target}=warn").parse() {
            filter = filter.add_directive(directive);
        }
    }

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(false))
            .init(),
    }
}
