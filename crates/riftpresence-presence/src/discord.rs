//! Discord IPC link
//!
//! Thin adapter over the Discord rich-presence socket. The crate underneath
//! reports everything as a boxed error; `classify` maps the io shapes that
//! mean "Discord went away" onto [`PresenceError::LinkClosed`] so the
//! updater can run its reconnect policy.

use discord_rich_presence::activity::{Activity, Assets, Timestamps};
use discord_rich_presence::{DiscordIpc, DiscordIpcClient};
use riftpresence_core::{PresenceError, PresenceLink, PresencePayload};
use std::error::Error;
use std::io;
use tracing::debug;

pub struct DiscordLink {
    client: DiscordIpcClient,
    connected: bool,
}

impl DiscordLink {
    pub fn new(client_id: &str) -> Result<Self, PresenceError> {
        let client = DiscordIpcClient::new(client_id)
            .map_err(|e| PresenceError::Handshake(e.to_string()))?;
        Ok(Self {
            client,
            connected: false,
        })
    }
}

/// Map a boxed transport error onto our error type.
fn classify(err: Box<dyn Error>) -> PresenceError {
    if let Some(io_err) = err.downcast_ref::<io::Error>() {
        return classify_io(io_err);
    }
    PresenceError::Transport(err.to_string())
}

fn classify_io(err: &io::Error) -> PresenceError {
    use io::ErrorKind::*;
    match err.kind() {
        BrokenPipe | ConnectionReset | ConnectionAborted | UnexpectedEof | WriteZero => {
            PresenceError::LinkClosed
        }
        // The socket file vanishes when Discord is not running
        NotFound | ConnectionRefused => PresenceError::LinkClosed,
        _ => PresenceError::Transport(err.to_string()),
    }
}

fn build_activity(payload: &PresencePayload) -> Activity<'_> {
    let mut activity = Activity::new();
    if !payload.details.is_empty() {
        activity = activity.details(&payload.details);
    }
    if !payload.state.is_empty() {
        activity = activity.state(&payload.state);
    }
    let mut assets = Assets::new();
    if !payload.large_image.is_empty() {
        assets = assets.large_image(&payload.large_image);
    }
    if !payload.large_text.is_empty() {
        assets = assets.large_text(&payload.large_text);
    }
    if !payload.small_image.is_empty() {
        assets = assets.small_image(&payload.small_image);
    }
    if !payload.small_text.is_empty() {
        assets = assets.small_text(&payload.small_text);
    }
    activity = activity.assets(assets);
    if payload.start_timestamp > 0 {
        activity = activity.timestamps(Timestamps::new().start(payload.start_timestamp));
    }
    activity
}

impl PresenceLink for DiscordLink {
    fn name(&self) -> &'static str {
        "discord-ipc"
    }

    fn connect(&mut self) -> Result<(), PresenceError> {
        self.client.connect().map_err(|e| {
            // A failed handshake on a fresh socket still means "unreachable"
            match classify(e) {
                PresenceError::Transport(msg) => PresenceError::Handshake(msg),
                other => other,
            }
        })?;
        self.connected = true;
        debug!("Discord IPC handshake complete");
        Ok(())
    }

    fn update(&mut self, payload: &PresencePayload) -> Result<(), PresenceError> {
        if !self.connected {
            return Err(PresenceError::LinkClosed);
        }
        self.client
            .set_activity(build_activity(payload))
            .map_err(|e| {
                let classified = classify(e);
                if classified.is_link_closed() {
                    self.connected = false;
                }
                classified
            })
    }

    fn close(&mut self) -> Result<(), PresenceError> {
        self.connected = false;
        self.client.close().map_err(classify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_disconnect_kinds_mean_link_closed() {
        for kind in [
            io::ErrorKind::BrokenPipe,
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::ConnectionAborted,
            io::ErrorKind::UnexpectedEof,
            io::ErrorKind::WriteZero,
            io::ErrorKind::NotFound,
            io::ErrorKind::ConnectionRefused,
        ] {
            let err = classify_io(&io::Error::new(kind, "gone"));
            assert!(err.is_link_closed(), "{kind:?} should be LinkClosed");
        }
    }

    #[test]
    fn other_io_errors_are_transport() {
        let err = classify_io(&io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(!err.is_link_closed());
        assert!(matches!(err, PresenceError::Transport(_)));
    }

    #[test]
    fn non_io_errors_keep_their_message() {
        let boxed: Box<dyn Error> = "handshake rejected".into();
        match classify(boxed) {
            PresenceError::Transport(msg) => assert!(msg.contains("handshake rejected")),
            other => panic!("unexpected: {other}"),
        }
    }
}
