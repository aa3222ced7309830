use thiserror::Error;

/// League client (LCU) connection and data errors
#[derive(Error, Debug)]
pub enum LcuError {
    #[error("Connection failed: {0}")]
    ConnectionError(String),

    #[error("WebSocket error: {0}")]
    WebSocketError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Client lockfile not found")]
    LockfileNotFound,

    #[error("Disconnected")]
    Disconnected,
}

/// Presence link errors
#[derive(Error, Debug)]
pub enum PresenceError {
    #[error("Handshake failed: {0}")]
    Handshake(String),

    #[error("Presence link closed by peer")]
    LinkClosed,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Reconnect exhausted after {attempts} attempts")]
    RetryExhausted { attempts: u32 },
}

impl PresenceError {
    /// Whether this failure means the downstream client is unreachable
    /// and a reconnect cycle should be attempted.
    pub fn is_link_closed(&self) -> bool {
        matches!(self, PresenceError::LinkClosed)
    }
}
