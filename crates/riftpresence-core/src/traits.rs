//! Seams between the pipeline stages.

use crate::error::PresenceError;

/// One full presence update, as accepted by the downstream display API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresencePayload {
    pub large_image: String,
    pub large_text: String,
    pub details: String,
    pub state: String,
    pub small_image: String,
    pub small_text: String,
    /// Unix seconds when the displayed activity started; 0 means "not shown".
    pub start_timestamp: i64,
}

/// Transport to the presence display (Discord IPC in production).
///
/// Implementations report an unreachable peer as
/// [`PresenceError::LinkClosed`]; the retry policy lives with the caller.
pub trait PresenceLink: Send {
    /// Name of this link, for logging.
    fn name(&self) -> &'static str;

    /// (Re-)establish the connection and perform the handshake.
    fn connect(&mut self) -> Result<(), PresenceError>;

    /// Push one full presence update.
    fn update(&mut self, payload: &PresencePayload) -> Result<(), PresenceError>;

    /// Close the link. Errors on close are ignored by callers.
    fn close(&mut self) -> Result<(), PresenceError>;
}

/// Receiver for "the shared state changed" notifications.
///
/// Topic handlers call this after a successful merge; the presence side
/// implements it with the debounced update scheduler. Must not block.
pub trait MergeNotifier: Send + Sync {
    fn notify(&self);
}
