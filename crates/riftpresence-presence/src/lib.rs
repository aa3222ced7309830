//! Riftpresence presence delivery
//!
//! Turns merged client state into Discord Rich Presence updates: payload
//! formatting, debounced delivery, and link supervision with a bounded
//! reconnect budget.

pub mod coalescer;
pub mod discord;
pub mod format;
pub mod reconnect;
pub mod updater;

pub use coalescer::UpdateCoalescer;
pub use discord::DiscordLink;
pub use reconnect::attempt_reconnect;
pub use updater::{PresencePush, PresenceUpdater};
