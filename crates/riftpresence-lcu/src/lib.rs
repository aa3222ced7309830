//! Riftpresence LCU
//!
//! Everything that talks to the League client: credential discovery,
//! readiness polling, the websocket event subscription with its topic
//! handlers, REST follow-ups, and the in-game live-data client.

pub mod base_data;
pub mod connector;
pub mod handlers;
pub mod live;
pub mod lockfile;
pub mod poller;
pub mod rest;
pub mod subscription;

pub use connector::LcuConnector;
pub use handlers::Topic;
pub use live::{AssetProbe, GameStats, LiveGame, LiveGameClient};
pub use lockfile::LcuCredentials;
pub use poller::{wait_until_ready, TimeoutPolicy};
pub use rest::{LcuRestClient, QueueInfo, QueueLookup};
pub use subscription::EventSubscription;
