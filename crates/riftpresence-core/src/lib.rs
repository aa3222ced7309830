//! Riftpresence Core
//!
//! Shared types, events, errors, and traits for the riftpresence bridge.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod state;
pub mod traits;

// Re-export commonly used types
pub use config::*;
pub use error::*;
pub use events::*;
pub use state::*;
pub use traits::*;
