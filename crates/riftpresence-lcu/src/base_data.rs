//! Base-data gathering
//!
//! Events only describe changes, so a fresh subscription starts from an
//! empty state. Immediately after subscribing we GET each topic's uri once
//! and feed the responses through the same merge path the websocket uses,
//! which seeds the state with whatever the client already knows.

use crate::handlers::Topic;
use crate::rest::{LcuRestClient, QueueLookup};
use riftpresence_core::{ClientStateHandle, EventKind, LcuError, LcuEvent};
use tracing::{debug, info};

/// GET every topic uri and merge the responses into the state.
///
/// Individual topic failures are tolerated: the lobby endpoint answers 404
/// when no lobby exists, and ranked stats may be empty on a fresh account.
/// Only a wholesale failure (every topic erroring) is reported.
pub async fn gather_base_data(
    rest: &LcuRestClient,
    state: &ClientStateHandle,
    queues: &dyn QueueLookup,
) -> Result<(), LcuError> {
    let mut merged = 0usize;
    let mut last_err = None;

    for topic in Topic::ALL {
        match rest.get(topic.uri()).await {
            Ok(body) => {
                let event = LcuEvent {
                    uri: topic.uri().to_string(),
                    kind: EventKind::Update,
                    data: Some(body),
                };
                if topic.merge(&event, state, queues).await {
                    merged += 1;
                }
            }
            Err(e) => {
                debug!(uri = topic.uri(), error = %e, "Base data unavailable");
                last_err = Some(e);
            }
        }
    }

    if merged == 0 {
        if let Some(e) = last_err {
            return Err(e);
        }
    }
    info!(topics = merged, "Base data gathered");
    Ok(())
}
