//! Websocket event subscription
//!
//! The client's websocket speaks a WAMP-flavored protocol. After the TLS
//! handshake (self-signed certificate, basic auth) we send one subscribe
//! frame per topic and then dispatch pushed events to the topic handlers
//! until the socket closes.

use crate::handlers::Topic;
use crate::rest::QueueLookup;
use futures::{SinkExt, StreamExt};
use riftpresence_core::{ClientStateHandle, LcuError, LcuEvent, MergeNotifier};
use std::sync::Arc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async_tls_with_config, Connector};
use tracing::{debug, info, trace};

use crate::lockfile::LcuCredentials;

/// WAMP subscribe opcode.
const SUBSCRIBE_OPCODE: u64 = 5;

/// Build the subscribe frame for one event uri.
///
/// The client derives the event name from the uri by swapping `/` for `_`,
/// e.g. `/lol-chat/v1/me` becomes `OnJsonApiEvent_lol-chat_v1_me`.
fn subscribe_message(uri: &str) -> Message {
    let event = format!("OnJsonApiEvent{}", uri.replace('/', "_"));
    Message::Text(format!("[{SUBSCRIBE_OPCODE},\"{event}\"]"))
}

/// Connection lifecycle, for logging and supervision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Idle,
    Handshaking,
    Active,
    Closed,
}

/// Live event subscription against one client instance.
///
/// A subscription is single-use: `run` consumes the connection attempt and
/// returns when the socket closes. The connector owns the retry loop.
pub struct EventSubscription {
    creds: LcuCredentials,
    state: ClientStateHandle,
    queues: Arc<dyn QueueLookup>,
    notifier: Arc<dyn MergeNotifier>,
}

impl EventSubscription {
    pub fn new(
        creds: LcuCredentials,
        state: ClientStateHandle,
        queues: Arc<dyn QueueLookup>,
        notifier: Arc<dyn MergeNotifier>,
    ) -> Self {
        Self {
            creds,
            state,
            queues,
            notifier,
        }
    }

    /// Connect, subscribe to every topic, and dispatch events until the
    /// socket closes. Returns `Ok(())` on an orderly close and an error when
    /// the handshake or transport fails.
    pub async fn run(self) -> Result<(), LcuError> {
        let mut request = self
            .creds
            .ws_url()
            .into_client_request()
            .map_err(|e| LcuError::WebSocketError(e.to_string()))?;
        {
            let headers = request.headers_mut();
            headers.insert(
                "Authorization",
                self.creds
                    .basic_auth()
                    .parse()
                    .map_err(|_| LcuError::WebSocketError("bad auth header".to_string()))?,
            );
            headers.insert(
                "Sec-WebSocket-Protocol",
                "wamp".parse().map_err(|_| {
                    LcuError::WebSocketError("bad protocol header".to_string())
                })?,
            );
        }

        debug!(state = ?SubscriptionState::Handshaking, url = %self.creds.ws_url(), "Connecting event socket");
        // The client presents a self-signed certificate on loopback
        let tls = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| LcuError::ConnectionError(e.to_string()))?;
        let (mut socket, _response) =
            connect_async_tls_with_config(request, None, false, Some(Connector::NativeTls(tls)))
                .await
                .map_err(|e| LcuError::WebSocketError(e.to_string()))?;

        for topic in Topic::ALL {
            socket
                .send(subscribe_message(topic.uri()))
                .await
                .map_err(|e| LcuError::WebSocketError(e.to_string()))?;
            trace!(uri = topic.uri(), "Subscribed");
        }
        info!(
            state = ?SubscriptionState::Active,
            topics = Topic::ALL.len(),
            "Event subscription established"
        );

        while let Some(frame) = socket.next().await {
            let frame = frame.map_err(|e| LcuError::WebSocketError(e.to_string()))?;
            match frame {
                Message::Text(text) => self.dispatch(&text).await,
                Message::Close(_) => {
                    debug!(state = ?SubscriptionState::Closed, "Event socket closed by peer");
                    return Ok(());
                }
                Message::Ping(payload) => {
                    socket
                        .send(Message::Pong(payload))
                        .await
                        .map_err(|e| LcuError::WebSocketError(e.to_string()))?;
                }
                _ => {}
            }
        }

        debug!(state = ?SubscriptionState::Closed, "Event socket ended");
        Ok(())
    }

    /// Parse one text frame and route it to its topic handler. Frames for
    /// unregistered topics and unusable payloads are dropped silently.
    async fn dispatch(&self, text: &str) {
        let Some(event) = LcuEvent::from_frame(text) else {
            trace!("Dropped non-event frame");
            return;
        };
        let Some(topic) = Topic::for_uri(&event.uri) else {
            trace!(uri = %event.uri, "Dropped event for unregistered topic");
            return;
        };
        if !topic.accepts(event.kind) {
            trace!(uri = %event.uri, kind = ?event.kind, "Dropped event kind");
            return;
        }
        if topic.merge(&event, &self.state, self.queues.as_ref()).await {
            self.notifier.notify();
        } else {
            trace!(uri = %event.uri, "Event carried no payload to merge");
        }
    }
}
