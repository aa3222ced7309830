//! LCU websocket event frames
//!
//! The client speaks a WAMP-flavored protocol: every pushed event arrives as
//! a JSON array `[8, "OnJsonApiEvent...", { "uri": ..., "eventType": ...,
//! "data": ... }]`. Only opcode 8 frames carry events; everything else
//! (subscription acks, keepalives) is ignored.

use serde_json::Value;

/// Opcode for server-pushed events.
const EVENT_OPCODE: u64 = 8;

/// Event type attached to each topic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Create,
    Update,
    Delete,
}

impl EventKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Create" => Some(EventKind::Create),
            "Update" => Some(EventKind::Update),
            "Delete" => Some(EventKind::Delete),
            _ => None,
        }
    }
}

/// A single topic event from the League client.
///
/// `data` is `None` when the event carries no body (e.g. a lobby delete).
#[derive(Debug, Clone)]
pub struct LcuEvent {
    pub uri: String,
    pub kind: EventKind,
    pub data: Option<Value>,
}

impl LcuEvent {
    /// Parse a raw websocket text frame into an event.
    ///
    /// Returns `None` for frames that are not opcode-8 event pushes, or
    /// whose payload is structurally unusable. Malformed frames are dropped,
    /// never an error: the subscription must survive anything the client
    /// sends.
    pub fn from_frame(text: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(text).ok()?;
        let arr = value.as_array()?;
        if arr.len() < 3 || arr[0].as_u64() != Some(EVENT_OPCODE) {
            return None;
        }
        let body = arr[2].as_object()?;
        let uri = body.get("uri")?.as_str()?.to_string();
        let kind = EventKind::parse(body.get("eventType")?.as_str()?)?;
        let data = match body.get("data") {
            None | Some(Value::Null) => None,
            Some(v) => Some(v.clone()),
        };
        Some(LcuEvent { uri, kind, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_update_event() {
        let frame = r#"[8,"OnJsonApiEvent",{"uri":"/lol-summoner/v1/current-summoner","eventType":"Update","data":{"displayName":"Foo"}}]"#;
        let evt = LcuEvent::from_frame(frame).expect("event");
        assert_eq!(evt.uri, "/lol-summoner/v1/current-summoner");
        assert_eq!(evt.kind, EventKind::Update);
        assert_eq!(evt.data.unwrap()["displayName"], "Foo");
    }

    #[test]
    fn delete_without_body_has_no_data() {
        let frame = r#"[8,"OnJsonApiEvent",{"uri":"/lol-lobby/v2/lobby","eventType":"Delete","data":null}]"#;
        let evt = LcuEvent::from_frame(frame).expect("event");
        assert_eq!(evt.kind, EventKind::Delete);
        assert!(evt.data.is_none());
    }

    #[test]
    fn ignores_non_event_opcodes() {
        // Subscription ack uses a different opcode
        assert!(LcuEvent::from_frame(r#"[3,"OnJsonApiEvent"]"#).is_none());
    }

    #[test]
    fn ignores_malformed_frames() {
        assert!(LcuEvent::from_frame("not json").is_none());
        assert!(LcuEvent::from_frame("{}").is_none());
        assert!(LcuEvent::from_frame(r#"[8,"x"]"#).is_none());
        assert!(LcuEvent::from_frame(r#"[8,"x",{"eventType":"Update"}]"#).is_none());
        assert!(LcuEvent::from_frame(r#"[8,"x",{"uri":"/a","eventType":"Bogus"}]"#).is_none());
    }
}
