//! Message router — decodes inbound device traffic into room events.
//!
//! The decode step is a pure function so it can be tested without a
//! runtime; [`MessageRouter::run`] pumps messages from the bus adapter's
//! inbound channel through it and publishes the results on the [`RoomBus`].
//! A message that fails to decode is logged and dropped without affecting
//! later messages.

use tokio::sync::mpsc;

use emuhub_domain::device::{DeviceKind, TOPIC_BASE};
use emuhub_domain::event::RoomEvent;

use crate::ports::InboundMessage;
use crate::room_bus::RoomBus;

/// Payload forms treated as "no value": the device is off.
const EMPTY_SENTINELS: [&str; 3] = ["None", "null", ""];

/// Decode one `(topic, payload)` pair into a room event.
///
/// Rules, per kind:
/// - topics outside `Home/` and unknown topic suffixes are ignored
/// - an empty-sentinel payload yields the inactive update for the kind
/// - `dht` parses a JSON object with `temperature`/`humidity` (missing
///   fields render as `"?"`); malformed JSON drops the message
/// - `light` passes the payload through as the reading
/// - `motion` passes the payload through; `active` is substring containment
///   of `"motion"` (case-insensitive), so `"no motion"` reports *active* —
///   a long-standing quirk the room display depends on, kept as is
/// - `button` yields a transient pulse, never a state update
/// - `relay` maps `"1"`/`"0"` to ON/OFF and anything else to inactive
#[must_use]
pub fn decode(topic: &str, payload: &str) -> Option<RoomEvent> {
    let suffix = topic.strip_prefix(TOPIC_BASE)?.strip_prefix('/')?;
    let key = suffix.rsplit('/').next().unwrap_or_default().to_lowercase();
    let kind = DeviceKind::from_key(&key)?;

    if EMPTY_SENTINELS.contains(&payload) {
        return Some(RoomEvent::inactive(kind));
    }

    match kind {
        DeviceKind::Dht => decode_climate(payload),
        DeviceKind::Light => Some(RoomEvent::state(kind, true, Some(payload.to_string()))),
        DeviceKind::Motion => {
            let active = payload.to_lowercase().contains("motion");
            Some(RoomEvent::state(kind, active, Some(payload.to_string())))
        }
        DeviceKind::Button => Some(RoomEvent::ButtonPulse),
        DeviceKind::Relay => Some(match payload {
            "1" => RoomEvent::state(kind, true, Some("ON".to_string())),
            "0" => RoomEvent::state(kind, false, Some("OFF".to_string())),
            _ => RoomEvent::inactive(kind),
        }),
    }
}

fn decode_climate(payload: &str) -> Option<RoomEvent> {
    let data: serde_json::Value = match serde_json::from_str(payload) {
        Ok(data) => data,
        Err(error) => {
            tracing::warn!(%payload, %error, "malformed dht payload, dropping message");
            return None;
        }
    };
    let Some(object) = data.as_object() else {
        tracing::warn!(%payload, "dht payload is not an object, dropping message");
        return None;
    };

    let temperature = climate_field(object, "temperature");
    let humidity = climate_field(object, "humidity");
    Some(RoomEvent::state(
        DeviceKind::Dht,
        true,
        Some(format!("{temperature}, {humidity}")),
    ))
}

fn climate_field(object: &serde_json::Map<String, serde_json::Value>, name: &str) -> String {
    match object.get(name) {
        None => "?".to_string(),
        Some(serde_json::Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Pumps inbound bus messages through [`decode`] onto the room bus.
pub struct MessageRouter {
    room: RoomBus,
}

impl MessageRouter {
    /// Create a router publishing to the given room bus.
    #[must_use]
    pub fn new(room: RoomBus) -> Self {
        Self { room }
    }

    /// Route a single message, emitting at most one room event.
    pub fn route(&self, topic: &str, payload: &str) {
        tracing::debug!(%topic, %payload, "routing inbound message");
        if let Some(event) = decode(topic, payload) {
            self.room.publish(event);
        }
    }

    /// Consume the inbound channel until the sender side is dropped.
    pub async fn run(self, mut inbound: mpsc::Receiver<InboundMessage>) {
        while let Some(message) = inbound.recv().await {
            self.route(&message.topic, &message.payload);
        }
        tracing::debug!("inbound channel closed, router stopping");
    }
}
