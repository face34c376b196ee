//! Closed-loop integration tests: emulator publishes are fed back through
//! the router, exactly as live MQTT traffic would be, and the resulting
//! room events are observed on the room bus.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;

use emuhub_app::ports::{InboundMessage, MessageBus, ReadingStore};
use emuhub_app::registry::EmulatorRegistry;
use emuhub_app::room_bus::RoomBus;
use emuhub_app::router::MessageRouter;
use emuhub_domain::device::DeviceKind;
use emuhub_domain::error::HubError;
use emuhub_domain::event::RoomEvent;
use emuhub_domain::reading::ReadingRecord;
use emuhub_domain::time::Timestamp;

/// Bus double that loops every publish straight back into the inbound
/// channel, standing in for the broker round-trip.
#[derive(Clone)]
struct LoopbackBus {
    tx: mpsc::Sender<InboundMessage>,
}

impl MessageBus for LoopbackBus {
    fn publish(
        &self,
        topic: &str,
        payload: &str,
    ) -> impl Future<Output = Result<(), HubError>> + Send {
        let message = InboundMessage {
            topic: topic.to_string(),
            payload: payload.to_string(),
        };
        let tx = self.tx.clone();
        async move {
            tx.send(message)
                .await
                .map_err(|err| HubError::Transport(Box::new(err)))
        }
    }

    fn is_connected(&self) -> bool {
        true
    }
}

/// In-memory reading store.
#[derive(Clone, Default)]
struct MemoryStore {
    records: Arc<Mutex<Vec<ReadingRecord>>>,
}

impl MemoryStore {
    fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl ReadingStore for MemoryStore {
    fn insert(
        &self,
        device: DeviceKind,
        value: &str,
        timestamp: Timestamp,
    ) -> impl Future<Output = Result<(), HubError>> + Send {
        let record = ReadingRecord::new(device, value, timestamp);
        let records = Arc::clone(&self.records);
        async move {
            records
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(record);
            Ok(())
        }
    }

    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ReadingRecord>, HubError>> + Send {
        let mut records: Vec<ReadingRecord> = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        records.reverse();
        records.truncate(limit);
        async move { Ok(records) }
    }

    fn ping(&self) -> impl Future<Output = bool> + Send {
        async { true }
    }
}

struct Harness {
    registry: EmulatorRegistry<LoopbackBus, MemoryStore>,
    store: MemoryStore,
    events: tokio::sync::broadcast::Receiver<RoomEvent>,
}

fn harness() -> Harness {
    let (tx, rx) = mpsc::channel(64);
    let room = RoomBus::new(64);
    let events = room.subscribe();
    tokio::spawn(MessageRouter::new(room).run(rx));

    let store = MemoryStore::default();
    let registry = EmulatorRegistry::new(LoopbackBus { tx }, store.clone());
    Harness {
        registry,
        store,
        events,
    }
}

#[tokio::test(start_paused = true)]
async fn should_round_trip_relay_commands_to_room_state() {
    let mut h = harness();
    let relay = h.registry.get(DeviceKind::Relay).unwrap();

    relay.turn_on().await;
    assert_eq!(
        h.events.recv().await.unwrap(),
        RoomEvent::state(DeviceKind::Relay, true, Some("ON".to_string()))
    );

    relay.turn_off().await;
    assert_eq!(
        h.events.recv().await.unwrap(),
        RoomEvent::state(DeviceKind::Relay, false, Some("OFF".to_string()))
    );

    // Both transitions are recorded.
    assert_eq!(h.store.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn should_round_trip_light_reading_to_room_state() {
    let mut h = harness();
    let light = h.registry.get(DeviceKind::Light).unwrap();

    light.turn_on().await;

    let RoomEvent::StateChanged {
        device,
        active,
        reading,
    } = h.events.recv().await.unwrap()
    else {
        panic!("expected a state update");
    };
    assert_eq!(device, DeviceKind::Light);
    assert!(active);
    assert!(reading.unwrap().ends_with(" lx"));
}

#[tokio::test(start_paused = true)]
async fn should_round_trip_dht_composite_to_combined_reading() {
    let mut h = harness();
    let dht = h.registry.get(DeviceKind::Dht).unwrap();

    dht.turn_on().await;

    let RoomEvent::StateChanged { device, reading, .. } = h.events.recv().await.unwrap() else {
        panic!("expected a state update");
    };
    assert_eq!(device, DeviceKind::Dht);
    let reading = reading.unwrap();
    assert!(
        reading.contains("\u{b0}C, ") && reading.ends_with(" %"),
        "unexpected reading: {reading}"
    );
}

#[tokio::test(start_paused = true)]
async fn should_emit_inactive_update_when_sensor_turned_off() {
    let mut h = harness();
    let motion = h.registry.get(DeviceKind::Motion).unwrap();

    motion.turn_on().await;
    let _ = h.events.recv().await.unwrap();

    motion.turn_off().await;
    assert_eq!(
        h.events.recv().await.unwrap(),
        RoomEvent::inactive(DeviceKind::Motion)
    );
}

#[tokio::test(start_paused = true)]
async fn should_pulse_on_press_and_again_on_auto_reset() {
    let mut h = harness();
    let button = h.registry.get(DeviceKind::Button).unwrap();

    button.press().await;
    assert_eq!(h.events.recv().await.unwrap(), RoomEvent::ButtonPulse);

    // The auto-reset republish carries "idle", which the router also treats
    // as a button message: another pulse, never a state update.
    tokio::time::sleep(Duration::from_millis(7100)).await;
    assert_eq!(h.events.recv().await.unwrap(), RoomEvent::ButtonPulse);
    assert_eq!(h.store.len(), 1);
}
