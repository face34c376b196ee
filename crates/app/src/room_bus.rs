//! In-process room event bus backed by a tokio broadcast channel.
//!
//! This is the explicit hand-off between the bus network task (which decodes
//! inbound traffic) and whatever presentation layer is attached. UI code
//! subscribes here and applies updates on its own thread.

use tokio::sync::broadcast;

use emuhub_domain::event::RoomEvent;

/// In-process room event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped).
#[derive(Clone)]
pub struct RoomBus {
    sender: broadcast::Sender<RoomEvent>,
}

impl RoomBus {
    /// Create a new bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to room events.
    ///
    /// Returns a receiver that will get all events published *after* the
    /// subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: RoomEvent) {
        // broadcast::send fails only when there are zero receivers,
        // which is fine — we simply ignore the error.
        let _ = self.sender.send(event);
    }
}
