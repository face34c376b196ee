//! # emuhub-adapter-mqtt
//!
//! MQTT implementation of the message bus port, built on `rumqttc`.
//!
//! ## Responsibilities
//! - Own the broker connection and its network event loop (one background
//!   task; the rest of the process never blocks on the socket)
//! - Subscribe to the device topic namespace (`Home/#`) and forward every
//!   inbound publish into an `mpsc` channel consumed by the router
//! - Track connection state; absorb connection errors and let the event
//!   loop reconnect on the next poll
//! - Publish device payloads at QoS 0 (fire-and-forget, per the bus
//!   contract)
//!
//! ## Dependency rule
//! Depends on `emuhub-app` (port traits) and `emuhub-domain` only.

mod config;
mod error;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;

use emuhub_app::ports::{InboundMessage, MessageBus};
use emuhub_domain::device::TOPIC_BASE;
use emuhub_domain::error::HubError;

pub use config::MqttConfig;
pub use error::MqttError;

/// The wildcard pattern covering every device topic.
#[must_use]
pub fn wildcard_topic() -> String {
    format!("{TOPIC_BASE}/#")
}

/// MQTT-backed message bus.
///
/// Cloning is cheap; all clones share the same connection. The event loop
/// serializes connection state internally, so concurrent publishes from
/// multiple emulator tasks are safe.
#[derive(Clone)]
pub struct MqttBus {
    client: AsyncClient,
    connected: Arc<AtomicBool>,
}

impl MqttBus {
    /// Start the connection and its background network task.
    ///
    /// Returns the bus handle plus the receiver of inbound device messages.
    /// The connection is established lazily by the event loop; publishes
    /// issued before the first ConnAck are queued by the client.
    #[must_use]
    pub fn connect(
        config: &MqttConfig,
        inbound_capacity: usize,
    ) -> (Self, mpsc::Receiver<InboundMessage>) {
        let mut options = MqttOptions::new(
            config.client_id.clone(),
            config.broker_host.clone(),
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));

        let (client, mut event_loop) = AsyncClient::new(options, 64);
        let (inbound_tx, inbound_rx) = mpsc::channel(inbound_capacity);
        let connected = Arc::new(AtomicBool::new(false));

        let bus = Self {
            client: client.clone(),
            connected: Arc::clone(&connected),
        };
        let reconnect_delay = Duration::from_secs(u64::from(config.reconnect_delay_secs));

        tokio::spawn(async move {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        connected.store(true, Ordering::SeqCst);
                        tracing::info!("connected to MQTT broker");
                        // (Re)subscribe on every new session.
                        if let Err(error) =
                            client.subscribe(wildcard_topic(), QoS::AtMostOnce).await
                        {
                            tracing::warn!(%error, "subscribing to device topics failed");
                        }
                    }
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        let message = InboundMessage {
                            topic: publish.topic.clone(),
                            payload: String::from_utf8_lossy(&publish.payload).into_owned(),
                        };
                        if inbound_tx.send(message).await.is_err() {
                            tracing::debug!("inbound consumer dropped, stopping MQTT loop");
                            break;
                        }
                    }
                    Ok(Event::Incoming(Packet::Disconnect)) => {
                        connected.store(false, Ordering::SeqCst);
                        tracing::warn!("broker requested disconnect");
                    }
                    Ok(_) => {}
                    Err(error) => {
                        connected.store(false, Ordering::SeqCst);
                        tracing::warn!(%error, "MQTT connection error, retrying");
                        tokio::time::sleep(reconnect_delay).await;
                    }
                }
            }
        });

        (bus, inbound_rx)
    }
}

impl MessageBus for MqttBus {
    fn publish(
        &self,
        topic: &str,
        payload: &str,
    ) -> impl Future<Output = Result<(), HubError>> + Send {
        let publish = self.client.publish(
            topic.to_string(),
            QoS::AtMostOnce,
            false,
            payload.as_bytes().to_vec(),
        );
        async move {
            publish.await.map_err(MqttError::Client)?;
            Ok(())
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_cover_device_namespace_with_wildcard() {
        assert_eq!(wildcard_topic(), "Home/#");
    }

    #[tokio::test]
    async fn should_report_disconnected_before_first_connack() {
        let (bus, _inbound) = MqttBus::connect(&MqttConfig::default(), 8);
        assert!(!bus.is_connected());
    }

    #[tokio::test]
    async fn should_queue_publish_while_disconnected() {
        // QoS 0 publishes are queued in the request channel; they must not
        // error just because the broker is unreachable.
        let (bus, _inbound) = MqttBus::connect(&MqttConfig::default(), 8);
        bus.publish("Home/light", "1 lx").await.unwrap();
    }

    #[tokio::test]
    async fn should_share_connection_state_across_clones() {
        let (bus, _inbound) = MqttBus::connect(&MqttConfig::default(), 8);
        let clone = bus.clone();
        bus.connected.store(true, Ordering::SeqCst);
        assert!(clone.is_connected());
    }
}
