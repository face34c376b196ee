//! # emuhubd — emuhub daemon
//!
//! Composition root that wires all adapters together and runs the hub
//! headless.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize the `SQLite` pool and run migrations
//! - Start the MQTT connection and its network task
//! - Construct the emulator registry and the message router
//! - Subscribe a logging sink to the room bus (stands in for a GUI)
//! - Handle graceful shutdown (ctrl-c)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use emuhub_adapter_mqtt::MqttBus;
use emuhub_adapter_storage_sqlite_sqlx::SqliteReadingStore;
use emuhub_app::registry::EmulatorRegistry;
use emuhub_app::room_bus::RoomBus;
use emuhub_app::router::MessageRouter;
use emuhub_domain::device::DeviceKind;
use emuhub_domain::event::RoomEvent;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Storage
    let db = emuhub_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let store = SqliteReadingStore::new(db.pool().clone());

    // Message bus + router + room event hand-off
    let (bus, inbound) = MqttBus::connect(&config.mqtt, 64);
    let room = RoomBus::new(256);
    tokio::spawn(log_room_events(room.subscribe()));
    tokio::spawn(MessageRouter::new(room.clone()).run(inbound));

    // Emulators
    let registry = EmulatorRegistry::new(bus, store);
    if config.emulators.autostart {
        for kind in [DeviceKind::Dht, DeviceKind::Light, DeviceKind::Motion] {
            if let Some(emulator) = registry.get(kind) {
                emulator.turn_on().await;
            }
        }
    }

    tracing::info!("emuhubd running, press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down");
    registry.turn_all_off().await;
    Ok(())
}

/// Headless stand-in for the room view: renders normalized updates to the
/// log. A GUI front-end would subscribe to the same bus instead.
async fn log_room_events(mut events: broadcast::Receiver<RoomEvent>) {
    loop {
        match events.recv().await {
            Ok(RoomEvent::StateChanged {
                device,
                active,
                reading,
            }) => {
                tracing::info!(
                    %device,
                    active,
                    reading = reading.as_deref().unwrap_or("-"),
                    "room state"
                );
            }
            Ok(RoomEvent::ButtonPulse) => tracing::info!("doorbell pulse"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "room event consumer lagging");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
