//! # emuhub-app
//!
//! Application layer — the device-state synchronization core and **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound
//!   ports):
//!   - `MessageBus` — publish to the device topic namespace
//!   - `ReadingStore` — persist and query historical readings
//! - Run the **emulator state machines**: per-kind value generation,
//!   publish/record cadence, on/off/press transitions
//! - Own the **emulator registry** (one instance per kind)
//! - Run the **message router**: decode inbound device traffic into
//!   normalized room events
//! - Provide **in-process infrastructure** (the room event bus) that doesn't
//!   need IO
//!
//! ## Dependency rule
//! Depends on `emuhub-domain` only (plus `tokio::sync`/`tokio::time` for
//! channels and timers). Never imports adapter crates. Adapters depend on
//! *this* crate, not the reverse.

pub mod emulator;
pub mod ports;
pub mod registry;
pub mod room_bus;
pub mod router;
