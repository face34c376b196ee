//! Emulator registry — owns exactly one emulator per device kind.

use std::collections::HashMap;

use emuhub_domain::device::DeviceKind;

use crate::emulator::Emulator;
use crate::ports::{MessageBus, ReadingStore};

/// Central owner of the five emulator instances.
///
/// Construction is eager: all kinds are instantiated up front with shared
/// bus/store handles and live for the process lifetime.
pub struct EmulatorRegistry<B, S> {
    emulators: HashMap<DeviceKind, Emulator<B, S>>,
}

impl<B, S> EmulatorRegistry<B, S>
where
    B: MessageBus + Clone + Send + Sync + 'static,
    S: ReadingStore + Clone + Send + Sync + 'static,
{
    /// Build the registry, creating one emulator per kind.
    #[must_use]
    pub fn new(bus: B, store: S) -> Self {
        let emulators = DeviceKind::ALL
            .into_iter()
            .map(|kind| (kind, Emulator::new(kind, bus.clone(), store.clone())))
            .collect();
        Self { emulators }
    }
}

impl<B, S> EmulatorRegistry<B, S> {
    /// Look up the emulator for a kind.
    #[must_use]
    pub fn get(&self, kind: DeviceKind) -> Option<&Emulator<B, S>> {
        self.emulators.get(&kind)
    }

    /// Look up an emulator by its string key. Unknown keys yield `None`,
    /// not an error — callers must handle the miss.
    #[must_use]
    pub fn get_by_key(&self, key: &str) -> Option<&Emulator<B, S>> {
        DeviceKind::from_key(key).and_then(|kind| self.get(kind))
    }

    /// Iterate over all emulators.
    pub fn iter(&self) -> impl Iterator<Item = &Emulator<B, S>> {
        self.emulators.values()
    }
}

impl<B, S> EmulatorRegistry<B, S>
where
    B: MessageBus + Send + Sync + 'static,
    S: ReadingStore + Send + Sync + 'static,
{
    /// Turn every emulator off. Used during shutdown.
    pub async fn turn_all_off(&self) {
        for emulator in self.emulators.values() {
            emulator.turn_off().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emuhub_domain::error::HubError;
    use emuhub_domain::reading::ReadingRecord;
    use emuhub_domain::time::Timestamp;
    use std::future::Future;

    #[derive(Clone, Default)]
    struct NullBus;

    impl MessageBus for NullBus {
        fn publish(
            &self,
            _topic: &str,
            _payload: &str,
        ) -> impl Future<Output = Result<(), HubError>> + Send {
            async { Ok(()) }
        }

        fn is_connected(&self) -> bool {
            true
        }
    }

    #[derive(Clone, Default)]
    struct NullStore;

    impl ReadingStore for NullStore {
        fn insert(
            &self,
            _device: DeviceKind,
            _value: &str,
            _timestamp: Timestamp,
        ) -> impl Future<Output = Result<(), HubError>> + Send {
            async { Ok(()) }
        }

        fn recent(
            &self,
            _limit: usize,
        ) -> impl Future<Output = Result<Vec<ReadingRecord>, HubError>> + Send {
            async { Ok(Vec::new()) }
        }

        fn ping(&self) -> impl Future<Output = bool> + Send {
            async { true }
        }
    }

    fn registry() -> EmulatorRegistry<NullBus, NullStore> {
        EmulatorRegistry::new(NullBus, NullStore)
    }

    #[tokio::test]
    async fn should_construct_all_five_emulators_eagerly() {
        let registry = registry();
        assert_eq!(registry.iter().count(), 5);
        for kind in DeviceKind::ALL {
            assert!(registry.get(kind).is_some());
        }
    }

    #[tokio::test]
    async fn should_look_up_emulator_by_string_key() {
        let registry = registry();
        let relay = registry.get_by_key("relay").unwrap();
        assert_eq!(relay.kind(), DeviceKind::Relay);
    }

    #[tokio::test]
    async fn should_return_none_for_unknown_key() {
        let registry = registry();
        assert!(registry.get_by_key("thermostat").is_none());
        assert!(registry.get_by_key("").is_none());
    }

    #[tokio::test]
    async fn should_turn_all_emulators_off() {
        let registry = registry();
        registry.get(DeviceKind::Relay).unwrap().turn_on().await;
        registry.get(DeviceKind::Light).unwrap().turn_on().await;

        registry.turn_all_off().await;

        for emulator in registry.iter() {
            assert!(!emulator.is_active());
        }
    }
}
