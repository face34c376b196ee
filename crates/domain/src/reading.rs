//! Reading record — one persisted sensor reading.

use crate::device::DeviceKind;
use crate::time::Timestamp;

/// A historical reading as stored by the reading store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingRecord {
    /// Which device produced the reading.
    pub device: DeviceKind,
    /// Value text as published (JSON for dht, plain text otherwise).
    pub value: String,
    /// When the reading was recorded.
    pub timestamp: Timestamp,
}

impl ReadingRecord {
    /// Create a record stamped with the given time.
    #[must_use]
    pub fn new(device: DeviceKind, value: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            device,
            value: value.into(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    #[test]
    fn should_keep_device_and_value() {
        let record = ReadingRecord::new(DeviceKind::Light, "120 lx", now());
        assert_eq!(record.device, DeviceKind::Light);
        assert_eq!(record.value, "120 lx");
    }
}
