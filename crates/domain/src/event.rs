//! Room events — normalized router output consumed by the presentation layer.

use crate::device::DeviceKind;

/// A normalized update produced by the message router.
///
/// `StateChanged` carries the unified `(device, active, reading)` shape the
/// room view renders. `ButtonPulse` is transient: the button never has a
/// persistent displayed state, it just flashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    StateChanged {
        device: DeviceKind,
        active: bool,
        reading: Option<String>,
    },
    ButtonPulse,
}

impl RoomEvent {
    /// Convenience constructor for the common state-update case.
    #[must_use]
    pub fn state(device: DeviceKind, active: bool, reading: Option<String>) -> Self {
        Self::StateChanged {
            device,
            active,
            reading,
        }
    }

    /// The inactive/empty update for a device.
    #[must_use]
    pub fn inactive(device: DeviceKind) -> Self {
        Self::state(device, false, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_inactive_update_with_no_reading() {
        let event = RoomEvent::inactive(DeviceKind::Relay);
        assert_eq!(event, RoomEvent::state(DeviceKind::Relay, false, None));
    }
}
