//! Device values and their wire payload formats.
//!
//! Payload shapes are fixed per kind and must stay stable — the router's
//! decode rules and any external subscriber depend on them:
//!
//! | Kind   | Payload                                              |
//! |--------|------------------------------------------------------|
//! | dht    | `{"temperature":"21.3 °C","humidity":"55.0 %"}`      |
//! | light  | `"<int> lx"`                                         |
//! | motion | `"motion detected"` or `"no motion"`                 |
//! | button | `"pressed"` or `"idle"`                              |
//! | relay  | `"1"` or `"0"`                                       |

use serde::{Deserialize, Serialize};

use crate::device::DeviceKind;

/// A temperature/humidity pair, both pre-formatted with units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Climate {
    pub temperature: String,
    pub humidity: String,
}

/// The current value held by an emulator.
///
/// Sensors hold formatted text; the dht sensor holds a composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceValue {
    Text(String),
    Climate(Climate),
}

impl DeviceValue {
    /// Textual form used when persisting a reading.
    ///
    /// The composite is stored as its JSON wire form so that historical
    /// rows stay self-describing.
    #[must_use]
    pub fn record_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Climate(climate) => climate_json(climate),
        }
    }
}

/// Serialize the current value into the wire payload for `kind`.
///
/// An absent value maps to the kind's inactive sentinel: `"null"` for dht
/// (JSON null), `"idle"` for the button, `"None"` for the rest. The router
/// treats `"null"` and `"None"` as empty; `"idle"` still decodes as a
/// button pulse.
#[must_use]
pub fn wire_payload(kind: DeviceKind, value: Option<&DeviceValue>) -> String {
    match (kind, value) {
        (_, Some(DeviceValue::Climate(climate))) => climate_json(climate),
        (_, Some(DeviceValue::Text(text))) => text.clone(),
        (DeviceKind::Dht, None) => "null".to_string(),
        (DeviceKind::Button, None) => "idle".to_string(),
        (_, None) => "None".to_string(),
    }
}

fn climate_json(climate: &Climate) -> String {
    // Serializing two string fields cannot fail in practice.
    serde_json::to_string(climate).unwrap_or_else(|_| "null".to_string())
}
