//! MQTT adapter error types.

use emuhub_domain::error::HubError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client rejected a request (e.g. the request channel to
    /// the event loop is closed).
    #[error("MQTT client error")]
    Client(#[from] rumqttc::ClientError),
}

impl From<MqttError> for HubError {
    fn from(err: MqttError) -> Self {
        Self::Transport(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_client_error_to_transport_error() {
        let (client, event_loop) =
            rumqttc::AsyncClient::new(rumqttc::MqttOptions::new("t", "localhost", 1883), 1);
        drop(event_loop);
        // With the event loop dropped, requests fail immediately.
        let err = futures_err(client);
        assert!(matches!(err, HubError::Transport(_)));
        assert_eq!(err.to_string(), "transport error");
    }

    fn futures_err(client: rumqttc::AsyncClient) -> HubError {
        let client_err = client
            .try_publish("Home/light", rumqttc::QoS::AtMostOnce, false, "1 lx")
            .expect_err("publish should fail without an event loop");
        MqttError::Client(client_err).into()
    }
}
