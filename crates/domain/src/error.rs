//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors (`MqttError`, `StorageError`, …)
//! and converts into [`HubError`] when crossing a port boundary.

/// Top-level error for port operations.
///
/// The core treats both variants as degraded-transport conditions: callers
/// log a warning and carry on, they never abort a state transition because
/// a publish or insert failed.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// The message bus rejected or could not deliver a publish.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The reading store rejected a query or lost its connection.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_transport_error() {
        let err = HubError::Transport("broker unreachable".into());
        assert_eq!(err.to_string(), "transport error");
    }

    #[test]
    fn should_expose_source_of_storage_error() {
        let err = HubError::Storage("disk full".into());
        let source = std::error::Error::source(&err);
        assert_eq!(source.unwrap().to_string(), "disk full");
    }
}
