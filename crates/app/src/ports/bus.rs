//! Message bus port — publish side of the device topic namespace.
//!
//! The inbound side is not a trait: the bus adapter forwards received
//! messages into an `mpsc` channel of [`InboundMessage`]s which the router
//! consumes. That keeps blocking network IO on the adapter's task and lets
//! the decode step run single-threaded and deterministic.

use std::future::Future;
use std::sync::Arc;

use emuhub_domain::error::HubError;

/// One message received from the bus, as raw topic and payload text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: String,
}

/// Publishes payloads to the device topic namespace.
///
/// Publishing is fire-and-forget: delivery is not confirmed, and callers
/// are expected to log failures and move on.
pub trait MessageBus {
    /// Publish `payload` on `topic`.
    fn publish(
        &self,
        topic: &str,
        payload: &str,
    ) -> impl Future<Output = Result<(), HubError>> + Send;

    /// Whether the underlying connection is currently established.
    fn is_connected(&self) -> bool;
}

impl<T: MessageBus + Send + Sync> MessageBus for Arc<T> {
    fn publish(
        &self,
        topic: &str,
        payload: &str,
    ) -> impl Future<Output = Result<(), HubError>> + Send {
        (**self).publish(topic, payload)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}
