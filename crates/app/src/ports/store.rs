//! Reading store port — persistence for historical readings.

use std::future::Future;
use std::sync::Arc;

use emuhub_domain::device::DeviceKind;
use emuhub_domain::error::HubError;
use emuhub_domain::reading::ReadingRecord;
use emuhub_domain::time::Timestamp;

/// Persists readings and serves recent history.
pub trait ReadingStore {
    /// Insert one reading. No transaction spans more than a single insert.
    fn insert(
        &self,
        device: DeviceKind,
        value: &str,
        timestamp: Timestamp,
    ) -> impl Future<Output = Result<(), HubError>> + Send;

    /// The most recent readings, newest first.
    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ReadingRecord>, HubError>> + Send;

    /// Check the connection, reconnecting transparently where the driver
    /// allows. Never fails — an unreachable store is just `false`.
    fn ping(&self) -> impl Future<Output = bool> + Send;
}

impl<T: ReadingStore + Send + Sync> ReadingStore for Arc<T> {
    fn insert(
        &self,
        device: DeviceKind,
        value: &str,
        timestamp: Timestamp,
    ) -> impl Future<Output = Result<(), HubError>> + Send {
        (**self).insert(device, value, timestamp)
    }

    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ReadingRecord>, HubError>> + Send {
        (**self).recent(limit)
    }

    fn ping(&self) -> impl Future<Output = bool> + Send {
        (**self).ping()
    }
}
