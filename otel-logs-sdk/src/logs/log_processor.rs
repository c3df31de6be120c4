//! # Log Processor
//!
//! A processor sits between [`SdkLogger`](crate::logs::SdkLogger) and an
//! exporter. The provider calls [`LogProcessor::emit`] for every record, in
//! processor registration order, on the emitting thread. Each processor
//! decides how to hand the record to its exporter:
//!
//! - [`SimpleLogProcessor`](crate::logs::SimpleLogProcessor) exports each
//!   record synchronously.
//! - [`BatchLogProcessor`](crate::logs::BatchLogProcessor) queues a copy and
//!   exports batches from a background thread.
use crate::error::SdkResult;
use crate::Resource;
use otel_logs::logs::LogRecord;
use otel_logs::InstrumentationScope;
use std::fmt::Debug;
use std::time::Duration;

/// Default deadline of [`LogProcessor::force_flush`] and
/// [`LogProcessor::shutdown`].
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Hook for processing emitted records.
pub trait LogProcessor: Send + Sync + Debug {
    /// Called for every emitted record. Must not report errors to the caller
    /// and must not block beyond the processor's documented backpressure
    /// policy. Changes to `record` are visible to later processors.
    fn emit(&self, record: &mut LogRecord, scope: &InstrumentationScope);

    /// Exports every record emitted before this call, waiting at most
    /// `timeout`.
    fn force_flush_with_timeout(&self, timeout: Duration) -> SdkResult;

    /// [`LogProcessor::force_flush_with_timeout`] with a 5 second deadline.
    fn force_flush(&self) -> SdkResult {
        self.force_flush_with_timeout(DEFAULT_TIMEOUT)
    }

    /// Flushes remaining records and shuts the exporter down, waiting at
    /// most `timeout`. Repeated calls return the first call's outcome.
    fn shutdown_with_timeout(&self, timeout: Duration) -> SdkResult;

    /// [`LogProcessor::shutdown_with_timeout`] with a 5 second deadline.
    fn shutdown(&self) -> SdkResult {
        self.shutdown_with_timeout(DEFAULT_TIMEOUT)
    }

    /// Receives the provider resource when the provider is built.
    fn set_resource(&mut self, _resource: &Resource) {}
}
