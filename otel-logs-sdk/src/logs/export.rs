//! Log exporters
use crate::error::SdkResult;
use crate::Resource;
use otel_logs::logs::LogRecord;
use otel_logs::InstrumentationScope;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

/// Records buffered by the batch processor, each paired with its scope.
pub(crate) type LogsData = Box<(LogRecord, InstrumentationScope)>;

/// A borrowed batch of records handed to [`LogExporter::export`].
#[derive(Debug)]
pub struct LogBatch<'a> {
    data: LogBatchData<'a>,
}

#[derive(Debug, Clone, Copy)]
enum LogBatchData<'a> {
    // Buffered copies owned by the batch processor.
    Owned(&'a [LogsData]),
    Borrowed(&'a [(&'a LogRecord, &'a InstrumentationScope)]),
}

impl<'a> LogBatch<'a> {
    /// Creates a batch from borrowed records and scopes.
    pub fn new(data: &'a [(&'a LogRecord, &'a InstrumentationScope)]) -> LogBatch<'a> {
        LogBatch {
            data: LogBatchData::Borrowed(data),
        }
    }

    pub(crate) fn new_with_owned_data(data: &'a [LogsData]) -> LogBatch<'a> {
        LogBatch {
            data: LogBatchData::Owned(data),
        }
    }

    /// Records in enqueue order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a LogRecord, &'a InstrumentationScope)> + 'a {
        let data = self.data;
        (0..self.len()).map(move |i| match data {
            LogBatchData::Owned(items) => (&items[i].0, &items[i].1),
            LogBatchData::Borrowed(items) => (items[i].0, items[i].1),
        })
    }

    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        match self.data {
            LogBatchData::Owned(data) => data.len(),
            LogBatchData::Borrowed(data) => data.len(),
        }
    }

    /// Returns `true` if the batch holds no record.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ships batches of records off-process.
///
/// Processors never call `export` concurrently on the same exporter. They
/// bound every call with their export timeout, so an implementation does not
/// need its own deadline, but it should return promptly for an empty batch.
pub trait LogExporter: Send + Sync + Debug {
    /// Exports a batch of records.
    fn export(&self, batch: LogBatch<'_>) -> impl Future<Output = SdkResult> + Send;

    /// Releases exporter resources. Called at most once by the owning
    /// processor; later `export` calls should fail with
    /// [`SdkError::AlreadyShutdown`](crate::error::SdkError::AlreadyShutdown).
    fn shutdown_with_timeout(&self, _timeout: Duration) -> SdkResult {
        Ok(())
    }

    /// Shuts down with a 5 second timeout.
    fn shutdown(&self) -> SdkResult {
        self.shutdown_with_timeout(Duration::from_secs(5))
    }

    /// Receives the provider resource before the first export.
    fn set_resource(&mut self, _resource: &Resource) {}
}
