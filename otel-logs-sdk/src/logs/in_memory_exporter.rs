use crate::error::{SdkError, SdkResult};
use crate::logs::{LogBatch, LogExporter};
use crate::Resource;
use otel_logs::logs::LogRecord;
use otel_logs::InstrumentationScope;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type LogResult<T> = Result<T, SdkError>;

/// An exporter that keeps exported records in memory, for tests.
///
/// Clones share their storage, so a test can keep one handle while the
/// provider owns another. Batch boundaries are preserved.
///
/// ```
/// # #[cfg(feature = "testing")]
/// # {
/// use otel_logs::logs::{LogRecord, Logger, LoggerProvider};
/// use otel_logs_sdk::logs::{InMemoryLogExporter, SdkLoggerProvider};
///
/// let exporter = InMemoryLogExporter::default();
/// let provider = SdkLoggerProvider::builder()
///     .with_simple_exporter(exporter.clone())
///     .build();
///
/// provider.logger("doc").emit(LogRecord::new().with_body("hello"));
///
/// assert_eq!(exporter.get_emitted_logs().unwrap().len(), 1);
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryLogExporter {
    batches: Arc<Mutex<Vec<Vec<OwnedLogData>>>>,
    resource: Arc<Mutex<Resource>>,
    shutdown_calls: Arc<AtomicUsize>,
    should_reset_on_shutdown: bool,
}

impl Default for InMemoryLogExporter {
    fn default() -> Self {
        InMemoryLogExporterBuilder::new().build()
    }
}

/// A record with the scope it was emitted from.
#[derive(Debug, Clone)]
pub struct OwnedLogData {
    /// The exported record.
    pub record: LogRecord,
    /// Scope of the logger that emitted the record.
    pub scope: InstrumentationScope,
}

/// A record with its scope and the resource it was exported with.
#[derive(Debug, Clone)]
pub struct LogDataWithResource {
    /// The exported record.
    pub record: LogRecord,
    /// Scope of the logger that emitted the record.
    pub scope: InstrumentationScope,
    /// Resource of the provider.
    pub resource: Resource,
}

/// Builder for [`InMemoryLogExporter`].
#[derive(Debug, Clone)]
pub struct InMemoryLogExporterBuilder {
    reset_on_shutdown: bool,
}

impl Default for InMemoryLogExporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLogExporterBuilder {
    /// Exported records are cleared on shutdown unless
    /// [`keep_records_on_shutdown`](Self::keep_records_on_shutdown) is used.
    pub fn new() -> Self {
        Self {
            reset_on_shutdown: true,
        }
    }

    /// Keep exported records after the exporter is shut down.
    pub fn keep_records_on_shutdown(self) -> Self {
        Self {
            reset_on_shutdown: false,
        }
    }

    /// Create the exporter.
    pub fn build(&self) -> InMemoryLogExporter {
        InMemoryLogExporter {
            batches: Arc::new(Mutex::new(Vec::new())),
            resource: Arc::new(Mutex::new(Resource::empty())),
            shutdown_calls: Arc::new(AtomicUsize::new(0)),
            should_reset_on_shutdown: self.reset_on_shutdown,
        }
    }
}

impl InMemoryLogExporter {
    /// Every exported record, in export order.
    pub fn get_emitted_logs(&self) -> LogResult<Vec<LogDataWithResource>> {
        let batches = self.batches.lock()?;
        let resource = self.resource.lock()?.clone();
        Ok(batches
            .iter()
            .flatten()
            .map(|data| LogDataWithResource {
                record: data.record.clone(),
                scope: data.scope.clone(),
                resource: resource.clone(),
            })
            .collect())
    }

    /// Exported records grouped by `export` call.
    pub fn get_emitted_batches(&self) -> LogResult<Vec<Vec<LogRecord>>> {
        Ok(self
            .batches
            .lock()?
            .iter()
            .map(|batch| batch.iter().map(|data| data.record.clone()).collect())
            .collect())
    }

    /// Number of times the exporter was shut down.
    pub fn shutdown_count(&self) -> usize {
        self.shutdown_calls.load(Ordering::SeqCst)
    }

    /// Clears the exported records.
    pub fn reset(&self) {
        if let Ok(mut batches) = self.batches.lock() {
            batches.clear();
        }
    }
}

impl LogExporter for InMemoryLogExporter {
    async fn export(&self, batch: LogBatch<'_>) -> SdkResult {
        if batch.is_empty() {
            return Ok(());
        }
        let owned = batch
            .iter()
            .map(|(record, scope)| OwnedLogData {
                record: record.clone(),
                scope: scope.clone(),
            })
            .collect();
        self.batches.lock()?.push(owned);
        Ok(())
    }

    fn shutdown_with_timeout(&self, _timeout: Duration) -> SdkResult {
        self.shutdown_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_reset_on_shutdown {
            self.reset();
        }
        Ok(())
    }

    fn set_resource(&mut self, resource: &Resource) {
        if let Ok(mut current) = self.resource.lock() {
            *current = resource.clone();
        }
    }
}
