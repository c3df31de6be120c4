//! # Simple Log Processor
//!
//! Exports every record synchronously from the emitting thread, one record
//! per export call. Intended for tests and debugging; production pipelines
//! should use [`BatchLogProcessor`](crate::logs::BatchLogProcessor).
use crate::error::{SdkError, SdkResult};
use crate::logs::{LogBatch, LogExporter, LogProcessor};
use crate::Resource;

use otel_logs::logs::LogRecord;
use otel_logs::{global, otel_debug, otel_error, otel_warn, InstrumentationScope};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

/// A [`LogProcessor`] that exports each record as soon as it is emitted.
///
/// The exporter sits behind a mutex, so concurrent emitters are serialized
/// and the exporter never sees overlapping `export` calls.
#[derive(Debug)]
pub struct SimpleLogProcessor<T: LogExporter> {
    exporter: Mutex<T>,
    is_shutdown: AtomicBool,
    shutdown_result: OnceLock<SdkResult>,
}

impl<T: LogExporter> SimpleLogProcessor<T> {
    /// Creates a processor exporting to `exporter`.
    pub fn new(exporter: T) -> Self {
        SimpleLogProcessor {
            exporter: Mutex::new(exporter),
            is_shutdown: AtomicBool::new(false),
            shutdown_result: OnceLock::new(),
        }
    }
}

impl<T: LogExporter> LogProcessor for SimpleLogProcessor<T> {
    fn emit(&self, record: &mut LogRecord, scope: &InstrumentationScope) {
        if self.is_shutdown.load(Ordering::Relaxed) {
            otel_warn!(name: "SimpleLogProcessor.Emit.ProcessorShutdown");
            return;
        }

        let result = self
            .exporter
            .lock()
            .map_err(|_| SdkError::InternalFailure("SimpleLogProcessor mutex poison".into()))
            .and_then(|exporter| {
                let batch = [(&*record, scope)];
                futures_executor::block_on(exporter.export(LogBatch::new(&batch)))
            });
        match result {
            Err(SdkError::InternalFailure(_)) => {
                otel_debug!(name: "SimpleLogProcessor.Emit.MutexPoisoning");
            }
            Err(err) => {
                otel_error!(
                    name: "SimpleLogProcessor.Emit.ExportError",
                    error = format!("{err}")
                );
                global::handle_error(err);
            }
            Ok(()) => {}
        }
    }

    fn force_flush_with_timeout(&self, _timeout: Duration) -> SdkResult {
        if self.is_shutdown.load(Ordering::Relaxed) {
            return Err(SdkError::AlreadyShutdown);
        }
        Ok(())
    }

    fn shutdown_with_timeout(&self, timeout: Duration) -> SdkResult {
        self.shutdown_result
            .get_or_init(|| {
                self.is_shutdown.store(true, Ordering::Relaxed);
                match self.exporter.lock() {
                    Ok(exporter) => exporter.shutdown_with_timeout(timeout),
                    Err(_) => Err(SdkError::InternalFailure(
                        "SimpleLogProcessor mutex poison at shutdown".into(),
                    )),
                }
            })
            .clone()
    }

    fn set_resource(&mut self, resource: &Resource) {
        if let Ok(exporter) = self.exporter.get_mut() {
            exporter.set_resource(resource);
        }
    }
}
