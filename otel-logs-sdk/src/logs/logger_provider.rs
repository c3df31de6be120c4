use super::{BatchLogProcessor, LogProcessor, SdkLogger, SimpleLogProcessor};
use crate::error::{combine_results, SdkError, SdkResult};
use crate::logs::log_processor::DEFAULT_TIMEOUT;
use crate::logs::LogExporter;
use crate::util::{Completion, Deadline};
use crate::Resource;
use otel_logs::{otel_debug, otel_info, otel_warn, InstrumentationScope};
use std::collections::HashSet;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, OnceLock, PoisonError,
};
use std::time::Duration;

// Used for loggers requested with an empty name.
const DEFAULT_LOGGER_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Clone)]
/// Handles the creation and coordination of [`Logger`]s.
///
/// All `Logger`s created by a `SdkLoggerProvider` will share the same
/// [`Resource`] and have their records processed by the configured log
/// processors. This is a clonable handle: cloning it creates a new
/// reference, not a new provider. Dropping the last reference shuts down
/// every processor that was not shut down yet, so remaining records are
/// flushed. Shutdown can also be triggered manually by calling
/// [`shutdown`](SdkLoggerProvider::shutdown).
///
/// [`Logger`]: otel_logs::logs::Logger
pub struct SdkLoggerProvider {
    inner: Arc<LoggerProviderInner>,
}

impl otel_logs::logs::LoggerProvider for SdkLoggerProvider {
    type Logger = SdkLogger;

    /// Returns the logger registered for the scope's name, version and
    /// schema URL, registering `scope` if it is the first of its identity.
    fn logger_with_scope(&self, scope: InstrumentationScope) -> Self::Logger {
        let scope = if scope.name().is_empty() {
            otel_info!(
                name: "LoggerProvider.LoggerNameEmpty",
                message = "Logger name is empty; the SDK name is used instead. Consider providing a meaningful name."
            );
            scope.to_builder_with_name(DEFAULT_LOGGER_NAME).build()
        } else {
            scope
        };

        let scope = {
            let mut loggers = self
                .inner
                .loggers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match loggers.get(&scope) {
                Some(registered) => registered.clone(),
                None => {
                    loggers.insert(scope.clone());
                    scope
                }
            }
        };

        if self.is_shutdown() {
            otel_debug!(
                name: "LoggerProvider.NoOpLoggerReturned",
                logger_name = scope.name()
            );
        } else {
            otel_debug!(
                name: "LoggerProvider.NewLoggerReturned",
                logger_name = scope.name()
            );
        }
        SdkLogger::new(scope, self.clone())
    }
}

impl SdkLoggerProvider {
    /// Create a new `LoggerProvider` builder.
    pub fn builder() -> LoggerProviderBuilder {
        LoggerProviderBuilder::default()
    }

    pub(crate) fn log_processors(&self) -> impl Iterator<Item = &dyn LogProcessor> {
        self.inner.processors.iter().map(|slot| &*slot.processor)
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.inner.is_shutdown.load(Ordering::Acquire)
    }

    /// The resource shared by every logger of this provider.
    pub fn resource(&self) -> &Resource {
        &self.inner.resource
    }

    /// Force flush all processors, waiting at most 5 seconds.
    pub fn force_flush(&self) -> SdkResult {
        self.force_flush_with_timeout(DEFAULT_TIMEOUT)
    }

    /// Force flush every processor in registration order; the deadline is
    /// shared by all of them. A no-op once the provider is shut down.
    pub fn force_flush_with_timeout(&self, timeout: Duration) -> SdkResult {
        if self.is_shutdown() {
            return Ok(());
        }
        let deadline = Deadline::after(timeout);
        let results: Vec<_> = self
            .log_processors()
            .map(|processor| processor.force_flush_with_timeout(deadline.remaining()))
            .collect();
        combine_results(results)
    }

    /// Shuts down this `LoggerProvider`, waiting at most 5 seconds.
    pub fn shutdown(&self) -> SdkResult {
        self.shutdown_with_timeout(DEFAULT_TIMEOUT)
    }

    /// Shuts down every processor in registration order and combines their
    /// errors.
    ///
    /// Only the first call does the work. Later and concurrent calls wait for
    /// its result, each for at most its own `timeout`. Loggers keep working
    /// after shutdown but drop every record.
    /// When `timeout` expires before every processor was reached, the call
    /// returns [`SdkError::Timeout`] right away and the processors not yet
    /// reached are shut down when the last provider handle is dropped.
    pub fn shutdown_with_timeout(&self, timeout: Duration) -> SdkResult {
        otel_debug!(name: "LoggerProvider.ShutdownInvokedByUser");
        if self.inner.is_shutdown.swap(true, Ordering::AcqRel) {
            return self
                .inner
                .shutdown_result
                .wait(timeout)
                .unwrap_or(Err(SdkError::Timeout(timeout)));
        }
        let result = self.inner.shutdown(timeout);
        self.inner.shutdown_result.complete(result.clone());
        result
    }
}

#[derive(Debug)]
struct ProcessorSlot {
    processor: Box<dyn LogProcessor>,
    result: OnceLock<SdkResult>,
}

impl ProcessorSlot {
    fn is_shutdown(&self) -> bool {
        self.result.get().is_some()
    }

    fn shutdown(&self, timeout: Duration) -> SdkResult {
        let result = self
            .result
            .get_or_init(|| self.processor.shutdown_with_timeout(timeout))
            .clone();
        if let Err(err) = &result {
            otel_debug!(name: "LoggerProvider.ShutdownError", error = format!("{err}"));
        }
        result
    }
}

#[derive(Debug)]
struct LoggerProviderInner {
    processors: Vec<ProcessorSlot>,
    resource: Resource,
    loggers: Mutex<HashSet<InstrumentationScope>>,
    is_shutdown: AtomicBool,
    shutdown_result: Completion,
}

impl LoggerProviderInner {
    fn shutdown(&self, timeout: Duration) -> SdkResult {
        let deadline = Deadline::after(timeout);
        let mut results = Vec::with_capacity(self.processors.len());
        for slot in &self.processors {
            let remaining = deadline.remaining();
            if remaining.is_zero() && !slot.is_shutdown() {
                otel_warn!(
                    name: "LoggerProvider.Shutdown.Timeout",
                    timeout_ms = timeout.as_millis() as u64,
                    message = "Shutdown deadline expired before every processor was shut down. Remaining processors are shut down when the provider is dropped."
                );
                return Err(SdkError::Timeout(timeout));
            }
            results.push(slot.shutdown(remaining));
        }
        combine_results(results)
    }
}

impl Drop for LoggerProviderInner {
    fn drop(&mut self) {
        let remaining = self
            .processors
            .iter()
            .filter(|slot| !slot.is_shutdown())
            .count();
        if remaining == 0 {
            otel_debug!(
                name: "LoggerProvider.Drop.AlreadyShutdown",
                message = "LoggerProvider was already shut down; drop will not attempt shutdown again."
            );
            return;
        }

        otel_info!(
            name: "LoggerProvider.Drop",
            processor_count = remaining,
            message = "Last reference of LoggerProvider dropped, initiating shutdown."
        );
        self.is_shutdown.store(true, Ordering::Release);
        for slot in self.processors.iter().filter(|slot| !slot.is_shutdown()) {
            // errors are logged within the slot
            let _ = slot.shutdown(DEFAULT_TIMEOUT);
        }
    }
}

#[derive(Debug, Default)]
/// Builder for provider attributes.
pub struct LoggerProviderBuilder {
    processors: Vec<Box<dyn LogProcessor>>,
    resource: Option<Resource>,
}

impl LoggerProviderBuilder {
    /// Adds a [SimpleLogProcessor] exporting to `exporter`.
    ///
    /// Processors are invoked in the order they are added.
    pub fn with_simple_exporter<T: LogExporter + 'static>(self, exporter: T) -> Self {
        self.with_log_processor(SimpleLogProcessor::new(exporter))
    }

    /// Adds a [BatchLogProcessor] with the default configuration exporting
    /// to `exporter`.
    ///
    /// Processors are invoked in the order they are added.
    pub fn with_batch_exporter<T: LogExporter + 'static>(self, exporter: T) -> Self {
        let batch = BatchLogProcessor::builder(exporter).build();
        self.with_log_processor(batch)
    }

    /// Adds a custom [LogProcessor] to the pipeline.
    ///
    /// Processors are invoked in the order they are added.
    pub fn with_log_processor<T: LogProcessor + 'static>(self, processor: T) -> Self {
        let mut processors = self.processors;
        processors.push(Box::new(processor));

        LoggerProviderBuilder { processors, ..self }
    }

    /// The `Resource` to be associated with this Provider.
    ///
    /// Its attributes are merged over the detected defaults, so they win on
    /// conflicting keys.
    pub fn with_resource(self, resource: Resource) -> Self {
        LoggerProviderBuilder {
            resource: Some(resource),
            ..self
        }
    }

    /// Create a new provider from this configuration.
    pub fn build(self) -> SdkLoggerProvider {
        let resource = match self.resource {
            Some(resource) => Resource::builder().build().merge(&resource),
            None => Resource::builder().build(),
        };

        let mut processors = self.processors;
        // invoke set_resource on all the processors
        for processor in processors.iter_mut() {
            processor.set_resource(&resource);
        }

        otel_debug!(name: "LoggerProvider.Built", processor_count = processors.len());
        SdkLoggerProvider {
            inner: Arc::new(LoggerProviderInner {
                processors: processors
                    .into_iter()
                    .map(|processor| ProcessorSlot {
                        processor,
                        result: OnceLock::new(),
                    })
                    .collect(),
                resource,
                loggers: Mutex::new(HashSet::new()),
                is_shutdown: AtomicBool::new(false),
                shutdown_result: Completion::default(),
            }),
        }
    }
}
