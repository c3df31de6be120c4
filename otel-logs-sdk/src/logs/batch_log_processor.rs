//! # Batch Log Processor
//!
//! The `BatchLogProcessor` buffers emitted records in a bounded queue and
//! hands them to the exporter in batches from a dedicated background thread.
//! This is the processor to use in production: emitting never waits for the
//! exporter, and at most one `export` call is in flight at a time.
//!
//! ## Diagram
//!
//! ```ascii
//!   +-------------+   +---------------+   +-----------+   +----------+
//!   | SdkLogger   |   | bounded queue |   | worker    |   |          |
//!   | .emit()     +---> (MaxQueueSize)+---> (batches) +---> Exporter |
//!   +-------------+   +---------------+   +-----------+   +----------+
//! ```
//!
//! A batch is exported when one of these happens:
//!
//! - the number of queued records reaches `max_export_batch_size`,
//! - `scheduled_delay` elapsed since the previous export,
//! - [`LogProcessor::force_flush`] or [`LogProcessor::shutdown`] is called.
//!
//! When the queue is full, new records are dropped and counted unless the
//! processor was configured with
//! [`BatchConfigBuilder::with_block_on_queue_full`].
use crate::error::{SdkError, SdkResult};
use crate::logs::export::LogsData;
use crate::logs::{LogBatch, LogExporter, LogProcessor};
use crate::util::{Completion, Deadline};
use crate::Resource;

use futures_timer::Delay;
use futures_util::future::{self, Either};
use otel_logs::logs::LogRecord;
use otel_logs::{global, otel_debug, otel_error, otel_info, otel_warn, InstrumentationScope};

use std::future::Future;
use std::pin::pin;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::mpsc::{
    self, Receiver, RecvTimeoutError, SyncSender, TryRecvError, TrySendError,
};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::{
    cmp::min,
    env,
    fmt::{self, Debug, Formatter},
    str::FromStr,
    thread,
    time::{Duration, Instant},
};

/// Delay interval between two consecutive exports.
pub(crate) const OTEL_BLRP_SCHEDULE_DELAY: &str = "OTEL_BLRP_SCHEDULE_DELAY";
/// Default delay interval between two consecutive exports.
pub(crate) const OTEL_BLRP_SCHEDULE_DELAY_DEFAULT: Duration = Duration::from_millis(5_000);
/// Maximum allowed time to export data.
pub(crate) const OTEL_BLRP_EXPORT_TIMEOUT: &str = "OTEL_BLRP_EXPORT_TIMEOUT";
/// Default maximum allowed time to export data.
pub(crate) const OTEL_BLRP_EXPORT_TIMEOUT_DEFAULT: Duration = Duration::from_millis(30_000);
/// Maximum queue size.
pub(crate) const OTEL_BLRP_MAX_QUEUE_SIZE: &str = "OTEL_BLRP_MAX_QUEUE_SIZE";
/// Default maximum queue size.
pub(crate) const OTEL_BLRP_MAX_QUEUE_SIZE_DEFAULT: usize = 2_048;
/// Maximum batch size, must be less than or equal to OTEL_BLRP_MAX_QUEUE_SIZE.
pub(crate) const OTEL_BLRP_MAX_EXPORT_BATCH_SIZE: &str = "OTEL_BLRP_MAX_EXPORT_BATCH_SIZE";
/// Default maximum batch size.
pub(crate) const OTEL_BLRP_MAX_EXPORT_BATCH_SIZE_DEFAULT: usize = 512;
/// Whether emitters wait for queue space instead of dropping records.
pub(crate) const OTEL_BLRP_BLOCK_ON_QUEUE_FULL: &str = "OTEL_BLRP_BLOCK_ON_QUEUE_FULL";
/// Records are dropped on a full queue by default.
pub(crate) const OTEL_BLRP_BLOCK_ON_QUEUE_FULL_DEFAULT: bool = false;

// Smallest accepted scheduled delay; a zero delay would spin the worker.
const MIN_SCHEDULED_DELAY: Duration = Duration::from_millis(1);
// Only wake-ups and one shutdown request ever travel on the control channel.
const CONTROL_CHANNEL_CAPACITY: usize = 64;
// Longest single wait for queue space before the queue is polled again.
const SPACE_RECHECK_INTERVAL: Duration = Duration::from_millis(50);

/// Items travelling on the data queue, in emit order.
#[allow(clippy::large_enum_variant)]
enum QueueItem {
    Record(LogsData),
    // Everything enqueued before the barrier belongs to the flush that sent
    // it; the worker exports it and answers with the result.
    FlushBarrier(SyncSender<SdkResult>),
}

/// Messages sent to the worker thread on the control channel.
#[derive(Debug)]
enum BatchMessage {
    /// Enough records are queued to fill a batch.
    Wake,
    /// Drain everything, export it and shut the exporter down.
    Shutdown,
}

/// Lifecycle of a [`BatchLogProcessor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ProcessorState {
    /// Accepting and exporting records.
    Running = 0,
    /// Shutdown was requested; new records are rejected.
    Stopping = 1,
    /// The worker is exporting what is left in the queue.
    Draining = 2,
    /// The worker has exited and the exporter is shut down.
    Stopped = 3,
}

impl ProcessorState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ProcessorState::Running,
            1 => ProcessorState::Stopping,
            2 => ProcessorState::Draining,
            _ => ProcessorState::Stopped,
        }
    }
}

/// Exporter and the batch being assembled for it, with the exporter type
/// erased so the processor itself stays non generic.
trait ExportBuffer: Send {
    fn batch(&mut self) -> &mut Vec<LogsData>;
    fn export_batch(&mut self, timeout: Duration) -> SdkResult;
    fn shutdown_exporter(&mut self, timeout: Duration) -> SdkResult;
    fn set_resource(&mut self, resource: &Resource);
}

struct ExportState<E> {
    exporter: E,
    batch: Vec<LogsData>,
}

impl<E: LogExporter> ExportBuffer for ExportState<E> {
    fn batch(&mut self) -> &mut Vec<LogsData> {
        &mut self.batch
    }

    fn export_batch(&mut self, timeout: Duration) -> SdkResult {
        let export = self
            .exporter
            .export(LogBatch::new_with_owned_data(&self.batch));
        let result = futures_executor::block_on(with_timeout(export, timeout));
        self.batch.clear();
        result
    }

    fn shutdown_exporter(&mut self, timeout: Duration) -> SdkResult {
        self.exporter.shutdown_with_timeout(timeout)
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.exporter.set_resource(resource);
    }
}

async fn with_timeout<F>(export: F, timeout: Duration) -> SdkResult
where
    F: Future<Output = SdkResult>,
{
    if Instant::now().checked_add(timeout).is_none() {
        return export.await;
    }
    match future::select(pin!(export), Delay::new(timeout)).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(SdkError::Timeout(timeout)),
    }
}

/// Parks emitters and flush callers while the queue is full.
///
/// The worker signals after taking items off the queue, `shutdown` signals
/// once the processor is closed.
#[derive(Default)]
struct QueueSpace {
    lock: Mutex<()>,
    freed: Condvar,
    waiters: AtomicUsize,
}

impl QueueSpace {
    fn notify(&self) {
        if self.waiters.load(Ordering::SeqCst) > 0 {
            self.notify_all();
        }
    }

    fn notify_all(&self) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.freed.notify_all();
    }
}

/// Why an item waiting for queue space was not enqueued.
#[derive(Debug, PartialEq, Eq)]
enum NotQueued {
    Closed,
    Disconnected,
    TimedOut,
}

impl NotQueued {
    fn as_str(&self) -> &'static str {
        match self {
            NotQueued::Closed => "ProcessorClosed",
            NotQueued::Disconnected => "WorkerStopped",
            NotQueued::TimedOut => "TimedOut",
        }
    }
}

struct Shared {
    buffer: Mutex<Box<dyn ExportBuffer>>,
    config: BatchConfig,
    closed: AtomicBool,
    state: AtomicU8,
    // Records accepted and not yet exported, queued or buffered.
    pending: AtomicUsize,
    wake_sent: AtomicBool,
    dropped: AtomicUsize,
    space: QueueSpace,
    completion: Completion,
}

impl Shared {
    fn lock_buffer(&self) -> MutexGuard<'_, Box<dyn ExportBuffer>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: ProcessorState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Exports the buffered batch, returning `None` when it is empty.
    fn export(&self, buffer: &mut dyn ExportBuffer, timeout: Duration) -> Option<SdkResult> {
        let count = buffer.batch().len();
        if count == 0 {
            return None;
        }

        let result = buffer.export_batch(timeout);
        self.pending.fetch_sub(count, Ordering::AcqRel);
        if let Err(err) = &result {
            otel_error!(
                name: "BatchLogProcessor.ExportError",
                error = format!("{err}"),
                batch_size = count
            );
            global::handle_error(err.clone());
        }
        Some(result)
    }
}

/// Test instrumentation for the worker thread.
#[derive(Default)]
struct WorkerHooks {
    // Held by a test to stop the worker before it handles the next message.
    #[cfg(test)]
    gate: Option<Arc<Mutex<()>>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Wake,
    Timer,
    Shutdown,
}

struct DrainOutcome {
    exported: bool,
    result: SdkResult,
}

impl DrainOutcome {
    fn new() -> Self {
        DrainOutcome {
            exported: false,
            result: Ok(()),
        }
    }

    fn record(&mut self, export: Option<SdkResult>) {
        if let Some(result) = export {
            self.exported = true;
            if self.result.is_ok() {
                self.result = result;
            }
        }
    }
}

struct Worker {
    logs: Receiver<QueueItem>,
    control: Receiver<BatchMessage>,
    shared: Arc<Shared>,
    #[cfg_attr(not(test), allow(dead_code))]
    hooks: WorkerHooks,
}

impl Worker {
    fn run(self) {
        let config = &self.shared.config;
        otel_debug!(
            name: "BatchLogProcessor.ThreadStarted",
            interval_in_millisecs = config.scheduled_delay.as_millis() as u64,
            max_export_batch_size = config.max_export_batch_size,
            max_queue_size = config.max_queue_size
        );

        let mut last_export_time = Instant::now();
        loop {
            let remaining = config
                .scheduled_delay
                .saturating_sub(last_export_time.elapsed());
            match self.control.recv_timeout(remaining) {
                Ok(BatchMessage::Wake) => {
                    self.pass_gate();
                    self.shared.wake_sent.store(false, Ordering::Release);
                    otel_debug!(name: "BatchLogProcessor.ExportingDueToBatchSize");
                    if self.drain(Trigger::Wake).exported {
                        last_export_time = Instant::now();
                    }
                }
                Ok(BatchMessage::Shutdown) => {
                    self.pass_gate();
                    otel_debug!(name: "BatchLogProcessor.ExportingDueToShutdown");
                    self.shutdown();
                    otel_debug!(
                        name: "BatchLogProcessor.ThreadExiting",
                        reason = "ShutdownRequested"
                    );
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    self.pass_gate();
                    otel_debug!(name: "BatchLogProcessor.ExportingDueToTimer");
                    self.drain(Trigger::Timer);
                    last_export_time = Instant::now();
                }
                Err(RecvTimeoutError::Disconnected) => {
                    // The processor was dropped without being shut down.
                    self.shutdown();
                    otel_debug!(
                        name: "BatchLogProcessor.ThreadExiting",
                        reason = "MessageSenderDisconnected"
                    );
                    break;
                }
            }
        }
        otel_debug!(name: "BatchLogProcessor.ThreadStopped");
    }

    fn pass_gate(&self) {
        #[cfg(test)]
        if let Some(gate) = &self.hooks.gate {
            drop(gate.lock().unwrap_or_else(PoisonError::into_inner));
        }
    }

    /// Moves queued records into the batch, exporting each time it is full.
    ///
    /// A flush barrier exports the partial batch and ends the drain, except
    /// during shutdown, which keeps going until the queue is empty.
    fn drain(&self, trigger: Trigger) -> DrainOutcome {
        let max_batch = self.shared.config.max_export_batch_size;
        let export_timeout = self.shared.config.max_export_timeout;
        let mut outcome = DrainOutcome::new();
        let mut buffer = self.shared.lock_buffer();

        loop {
            let item = match self.logs.try_recv() {
                Ok(item) => item,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            self.shared.space.notify();
            match item {
                QueueItem::Record(data) => {
                    buffer.batch().push(data);
                    if buffer.batch().len() >= max_batch {
                        outcome.record(self.shared.export(&mut **buffer, export_timeout));
                    }
                }
                QueueItem::FlushBarrier(ack) => {
                    let export = self.shared.export(&mut **buffer, export_timeout);
                    let _ = ack.send(export.clone().unwrap_or(Ok(())));
                    outcome.record(export);
                    if trigger != Trigger::Shutdown {
                        return outcome;
                    }
                }
            }
        }

        if trigger != Trigger::Wake {
            outcome.record(self.shared.export(&mut **buffer, export_timeout));
        }
        outcome
    }

    fn shutdown(&self) {
        self.shared.set_state(ProcessorState::Draining);
        let drained = self.drain(Trigger::Shutdown);
        let shutdown_result = self
            .shared
            .lock_buffer()
            .shutdown_exporter(self.shared.config.max_export_timeout);
        self.shared.set_state(ProcessorState::Stopped);
        self.shared
            .completion
            .complete(drained.result.and(shutdown_result));
    }
}

/// A [`LogProcessor`] that buffers records and exports them in batches from
/// a background thread.
///
/// ```
/// use otel_logs_sdk::error::SdkResult;
/// use otel_logs_sdk::logs::{BatchConfigBuilder, BatchLogProcessor, LogBatch, LogExporter};
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// struct CountingExporter;
///
/// impl LogExporter for CountingExporter {
///     async fn export(&self, batch: LogBatch<'_>) -> SdkResult {
///         println!("exporting {} records", batch.len());
///         Ok(())
///     }
/// }
///
/// let processor = BatchLogProcessor::builder(CountingExporter)
///     .with_batch_config(
///         BatchConfigBuilder::default()
///             .with_max_queue_size(4096)
///             .with_scheduled_delay(Duration::from_millis(500))
///             .build(),
///     )
///     .build();
/// # drop(processor);
/// ```
pub struct BatchLogProcessor {
    logs_sender: SyncSender<QueueItem>,
    message_sender: SyncSender<BatchMessage>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
    shared: Arc<Shared>,
}

impl Debug for BatchLogProcessor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchLogProcessor")
            .field("config", &self.shared.config)
            .field("state", &self.state())
            .field("dropped", &self.dropped_records_count())
            .finish()
    }
}

impl BatchLogProcessor {
    /// Creates a processor and starts its worker thread.
    pub fn new<E>(exporter: E, config: BatchConfig) -> Self
    where
        E: LogExporter + 'static,
    {
        Self::start(exporter, config, WorkerHooks::default())
    }

    /// Creates a builder for a processor exporting to `exporter`.
    pub fn builder<E>(exporter: E) -> BatchLogProcessorBuilder<E>
    where
        E: LogExporter,
    {
        BatchLogProcessorBuilder {
            exporter,
            config: BatchConfig::default(),
        }
    }

    fn start<E>(exporter: E, config: BatchConfig, hooks: WorkerHooks) -> Self
    where
        E: LogExporter + 'static,
    {
        let (logs_sender, logs) = mpsc::sync_channel(config.max_queue_size);
        let (message_sender, control) = mpsc::sync_channel(CONTROL_CHANNEL_CAPACITY);

        otel_info!(
            name: "BatchLogProcessor.Built",
            max_queue_size = config.max_queue_size,
            max_export_batch_size = config.max_export_batch_size,
            scheduled_delay_ms = config.scheduled_delay.as_millis() as u64,
            max_export_timeout_ms = config.max_export_timeout.as_millis() as u64,
            block_on_queue_full = config.block_on_queue_full
        );

        let buffer: Box<dyn ExportBuffer> = Box::new(ExportState {
            exporter,
            batch: Vec::with_capacity(config.max_export_batch_size),
        });
        let shared = Arc::new(Shared {
            buffer: Mutex::new(buffer),
            config,
            closed: AtomicBool::new(false),
            state: AtomicU8::new(ProcessorState::Running as u8),
            pending: AtomicUsize::new(0),
            wake_sent: AtomicBool::new(false),
            dropped: AtomicUsize::new(0),
            space: QueueSpace::default(),
            completion: Completion::default(),
        });

        let worker = Worker {
            logs,
            control,
            shared: shared.clone(),
            hooks,
        };
        let handle = match thread::Builder::new()
            .name("otel-logs.BatchProcessor".to_string())
            .spawn(move || worker.run())
        {
            Ok(handle) => Some(handle),
            Err(err) => {
                otel_error!(
                    name: "BatchLogProcessor.ThreadSpawnFailed",
                    error = format!("{err}")
                );
                shared.closed.store(true, Ordering::Release);
                shared.set_state(ProcessorState::Stopped);
                shared.completion.complete(Err(SdkError::InternalFailure(format!(
                    "failed to start the export thread: {err}"
                ))));
                None
            }
        };

        BatchLogProcessor {
            logs_sender,
            message_sender,
            handle: Mutex::new(handle),
            shared,
        }
    }

    /// Number of records dropped because the queue was full.
    pub fn dropped_records_count(&self) -> usize {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProcessorState {
        ProcessorState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    fn wake_worker(&self) {
        if self.shared.wake_sent.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Err(err) = self.message_sender.try_send(BatchMessage::Wake) {
            self.shared.wake_sent.store(false, Ordering::Release);
            let reason = match err {
                TrySendError::Full(_) => "ControlChannelFull",
                TrySendError::Disconnected(_) => "WorkerStopped",
            };
            otel_debug!(name: "BatchLogProcessor.WakeFailed", reason = reason);
        }
    }

    /// Waits for room on the full queue until `deadline`. Shutdown wins over
    /// space: once the processor is closed the item is discarded.
    fn send_when_space(&self, mut item: QueueItem, deadline: Deadline) -> Result<(), NotQueued> {
        let space = &self.shared.space;
        space.waiters.fetch_add(1, Ordering::SeqCst);
        let mut guard = space.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let outcome = loop {
            if self.shared.closed.load(Ordering::Acquire) {
                break Err(NotQueued::Closed);
            }
            match self.logs_sender.try_send(item) {
                Ok(()) => break Ok(()),
                Err(TrySendError::Full(returned)) => item = returned,
                Err(TrySendError::Disconnected(_)) => break Err(NotQueued::Disconnected),
            }
            if deadline.is_expired() {
                break Err(NotQueued::TimedOut);
            }
            self.wake_worker();
            let wait = min(SPACE_RECHECK_INTERVAL, deadline.remaining());
            guard = space
                .freed
                .wait_timeout(guard, wait)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        };
        drop(guard);
        space.waiters.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    fn enqueue(&self, item: QueueItem) -> bool {
        match self.logs_sender.try_send(item) {
            Ok(()) => true,
            Err(TrySendError::Full(item)) if self.shared.config.block_on_queue_full => {
                match self.send_when_space(item, Deadline::after(Duration::MAX)) {
                    Ok(()) => true,
                    Err(reason) => {
                        otel_debug!(
                            name: "BatchLogProcessor.Emit.DiscardedWhileBlocked",
                            reason = reason.as_str()
                        );
                        false
                    }
                }
            }
            Err(TrySendError::Full(_)) => {
                if self.shared.dropped.fetch_add(1, Ordering::Relaxed) == 0 {
                    otel_warn!(
                        name: "BatchLogProcessor.LogDroppingStarted",
                        message = "BatchLogProcessor dropped a LogRecord due to queue full. No further log will be emitted for further drops until Shutdown. During Shutdown time, a log will be emitted with exact count of total logs dropped."
                    );
                }
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                otel_warn!(
                    name: "BatchLogProcessor.Emit.AfterShutdown",
                    message = "Logs are being emitted after the export thread stopped. Logs will not be exported."
                );
                false
            }
        }
    }
}

impl LogProcessor for BatchLogProcessor {
    fn emit(&self, record: &mut LogRecord, scope: &InstrumentationScope) {
        if self.shared.closed.load(Ordering::Acquire) {
            otel_warn!(
                name: "BatchLogProcessor.Emit.AfterShutdown",
                message = "Logs are being emitted even after Shutdown. This indicates incorrect lifecycle management of SdkLoggerProvider in application. Logs will not be exported."
            );
            return;
        }

        let item = QueueItem::Record(Box::new((record.clone(), scope.clone())));
        let pending = self.shared.pending.fetch_add(1, Ordering::AcqRel) + 1;
        if !self.enqueue(item) {
            self.shared.pending.fetch_sub(1, Ordering::AcqRel);
            return;
        }
        if pending >= self.shared.config.max_export_batch_size {
            self.wake_worker();
        }
    }

    fn force_flush_with_timeout(&self, timeout: Duration) -> SdkResult {
        if self.shared.closed.load(Ordering::Acquire) {
            otel_debug!(
                name: "BatchLogProcessor.ForceFlush.AlreadyShutdown",
                message = "ForceFlush invoked after Shutdown. This will not perform Flush and indicates a incorrect lifecycle management in Application."
            );
            return Err(SdkError::AlreadyShutdown);
        }

        let deadline = Deadline::after(timeout);
        let (ack_sender, ack) = mpsc::sync_channel(1);
        let barrier = QueueItem::FlushBarrier(ack_sender);
        let queued = match self.logs_sender.try_send(barrier) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(barrier)) => self.send_when_space(barrier, deadline),
            Err(TrySendError::Disconnected(_)) => Err(NotQueued::Disconnected),
        };
        match queued {
            Ok(()) => {}
            Err(NotQueued::TimedOut) => return Err(SdkError::Timeout(timeout)),
            Err(NotQueued::Closed) | Err(NotQueued::Disconnected) => {
                return Err(SdkError::AlreadyShutdown)
            }
        }

        otel_debug!(name: "BatchLogProcessor.ExportingDueToForceFlush");
        self.wake_worker();
        match ack.recv_timeout(deadline.remaining()) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                otel_warn!(
                    name: "BatchLogProcessor.ForceFlush.Timeout",
                    timeout_ms = timeout.as_millis() as u64
                );
                Err(SdkError::Timeout(timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(SdkError::AlreadyShutdown),
        }
    }

    fn shutdown_with_timeout(&self, timeout: Duration) -> SdkResult {
        let first_call = self
            .shared
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if first_call {
            self.shared.set_state(ProcessorState::Stopping);
            self.shared.space.notify_all();
            let dropped_logs = self.dropped_records_count();
            if dropped_logs > 0 {
                otel_warn!(
                    name: "BatchLogProcessor.LogsDropped",
                    dropped_logs_count = dropped_logs,
                    max_queue_size = self.shared.config.max_queue_size,
                    message = "Logs were dropped due to a queue being full. The count represents the total count of log records dropped in the lifetime of this BatchLogProcessor. Consider increasing the queue size and/or decrease delay between intervals."
                );
            }
            if self.message_sender.send(BatchMessage::Shutdown).is_err() {
                self.shared.set_state(ProcessorState::Stopped);
                self.shared.completion.complete(Err(SdkError::InternalFailure(
                    "the export thread is not running".into(),
                )));
            }
        } else {
            otel_debug!(
                name: "BatchLogProcessor.Shutdown.AlreadyShutdown",
                message = "Shutdown is being invoked more than once. This is noop, but indicates a potential issue in the application's lifecycle management."
            );
        }

        match self.shared.completion.wait(timeout) {
            Some(result) => {
                let handle = self
                    .handle
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
                if let Some(handle) = handle {
                    if handle.join().is_err() {
                        otel_error!(name: "BatchLogProcessor.Shutdown.ThreadPanicked");
                    }
                }
                result
            }
            None => {
                otel_error!(
                    name: "BatchLogProcessor.Shutdown.Timeout",
                    message = "BatchLogProcessor shutdown timing out."
                );
                Err(SdkError::Timeout(timeout))
            }
        }
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.shared.lock_buffer().set_resource(resource);
    }
}

/// A builder for creating [`BatchLogProcessor`] instances.
#[derive(Debug)]
pub struct BatchLogProcessorBuilder<E> {
    exporter: E,
    config: BatchConfig,
}

impl<E> BatchLogProcessorBuilder<E>
where
    E: LogExporter + 'static,
{
    /// Set the BatchConfig for [`BatchLogProcessorBuilder`]
    pub fn with_batch_config(self, config: BatchConfig) -> Self {
        BatchLogProcessorBuilder { config, ..self }
    }

    /// Build a batch processor
    pub fn build(self) -> BatchLogProcessor {
        BatchLogProcessor::new(self.exporter, self.config)
    }
}

/// Batch log processor configuration.
/// Use [`BatchConfigBuilder`] to configure your own instance of [`BatchConfig`].
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// The maximum queue size to buffer logs for delayed processing. If the
    /// queue gets full it drops the logs. The default value of is 2048.
    pub(crate) max_queue_size: usize,

    /// The delay interval in milliseconds between two consecutive processing
    /// of batches. The default value is 5 seconds.
    pub(crate) scheduled_delay: Duration,

    /// The maximum number of logs to process in a single batch. If there are
    /// more than one batch worth of logs then it processes multiple batches
    /// of logs one batch after the other without any delay. The default value
    /// is 512.
    pub(crate) max_export_batch_size: usize,

    /// The maximum duration to export a batch of data. The default value is
    /// 30 seconds.
    pub(crate) max_export_timeout: Duration,

    /// Wait for queue space instead of dropping records.
    pub(crate) block_on_queue_full: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfigBuilder::default().build()
    }
}

/// A builder for creating [`BatchConfig`] instances.
#[derive(Debug)]
pub struct BatchConfigBuilder {
    max_queue_size: usize,
    scheduled_delay: Duration,
    max_export_batch_size: usize,
    max_export_timeout: Duration,
    block_on_queue_full: bool,
}

impl Default for BatchConfigBuilder {
    /// Create a new [`BatchConfigBuilder`] initialized with default batch config values, then applies the `OTEL_BLRP_*` environment variables.
    /// The values are overridden by environment variables if set.
    /// The supported environment variables are:
    /// * `OTEL_BLRP_MAX_QUEUE_SIZE`
    /// * `OTEL_BLRP_SCHEDULE_DELAY`
    /// * `OTEL_BLRP_MAX_EXPORT_BATCH_SIZE`
    /// * `OTEL_BLRP_EXPORT_TIMEOUT`
    /// * `OTEL_BLRP_BLOCK_ON_QUEUE_FULL`
    fn default() -> Self {
        BatchConfigBuilder {
            max_queue_size: OTEL_BLRP_MAX_QUEUE_SIZE_DEFAULT,
            scheduled_delay: OTEL_BLRP_SCHEDULE_DELAY_DEFAULT,
            max_export_batch_size: OTEL_BLRP_MAX_EXPORT_BATCH_SIZE_DEFAULT,
            max_export_timeout: OTEL_BLRP_EXPORT_TIMEOUT_DEFAULT,
            block_on_queue_full: OTEL_BLRP_BLOCK_ON_QUEUE_FULL_DEFAULT,
        }
        .init_from_env_vars()
    }
}

impl BatchConfigBuilder {
    /// Set max_queue_size for [`BatchConfigBuilder`].
    /// It's the maximum queue size to buffer logs for delayed processing.
    /// If the queue gets full it will drop the logs.
    /// The default value of is 2048.
    pub fn with_max_queue_size(mut self, max_queue_size: usize) -> Self {
        self.max_queue_size = max_queue_size;
        self
    }

    /// Set scheduled_delay for [`BatchConfigBuilder`].
    /// It's the delay interval in milliseconds between two consecutive processing of batches.
    /// The default value is 5000 milliseconds.
    pub fn with_scheduled_delay(mut self, scheduled_delay: Duration) -> Self {
        self.scheduled_delay = scheduled_delay;
        self
    }

    /// Set max_export_timeout for [`BatchConfigBuilder`].
    /// It's the maximum duration to export a batch of data.
    /// The default value is 30000 milliseconds.
    pub fn with_max_export_timeout(mut self, max_export_timeout: Duration) -> Self {
        self.max_export_timeout = max_export_timeout;
        self
    }

    /// Set max_export_batch_size for [`BatchConfigBuilder`].
    /// It's the maximum number of logs to process in a single batch. If there are
    /// more than one batch worth of logs then it processes multiple batches
    /// of logs one batch after the other without any delay.
    /// The default value is 512.
    pub fn with_max_export_batch_size(mut self, max_export_batch_size: usize) -> Self {
        self.max_export_batch_size = max_export_batch_size;
        self
    }

    /// Make emitters wait for queue space instead of dropping records.
    pub fn with_block_on_queue_full(mut self, block_on_queue_full: bool) -> Self {
        self.block_on_queue_full = block_on_queue_full;
        self
    }

    /// Builds a `BatchConfig` enforcing the following invariants:
    /// * `max_export_batch_size` must be less than or equal to `max_queue_size`.
    /// * sizes are at least one and the scheduled delay at least a millisecond.
    pub fn build(self) -> BatchConfig {
        let max_queue_size = self.max_queue_size.max(1);
        let max_export_batch_size = min(self.max_export_batch_size, max_queue_size).max(1);

        BatchConfig {
            max_queue_size,
            scheduled_delay: self.scheduled_delay.max(MIN_SCHEDULED_DELAY),
            max_export_batch_size,
            max_export_timeout: self.max_export_timeout,
            block_on_queue_full: self.block_on_queue_full,
        }
    }

    fn init_from_env_vars(mut self) -> Self {
        if let Some(max_queue_size) = positive_env::<usize>(OTEL_BLRP_MAX_QUEUE_SIZE) {
            self.max_queue_size = max_queue_size;
        }

        if let Some(max_export_batch_size) = positive_env::<usize>(OTEL_BLRP_MAX_EXPORT_BATCH_SIZE)
        {
            self.max_export_batch_size = max_export_batch_size;
        }

        // A batch larger than the queue falls back to the default batch size,
        // or to the queue size when even the default does not fit.
        if self.max_export_batch_size > self.max_queue_size {
            self.max_export_batch_size =
                if OTEL_BLRP_MAX_EXPORT_BATCH_SIZE_DEFAULT > self.max_queue_size {
                    self.max_queue_size
                } else {
                    OTEL_BLRP_MAX_EXPORT_BATCH_SIZE_DEFAULT
                };
        }

        if let Some(scheduled_delay) = positive_env::<u64>(OTEL_BLRP_SCHEDULE_DELAY) {
            self.scheduled_delay = Duration::from_millis(scheduled_delay);
        }

        if let Some(max_export_timeout) = positive_env::<u64>(OTEL_BLRP_EXPORT_TIMEOUT) {
            self.max_export_timeout = Duration::from_millis(max_export_timeout);
        }

        if let Some(block) = env::var(OTEL_BLRP_BLOCK_ON_QUEUE_FULL)
            .ok()
            .and_then(|value| bool::from_str(&value.trim().to_ascii_lowercase()).ok())
        {
            self.block_on_queue_full = block;
        }

        self
    }
}

// Invalid and zero values are ignored.
fn positive_env<T>(name: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    env::var(name)
        .ok()
        .and_then(|value| T::from_str(value.trim()).ok())
        .filter(|value| *value > T::default())
}
