//! Log SDK: processors, batching and the provider behind
//! [`otel_logs::logs::LoggerProvider`].
//!
//! Records emitted through an [`SdkLogger`](logs::SdkLogger) are handed to
//! every configured [`LogProcessor`](logs::LogProcessor). The
//! [`BatchLogProcessor`](logs::BatchLogProcessor) buffers them in a bounded
//! queue and exports them in batches from a background thread, so the
//! emitting thread never waits for the exporter.
//!
//! ```no_run
//! use otel_logs::logs::{LogRecord, Logger, LoggerProvider, Severity};
//! use otel_logs_sdk::error::SdkResult;
//! use otel_logs_sdk::logs::{LogBatch, LogExporter, SdkLoggerProvider};
//! use otel_logs_sdk::Resource;
//!
//! #[derive(Debug)]
//! struct PrintExporter;
//!
//! impl LogExporter for PrintExporter {
//!     async fn export(&self, batch: LogBatch<'_>) -> SdkResult {
//!         for (record, scope) in batch.iter() {
//!             println!("{} {:?}", scope.name(), record.body);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let provider = SdkLoggerProvider::builder()
//!     .with_resource(Resource::builder().with_service_name("inventory").build())
//!     .with_batch_exporter(PrintExporter)
//!     .build();
//!
//! let logger = provider.logger("inventory");
//! logger.emit(
//!     LogRecord::new()
//!         .with_severity_number(Severity::Warn)
//!         .with_body("stock low"),
//! );
//!
//! provider.shutdown().expect("shutdown failed");
//! ```
//!
//! ## Crate Feature Flags
//!
//! * `internal-logs`: forward the SDK's own diagnostics to `tracing`
//!   (enabled by default).
//! * `testing`: the [`InMemoryLogExporter`](logs::InMemoryLogExporter).
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]

pub mod error;
pub mod logs;
pub mod resource;
mod util;

pub use resource::Resource;
