//! Export log records to stdout.
//!
//! Two formats are available: a human readable listing (the default) and
//! one JSON document per exported batch, shaped like the OTLP JSON encoding.
//!
//! # Examples
//!
//! ```no_run
//! use otel_logs::logs::{LogRecord, Logger, LoggerProvider, Severity};
//! use otel_logs_sdk::logs::SdkLoggerProvider;
//! use otel_logs_stdout::{Format, LogExporter};
//!
//! let exporter = LogExporter::builder().with_format(Format::Json).build();
//! let provider = SdkLoggerProvider::builder()
//!     .with_batch_exporter(exporter)
//!     .build();
//!
//! provider.logger("shop").emit(
//!     LogRecord::new()
//!         .with_severity_number(Severity::Info)
//!         .with_body("order placed"),
//! );
//!
//! // recorded logs are written to stdout when the batch is exported:
//! // {"resourceLogs":[{"resource":{"attributes":[{"key":"service.name","value":{"stri..
//! let _ = provider.shutdown();
//! ```
#![warn(missing_debug_implementations, missing_docs)]

mod exporter;
mod transform;

pub use exporter::{Format, LogExporter, LogExporterBuilder};
