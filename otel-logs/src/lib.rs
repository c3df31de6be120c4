//! API for emitting structured telemetry log records.
//!
//! This crate holds the record model ([`logs::LogRecord`]), the
//! [`logs::Logger`] / [`logs::LoggerProvider`] traits implemented by the
//! `otel-logs-sdk` crate, the process-wide [`global`] provider with its
//! deferred loggers, trace correlation ids and the carriers used to move
//! them across process boundaries ([`propagation`]).
//!
//! Library authors depend on this crate only; applications pick an SDK and
//! exporters and install the provider at startup.
//!
//! ```
//! use otel_logs::logs::{LogRecord, Logger, LoggerProvider, NoopLoggerProvider, Severity};
//!
//! let provider = NoopLoggerProvider::new();
//! let logger = provider.logger("inventory");
//! logger.emit(
//!     LogRecord::new()
//!         .with_severity_number(Severity::Info)
//!         .with_body("stock refreshed")
//!         .with_attribute("items", 42_i64),
//! );
//! ```
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

use std::sync::PoisonError;

pub mod global;

mod common;

pub use common::{
    Array, InstrumentationScope, InstrumentationScopeBuilder, Key, KeyValue, StringValue, Value,
};

mod trace_context;

pub use trace_context::{SpanId, TraceContext, TraceFlags, TraceId};

pub mod logs;

pub mod propagation;

/// Errors reported to the process-wide error sink.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Delivering records to an exporter failed.
    #[error("export failed: {0}")]
    Export(String),

    /// Any other pipeline failure.
    #[error("{0}")]
    Other(String),
}

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Error::Other(err.to_string())
    }
}

#[cfg(feature = "internal-logs")]
#[doc(hidden)]
pub mod _private {
    pub use tracing::{debug, error, info, warn};
}
