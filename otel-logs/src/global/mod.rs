//! Process-wide state: the global logger provider and the error sink.
//!
//! Libraries that cannot receive a provider explicitly obtain loggers through
//! [`logger`]; the application installs its provider once with
//! [`set_logger_provider`] during bootstrap. Prefer passing a provider
//! explicitly wherever possible.
//!
//! ```
//! use otel_logs::global;
//! use otel_logs::logs::{LogRecord, Logger, NoopLoggerProvider, Severity};
//!
//! let logger = global::logger("checkout");
//! global::set_logger_provider(NoopLoggerProvider::new());
//! logger.emit(LogRecord::new().with_severity_number(Severity::Info).with_body("ready"));
//! ```
mod error_handler;
mod internal_logging;
mod logs;

pub use error_handler::{handle_error, set_error_handler};
pub use logs::{
    logger, logger_provider, logger_with_scope, set_logger_provider, BoxedLogger,
    GlobalLoggerProvider, ObjectSafeLoggerProvider,
};
