//! Log record model and the logging bridge API.
//!
//! Logging library authors build appenders on top of [`Logger`] and
//! [`LoggerProvider`]; the SDK supplies the implementations that batch and
//! export records.
mod logger;
mod noop;
mod record;

pub use logger::{Logger, LoggerProvider};
pub use noop::{NoopLogger, NoopLoggerProvider};
pub use record::{LogRecord, Severity};
