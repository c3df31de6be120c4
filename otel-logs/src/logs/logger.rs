use std::borrow::Cow;

use crate::{logs::LogRecord, InstrumentationScope};

/// The interface for emitting [`LogRecord`]s.
pub trait Logger {
    /// Creates an empty record to be filled by the caller.
    fn create_log_record(&self) -> LogRecord {
        LogRecord::default()
    }

    /// Emit a [`LogRecord`].
    ///
    /// The record is moved into the logger, so the producer cannot touch it
    /// once emitted. Emitting never reports pipeline failures to the caller.
    fn emit(&self, record: LogRecord);
}

/// Interfaces that can create [`Logger`] instances.
pub trait LoggerProvider {
    /// The [`Logger`] type that this provider will return.
    type Logger: Logger;

    /// Returns a logger for the given instrumentation scope.
    ///
    /// # Examples
    ///
    /// ```
    /// use otel_logs::InstrumentationScope;
    /// use otel_logs::logs::{LoggerProvider, NoopLoggerProvider};
    ///
    /// let provider = NoopLoggerProvider::new();
    ///
    /// let scope = InstrumentationScope::builder(env!("CARGO_PKG_NAME"))
    ///     .with_version(env!("CARGO_PKG_VERSION"))
    ///     .build();
    ///
    /// let logger = provider.logger_with_scope(scope);
    /// ```
    fn logger_with_scope(&self, scope: InstrumentationScope) -> Self::Logger;

    /// Returns a logger with the given name.
    fn logger(&self, name: impl Into<Cow<'static, str>>) -> Self::Logger {
        self.logger_with_scope(InstrumentationScope::builder(name).build())
    }
}
