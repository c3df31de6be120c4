use super::SdkLoggerProvider;
use otel_logs::logs::LogRecord;
use otel_logs::InstrumentationScope;
use std::time::SystemTime;

#[derive(Debug, Clone)]
/// The object for emitting [`LogRecord`]s.
///
/// Obtained from [`SdkLoggerProvider`]; every record it emits is handed to
/// the provider's processors in registration order, on the calling thread.
pub struct SdkLogger {
    scope: InstrumentationScope,
    provider: SdkLoggerProvider,
}

impl SdkLogger {
    pub(crate) fn new(scope: InstrumentationScope, provider: SdkLoggerProvider) -> Self {
        SdkLogger { scope, provider }
    }

    /// Scope this logger stamps on its records.
    pub fn scope(&self) -> &InstrumentationScope {
        &self.scope
    }

    #[cfg(test)]
    pub(crate) fn provider(&self) -> &SdkLoggerProvider {
        &self.provider
    }
}

impl otel_logs::logs::Logger for SdkLogger {
    /// Emit a `LogRecord`.
    fn emit(&self, mut record: LogRecord) {
        if self.provider.is_shutdown() {
            return;
        }
        if record.observed_timestamp.is_none() {
            record.observed_timestamp = Some(SystemTime::now());
        }

        for processor in self.provider.log_processors() {
            processor.emit(&mut record, &self.scope);
        }
    }
}
