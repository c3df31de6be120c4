//! Bridge from the [`log`] crate to `otel-logs`.
//!
//! [`OtelLogBridge`] implements [`log::Log`]; install it with
//! [`log::set_boxed_logger`] and every `log` macro call becomes a
//! [`LogRecord`] handed to the logger of the provider it was built from.
//!
//! ```no_run
//! use log::{info, Level};
//! use otel_logs_appender_log::OtelLogBridge;
//! use otel_logs_sdk::logs::SdkLoggerProvider;
//!
//! let provider = SdkLoggerProvider::builder()
//!     .with_simple_exporter(otel_logs_stdout::LogExporter::default())
//!     .build();
//!
//! log::set_boxed_logger(Box::new(OtelLogBridge::new(&provider))).unwrap();
//! log::set_max_level(Level::Info.to_level_filter());
//!
//! info!(user = "alice"; "signed in");
//! ```
//!
//! Records are mapped as follows:
//!
//! | `log` | `LogRecord` |
//! |---|---|
//! | level | `severity_number`, `severity_text` |
//! | formatted message | `body` |
//! | target | `target` attribute |
//! | module path, file, line | `code.namespace`, `code.filepath`, `code.lineno` |
//! | key-values | attributes, in order |
#![warn(missing_debug_implementations, missing_docs)]

use log::kv::{self, VisitSource};
use log::{Level, Metadata, Record};
use otel_logs::logs::{LogRecord, Logger, LoggerProvider, Severity};
use otel_logs::{otel_debug, Key, Value};
use std::fmt;
use std::marker::PhantomData;
use std::time::SystemTime;

/// Scope name of the logger used by the bridge.
const SCOPE_NAME: &str = "otel-logs-appender-log";

/// A [`log::Log`] implementation forwarding records to an `otel-logs` logger.
pub struct OtelLogBridge<P, L>
where
    P: LoggerProvider<Logger = L> + Send + Sync,
    L: Logger + Send + Sync,
{
    logger: L,
    _phantom: PhantomData<P>,
}

impl<P, L> OtelLogBridge<P, L>
where
    P: LoggerProvider<Logger = L> + Send + Sync,
    L: Logger + Send + Sync,
{
    /// Creates a bridge emitting through a logger of `provider`.
    pub fn new(provider: &P) -> Self {
        OtelLogBridge {
            logger: provider.logger(SCOPE_NAME),
            _phantom: PhantomData,
        }
    }
}

impl<P, L> fmt::Debug for OtelLogBridge<P, L>
where
    P: LoggerProvider<Logger = L> + Send + Sync,
    L: Logger + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtelLogBridge").finish_non_exhaustive()
    }
}

impl<P, L> log::Log for OtelLogBridge<P, L>
where
    P: LoggerProvider<Logger = L> + Send + Sync,
    L: Logger + Send + Sync,
{
    // Level filtering is left to `log::set_max_level`.
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let body: Value = match record.args().as_str() {
            Some(message) => message.into(),
            None => record.args().to_string().into(),
        };
        let mut log_record = self
            .logger
            .create_log_record()
            .with_timestamp(SystemTime::now())
            .with_severity_number(severity_of_level(record.level()))
            .with_severity_text(record.level().as_str())
            .with_body(body)
            .with_attribute("target", record.target().to_string());

        if let Some(module_path) = record.module_path() {
            log_record.add_attribute("code.namespace", module_path.to_string());
        }
        if let Some(file) = record.file() {
            log_record.add_attribute("code.filepath", file.to_string());
        }
        if let Some(line) = record.line() {
            log_record.add_attribute("code.lineno", i64::from(line));
        }

        let mut visitor = AttributeVisitor(&mut log_record);
        if let Err(err) = record.key_values().visit(&mut visitor) {
            otel_debug!(name: "LogBridge.KeyValueError", error = err.to_string());
        }

        self.logger.emit(log_record);
    }

    fn flush(&self) {}
}

/// Maps a `log` level to the base sub-level of the matching severity.
pub fn severity_of_level(level: Level) -> Severity {
    match level {
        Level::Error => Severity::Error,
        Level::Warn => Severity::Warn,
        Level::Info => Severity::Info,
        Level::Debug => Severity::Debug,
        Level::Trace => Severity::Trace,
    }
}

struct AttributeVisitor<'a>(&'a mut LogRecord);

impl<'kvs> VisitSource<'kvs> for AttributeVisitor<'_> {
    fn visit_pair(&mut self, key: kv::Key<'kvs>, value: kv::Value<'kvs>) -> Result<(), kv::Error> {
        self.0
            .add_attribute(Key::from(key.as_str().to_string()), to_value(&value));
        Ok(())
    }
}

fn to_value(value: &kv::Value<'_>) -> Value {
    if let Some(b) = value.to_bool() {
        return b.into();
    }
    if let Some(i) = value.to_i64() {
        return i.into();
    }
    // Integers above i64::MAX keep their exact digits.
    if let Some(u) = value.to_u64() {
        return u.to_string().into();
    }
    if let Some(f) = value.to_f64() {
        return f.into();
    }
    value.to_string().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;
    use otel_logs_sdk::logs::{InMemoryLogExporter, InMemoryLogExporterBuilder, SdkLoggerProvider};
    use rstest::rstest;

    fn setup() -> (SdkLoggerProvider, InMemoryLogExporter) {
        let exporter = InMemoryLogExporter::default();
        let provider = SdkLoggerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        (provider, exporter)
    }

    fn single_record(exporter: &InMemoryLogExporter) -> LogRecord {
        let mut logs = exporter.get_emitted_logs().unwrap();
        assert_eq!(logs.len(), 1);
        logs.remove(0).record
    }

    #[rstest]
    #[case(Level::Error, Severity::Error, "ERROR")]
    #[case(Level::Warn, Severity::Warn, "WARN")]
    #[case(Level::Info, Severity::Info, "INFO")]
    #[case(Level::Debug, Severity::Debug, "DEBUG")]
    #[case(Level::Trace, Severity::Trace, "TRACE")]
    fn levels_map_to_severities(
        #[case] level: Level,
        #[case] severity: Severity,
        #[case] text: &str,
    ) {
        let (provider, exporter) = setup();
        let bridge = OtelLogBridge::new(&provider);

        bridge.log(
            &Record::builder()
                .level(level)
                .args(format_args!("level test"))
                .build(),
        );

        let record = single_record(&exporter);
        assert_eq!(record.severity_number, severity);
        assert_eq!(record.severity_text(), text);
    }

    #[test]
    fn message_target_and_location_are_kept() {
        let (provider, exporter) = setup();
        let bridge = OtelLogBridge::new(&provider);
        let fruit = "apple";

        bridge.log(
            &Record::builder()
                .level(Level::Info)
                .target("shop")
                .module_path_static(Some("shop::cart"))
                .file_static(Some("src/cart.rs"))
                .line(Some(42))
                .args(format_args!("hello from {fruit}"))
                .build(),
        );

        let mut logs = exporter.get_emitted_logs().unwrap();
        assert_eq!(logs.len(), 1);
        let data = logs.remove(0);
        assert_eq!(data.scope.name(), SCOPE_NAME);

        let record = data.record;
        assert_eq!(record.body, Some(Value::from("hello from apple")));
        assert!(record.timestamp.is_some());
        assert!(record.observed_timestamp.is_some());
        assert_eq!(record.attribute("target"), Some(&Value::from("shop")));
        assert_eq!(
            record.attribute("code.namespace"),
            Some(&Value::from("shop::cart"))
        );
        assert_eq!(
            record.attribute("code.filepath"),
            Some(&Value::from("src/cart.rs"))
        );
        assert_eq!(record.attribute("code.lineno"), Some(&Value::from(42_i64)));
    }

    #[test]
    fn key_values_become_attributes() {
        let (provider, exporter) = setup();
        let bridge = OtelLogBridge::new(&provider);
        let pairs = [
            ("user", kv::Value::from("alice")),
            ("retries", kv::Value::from(3_i64)),
            ("price", kv::Value::from(2.99_f64)),
            ("cached", kv::Value::from(true)),
            ("huge", kv::Value::from(u64::MAX)),
        ];

        bridge.log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("checkout"))
                .key_values(&pairs)
                .build(),
        );

        let record = single_record(&exporter);
        assert_eq!(record.attribute("user"), Some(&Value::from("alice")));
        assert_eq!(record.attribute("retries"), Some(&Value::from(3_i64)));
        assert_eq!(record.attribute("price"), Some(&Value::from(2.99_f64)));
        assert_eq!(record.attribute("cached"), Some(&Value::from(true)));
        assert_eq!(
            record.attribute("huge"),
            Some(&Value::from(u64::MAX.to_string()))
        );

        let keys: Vec<_> = record
            .attributes
            .iter()
            .map(|kv| kv.key.as_str())
            .filter(|key| !key.starts_with("code.") && *key != "target")
            .collect();
        assert_eq!(keys, ["user", "retries", "price", "cached", "huge"]);
    }

    #[test]
    fn nothing_is_emitted_after_provider_shutdown() {
        let exporter = InMemoryLogExporterBuilder::new()
            .keep_records_on_shutdown()
            .build();
        let provider = SdkLoggerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let bridge = OtelLogBridge::new(&provider);

        bridge.log(&Record::builder().args(format_args!("before")).build());
        assert!(provider.shutdown().is_ok());
        bridge.log(&Record::builder().args(format_args!("after")).build());
        bridge.flush();

        let record = single_record(&exporter);
        assert_eq!(record.body, Some(Value::from("before")));
        assert!(bridge.enabled(&Metadata::builder().level(Level::Trace).build()));
    }
}
