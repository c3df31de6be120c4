use crate::transform::{human_readable, valid_trace_context, LogsData};
use core::fmt;
use otel_logs::otel_debug;
use otel_logs_sdk::error::{SdkError, SdkResult};
use otel_logs_sdk::logs::LogBatch;
use otel_logs_sdk::Resource;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Output layout of [`LogExporter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// An indented listing, one block per record.
    #[default]
    Human,
    /// One JSON document per exported batch, on a single line.
    Json,
}

/// An exporter that writes log records to stdout, or to any writer, on
/// export.
pub struct LogExporter {
    writer: Mutex<Box<dyn Write + Send>>,
    format: Format,
    resource: Resource,
    is_shutdown: AtomicBool,
    resource_emitted: AtomicBool,
}

impl Default for LogExporter {
    fn default() -> Self {
        LogExporterBuilder::default().build()
    }
}

impl fmt::Debug for LogExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogExporter")
            .field("format", &self.format)
            .field("is_shutdown", &self.is_shutdown.load(Ordering::Relaxed))
            .finish()
    }
}

impl LogExporter {
    /// Builder writing to stdout in the human readable format.
    pub fn builder() -> LogExporterBuilder {
        LogExporterBuilder::default()
    }

    fn write_batch(&self, batch: &LogBatch<'_>) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        match self.format {
            Format::Json => {
                serde_json::to_writer(&mut *writer, &LogsData::new(&self.resource, batch))?;
                writeln!(writer)?;
            }
            Format::Human => {
                if !self.resource_emitted.swap(true, Ordering::AcqRel) {
                    self.write_resource(&mut *writer)?;
                }
                write_records(&mut *writer, batch)?;
            }
        }
        writer.flush()
    }

    fn write_resource(&self, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "Resource")?;
        if let Some(schema_url) = self.resource.schema_url() {
            writeln!(writer, "\t Resource SchemaUrl: {schema_url:?}")?;
        }
        let mut attributes: Vec<_> = self.resource.iter().collect();
        attributes.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        for (key, value) in attributes {
            writeln!(writer, "\t ->  {key}={value}")?;
        }
        Ok(())
    }
}

impl otel_logs_sdk::logs::LogExporter for LogExporter {
    /// Export logs to the configured writer
    async fn export(&self, batch: LogBatch<'_>) -> SdkResult {
        if self.is_shutdown.load(Ordering::Acquire) {
            return Err(SdkError::AlreadyShutdown);
        }
        if batch.is_empty() {
            return Ok(());
        }
        self.write_batch(&batch)
            .map_err(|err| SdkError::ExportFailed(err.to_string()))
    }

    fn shutdown_with_timeout(&self, _timeout: Duration) -> SdkResult {
        if self.is_shutdown.swap(true, Ordering::AcqRel) {
            return Err(SdkError::AlreadyShutdown);
        }
        otel_debug!(name: "StdoutLogExporter.Shutdown");
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
            .map_err(|err| SdkError::InternalFailure(err.to_string()))
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.resource = resource.clone();
    }
}

fn write_records(writer: &mut dyn Write, batch: &LogBatch<'_>) -> io::Result<()> {
    writeln!(writer, "Logs")?;
    for (i, (record, scope)) in batch.iter().enumerate() {
        writeln!(writer, "Log #{i}")?;
        writeln!(writer, "\t Instrumentation Scope: {}", scope.name())?;
        if let Some(version) = scope.version() {
            writeln!(writer, "\t Scope Version: {version}")?;
        }
        if let Some(trace_context) = valid_trace_context(&record.trace_context) {
            writeln!(writer, "\t TraceId: {}", trace_context.trace_id)?;
            writeln!(writer, "\t SpanId: {}", trace_context.span_id)?;
            writeln!(writer, "\t TraceFlags: {:02x}", trace_context.trace_flags.to_u8())?;
        }
        if let Some(timestamp) = record.timestamp {
            writeln!(writer, "\t Timestamp: {}", human_readable(timestamp))?;
        }
        if let Some(timestamp) = record.observed_timestamp {
            writeln!(writer, "\t Observed Timestamp: {}", human_readable(timestamp))?;
        }
        writeln!(writer, "\t SeverityText: {}", record.severity_text())?;
        writeln!(writer, "\t SeverityNumber: {}", record.severity_number.number())?;
        if let Some(body) = &record.body {
            writeln!(writer, "\t Body: {body}")?;
        }

        writeln!(writer, "\t Attributes:")?;
        for kv in &record.attributes {
            writeln!(writer, "\t\t ->  {}: {}", kv.key, kv.value)?;
        }
    }
    Ok(())
}

/// Builder for [`LogExporter`].
pub struct LogExporterBuilder {
    writer: Box<dyn Write + Send>,
    format: Format,
}

impl Default for LogExporterBuilder {
    fn default() -> Self {
        LogExporterBuilder {
            writer: Box::new(io::stdout()),
            format: Format::default(),
        }
    }
}

impl fmt::Debug for LogExporterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogExporterBuilder")
            .field("format", &self.format)
            .finish()
    }
}

impl LogExporterBuilder {
    /// Write to `writer` instead of stdout.
    pub fn with_writer<W: Write + Send + 'static>(self, writer: W) -> Self {
        LogExporterBuilder {
            writer: Box::new(writer),
            ..self
        }
    }

    /// Select the output layout.
    pub fn with_format(self, format: Format) -> Self {
        LogExporterBuilder { format, ..self }
    }

    /// Create the exporter.
    pub fn build(self) -> LogExporter {
        LogExporter {
            writer: Mutex::new(self.writer),
            format: self.format,
            resource: Resource::builder().build(),
            is_shutdown: AtomicBool::new(false),
            resource_emitted: AtomicBool::new(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otel_logs::logs::{LogRecord, Logger, LoggerProvider, Severity};
    use otel_logs::{InstrumentationScope, KeyValue, SpanId, TraceContext, TraceFlags, TraceId};
    use otel_logs_sdk::logs::{LogExporter as _, SdkLoggerProvider};
    use std::sync::Arc;
    use std::time::UNIX_EPOCH;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn provider(format: Format, buffer: &SharedBuffer) -> SdkLoggerProvider {
        let exporter = LogExporter::builder()
            .with_writer(buffer.clone())
            .with_format(format)
            .build();
        SdkLoggerProvider::builder()
            .with_resource(
                Resource::builder_empty()
                    .with_service_name("stdout-test")
                    .build(),
            )
            .with_simple_exporter(exporter)
            .build()
    }

    fn sample_record() -> LogRecord {
        LogRecord::new()
            .with_timestamp(UNIX_EPOCH + Duration::from_secs(1_700_000_000))
            .with_severity_number(Severity::Warn)
            .with_body("disk almost full")
            .with_attribute("free_mb", 512_i64)
            .with_trace_context(TraceContext::new(
                TraceId::from(0x4bf92f3577b34da6a3ce929d0e0e4736),
                SpanId::from(0x00f067aa0ba902b7),
                TraceFlags::SAMPLED,
            ))
    }

    #[test]
    fn json_output_is_one_document_per_batch() {
        let buffer = SharedBuffer::default();
        let provider = provider(Format::Json, &buffer);
        let logger = provider.logger_with_scope(
            InstrumentationScope::builder("storage")
                .with_version("2.1.0")
                .with_attributes([KeyValue::new("node", "a1")])
                .build(),
        );

        logger.emit(sample_record());
        assert!(provider.shutdown().is_ok());

        let output = buffer.contents();
        assert_eq!(output.lines().count(), 1);
        let json: serde_json::Value = serde_json::from_str(output.trim()).unwrap();

        let resource_logs = &json["resourceLogs"][0];
        assert!(resource_logs["resource"]["attributes"]
            .as_array()
            .unwrap()
            .iter()
            .any(|kv| kv["key"] == "service.name"
                && kv["value"]["stringValue"] == "stdout-test"));

        let scope_logs = &resource_logs["scopeLogs"][0];
        assert_eq!(scope_logs["scope"]["name"], "storage");
        assert_eq!(scope_logs["scope"]["version"], "2.1.0");
        assert_eq!(scope_logs["scope"]["attributes"][0]["key"], "node");

        let record = &scope_logs["logRecords"][0];
        assert_eq!(record["timeUnixNano"], 1_700_000_000_000_000_000_u64);
        assert_eq!(record["time"], "2023-11-14T22:13:20.000000Z");
        assert!(record["observedTimeUnixNano"].as_u64().is_some());
        assert_eq!(record["severityNumber"], 13);
        assert_eq!(record["severityText"], "WARN");
        assert_eq!(record["body"]["stringValue"], "disk almost full");
        assert_eq!(record["attributes"][0]["key"], "free_mb");
        assert_eq!(record["attributes"][0]["value"]["intValue"], 512);
        assert_eq!(record["traceId"], "4bf92f3577b34da6a3ce929d0e0e4736");
        assert_eq!(record["spanId"], "00f067aa0ba902b7");
        assert_eq!(record["flags"], 1);
    }

    #[test]
    fn json_groups_records_by_scope() {
        let buffer = SharedBuffer::default();
        let exporter = LogExporter::builder()
            .with_writer(buffer.clone())
            .with_format(Format::Json)
            .build();

        let first = InstrumentationScope::builder("first").build();
        let second = InstrumentationScope::builder("second").build();
        let records = [LogRecord::new().with_body("a"), LogRecord::new().with_body("b")];
        let data = [
            (&records[0], &first),
            (&records[1], &second),
            (&records[0], &first),
        ];
        futures_executor::block_on(exporter.export(LogBatch::new(&data))).unwrap();

        let json: serde_json::Value = serde_json::from_str(buffer.contents().trim()).unwrap();
        let scope_logs = json["resourceLogs"][0]["scopeLogs"].as_array().unwrap();
        assert_eq!(scope_logs.len(), 2);
        assert_eq!(scope_logs[0]["scope"]["name"], "first");
        assert_eq!(scope_logs[0]["logRecords"].as_array().unwrap().len(), 2);
        assert_eq!(scope_logs[1]["scope"]["name"], "second");
        // no valid trace context, no correlation fields
        assert!(scope_logs[1]["logRecords"][0].get("traceId").is_none());
    }

    #[test]
    fn human_output_lists_resource_once() {
        let buffer = SharedBuffer::default();
        let provider = provider(Format::Human, &buffer);
        let logger = provider.logger("storage");

        logger.emit(sample_record());
        logger.emit(LogRecord::new().with_severity_number(Severity::Info));
        assert!(provider.shutdown().is_ok());

        let output = buffer.contents();
        assert_eq!(output.matches("Resource\n").count(), 1);
        assert!(output.contains("\t ->  service.name=stdout-test"));
        assert!(output.contains("\t Instrumentation Scope: storage"));
        assert!(output.contains("\t Timestamp: 2023-11-14T22:13:20.000000Z"));
        assert!(output.contains("\t SeverityText: WARN"));
        assert!(output.contains("\t Body: disk almost full"));
        assert!(output.contains("\t\t ->  free_mb: 512"));
        assert!(output.contains("\t TraceId: 4bf92f3577b34da6a3ce929d0e0e4736"));
        assert!(output.contains("\t SeverityText: INFO"));
        assert_eq!(output.matches("Logs\n").count(), 2);
    }

    #[test]
    fn export_after_shutdown_fails() {
        let buffer = SharedBuffer::default();
        let exporter = LogExporter::builder().with_writer(buffer.clone()).build();
        let scope = InstrumentationScope::builder("late").build();
        let record = LogRecord::new().with_body("too late");

        assert!(exporter.shutdown().is_ok());
        assert_eq!(exporter.shutdown(), Err(SdkError::AlreadyShutdown));

        let data = [(&record, &scope)];
        let result = futures_executor::block_on(exporter.export(LogBatch::new(&data)));
        assert_eq!(result, Err(SdkError::AlreadyShutdown));
        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let buffer = SharedBuffer::default();
        let exporter = LogExporter::builder().with_writer(buffer.clone()).build();

        let result = futures_executor::block_on(exporter.export(LogBatch::new(&[])));
        assert!(result.is_ok());
        assert!(buffer.contents().is_empty());
    }
}
