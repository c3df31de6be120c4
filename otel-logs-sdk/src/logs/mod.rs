//! # Log SDK
//!
//! [`SdkLoggerProvider`] owns an ordered list of [`LogProcessor`]s and hands
//! out [`SdkLogger`]s. Every record a logger emits goes through each
//! processor in turn; [`BatchLogProcessor`] queues it for a background
//! export, [`SimpleLogProcessor`] exports it right away.
mod batch_log_processor;
pub(crate) mod export;
mod log_processor;
mod logger;
mod logger_provider;
mod simple_log_processor;

/// In-Memory log exporter for testing purpose.
#[cfg(any(feature = "testing", test))]
#[cfg_attr(docsrs, doc(cfg(any(feature = "testing", test))))]
pub mod in_memory_exporter;
#[cfg(any(feature = "testing", test))]
#[cfg_attr(docsrs, doc(cfg(any(feature = "testing", test))))]
pub use in_memory_exporter::{InMemoryLogExporter, InMemoryLogExporterBuilder};

pub use batch_log_processor::{
    BatchConfig, BatchConfigBuilder, BatchLogProcessor, BatchLogProcessorBuilder, ProcessorState,
};
pub use export::{LogBatch, LogExporter};
pub use log_processor::LogProcessor;
pub use logger::SdkLogger;
pub use logger_provider::{LoggerProviderBuilder, SdkLoggerProvider};
pub use simple_log_processor::SimpleLogProcessor;

#[cfg(test)]
mod tests {
    use super::*;
    use otel_logs::logs::{LogRecord, Logger, LoggerProvider, Severity};
    use otel_logs::propagation::TraceContextPropagator;
    use otel_logs::{SpanId, TraceContext, TraceFlags, TraceId, Value};
    use std::collections::HashMap;

    #[test]
    fn each_processor_gets_its_own_copy() {
        let batched = InMemoryLogExporterBuilder::new()
            .keep_records_on_shutdown()
            .build();
        let simple = InMemoryLogExporterBuilder::new()
            .keep_records_on_shutdown()
            .build();
        let provider = SdkLoggerProvider::builder()
            .with_batch_exporter(batched.clone())
            .with_simple_exporter(simple.clone())
            .build();

        let logger = provider.logger("fan-out");
        for i in 0..5_i64 {
            logger.emit(
                LogRecord::new()
                    .with_severity_number(Severity::Info)
                    .with_attribute("index", i),
            );
        }

        // the simple exporter saw every record synchronously
        assert_eq!(simple.get_emitted_batches().unwrap().len(), 5);
        assert!(provider.shutdown().is_ok());

        for exporter in [&batched, &simple] {
            let indices: Vec<_> = exporter
                .get_emitted_logs()
                .unwrap()
                .into_iter()
                .map(|log| log.record.attribute("index").cloned())
                .collect();
            let expected: Vec<_> = (0..5_i64).map(|i| Some(Value::from(i))).collect();
            assert_eq!(indices, expected);
        }
    }

    #[test]
    fn trace_context_travels_with_the_record() {
        let exporter = InMemoryLogExporter::default();
        let provider = SdkLoggerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();

        let context = TraceContext::new(
            TraceId::from(0x4bf92f3577b34da6a3ce929d0e0e4736),
            SpanId::from(0x00f067aa0ba902b7),
            TraceFlags::SAMPLED,
        );
        let mut headers: HashMap<String, String> = HashMap::new();
        TraceContextPropagator::new().inject(&context, &mut headers);
        assert_eq!(
            headers.get("traceparent").map(String::as_str),
            Some("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01")
        );
        assert_eq!(headers.keys().count(), 1);

        let mut record = LogRecord::new().with_body("correlated");
        assert!(record.set_trace_context_from(&headers));
        provider.logger("consumer").emit(record);

        let logs = exporter.get_emitted_logs().unwrap();
        assert_eq!(logs[0].record.trace_context, context);
        assert!(logs[0].record.trace_context.trace_flags.is_sampled());

        let empty: HashMap<String, String> = HashMap::new();
        assert!(!LogRecord::new().set_trace_context_from(&empty));
    }
}
