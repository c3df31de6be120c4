//! The process-wide provider can only be installed once, so the whole
//! lifecycle is exercised by a single test in its own binary.
use otel_logs::global;
use otel_logs::logs::{LogRecord, Logger, LoggerProvider};
use otel_logs::InstrumentationScope;
use otel_logs_sdk::error::SdkResult;
use otel_logs_sdk::logs::{LogBatch, LogExporter, SdkLoggerProvider};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
struct CollectingExporter {
    records: Arc<Mutex<Vec<(String, String)>>>,
}

impl CollectingExporter {
    fn collected(&self) -> Vec<(String, String)> {
        self.records.lock().unwrap().clone()
    }
}

impl LogExporter for CollectingExporter {
    async fn export(&self, batch: LogBatch<'_>) -> SdkResult {
        let mut records = self.records.lock().unwrap();
        for (record, scope) in batch.iter() {
            let body = record.body.as_ref().map(|b| b.to_string()).unwrap_or_default();
            records.push((scope.name().to_string(), body));
        }
        Ok(())
    }
}

fn emit(logger: &impl Logger, body: &'static str) {
    logger.emit(LogRecord::new().with_body(body));
}

#[test]
fn deferred_loggers_follow_the_installed_provider() {
    // handles taken before any provider is installed
    let early = global::logger("early");
    let versioned = global::logger_with_scope(
        InstrumentationScope::builder("versioned")
            .with_version("1.2.0")
            .build(),
    );
    let stale_provider = global::logger_provider();

    emit(&early, "lost before install");
    emit(&versioned, "lost before install");

    let exporter = CollectingExporter::default();
    let provider = SdkLoggerProvider::builder()
        .with_simple_exporter(exporter.clone())
        .build();
    global::set_logger_provider(provider.clone());
    assert!(exporter.collected().is_empty());

    emit(&early, "early after install");
    emit(&versioned, "versioned after install");
    emit(&stale_provider.logger("stale"), "through stale provider");
    emit(&global::logger("late"), "late");

    // a second provider is ignored
    let ignored = CollectingExporter::default();
    global::set_logger_provider(
        SdkLoggerProvider::builder()
            .with_simple_exporter(ignored.clone())
            .build(),
    );
    emit(&global::logger("after-second-install"), "still first provider");
    assert!(ignored.collected().is_empty());

    let expected: Vec<(String, String)> = [
        ("early", "early after install"),
        ("versioned", "versioned after install"),
        ("stale", "through stale provider"),
        ("late", "late"),
        ("after-second-install", "still first provider"),
    ]
    .into_iter()
    .map(|(scope, body)| (scope.to_string(), body.to_string()))
    .collect();
    assert_eq!(exporter.collected(), expected);

    assert!(provider.shutdown().is_ok());
    emit(&global::logger("after-shutdown"), "dropped");
    assert_eq!(exporter.collected().len(), expected.len());
}
