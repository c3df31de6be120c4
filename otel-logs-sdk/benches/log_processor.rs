/*
    Emit cost through the provider with different processors.
    The exporter discards every batch, so the numbers show the cost paid by
    the emitting thread only.

    Run with:
    cargo bench --bench log_processor
*/

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use otel_logs::logs::{LogRecord, Logger, LoggerProvider, Severity};
use otel_logs::InstrumentationScope;
use otel_logs_sdk::error::SdkResult;
use otel_logs_sdk::logs::{
    BatchConfigBuilder, BatchLogProcessor, LogBatch, LogExporter, LogProcessor, SdkLogger,
    SdkLoggerProvider,
};
use std::thread;
use std::time::{Duration, SystemTime};

#[derive(Debug)]
struct DiscardingExporter;

impl LogExporter for DiscardingExporter {
    async fn export(&self, _batch: LogBatch<'_>) -> SdkResult {
        Ok(())
    }
}

#[derive(Debug)]
struct NoopProcessor;

impl LogProcessor for NoopProcessor {
    fn emit(&self, _data: &mut LogRecord, _scope: &InstrumentationScope) {}

    fn force_flush_with_timeout(&self, _timeout: Duration) -> SdkResult {
        Ok(())
    }

    fn shutdown_with_timeout(&self, _timeout: Duration) -> SdkResult {
        Ok(())
    }
}

fn create_log_record(logger: &SdkLogger) -> LogRecord {
    logger
        .create_log_record()
        .with_observed_timestamp(SystemTime::now())
        .with_severity_number(Severity::Warn)
        .with_severity_text("WARN")
        .with_body("Unable to process checkout.")
        .with_attribute("book_id", "12345")
        .with_attribute("book_title", "Rust Programming Adventures")
}

fn batch_provider(queue: usize) -> SdkLoggerProvider {
    let processor = BatchLogProcessor::builder(DiscardingExporter)
        .with_batch_config(
            BatchConfigBuilder::default()
                .with_max_queue_size(queue)
                .with_scheduled_delay(Duration::from_millis(100))
                .build(),
        )
        .build();
    SdkLoggerProvider::builder()
        .with_log_processor(processor)
        .build()
}

fn log_noop_processor(c: &mut Criterion) {
    let provider = SdkLoggerProvider::builder()
        .with_log_processor(NoopProcessor)
        .build();
    let logger = provider.logger("benchmark");

    c.bench_function("log_noop_processor", |b| {
        b.iter(|| logger.emit(create_log_record(&logger)));
    });
}

fn log_simple_processor(c: &mut Criterion) {
    let provider = SdkLoggerProvider::builder()
        .with_simple_exporter(DiscardingExporter)
        .build();
    let logger = provider.logger("benchmark");

    c.bench_function("log_simple_processor", |b| {
        b.iter(|| logger.emit(create_log_record(&logger)));
    });
}

fn log_batch_processor(c: &mut Criterion) {
    let provider = batch_provider(65_536);
    let logger = provider.logger("benchmark");

    c.bench_function("log_batch_processor", |b| {
        b.iter(|| logger.emit(create_log_record(&logger)));
    });
    let _ = provider.shutdown();
}

fn log_batch_processor_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_batch_processor_contended");
    for threads in [2, 4, 8] {
        let provider = batch_provider(65_536);
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                thread::scope(|scope| {
                    for _ in 0..threads {
                        let logger = provider.logger("benchmark");
                        scope.spawn(move || {
                            for _ in 0..100 {
                                logger.emit(create_log_record(&logger));
                            }
                        });
                    }
                });
            });
        });
        let _ = provider.shutdown();
    }
    group.finish();
}

criterion_group!(
    benches,
    log_noop_processor,
    log_simple_processor,
    log_batch_processor,
    log_batch_processor_contended
);
criterion_main!(benches);
