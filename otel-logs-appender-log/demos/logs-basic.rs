//! run with `$ cargo run --example logs-basic`
//!
//! Routes `log` macros through a batch processor to stdout.
use log::{error, info, warn, Level};
use otel_logs_appender_log::OtelLogBridge;
use otel_logs_sdk::logs::SdkLoggerProvider;
use otel_logs_sdk::Resource;
use otel_logs_stdout::LogExporter;

fn main() {
    let provider = SdkLoggerProvider::builder()
        .with_resource(
            Resource::builder()
                .with_service_name("logs-basic-example")
                .build(),
        )
        .with_batch_exporter(LogExporter::default())
        .build();

    let bridge = OtelLogBridge::new(&provider);
    if let Err(err) = log::set_boxed_logger(Box::new(bridge)) {
        eprintln!("a logger is already installed: {err}");
        return;
    }
    log::set_max_level(Level::Info.to_level_filter());

    let fruit = "apple";
    let price = 2.99;

    error!(fruit, price; "hello from {fruit}. My price is {price}");
    warn!("warn!");
    info!("test log!");

    if let Err(err) = provider.shutdown() {
        eprintln!("shutdown failed: {err}");
    }
}
