//! Detectors reading the process environment.
use crate::resource::{Resource, ResourceDetector, SERVICE_NAME};
use otel_logs::{Key, KeyValue, Value};
use std::env;

const OTEL_RESOURCE_ATTRIBUTES: &str = "OTEL_RESOURCE_ATTRIBUTES";
const OTEL_SERVICE_NAME: &str = "OTEL_SERVICE_NAME";

/// Reads `OTEL_RESOURCE_ATTRIBUTES`, a comma separated list of `key=value`
/// pairs. Entries without `=` are skipped, keys and values are trimmed.
#[derive(Debug, Default)]
pub struct EnvResourceDetector {
    _private: (),
}

impl EnvResourceDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        EnvResourceDetector { _private: () }
    }
}

impl ResourceDetector for EnvResourceDetector {
    fn detect(&self) -> Resource {
        match env::var(OTEL_RESOURCE_ATTRIBUTES) {
            Ok(value) if !value.is_empty() => parse_resource_attributes(&value),
            _ => Resource::empty(),
        }
    }
}

fn parse_resource_attributes(value: &str) -> Resource {
    Resource::builder_empty()
        .with_attributes(value.split_terminator(',').filter_map(|entry| {
            let (key, value) = entry.split_once('=')?;
            Some(KeyValue::new(key.trim().to_owned(), value.trim().to_owned()))
        }))
        .build()
}

/// Provides `service.name`, which every resource must carry.
#[derive(Debug)]
pub struct SdkProvidedResourceDetector;

impl ResourceDetector for SdkProvidedResourceDetector {
    fn detect(&self) -> Resource {
        let service_name = env::var(OTEL_SERVICE_NAME)
            .ok()
            .filter(|name| !name.is_empty())
            .map(Value::from)
            .or_else(|| {
                EnvResourceDetector::new()
                    .detect()
                    .get(&Key::from_static_str(SERVICE_NAME))
            })
            .unwrap_or_else(|| "unknown_service".into());
        Resource::builder_empty()
            .with_service_name(service_name)
            .build()
    }
}

/// Describes this SDK.
#[derive(Debug)]
pub struct TelemetryResourceDetector;

impl ResourceDetector for TelemetryResourceDetector {
    fn detect(&self) -> Resource {
        Resource::builder_empty()
            .with_attributes([
                KeyValue::new("telemetry.sdk.name", env!("CARGO_PKG_NAME")),
                KeyValue::new("telemetry.sdk.language", "rust"),
                KeyValue::new("telemetry.sdk.version", env!("CARGO_PKG_VERSION")),
            ])
            .build()
    }
}
