use chrono::{DateTime, SecondsFormat, Utc};
use otel_logs::{Array, InstrumentationScope, TraceContext};
use otel_logs_sdk::logs::LogBatch;
use otel_logs_sdk::Resource;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

/// One exported batch, grouped by scope in order of first appearance.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogsData<'a> {
    resource_logs: Vec<ResourceLogs<'a>>,
}

impl<'a> LogsData<'a> {
    pub(crate) fn new(resource: &'a Resource, batch: &LogBatch<'a>) -> Self {
        let mut scope_logs: Vec<ScopeLogs<'a>> = Vec::new();
        for (record, scope) in batch.iter() {
            let record = LogRecord::from(record);
            match scope_logs.iter_mut().find(|logs| logs.identity == scope) {
                Some(logs) => logs.log_records.push(record),
                None => scope_logs.push(ScopeLogs {
                    identity: scope,
                    scope: Scope::from(scope),
                    log_records: vec![record],
                    schema_url: scope.schema_url(),
                }),
            }
        }

        LogsData {
            resource_logs: vec![ResourceLogs {
                resource: ResourceAttributes::from(resource),
                scope_logs,
                schema_url: resource.schema_url(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceLogs<'a> {
    resource: ResourceAttributes,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    scope_logs: Vec<ScopeLogs<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ResourceAttributes {
    attributes: Vec<KeyValue>,
}

impl From<&Resource> for ResourceAttributes {
    fn from(resource: &Resource) -> Self {
        let mut attributes: Vec<KeyValue> = resource
            .iter()
            .map(|(key, value)| KeyValue {
                key: key.as_str().to_string(),
                value: value.into(),
            })
            .collect();
        attributes.sort_by(|a, b| a.key.cmp(&b.key));
        ResourceAttributes { attributes }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScopeLogs<'a> {
    #[serde(skip)]
    identity: &'a InstrumentationScope,
    scope: Scope<'a>,
    log_records: Vec<LogRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Scope<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<KeyValue>,
}

impl<'a> From<&'a InstrumentationScope> for Scope<'a> {
    fn from(scope: &'a InstrumentationScope) -> Self {
        Scope {
            name: scope.name(),
            version: scope.version(),
            attributes: scope.attributes().map(KeyValue::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogRecord {
    #[serde(serialize_with = "as_opt_unix_nano")]
    time_unix_nano: Option<SystemTime>,
    #[serde(serialize_with = "as_opt_human_readable")]
    time: Option<SystemTime>,
    #[serde(serialize_with = "as_opt_unix_nano")]
    observed_time_unix_nano: Option<SystemTime>,
    severity_number: u8,
    severity_text: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<Value>,
    attributes: Vec<KeyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flags: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    span_id: Option<String>,
}

impl From<&otel_logs::logs::LogRecord> for LogRecord {
    fn from(record: &otel_logs::logs::LogRecord) -> Self {
        let trace_context = valid_trace_context(&record.trace_context);
        LogRecord {
            time_unix_nano: record.timestamp,
            time: record.timestamp,
            observed_time_unix_nano: record.observed_timestamp,
            severity_number: record.severity_number.number(),
            severity_text: record.severity_text(),
            body: record.body.as_ref().map(Value::from),
            attributes: record.attributes.iter().map(KeyValue::from).collect(),
            flags: trace_context.map(|c| c.trace_flags.to_u8()),
            trace_id: trace_context.map(|c| c.trace_id.to_string()),
            span_id: trace_context.map(|c| c.span_id.to_string()),
        }
    }
}

pub(crate) fn valid_trace_context(trace_context: &TraceContext) -> Option<&TraceContext> {
    trace_context.is_valid().then_some(trace_context)
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub(crate) enum Value {
    #[serde(rename = "boolValue")]
    Bool(bool),
    #[serde(rename = "intValue")]
    Int(i64),
    #[serde(rename = "doubleValue")]
    Double(f64),
    #[serde(rename = "stringValue")]
    String(String),
    #[serde(rename = "arrayValue")]
    Array(Vec<Value>),
}

impl From<&otel_logs::Value> for Value {
    fn from(value: &otel_logs::Value) -> Self {
        match value {
            otel_logs::Value::Bool(b) => Value::Bool(*b),
            otel_logs::Value::I64(i) => Value::Int(*i),
            otel_logs::Value::F64(f) => Value::Double(*f),
            otel_logs::Value::String(s) => Value::String(s.as_str().to_string()),
            otel_logs::Value::Array(array) => Value::Array(match array {
                Array::Bool(values) => values.iter().copied().map(Value::Bool).collect(),
                Array::I64(values) => values.iter().copied().map(Value::Int).collect(),
                Array::F64(values) => values.iter().copied().map(Value::Double).collect(),
                Array::String(values) => values
                    .iter()
                    .map(|s| Value::String(s.as_str().to_string()))
                    .collect(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub(crate) struct KeyValue {
    key: String,
    value: Value,
}

impl From<&otel_logs::KeyValue> for KeyValue {
    fn from(kv: &otel_logs::KeyValue) -> Self {
        KeyValue {
            key: kv.key.as_str().to_string(),
            value: (&kv.value).into(),
        }
    }
}

/// `2024-05-01T12:00:00.000000Z`
pub(crate) fn human_readable(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn as_opt_human_readable<S>(time: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match time {
        None => serializer.serialize_none(),
        Some(time) => serializer.serialize_str(&human_readable(*time)),
    }
}

fn as_opt_unix_nano<S>(time: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match time {
        None => serializer.serialize_none(),
        Some(time) => {
            let nanos = time
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos();
            serializer.serialize_u64(u64::try_from(nanos).unwrap_or(u64::MAX))
        }
    }
}
