use crate::propagation::{Extractor, TraceContextPropagator};
use crate::{Key, KeyValue, TraceContext, Value};
use std::borrow::Cow;
use std::time::SystemTime;

/// A structured log entry.
///
/// A record is built by the producer and handed to [`Logger::emit`] by value,
/// after which the processor chain owns it. Attribute keys are not unique:
/// [`LogRecord::add_attribute`] always appends, [`LogRecord::set_attribute`]
/// replaces the most recent entry with the same key.
///
/// [`Logger::emit`]: crate::logs::Logger::emit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogRecord {
    /// Time when the event occurred.
    pub timestamp: Option<SystemTime>,

    /// Time when the event was observed by the pipeline.
    pub observed_timestamp: Option<SystemTime>,

    /// Numeric severity.
    pub severity_number: Severity,

    /// Severity text as reported by the source, if any.
    pub severity_text: Option<Cow<'static, str>>,

    /// Record body.
    pub body: Option<Value>,

    /// Additional attributes, in insertion order.
    pub attributes: Vec<KeyValue>,

    /// Trace correlation pair.
    pub trace_context: TraceContext,
}

impl LogRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the event timestamp.
    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the observed timestamp.
    pub fn with_observed_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.observed_timestamp = Some(timestamp);
        self
    }

    /// Sets the severity number.
    pub fn with_severity_number(mut self, severity: Severity) -> Self {
        self.severity_number = severity;
        self
    }

    /// Sets the severity text.
    pub fn with_severity_text(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.severity_text = Some(text.into());
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Appends an attribute.
    pub fn with_attribute(mut self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Sets the trace correlation pair.
    pub fn with_trace_context(mut self, trace_context: TraceContext) -> Self {
        self.trace_context = trace_context;
        self
    }

    /// Appends an attribute, keeping any previous entry with the same key.
    pub fn add_attribute(&mut self, key: impl Into<Key>, value: impl Into<Value>) {
        self.attributes.push(KeyValue::new(key, value));
    }

    /// Appends several attributes.
    pub fn add_attributes<I>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = KeyValue>,
    {
        self.attributes.extend(attributes);
    }

    /// Overwrites the latest attribute with the same key, or appends it.
    pub fn set_attribute(&mut self, key: impl Into<Key>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().rev().find(|kv| kv.key == key) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(KeyValue { key, value }),
        }
    }

    /// Replaces every attribute.
    pub fn set_attributes<I>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = KeyValue>,
    {
        self.attributes = attributes.into_iter().collect();
    }

    /// Returns the most recently added value for `key`.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .rev()
            .find(|kv| kv.key.as_str() == key)
            .map(|kv| &kv.value)
    }

    /// Severity text, falling back to the name of the severity number.
    pub fn severity_text(&self) -> Cow<'static, str> {
        match &self.severity_text {
            Some(text) => text.clone(),
            None => Cow::Borrowed(self.severity_number.name()),
        }
    }

    /// Fills the trace correlation pair from a `traceparent` carried by `carrier`.
    ///
    /// Returns `false` and leaves the record untouched when the carrier holds
    /// no valid trace context.
    pub fn set_trace_context_from(&mut self, carrier: &dyn Extractor) -> bool {
        match TraceContextPropagator::new().extract(carrier) {
            Some(trace_context) => {
                self.trace_context = trace_context;
                true
            }
            None => false,
        }
    }
}

/// Log record severity, ordinal 0 to 24.
///
/// Variants are grouped in sub-levels of four per level; `Unspecified` is the
/// default.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    #[default]
    /// UNSPECIFIED
    Unspecified = 0,
    /// TRACE
    Trace = 1,
    /// TRACE2
    Trace2 = 2,
    /// TRACE3
    Trace3 = 3,
    /// TRACE4
    Trace4 = 4,
    /// DEBUG
    Debug = 5,
    /// DEBUG2
    Debug2 = 6,
    /// DEBUG3
    Debug3 = 7,
    /// DEBUG4
    Debug4 = 8,
    /// INFO
    Info = 9,
    /// INFO2
    Info2 = 10,
    /// INFO3
    Info3 = 11,
    /// INFO4
    Info4 = 12,
    /// WARN
    Warn = 13,
    /// WARN2
    Warn2 = 14,
    /// WARN3
    Warn3 = 15,
    /// WARN4
    Warn4 = 16,
    /// ERROR
    Error = 17,
    /// ERROR2
    Error2 = 18,
    /// ERROR3
    Error3 = 19,
    /// ERROR4
    Error4 = 20,
    /// FATAL
    Fatal = 21,
    /// FATAL2
    Fatal2 = 22,
    /// FATAL3
    Fatal3 = 23,
    /// FATAL4
    Fatal4 = 24,
}

const SEVERITIES: [Severity; 25] = [
    Severity::Unspecified,
    Severity::Trace,
    Severity::Trace2,
    Severity::Trace3,
    Severity::Trace4,
    Severity::Debug,
    Severity::Debug2,
    Severity::Debug3,
    Severity::Debug4,
    Severity::Info,
    Severity::Info2,
    Severity::Info3,
    Severity::Info4,
    Severity::Warn,
    Severity::Warn2,
    Severity::Warn3,
    Severity::Warn4,
    Severity::Error,
    Severity::Error2,
    Severity::Error3,
    Severity::Error4,
    Severity::Fatal,
    Severity::Fatal2,
    Severity::Fatal3,
    Severity::Fatal4,
];

impl Severity {
    /// Canonical upper-case name, e.g. `"INFO2"`.
    pub const fn name(&self) -> &'static str {
        match self {
            Severity::Unspecified => "UNSPECIFIED",
            Severity::Trace => "TRACE",
            Severity::Trace2 => "TRACE2",
            Severity::Trace3 => "TRACE3",
            Severity::Trace4 => "TRACE4",
            Severity::Debug => "DEBUG",
            Severity::Debug2 => "DEBUG2",
            Severity::Debug3 => "DEBUG3",
            Severity::Debug4 => "DEBUG4",
            Severity::Info => "INFO",
            Severity::Info2 => "INFO2",
            Severity::Info3 => "INFO3",
            Severity::Info4 => "INFO4",
            Severity::Warn => "WARN",
            Severity::Warn2 => "WARN2",
            Severity::Warn3 => "WARN3",
            Severity::Warn4 => "WARN4",
            Severity::Error => "ERROR",
            Severity::Error2 => "ERROR2",
            Severity::Error3 => "ERROR3",
            Severity::Error4 => "ERROR4",
            Severity::Fatal => "FATAL",
            Severity::Fatal2 => "FATAL2",
            Severity::Fatal3 => "FATAL3",
            Severity::Fatal4 => "FATAL4",
        }
    }

    /// Numeric value of the severity.
    pub const fn number(&self) -> u8 {
        *self as u8
    }

    /// Severity for an ordinal; out of range values map to `Unspecified`.
    pub fn from_number(number: u8) -> Self {
        SEVERITIES
            .get(number as usize)
            .copied()
            .unwrap_or(Severity::Unspecified)
    }
}
