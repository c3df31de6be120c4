//! Correlation carriers.
//!
//! An [`Injector`] writes and an [`Extractor`] reads textual key/value fields
//! of some transport message (HTTP headers, message-queue headers, ...).
//! [`TraceContextPropagator`] uses them to move the trace correlation pair of
//! a [`LogRecord`](crate::logs::LogRecord) across process boundaries.
use std::borrow::Cow;
use std::collections::HashMap;

mod trace_context;

pub use trace_context::TraceContextPropagator;

/// Writes fields into a carrier.
pub trait Injector {
    /// Add a key and value to the underlying data.
    fn set(&mut self, key: &str, value: String);
}

/// Reads fields from a carrier.
pub trait Extractor {
    /// Get a value from a key from the underlying data.
    fn get(&self, key: &str) -> Option<Cow<'_, str>>;

    /// Collect all the keys from the underlying data.
    fn keys(&self) -> Vec<Cow<'_, str>>;
}

impl<S: std::hash::BuildHasher> Injector for HashMap<String, String, S> {
    /// Keys are stored lower-cased.
    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_lowercase(), value);
    }
}

impl<S: std::hash::BuildHasher> Extractor for HashMap<String, String, S> {
    /// Case insensitive lookup.
    fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(&key.to_lowercase())
            .map(|v| Cow::Borrowed(v.as_str()))
    }

    fn keys(&self) -> Vec<Cow<'_, str>> {
        self.keys().map(|k| Cow::Borrowed(k.as_str())).collect()
    }
}

/// Ordered message headers with binary values, as carried by message queues.
///
/// `set` replaces an existing header with the same key and appends otherwise;
/// `get` decodes the value as UTF-8, replacing invalid sequences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageHeaders(pub Vec<(String, Vec<u8>)>);

impl MessageHeaders {
    /// Create an empty header list.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Injector for MessageHeaders {
    fn set(&mut self, key: &str, value: String) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.into_bytes(),
            None => self.0.push((key.to_owned(), value.into_bytes())),
        }
    }
}

impl Extractor for MessageHeaders {
    fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| String::from_utf8_lossy(v))
    }

    fn keys(&self) -> Vec<Cow<'_, str>> {
        self.0.iter().map(|(k, _)| Cow::Borrowed(k.as_str())).collect()
    }
}
