//! Descriptive metadata of the entity producing records.
//!
//! A [`Resource`] is immutable once built and shared by every record a
//! provider emits. [`Resource::builder`] starts from the detected defaults:
//!
//! - [`SdkProvidedResourceDetector`]: `service.name` from `OTEL_SERVICE_NAME`,
//!   then `OTEL_RESOURCE_ATTRIBUTES`, then `unknown_service`.
//! - [`TelemetryResourceDetector`]: name, language and version of this SDK.
//! - [`EnvResourceDetector`]: every `key=value` of `OTEL_RESOURCE_ATTRIBUTES`.
mod env;

pub use env::{EnvResourceDetector, SdkProvidedResourceDetector, TelemetryResourceDetector};

use otel_logs::{Key, KeyValue, Value};
use std::borrow::Cow;
use std::collections::{hash_map, HashMap};
use std::sync::Arc;

/// Attribute key of the logical service name.
pub const SERVICE_NAME: &str = "service.name";

#[derive(Debug, Clone, PartialEq)]
struct ResourceInner {
    attrs: HashMap<Key, Value>,
    schema_url: Option<Cow<'static, str>>,
}

/// An immutable set of attributes describing the record producer.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    inner: Arc<ResourceInner>,
}

impl Default for Resource {
    fn default() -> Self {
        Resource::builder().build()
    }
}

impl Resource {
    /// Builder pre-filled with the detected default attributes.
    pub fn builder() -> ResourceBuilder {
        ResourceBuilder {
            resource: Self::from_detectors(&[
                &SdkProvidedResourceDetector,
                &TelemetryResourceDetector,
                &EnvResourceDetector::new(),
            ]),
        }
    }

    /// Builder without any attribute.
    pub fn builder_empty() -> ResourceBuilder {
        ResourceBuilder {
            resource: Resource::empty(),
        }
    }

    /// A resource without attributes or schema URL.
    pub fn empty() -> Self {
        Resource {
            inner: Arc::new(ResourceInner {
                attrs: HashMap::new(),
                schema_url: None,
            }),
        }
    }

    fn from_attributes<T: IntoIterator<Item = KeyValue>>(
        kvs: T,
        schema_url: Option<Cow<'static, str>>,
    ) -> Self {
        Resource {
            inner: Arc::new(ResourceInner {
                attrs: kvs.into_iter().map(|kv| (kv.key, kv.value)).collect(),
                schema_url: schema_url.filter(|url| !url.is_empty()),
            }),
        }
    }

    fn from_detectors(detectors: &[&dyn ResourceDetector]) -> Self {
        detectors
            .iter()
            .fold(Resource::empty(), |resource, detector| {
                resource.merge(&detector.detect())
            })
    }

    /// Combines two resources; attributes of `other` win on key conflicts.
    ///
    /// Schema URLs: equal URLs are kept, conflicting URLs are dropped, and a
    /// URL present on one side only is kept.
    pub fn merge(&self, other: &Resource) -> Self {
        if other.is_empty() && other.schema_url().is_none() {
            return self.clone();
        }
        if self.is_empty() && self.schema_url().is_none() {
            return other.clone();
        }

        let mut attrs = self.inner.attrs.clone();
        attrs.extend(
            other
                .inner
                .attrs
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        let schema_url = match (&self.inner.schema_url, &other.inner.schema_url) {
            (Some(mine), Some(theirs)) if mine == theirs => Some(mine.clone()),
            (Some(_), Some(_)) => None,
            (None, Some(url)) | (Some(url), None) => Some(url.clone()),
            (None, None) => None,
        };

        Resource {
            inner: Arc::new(ResourceInner { attrs, schema_url }),
        }
    }

    /// Schema URL of the resource, if any.
    pub fn schema_url(&self) -> Option<&str> {
        self.inner.schema_url.as_deref()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.inner.attrs.len()
    }

    /// Returns `true` if the resource has no attributes.
    pub fn is_empty(&self) -> bool {
        self.inner.attrs.is_empty()
    }

    /// Iterates over the attributes in no particular order.
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.inner.attrs.iter())
    }

    /// Value of the attribute `key`.
    pub fn get(&self, key: &Key) -> Option<Value> {
        self.inner.attrs.get(key).cloned()
    }
}

/// Iterator over the attributes of a [`Resource`].
#[derive(Debug)]
pub struct Iter<'a>(hash_map::Iter<'a, Key, Value>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Key, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

impl<'a> IntoIterator for &'a Resource {
    type Item = (&'a Key, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Produces a [`Resource`] from the runtime environment.
pub trait ResourceDetector {
    /// Detects the resource; failures yield an empty resource.
    fn detect(&self) -> Resource;
}

/// Builder for [`Resource`]. Later calls override earlier attributes.
#[derive(Debug)]
pub struct ResourceBuilder {
    resource: Resource,
}

impl ResourceBuilder {
    /// Merges in the output of `detector`.
    pub fn with_detector(mut self, detector: &dyn ResourceDetector) -> Self {
        self.resource = self.resource.merge(&detector.detect());
        self
    }

    /// Adds a single attribute.
    pub fn with_attribute(self, kv: KeyValue) -> Self {
        self.with_attributes([kv])
    }

    /// Adds several attributes.
    pub fn with_attributes<T: IntoIterator<Item = KeyValue>>(mut self, kvs: T) -> Self {
        self.resource = self.resource.merge(&Resource::from_attributes(kvs, None));
        self
    }

    /// Sets `service.name`.
    pub fn with_service_name(self, name: impl Into<Value>) -> Self {
        self.with_attribute(KeyValue::new(SERVICE_NAME, name.into()))
    }

    /// Sets the schema URL. An empty URL clears it.
    pub fn with_schema_url(mut self, schema_url: impl Into<Cow<'static, str>>) -> Self {
        let schema_url = Some(schema_url.into()).filter(|url| !url.is_empty());
        let inner = Arc::make_mut(&mut self.resource.inner);
        inner.schema_url = schema_url;
        self
    }

    /// Create the [`Resource`].
    pub fn build(self) -> Resource {
        self.resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case([KeyValue::new("a", ""), KeyValue::new("a", "final")], "final")]
    #[case([KeyValue::new("a", "final"), KeyValue::new("a", "")], "")]
    fn later_attributes_win(#[case] given: [KeyValue; 2], #[case] expected: &'static str) {
        let resource = Resource::builder_empty().with_attributes(given).build();
        assert_eq!(resource.len(), 1);
        assert_eq!(resource.get(&Key::new("a")), Some(Value::from(expected)));
        assert_eq!(resource.schema_url(), None);
    }

    #[test]
    fn merge_prefers_other_attributes() {
        let base = Resource::builder_empty()
            .with_attributes([KeyValue::new("a", "base"), KeyValue::new("b", "kept")])
            .build();
        let overlay = Resource::builder_empty()
            .with_attributes([KeyValue::new("a", "overlay"), KeyValue::new("c", "added")])
            .build();

        let merged = base.merge(&overlay);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get(&Key::new("a")), Some(Value::from("overlay")));
        assert_eq!(merged.get(&Key::new("b")), Some(Value::from("kept")));
        assert_eq!(merged.get(&Key::new("c")), Some(Value::from("added")));
    }

    #[rstest]
    #[case(Some("http://schema/a"), Some("http://schema/a"), Some("http://schema/a"))]
    #[case(Some("http://schema/a"), Some("http://schema/b"), None)]
    #[case(None, Some("http://schema/b"), Some("http://schema/b"))]
    #[case(Some("http://schema/a"), None, Some("http://schema/a"))]
    #[case(None, None, None)]
    fn merge_schema_urls(
        #[case] left: Option<&'static str>,
        #[case] right: Option<&'static str>,
        #[case] expected: Option<&'static str>,
    ) {
        let build = |url: Option<&'static str>| {
            let builder = Resource::builder_empty().with_attribute(KeyValue::new("k", "v"));
            match url {
                Some(url) => builder.with_schema_url(url).build(),
                None => builder.build(),
            }
        };
        assert_eq!(build(left).merge(&build(right)).schema_url(), expected);
    }

    #[test]
    fn empty_schema_url_is_none() {
        let resource = Resource::builder_empty().with_schema_url("").build();
        assert_eq!(resource.schema_url(), None);
    }

    #[test]
    fn default_resource_has_service_and_sdk_attributes() {
        temp_env::with_vars_unset(["OTEL_SERVICE_NAME", "OTEL_RESOURCE_ATTRIBUTES"], || {
            let resource = Resource::builder().build();
            assert_eq!(
                resource.get(&Key::new(SERVICE_NAME)),
                Some(Value::from("unknown_service"))
            );
            assert_eq!(
                resource.get(&Key::new("telemetry.sdk.language")),
                Some(Value::from("rust"))
            );
            assert_eq!(resource.len(), 4);
        });
    }
}
