use std::borrow::{Borrow, Cow};
use std::sync::Arc;
use std::{fmt, hash};

/// The name half of an attribute [KeyValue] pair.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Cow<'static, str>);

impl Key {
    /// Create a new `Key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use otel_logs::Key;
    ///
    /// let static_key = Key::new("http.method");
    /// let owned_key = Key::new(String::from("user.id"));
    /// assert_eq!(static_key.as_str(), "http.method");
    /// ```
    pub fn new(value: impl Into<Key>) -> Self {
        value.into()
    }

    /// Create a new const `Key`.
    pub const fn from_static_str(value: &'static str) -> Self {
        Key(Cow::Borrowed(value))
    }

    /// Returns the key name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Key {
    fn from(key: &'static str) -> Self {
        Key(Cow::Borrowed(key))
    }
}

impl From<String> for Key {
    fn from(key: String) -> Self {
        Key(Cow::Owned(key))
    }
}

impl From<Arc<str>> for Key {
    fn from(key: Arc<str>) -> Self {
        Key(Cow::Owned(key.as_ref().to_owned()))
    }
}

impl From<Cow<'static, str>> for Key {
    fn from(key: Cow<'static, str>) -> Self {
        Key(key)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.0.into_owned()
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// String payload of a [Value].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StringValue(Cow<'static, str>);

impl StringValue {
    /// Returns a string slice to this value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for StringValue {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<StringValue> for String {
    fn from(s: StringValue) -> Self {
        s.0.into_owned()
    }
}

impl From<&'static str> for StringValue {
    fn from(s: &'static str) -> Self {
        StringValue(Cow::Borrowed(s))
    }
}

impl From<String> for StringValue {
    fn from(s: String) -> Self {
        StringValue(Cow::Owned(s))
    }
}

impl From<Cow<'static, str>> for StringValue {
    fn from(s: Cow<'static, str>) -> Self {
        StringValue(s)
    }
}

/// A [Value::Array] holding values of a single type.
#[derive(Clone, Debug, PartialEq)]
pub enum Array {
    /// Array of bools
    Bool(Vec<bool>),
    /// Array of integers
    I64(Vec<i64>),
    /// Array of floats
    F64(Vec<f64>),
    /// Array of strings
    String(Vec<StringValue>),
}

impl Array {
    /// Number of elements in the array.
    pub fn len(&self) -> usize {
        match self {
            Array::Bool(v) => v.len(),
            Array::I64(v) => v.len(),
            Array::F64(v) => v.len(),
            Array::String(v) => v.len(),
        }
    }

    /// Returns `true` if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn write_list<T, F>(items: &[T], f: &mut fmt::Formatter<'_>, item: F) -> fmt::Result
where
    F: Fn(&T, &mut fmt::Formatter<'_>) -> fmt::Result,
{
    f.write_str("[")?;
    for (i, value) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        item(value, f)?;
    }
    f.write_str("]")
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Array::Bool(values) => write_list(values, f, |v, f| write!(f, "{v}")),
            Array::I64(values) => write_list(values, f, |v, f| write!(f, "{v}")),
            Array::F64(values) => write_list(values, f, |v, f| write!(f, "{v}")),
            Array::String(values) => write_list(values, f, |v, f| write!(f, "\"{v}\"")),
        }
    }
}

impl From<Vec<bool>> for Array {
    fn from(values: Vec<bool>) -> Self {
        Array::Bool(values)
    }
}

impl From<Vec<i64>> for Array {
    fn from(values: Vec<i64>) -> Self {
        Array::I64(values)
    }
}

impl From<Vec<f64>> for Array {
    fn from(values: Vec<f64>) -> Self {
        Array::F64(values)
    }
}

impl From<Vec<StringValue>> for Array {
    fn from(values: Vec<StringValue>) -> Self {
        Array::String(values)
    }
}

/// Typed payload used for record bodies and attribute values.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// bool values
    Bool(bool),
    /// i64 values
    I64(i64),
    /// f64 values
    F64(f64),
    /// String values
    String(StringValue),
    /// Array of homogeneous values
    Array(Array),
}

impl Value {
    /// String representation of the `Value`.
    ///
    /// Allocates unless the value already is a string.
    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            Value::String(v) => Cow::Borrowed(v.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => v.fmt(f),
            Value::I64(v) => v.fmt(f),
            Value::F64(v) => v.fmt(f),
            Value::String(v) => f.write_str(v.as_str()),
            Value::Array(v) => v.fmt(f),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<StringValue> for Value {
    fn from(v: StringValue) -> Self {
        Value::String(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Value::Array(v)
    }
}

impl From<&'static str> for Value {
    fn from(s: &'static str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<Cow<'static, str>> for Value {
    fn from(s: Cow<'static, str>) -> Self {
        Value::String(s.into())
    }
}

/// A key-value pair describing an attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    /// The attribute name
    pub key: Key,

    /// The attribute value
    pub value: Value,
}

impl KeyValue {
    /// Create a new `KeyValue` pair.
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
    {
        KeyValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Identity of the code path that created a logger.
///
/// Two scopes are equal when their name, version and schema URL match;
/// attributes do not take part in the identity.
#[derive(Debug, Default, Clone)]
pub struct InstrumentationScope {
    name: Cow<'static, str>,
    version: Option<Cow<'static, str>>,
    schema_url: Option<Cow<'static, str>>,
    attributes: Vec<KeyValue>,
}

impl Eq for InstrumentationScope {}

impl PartialEq for InstrumentationScope {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.schema_url == other.schema_url
    }
}

impl hash::Hash for InstrumentationScope {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.version.hash(state);
        self.schema_url.hash(state);
    }
}

impl InstrumentationScope {
    /// Create a new builder to create an [InstrumentationScope]
    pub fn builder<T: Into<Cow<'static, str>>>(name: T) -> InstrumentationScopeBuilder {
        InstrumentationScopeBuilder {
            scope: InstrumentationScope {
                name: name.into(),
                ..Default::default()
            },
        }
    }

    /// Returns a builder pre-filled with this scope, renamed to `name`.
    pub fn to_builder_with_name<T: Into<Cow<'static, str>>>(
        &self,
        name: T,
    ) -> InstrumentationScopeBuilder {
        InstrumentationScopeBuilder {
            scope: InstrumentationScope {
                name: name.into(),
                ..self.clone()
            },
        }
    }

    /// Returns the instrumentation scope name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the instrumentation scope version.
    #[inline]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns the schema URL used by this scope.
    #[inline]
    pub fn schema_url(&self) -> Option<&str> {
        self.schema_url.as_deref()
    }

    /// Returns the scope attributes to associate with emitted records.
    #[inline]
    pub fn attributes(&self) -> impl Iterator<Item = &KeyValue> {
        self.attributes.iter()
    }
}

/// Configuration options for [InstrumentationScope].
#[derive(Debug)]
pub struct InstrumentationScopeBuilder {
    scope: InstrumentationScope,
}

impl InstrumentationScopeBuilder {
    /// Configure the version for the instrumentation scope
    ///
    /// # Examples
    ///
    /// ```
    /// let scope = otel_logs::InstrumentationScope::builder("checkout")
    ///     .with_version("v0.1.0")
    ///     .build();
    /// assert_eq!(scope.version(), Some("v0.1.0"));
    /// ```
    pub fn with_version(mut self, version: impl Into<Cow<'static, str>>) -> Self {
        self.scope.version = Some(version.into());
        self
    }

    /// Configure the schema URL for the instrumentation scope
    pub fn with_schema_url(mut self, schema_url: impl Into<Cow<'static, str>>) -> Self {
        self.scope.schema_url = Some(schema_url.into());
        self
    }

    /// Configure the attributes for the instrumentation scope
    pub fn with_attributes<I>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = KeyValue>,
    {
        self.scope.attributes = attributes.into_iter().collect();
        self
    }

    /// Create a new [InstrumentationScope] from this configuration
    pub fn build(self) -> InstrumentationScope {
        self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(scope: &InstrumentationScope) -> u64 {
        let mut hasher = DefaultHasher::new();
        scope.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn scope_identity_ignores_attributes() {
        let first = InstrumentationScope::builder("payments")
            .with_version("1.0")
            .with_attributes([KeyValue::new("tier", "gold")])
            .build();
        let second = InstrumentationScope::builder("payments")
            .with_version("1.0")
            .build();
        assert_eq!(first, second);
        assert_eq!(hash_of(&first), hash_of(&second));

        let other_schema = InstrumentationScope::builder("payments")
            .with_version("1.0")
            .with_schema_url("https://opentelemetry.io/schemas/1.21.0")
            .build();
        assert_ne!(first, other_schema);
    }

    #[test]
    fn renamed_scope_keeps_everything_else() {
        let scope = InstrumentationScope::builder("")
            .with_version("2.1")
            .with_attributes([KeyValue::new("k", 1_i64)])
            .build();
        let renamed = scope.to_builder_with_name("fallback").build();
        assert_eq!(renamed.name(), "fallback");
        assert_eq!(renamed.version(), Some("2.1"));
        assert_eq!(renamed.attributes().count(), 1);
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(-3_i64).as_str(), "-3");
        assert_eq!(Value::from("plain").as_str(), "plain");
        let strings = Array::from(vec![StringValue::from("a"), StringValue::from("b")]);
        assert_eq!(Value::from(strings).to_string(), "[\"a\",\"b\"]");
        assert_eq!(Value::from(Array::from(vec![1_i64, 2, 3])).to_string(), "[1,2,3]");
    }
}
