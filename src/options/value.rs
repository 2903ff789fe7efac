//! Option values and option maps.
//!
//! `OptionValue` is the dynamic value that flows from markup attributes,
//! component defaults and theme configuration into widgets. Functions are
//! carried as reference-counted callables so merges copy the handle, never the
//! body.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

// =============================================================================
// OptionValue
// =============================================================================

/// Callable option (callbacks such as `onChange`, `onShow`).
pub type OptionFn = Rc<dyn Fn(&[OptionValue]) -> OptionValue>;

/// A single option value.
#[derive(Clone, Default)]
pub enum OptionValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<OptionValue>),
    Map(Options),
    Function(OptionFn),
}

impl OptionValue {
    /// Wrap a closure as a function option.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[OptionValue]) -> OptionValue + 'static,
    {
        Self::Function(Rc::new(f))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[OptionValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Options> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_fn(&self) -> Option<&OptionFn> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Invoke a function option. Non-functions yield `Null`.
    pub fn call(&self, args: &[OptionValue]) -> OptionValue {
        match self {
            Self::Function(f) => f(args),
            _ => Self::Null,
        }
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Number(n) => write!(f, "Number({n})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::List(items) => f.debug_list().entries(items).finish(),
            Self::Map(map) => map.fmt(f),
            Self::Function(_) => f.write_str("<function>"),
        }
    }
}

/// Functions compare by identity.
impl PartialEq for OptionValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<f32> for OptionValue {
    fn from(n: f32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for OptionValue {
    fn from(n: i32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<usize> for OptionValue {
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Options> for OptionValue {
    fn from(map: Options) -> Self {
        Self::Map(map)
    }
}

impl From<Vec<OptionValue>> for OptionValue {
    fn from(items: Vec<OptionValue>) -> Self {
        Self::List(items)
    }
}

impl From<serde_json::Value> for OptionValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or_default()),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<toml::Value> for OptionValue {
    fn from(value: toml::Value) -> Self {
        use toml::Value;
        match value {
            Value::Boolean(b) => Self::Bool(b),
            Value::Integer(n) => Self::Number(n as f64),
            Value::Float(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Datetime(dt) => Self::String(dt.to_string()),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Table(table) => Self::Map(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

// =============================================================================
// Options
// =============================================================================

/// Map of option name to value.
#[derive(Clone, Default, PartialEq)]
pub struct Options(BTreeMap<String, OptionValue>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Option<OptionValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut OptionValue> {
        self.0.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<OptionValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(OptionValue::as_bool)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(OptionValue::as_f64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_str)
    }

    pub fn get_map(&self, key: &str) -> Option<&Options> {
        self.get(key).and_then(OptionValue::as_map)
    }

    pub fn get_fn(&self, key: &str) -> Option<&OptionFn> {
        self.get(key).and_then(OptionValue::as_fn)
    }

    /// Call the function stored under `key`, if any.
    pub fn call(&self, key: &str, args: &[OptionValue]) -> Option<OptionValue> {
        self.get_fn(key).map(|f| f(args))
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl FromIterator<(String, OptionValue)> for Options {
    fn from_iter<I: IntoIterator<Item = (String, OptionValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Options {
    type Item = (String, OptionValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_builder_and_accessors() {
        let opts = Options::new()
            .with("delay", 5000)
            .with("theme", "bootstrap")
            .with("closeOnClick", true);

        assert_eq!(opts.get_f64("delay"), Some(5000.0));
        assert_eq!(opts.get_str("theme"), Some("bootstrap"));
        assert_eq!(opts.get_bool("closeOnClick"), Some(true));
        assert_eq!(opts.get_bool("theme"), None);
        assert_eq!(opts.len(), 3);
    }

    #[test]
    fn test_function_identity() {
        let f = OptionValue::function(|_| OptionValue::Null);
        let g = f.clone();
        let h = OptionValue::function(|_| OptionValue::Null);

        assert_eq!(f, g);
        assert_ne!(f, h);
        assert_eq!(format!("{f:?}"), "<function>");
    }

    #[test]
    fn test_call() {
        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let opts = Options::new().with(
            "onChange",
            OptionValue::function(move |args| {
                hits_clone.set(hits_clone.get() + 1);
                args.first().cloned().unwrap_or_default()
            }),
        );

        let out = opts.call("onChange", &[OptionValue::from(3)]);
        assert_eq!(out, Some(OptionValue::Number(3.0)));
        assert_eq!(hits.get(), 1);
        assert_eq!(opts.call("missing", &[]), None);
    }

    #[test]
    fn test_from_json() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"a": 1, "b": [true, null], "c": {"d": "x"}}"#).unwrap();
        let value = OptionValue::from(json);
        let map = value.as_map().unwrap();

        assert_eq!(map.get_f64("a"), Some(1.0));
        assert_eq!(
            map.get("b"),
            Some(&OptionValue::List(vec![OptionValue::Bool(true), OptionValue::Null]))
        );
        assert_eq!(map.get_map("c").unwrap().get_str("d"), Some("x"));
    }

    #[test]
    fn test_from_toml() {
        let table: toml::Value = toml::from_str("speed = 30\n[classes]\nsvg = \"pie\"\n").unwrap();
        let value = OptionValue::from(table);
        let map = value.as_map().unwrap();

        assert_eq!(map.get_f64("speed"), Some(30.0));
        assert_eq!(map.get_map("classes").unwrap().get_str("svg"), Some("pie"));
    }
}
