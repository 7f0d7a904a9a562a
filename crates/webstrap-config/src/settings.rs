//! Loaded configuration tree and default-on-miss accessors.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use webstrap_params::Coerce;

use crate::{AppConfig, ConfigError};

/// A path into the configuration tree.
///
/// Implemented for dotted strings (`"service.port"`) and for arrays or
/// slices of segments (`["service", "port"]`).
pub trait KeyPath {
    /// The individual segments of the path.
    fn segments(&self) -> Vec<&str>;
}

impl KeyPath for str {
    fn segments(&self) -> Vec<&str> {
        self.split('.').filter(|s| !s.is_empty()).collect()
    }
}

impl KeyPath for String {
    fn segments(&self) -> Vec<&str> {
        self.as_str().segments()
    }
}

impl<'a, const N: usize> KeyPath for [&'a str; N] {
    fn segments(&self) -> Vec<&str> {
        self.to_vec()
    }
}

impl<'a> KeyPath for [&'a str] {
    fn segments(&self) -> Vec<&str> {
        self.to_vec()
    }
}

impl<K: KeyPath + ?Sized> KeyPath for &K {
    fn segments(&self) -> Vec<&str> {
        (**self).segments()
    }
}

/// Loaded configuration.
///
/// # Example
///
/// ```
/// use webstrap_config::Settings;
///
/// let settings = Settings::from_value(serde_json::json!({
///     "service": { "name": "orders", "port": 8080 }
/// }));
///
/// assert_eq!(settings.get("service.name").string("unknown"), "orders");
/// assert_eq!(settings.get(["service", "port"]).int(0), 8080);
/// assert_eq!(settings.get("service.host").string("localhost"), "localhost");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    root: Value,
    source: Option<PathBuf>,
}

impl Settings {
    /// Wraps an already-built tree.
    #[must_use]
    pub fn from_value(root: Value) -> Self {
        Self { root, source: None }
    }

    pub(crate) fn with_source(mut self, source: Option<PathBuf>) -> Self {
        self.source = source;
        self
    }

    /// The configuration file that was loaded, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The whole tree.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Looks up `key`. The returned entry falls back to the caller's default
    /// for anything missing or of the wrong shape.
    pub fn get(&self, key: impl KeyPath) -> Entry<'_> {
        let segments = key.segments();
        let mut value = Some(&self.root);
        for segment in &segments {
            value = value.and_then(|v| v.get(segment));
        }
        Entry {
            key: segments.join("."),
            value: value.filter(|v| !v.is_null()),
        }
    }

    /// Returns true if `key` holds a non-null value.
    pub fn is_set(&self, key: impl KeyPath) -> bool {
        self.get(key).is_set()
    }

    /// Checks that every key in `keys` is set, reporting the first one that
    /// is not.
    pub fn require<K: KeyPath>(&self, keys: impl IntoIterator<Item = K>) -> Result<(), ConfigError> {
        for key in keys {
            let entry = self.get(&key);
            if !entry.is_set() {
                return Err(ConfigError::missing_field(entry.key));
            }
        }
        Ok(())
    }

    /// Deserializes the subtree at `key` into `T`.
    pub fn section<T: DeserializeOwned>(&self, key: impl KeyPath) -> Result<T, ConfigError> {
        let entry = self.get(key);
        let value = entry.value.cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
            .map_err(|e| ConfigError::invalid_value(entry.key, e.to_string()))
    }

    /// The typed view of the well-known keys, with defaults for anything
    /// unset.
    pub fn app_config(&self) -> Result<AppConfig, ConfigError> {
        if self.root.is_null() {
            return Ok(AppConfig::default());
        }
        serde_json::from_value(self.root.clone())
            .map_err(|e| ConfigError::invalid_value("<root>", e.to_string()))
    }
}

/// A configuration lookup result.
///
/// Every accessor takes a default and returns it when the key is missing
/// or its value cannot be read as the requested type.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    key: String,
    value: Option<&'a Value>,
}

impl<'a> Entry<'a> {
    /// The dotted key this entry was looked up by.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The raw value, if set.
    #[must_use]
    pub fn value(&self) -> Option<&'a Value> {
        self.value
    }

    /// Returns true if the key holds a non-null value.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    fn text(&self) -> Option<String> {
        match self.value? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Scalar as text. Numbers and booleans are rendered.
    #[must_use]
    pub fn string(&self, default: &str) -> String {
        self.text().unwrap_or_else(|| default.to_owned())
    }

    /// Integer value. Strings holding an integer are accepted.
    #[must_use]
    pub fn int(&self, default: i64) -> i64 {
        match self.value {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(default),
            Some(Value::String(s)) => i64::coerce(s).unwrap_or(default),
            _ => default,
        }
    }

    /// Non-negative integer value.
    #[must_use]
    pub fn uint(&self, default: u64) -> u64 {
        match self.value {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(default),
            Some(Value::String(s)) => u64::coerce(s).unwrap_or(default),
            _ => default,
        }
    }

    /// Floating point value.
    #[must_use]
    pub fn float(&self, default: f64) -> f64 {
        match self.value {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
            Some(Value::String(s)) => f64::coerce(s).unwrap_or(default),
            _ => default,
        }
    }

    /// Boolean value. Strings use the lenient request-parameter rules, so
    /// `yes`, `n` and `1` are understood.
    #[must_use]
    pub fn bool(&self, default: bool) -> bool {
        match self.value {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().map_or(default, |v| v != 0),
            Some(Value::String(s)) => bool::coerce(s).unwrap_or(default),
            _ => default,
        }
    }

    /// Duration. Bare numbers are seconds; strings may carry an `ms`, `s`,
    /// `m` or `h` suffix.
    #[must_use]
    pub fn duration(&self, default: Duration) -> Duration {
        match self.value {
            Some(Value::Number(n)) => n
                .as_f64()
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .unwrap_or(default),
            Some(Value::String(s)) => parse_duration(s).unwrap_or(default),
            _ => default,
        }
    }

    /// Whole seconds as a duration.
    #[must_use]
    pub fn duration_secs(&self, default_secs: u64) -> Duration {
        Duration::from_secs(self.uint(default_secs))
    }

    /// Timestamp. RFC 3339 is accepted along with the request-parameter
    /// timestamp layouts.
    #[must_use]
    pub fn time(&self, default: DateTime<Utc>) -> DateTime<Utc> {
        let Some(Value::String(s)) = self.value else {
            return default;
        };
        DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .ok()
            .or_else(|| DateTime::<Utc>::coerce(s))
            .unwrap_or(default)
    }

    /// List of strings. A scalar string is split on commas.
    #[must_use]
    pub fn string_list(&self, default: Vec<String>) -> Vec<String> {
        match self.value {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
            _ => default,
        }
    }

    /// Table of scalar values rendered as strings.
    #[must_use]
    pub fn string_map(&self, default: HashMap<String, String>) -> HashMap<String, String> {
        match self.value {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(k, v)| {
                    let text = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), text)
                })
                .collect(),
            _ => default,
        }
    }

    /// Table of raw values.
    #[must_use]
    pub fn map(&self, default: Map<String, Value>) -> Map<String, Value> {
        match self.value {
            Some(Value::Object(map)) => map.clone(),
            _ => default,
        }
    }

    /// Raw value, cloned, or `default`.
    #[must_use]
    pub fn or_value(&self, default: Value) -> Value {
        self.value.cloned().unwrap_or(default)
    }
}

fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (number, unit_secs) = if let Some(n) = raw.strip_suffix("ms") {
        (n, 0.001)
    } else if let Some(n) = raw.strip_suffix('s') {
        (n, 1.0)
    } else if let Some(n) = raw.strip_suffix('m') {
        (n, 60.0)
    } else if let Some(n) = raw.strip_suffix('h') {
        (n, 3600.0)
    } else {
        (raw, 1.0)
    };
    let value = f64::coerce(number.trim())?;
    Duration::try_from_secs_f64(value * unit_secs).ok()
}
