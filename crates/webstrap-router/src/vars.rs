//! Path variables captured by a route match.
//!
//! The router stores the captured variables in the request's
//! [`http::Extensions`] so handlers (and the parameter accessors in
//! `webstrap-params`) can look them up by name.

use smallvec::SmallVec;

/// Number of variables stored inline before spilling to the heap.
const INLINE_VARS: usize = 4;

/// Variables captured from a matched path template.
///
/// Names are the template names without braces (`{id}` is stored as `id`),
/// values are percent-decoded. Lookup returns the first binding for a name.
///
/// # Example
///
/// ```rust
/// use webstrap_router::PathVars;
///
/// let mut vars = PathVars::new();
/// vars.insert("id", "42");
///
/// assert_eq!(vars.get("id"), Some("42"));
/// assert_eq!(vars.get("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathVars {
    entries: SmallVec<[(String, String); INLINE_VARS]>,
}

impl PathVars {
    /// Creates an empty set of variables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns the value bound to `name`, if any.
    ///
    /// A variable bound to an empty string is reported as `Some("")`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Percent-decodes a captured segment, keeping the raw text when the
/// escapes do not form valid UTF-8.
pub(crate) fn decode_segment(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), std::borrow::Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_vars() {
        let vars = PathVars::new();
        assert!(vars.is_empty());
        assert_eq!(vars.len(), 0);
        assert_eq!(vars.get("id"), None);
    }

    #[test]
    fn test_empty_value_is_present() {
        let mut vars = PathVars::new();
        vars.insert("name", "");
        assert_eq!(vars.get("name"), Some(""));
        assert!(vars.contains("name"));
    }

    #[test]
    fn test_first_binding_wins() {
        let vars: PathVars = [("id", "1"), ("id", "2")].into_iter().collect();
        assert_eq!(vars.get("id"), Some("1"));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_iter_preserves_order() {
        let vars: PathVars = [("org", "acme"), ("user", "7")].into_iter().collect();
        let collected: Vec<_> = vars.iter().collect();
        assert_eq!(collected, vec![("org", "acme"), ("user", "7")]);
    }

    #[test]
    fn test_spill_past_inline_capacity() {
        let mut vars = PathVars::new();
        for i in 0..10 {
            vars.insert(format!("v{i}"), i.to_string());
        }
        assert_eq!(vars.get("v9"), Some("9"));
    }

    #[test]
    fn test_decode_segment() {
        assert_eq!(decode_segment("hello%20world"), "hello world");
        assert_eq!(decode_segment("plain"), "plain");
        // '+' is literal in a path
        assert_eq!(decode_segment("a+b"), "a+b");
        assert_eq!(decode_segment("%FF"), "%FF");
    }
}
