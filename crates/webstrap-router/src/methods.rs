//! Per-path method table.

use http::Method;

/// Maps HTTP methods to route targets for a single path.
///
/// The target type is generic: the server stores handlers, tests usually
/// store plain strings.
///
/// # Example
///
/// ```rust
/// use webstrap_router::MethodRouter;
/// use http::Method;
///
/// let methods = MethodRouter::new().get("show").delete("remove");
/// assert_eq!(methods.target(&Method::GET), Some(&"show"));
/// assert_eq!(methods.target(&Method::POST), None);
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<T> {
    entries: Vec<(Method, T)>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> MethodRouter<T> {
    /// Creates an empty method table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `target` for `method`. A later registration for the same
    /// method replaces the earlier one.
    #[must_use]
    pub fn on(mut self, method: Method, target: T) -> Self {
        self.set(method, target);
        self
    }

    /// Registers a GET target.
    #[must_use]
    pub fn get(self, target: T) -> Self {
        self.on(Method::GET, target)
    }

    /// Registers a POST target.
    #[must_use]
    pub fn post(self, target: T) -> Self {
        self.on(Method::POST, target)
    }

    /// Registers a PUT target.
    #[must_use]
    pub fn put(self, target: T) -> Self {
        self.on(Method::PUT, target)
    }

    /// Registers a DELETE target.
    #[must_use]
    pub fn delete(self, target: T) -> Self {
        self.on(Method::DELETE, target)
    }

    /// Registers a PATCH target.
    #[must_use]
    pub fn patch(self, target: T) -> Self {
        self.on(Method::PATCH, target)
    }

    fn set(&mut self, method: Method, target: T) {
        if let Some(slot) = self.entries.iter_mut().find(|(m, _)| *m == method) {
            slot.1 = target;
        } else {
            self.entries.push((method, target));
        }
    }

    /// Returns the target registered for `method`.
    ///
    /// A HEAD request falls back to the GET target when no explicit HEAD
    /// target exists.
    #[must_use]
    pub fn target(&self, method: &Method) -> Option<&T> {
        self.lookup(method).or_else(|| {
            if *method == Method::HEAD {
                self.lookup(&Method::GET)
            } else {
                None
            }
        })
    }

    fn lookup(&self, method: &Method) -> Option<&T> {
        self.entries
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, t)| t)
    }

    /// Adds every method from `other` that is not registered here yet.
    pub fn merge(&mut self, other: Self) {
        for (method, target) in other.entries {
            if self.lookup(&method).is_none() {
                self.entries.push((method, target));
            }
        }
    }

    /// Returns true if no method is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Methods registered for this path, in registration order.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.entries.iter().map(|(m, _)| m.clone()).collect()
    }

    /// Renders the allowed methods as an `Allow` header value.
    #[must_use]
    pub fn allow_header(&self) -> String {
        self.entries
            .iter()
            .map(|(m, _)| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
