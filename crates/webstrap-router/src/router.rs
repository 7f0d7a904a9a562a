//! Router API.

use http::Method;

use crate::methods::MethodRouter;
use crate::node::{parse_template, Node};
use crate::vars::PathVars;
use crate::RouteMatch;

/// Path-template router.
///
/// Templates are made of literal segments, `{name}` variables and a
/// trailing `*name` catch-all. When several templates could match, literals
/// win over variables and variables win over catch-alls.
///
/// # Example
///
/// ```rust
/// use webstrap_router::Router;
/// use http::Method;
///
/// let mut router = Router::new();
/// router.route(Method::GET, "/users/me", "current");
/// router.route(Method::GET, "/users/{id}", "by-id");
///
/// let m = router.match_route(&Method::GET, "/users/me").unwrap();
/// assert_eq!(*m.target, "current");
///
/// let m = router.match_route(&Method::GET, "/users/42").unwrap();
/// assert_eq!(*m.target, "by-id");
/// assert_eq!(m.vars.get("id"), Some("42"));
/// ```
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    routes: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self {
            root: Node::default(),
            routes: 0,
        }
    }
}

impl<T> Router<T> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a method table for `path`. Tables registered for the same
    /// template are merged; methods already present are kept.
    ///
    /// # Panics
    ///
    /// Panics if a `*name` catch-all is not the last segment of `path`.
    pub fn insert(&mut self, path: &str, methods: MethodRouter<T>) {
        self.root.insert(&parse_template(path), methods);
        self.routes += 1;
    }

    /// Registers a single method for `path`.
    pub fn route(&mut self, method: Method, path: &str, target: T) {
        self.insert(path, MethodRouter::new().on(method, target));
    }

    /// Matches a request method and path.
    ///
    /// Returns `None` both when no template matches and when the template
    /// matches but has no target for `method`; use [`Router::match_path`] to
    /// tell the two apart.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        let (methods, vars) = self.match_path(path)?;
        let target = methods.target(method)?;
        Some(RouteMatch { target, vars })
    }

    /// Matches a path regardless of method.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, PathVars)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.root.find(&segments)
    }

    /// Methods accepted for `path`, or an empty list if no template matches.
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        self.match_path(path)
            .map(|(methods, _)| methods.allowed_methods())
            .unwrap_or_default()
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes == 0
    }
}
