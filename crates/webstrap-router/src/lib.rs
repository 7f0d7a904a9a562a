//! Path-template router for webstrap services.
//!
//! A [`Router`] maps `(method, path)` pairs to route targets of any type and
//! captures template variables into [`PathVars`]. The server attaches the
//! captured [`PathVars`] to the request extensions, which is where the
//! parameter accessors look them up.
//!
//! ```rust
//! use webstrap_router::{MethodRouter, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert("/users/{id}", MethodRouter::new().get("show").delete("remove"));
//!
//! let m = router.match_route(&Method::DELETE, "/users/7").unwrap();
//! assert_eq!(*m.target, "remove");
//! assert_eq!(m.vars.get("id"), Some("7"));
//! ```

mod methods;
mod node;
mod router;
mod vars;

pub use methods::MethodRouter;
pub use router::Router;
pub use vars::PathVars;

/// A successful match: the route target plus the captured variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// Target registered for the matched template and method.
    pub target: &'a T,
    /// Variables captured from the path.
    pub vars: PathVars,
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn captured_segment_round_trips(value in "[A-Za-z0-9._~-]{1,24}") {
            let mut router = Router::new();
            router.route(Method::GET, "/items/{key}", ());

            let path = format!("/items/{value}");
            let m = router.match_route(&Method::GET, &path).unwrap();
            prop_assert_eq!(m.vars.get("key"), Some(value.as_str()));
        }

        #[test]
        fn encoded_segment_decodes(value in "[ a-z/?#&=%]{1,16}") {
            let mut router = Router::new();
            router.route(Method::GET, "/q/{text}", ());

            let path = format!("/q/{}", urlencoding::encode(&value));
            let m = router.match_route(&Method::GET, &path).unwrap();
            prop_assert_eq!(m.vars.get("text"), Some(value.as_str()));
        }
    }
}
