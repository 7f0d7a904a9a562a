//! Typed request parameter accessors for webstrap services.
//!
//! The accessors read a named parameter from a request, either a path
//! variable captured by `webstrap-router` or a query-string value, and
//! coerce it to the requested type. They never fail: a missing request,
//! an empty name, a missing parameter or an unparseable value all yield
//! the caller's default.
//!
//! ```rust
//! use http::Request;
//! use webstrap_params::{param_as_u32, query_param_as, query_param_as_bool, PathVars};
//!
//! let mut req = Request::builder()
//!     .uri("/users/42?verbose=yes&limit=abc")
//!     .body(())
//!     .unwrap();
//! req.extensions_mut().insert([("id", "42")].into_iter().collect::<PathVars>());
//!
//! assert_eq!(param_as_u32(&req, "id", 0), 42);
//! assert!(query_param_as_bool(&req, "verbose", false));
//! assert_eq!(query_param_as(&req, "limit", 20u16), 20);
//!
//! let missing: Option<Request<()>> = None;
//! assert_eq!(param_as_u32(&missing, "id", 7), 7);
//! ```
//!
//! | Type | Path | Query |
//! |------|------|-------|
//! | `String` | [`param_as_string`] | [`query_param_as_string`] |
//! | `isize` / `usize` | [`param_as_int`] / [`param_as_uint`] | [`query_param_as_int`] / [`query_param_as_uint`] |
//! | fixed-width integers | `param_as_{i8..i64,u8..u64}` | `query_param_as_{i8..i64,u8..u64}` |
//! | `f32` / `f64` | [`param_as_f32`] / [`param_as_f64`] | [`query_param_as_f32`] / [`query_param_as_f64`] |
//! | `bool` | [`param_as_bool`] | [`query_param_as_bool`] |
//! | `DateTime<Utc>` | [`param_as_time`] | [`query_param_as_time`] |
//! | bytes | [`param_as_bytes`] | [`query_param_as_bytes`] |
//!
//! Any [`Coerce`] type can also be read with the generic [`param_as`] and
//! [`query_param_as`].

mod accessors;
mod coerce;
mod encode;
mod resolve;
mod source;

pub use accessors::*;
pub use coerce::{Coerce, TIMESTAMP_FORMATS};
pub use encode::{encode, to_bytes, to_bytes_named, PrimitiveKind, UnknownKind};
pub use resolve::resolve;
pub use source::{ParamSource, Source};
pub use webstrap_router::PathVars;

/// Reads parameter `name` from `from` and coerces it to `T`.
///
/// Returns `None` if the parameter is absent or does not parse.
pub fn lookup<T: Coerce>(source: &(impl ParamSource + ?Sized), name: &str, from: Source) -> Option<T> {
    resolve(source, name, from).and_then(|raw| T::coerce(&raw))
}

/// Reads path variable `name` as `T`, or returns `default`.
pub fn param_as<T: Coerce>(source: &(impl ParamSource + ?Sized), name: &str, default: T) -> T {
    lookup(source, name, Source::Path).unwrap_or(default)
}

/// Reads query parameter `name` as `T`, or returns `default`.
pub fn query_param_as<T: Coerce>(source: &(impl ParamSource + ?Sized), name: &str, default: T) -> T {
    lookup(source, name, Source::Query).unwrap_or(default)
}
