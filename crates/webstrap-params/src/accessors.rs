//! Named accessors, one per target type and source.
//!
//! `param_as_*` functions read path variables, `query_param_as_*` functions
//! read the query string. Every one of them returns its `default` when the
//! request is absent, the name is empty, the parameter is missing, or the
//! value does not parse.

use chrono::{DateTime, Utc};

use crate::encode::{to_bytes, to_bytes_named, PrimitiveKind};
use crate::resolve::resolve;
use crate::source::{ParamSource, Source};
use crate::{param_as, query_param_as};

macro_rules! typed_accessors {
    ($($ty:ty, $label:literal => $path_fn:ident, $query_fn:ident;)*) => {$(
        #[doc = concat!("Reads path variable `name` as ", $label, ", or returns `default`.")]
        pub fn $path_fn(source: &(impl ParamSource + ?Sized), name: &str, default: $ty) -> $ty {
            param_as(source, name, default)
        }

        #[doc = concat!("Reads query parameter `name` as ", $label, ", or returns `default`.")]
        pub fn $query_fn(source: &(impl ParamSource + ?Sized), name: &str, default: $ty) -> $ty {
            query_param_as(source, name, default)
        }
    )*};
}

typed_accessors! {
    isize, "a native-width signed integer" => param_as_int, query_param_as_int;
    i8, "an `i8`" => param_as_i8, query_param_as_i8;
    i16, "an `i16`" => param_as_i16, query_param_as_i16;
    i32, "an `i32`" => param_as_i32, query_param_as_i32;
    i64, "an `i64`" => param_as_i64, query_param_as_i64;
    usize, "a native-width unsigned integer" => param_as_uint, query_param_as_uint;
    u8, "a `u8`" => param_as_u8, query_param_as_u8;
    u16, "a `u16`" => param_as_u16, query_param_as_u16;
    u32, "a `u32`" => param_as_u32, query_param_as_u32;
    u64, "a `u64`" => param_as_u64, query_param_as_u64;
    f32, "an `f32`" => param_as_f32, query_param_as_f32;
    f64, "an `f64`" => param_as_f64, query_param_as_f64;
    bool, "a lenient boolean" => param_as_bool, query_param_as_bool;
    DateTime<Utc>, "a UTC timestamp" => param_as_time, query_param_as_time;
}

/// Reads path variable `name` as text, or returns `default`.
///
/// A path variable bound to the empty string is returned as `""`.
pub fn param_as_string(source: &(impl ParamSource + ?Sized), name: &str, default: &str) -> String {
    resolve(source, name, Source::Path).unwrap_or_else(|| default.to_owned())
}

/// Reads query parameter `name` as text, or returns `default`.
pub fn query_param_as_string(
    source: &(impl ParamSource + ?Sized),
    name: &str,
    default: &str,
) -> String {
    resolve(source, name, Source::Query).unwrap_or_else(|| default.to_owned())
}

/// Reads path variable `name` and encodes it as `kind`, or returns `default`.
pub fn param_as_bytes(
    source: &(impl ParamSource + ?Sized),
    name: &str,
    kind: PrimitiveKind,
    default: Vec<u8>,
) -> Vec<u8> {
    match resolve(source, name, Source::Path) {
        Some(raw) => to_bytes(&raw, kind, default),
        None => default,
    }
}

/// Reads query parameter `name` and encodes it as `kind`, or returns
/// `default`.
pub fn query_param_as_bytes(
    source: &(impl ParamSource + ?Sized),
    name: &str,
    kind: PrimitiveKind,
    default: Vec<u8>,
) -> Vec<u8> {
    match resolve(source, name, Source::Query) {
        Some(raw) => to_bytes(&raw, kind, default),
        None => default,
    }
}

/// [`param_as_bytes`] with the kind given by name; an unknown name yields
/// `default`.
pub fn param_as_bytes_named(
    source: &(impl ParamSource + ?Sized),
    name: &str,
    kind: &str,
    default: Vec<u8>,
) -> Vec<u8> {
    match resolve(source, name, Source::Path) {
        Some(raw) => to_bytes_named(&raw, kind, default),
        None => default,
    }
}

/// [`query_param_as_bytes`] with the kind given by name; an unknown name
/// yields `default`.
pub fn query_param_as_bytes_named(
    source: &(impl ParamSource + ?Sized),
    name: &str,
    kind: &str,
    default: Vec<u8>,
) -> Vec<u8> {
    match resolve(source, name, Source::Query) {
        Some(raw) => to_bytes_named(&raw, kind, default),
        None => default,
    }
}
